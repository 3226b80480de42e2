//! Collection construction: turns a vector of already-parsed elements into
//! the arena-backed slice a `List`/`Vector`/`Set`/`Map` node holds, running
//! the adaptive duplicate detector over set elements and map keys.

use edn_core::{first_duplicate, Arena, Error, ErrorKind, Span, ValueKind, ValueRef};

pub fn build_list<'a>(items: Vec<ValueRef<'a>>, arena: &'a Arena) -> ValueKind<'a> {
    ValueKind::List(arena.alloc_slice_from_iter(items))
}

pub fn build_vector<'a>(items: Vec<ValueRef<'a>>, arena: &'a Arena) -> ValueKind<'a> {
    ValueKind::Vector(arena.alloc_slice_from_iter(items))
}

pub fn build_set<'a>(items: Vec<ValueRef<'a>>, arena: &'a Arena, span: Span) -> Result<ValueKind<'a>, Error> {
    if first_duplicate(&items).is_some() {
        return Err(Error::with_static(
            ErrorKind::DuplicateElement,
            "set literal repeats an element",
            span,
        ));
    }
    Ok(ValueKind::Set(arena.alloc_slice_from_iter(items)))
}

pub fn build_map<'a>(
    pairs: Vec<(ValueRef<'a>, ValueRef<'a>)>,
    arena: &'a Arena,
    span: Span,
) -> Result<ValueKind<'a>, Error> {
    let keys: Vec<ValueRef<'a>> = pairs.iter().map(|(k, _)| *k).collect();
    if first_duplicate(&keys).is_some() {
        return Err(Error::with_static(
            ErrorKind::DuplicateKey,
            "map literal repeats a key",
            span,
        ));
    }
    Ok(ValueKind::Map(arena.alloc_slice_from_iter(pairs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use edn_core::Value;

    #[test]
    fn build_list_preserves_order() {
        let arena = Arena::new();
        let a = arena.alloc(Value::new(ValueKind::Int(1)));
        let b = arena.alloc(Value::new(ValueKind::Int(2)));
        let kind = build_list(vec![a, b], &arena);
        match kind {
            ValueKind::List(items) => assert_eq!(items.len(), 2),
            _ => panic!("expected List"),
        }
    }

    #[test]
    fn build_set_rejects_duplicate_elements() {
        let arena = Arena::new();
        let a = arena.alloc(Value::new(ValueKind::Int(1)));
        let b = arena.alloc(Value::new(ValueKind::Int(1)));
        let err = build_set(vec![a, b], &arena, (0, 4)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateElement);
    }

    #[test]
    fn build_map_rejects_duplicate_keys() {
        let arena = Arena::new();
        let k1 = arena.alloc(Value::new(ValueKind::Int(1)));
        let v1 = arena.alloc(Value::new(ValueKind::Bool(true)));
        let k2 = arena.alloc(Value::new(ValueKind::Int(1)));
        let v2 = arena.alloc(Value::new(ValueKind::Bool(false)));
        let err = build_map(vec![(k1, v1), (k2, v2)], &arena, (0, 4)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateKey);
    }

    #[test]
    fn build_map_accepts_unique_keys() {
        let arena = Arena::new();
        let k1 = arena.alloc(Value::new(ValueKind::Int(1)));
        let v1 = arena.alloc(Value::new(ValueKind::Bool(true)));
        let k2 = arena.alloc(Value::new(ValueKind::Int(2)));
        let v2 = arena.alloc(Value::new(ValueKind::Bool(false)));
        let kind = build_map(vec![(k1, v1), (k2, v2)], &arena, (0, 4)).unwrap();
        match kind {
            ValueKind::Map(pairs) => assert_eq!(pairs.len(), 2),
            _ => panic!("expected Map"),
        }
    }
}
