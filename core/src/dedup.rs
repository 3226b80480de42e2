//! Adaptive duplicate detection for set elements and map keys.
//!
//! Three strategies scaled to collection size: a linear O(n²) scan for
//! small collections (cheap in practice, no setup cost), a sort-by-hash
//! pass for medium ones (O(n log n) with an O(k) equality check only among
//! hash-colliding neighbors), and a hash-set pass for large ones. The
//! crossover points match this crate's adaptive strategies elsewhere
//! (`tagged_stack`'s small-vec-vs-heap switch is the same idea applied to
//! storage rather than search).

use crate::equality::value_equal;
use crate::hash::value_hash;
use crate::value::Value;
use std::collections::HashSet;

const LINEAR_SCAN_LIMIT: usize = 16;
const SORT_SCAN_LIMIT: usize = 1000;

/// Returns the index of the first element that duplicates an earlier one,
/// or `None` if every element is unique under [`value_equal`].
pub fn first_duplicate(items: &[&Value]) -> Option<usize> {
    if items.len() <= LINEAR_SCAN_LIMIT {
        linear_scan(items)
    } else if items.len() <= SORT_SCAN_LIMIT {
        sorted_scan(items)
    } else {
        hash_set_scan(items)
    }
}

pub fn has_duplicate(items: &[&Value]) -> bool {
    first_duplicate(items).is_some()
}

fn linear_scan(items: &[&Value]) -> Option<usize> {
    for i in 1..items.len() {
        for j in 0..i {
            if value_equal(items[i], items[j]) {
                return Some(i);
            }
        }
    }
    None
}

fn sorted_scan(items: &[&Value]) -> Option<usize> {
    let mut indexed: Vec<(u64, usize)> = items
        .iter()
        .enumerate()
        .map(|(i, v)| (value_hash(v), i))
        .collect();
    indexed.sort_unstable_by_key(|(hash, _)| *hash);

    let mut i = 0;
    while i < indexed.len() {
        let mut j = i + 1;
        while j < indexed.len() && indexed[j].0 == indexed[i].0 {
            j += 1;
        }
        // indexed[i..j] all share a hash; compare pairwise within the group.
        for a in i..j {
            for b in (a + 1)..j {
                let (_, idx_a) = indexed[a];
                let (_, idx_b) = indexed[b];
                if value_equal(items[idx_a], items[idx_b]) {
                    return Some(idx_a.max(idx_b));
                }
            }
        }
        i = j;
    }
    None
}

/// Wraps a `Value` reference so it can live in a `HashSet` keyed by
/// structural hash/equality rather than pointer identity.
struct StructuralKey<'a, 'b>(&'a Value<'b>);

impl<'a, 'b> PartialEq for StructuralKey<'a, 'b> {
    fn eq(&self, other: &Self) -> bool {
        value_equal(self.0, other.0)
    }
}
impl<'a, 'b> Eq for StructuralKey<'a, 'b> {}
impl<'a, 'b> std::hash::Hash for StructuralKey<'a, 'b> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        value_hash(self.0).hash(state)
    }
}

fn hash_set_scan(items: &[&Value]) -> Option<usize> {
    let mut seen: HashSet<StructuralKey> = HashSet::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if !seen.insert(StructuralKey(item)) {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    fn ints(values: &[i64]) -> Vec<Value<'static>> {
        values.iter().map(|&n| Value::new(ValueKind::Int(n))).collect()
    }

    fn refs<'a>(values: &'a [Value<'static>]) -> Vec<&'a Value<'static>> {
        values.iter().collect()
    }

    #[test]
    fn linear_scan_finds_duplicate() {
        let values = ints(&[1, 2, 3, 2]);
        let items = refs(&values);
        assert_eq!(first_duplicate(&items), Some(3));
    }

    #[test]
    fn linear_scan_accepts_unique_small_set() {
        let values = ints(&[1, 2, 3]);
        let items = refs(&values);
        assert!(!has_duplicate(&items));
    }

    #[test]
    fn sorted_scan_finds_duplicate_in_medium_collection() {
        let mut values: Vec<i64> = (0..500).collect();
        values.push(250); // duplicate
        let values = ints(&values);
        let items = refs(&values);
        assert!(items.len() > LINEAR_SCAN_LIMIT);
        assert!(has_duplicate(&items));
    }

    #[test]
    fn sorted_scan_accepts_unique_medium_collection() {
        let values: Vec<i64> = (0..500).collect();
        let values = ints(&values);
        let items = refs(&values);
        assert!(!has_duplicate(&items));
    }

    #[test]
    fn hash_set_scan_finds_duplicate_in_large_collection() {
        let mut values: Vec<i64> = (0..2000).collect();
        values.push(1999); // duplicate
        let values = ints(&values);
        let items = refs(&values);
        assert!(items.len() > SORT_SCAN_LIMIT);
        assert!(has_duplicate(&items));
    }

    #[test]
    fn hash_set_scan_accepts_unique_large_collection() {
        let values: Vec<i64> = (0..2000).collect();
        let values = ints(&values);
        let items = refs(&values);
        assert!(!has_duplicate(&items));
    }
}
