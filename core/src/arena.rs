//! The per-parse arena and the self-owned [`Document`] that pairs it with a
//! root value.
//!
//! One parse allocates from exactly one arena and nothing it produces is
//! freed piecewise; the whole arena is released in one shot when the
//! `Document` that owns it drops. This mirrors this codebase's strand-local
//! bump arenas (see `with_arena`/`ArenaStats` in the runtime crate this is
//! patterned on) generalized from a thread-local singleton to a value owned
//! directly by its caller.

use crate::value::Value;
use bumpalo::Bump;

/// A bump allocator that backs a single parse. Everything a [`crate::Value`]
/// tree references — its own nodes, collection spines, decoded string
/// buffers — is allocated out of one `Arena` and lives exactly as long as it
/// does.
pub struct Arena {
    bump: Bump,
}

impl Arena {
    pub fn new() -> Self {
        Arena { bump: Bump::new() }
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Arena {
            bump: Bump::with_capacity(bytes),
        }
    }

    pub fn alloc<T>(&self, value: T) -> &T {
        self.bump.alloc(value)
    }

    pub fn alloc_str(&self, s: &str) -> &str {
        self.bump.alloc_str(s)
    }

    pub fn alloc_slice_copy<T: Copy>(&self, slice: &[T]) -> &[T] {
        self.bump.alloc_slice_copy(slice)
    }

    pub fn alloc_slice_from_iter<T, I>(&self, iter: I) -> &[T]
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        self.bump.alloc_slice_fill_iter(iter)
    }

    /// Bytes currently reserved by the underlying allocator, across all of
    /// its chunks. Exposed for callers that want to observe arena growth
    /// (e.g. choosing an initial capacity for a subsequent parse).
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Arena::new()
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("allocated_bytes", &self.allocated_bytes())
            .finish()
    }
}

/// A parsed value tree, bundled with the arena that owns its storage.
///
/// `Value<'a>` trees are not self-contained: every node is a reference into
/// an `Arena`. `Document` exists so a caller can hold "a parsed form" as one
/// value without naming that arena's lifetime itself. Internally it erases
/// the root reference's lifetime to `'static` and re-derives a lifetime tied
/// to `&self` on every access, the same trick this codebase's raw-pointer
/// backed `SeqString` uses to decouple an owned buffer's lifetime from the
/// borrows it hands out.
pub struct Document {
    arena: Box<Arena>,
    // Safety: erased from the `Value<'arena>` this was built with. The
    // `Box<Arena>` above never moves or is re-allocated after construction
    // (`Box`'s address is stable independent of `Document`'s own moves), so
    // `root` stays valid for as long as `arena` does, i.e. for the lifetime
    // of this `Document`. Every accessor re-derives a shorter lifetime tied
    // to `&self` before handing a reference out, so the erased `'static`
    // never actually escapes to a caller.
    root: *const Value<'static>,
}

impl Document {
    /// # Safety
    /// `root` must be a reference allocated out of `arena` (directly or
    /// transitively — e.g. a child of the tree `arena` owns).
    pub unsafe fn from_parts(arena: Box<Arena>, root: &Value<'_>) -> Self {
        let root: *const Value<'static> = root as *const Value<'_> as *const Value<'static>;
        Document { arena, root }
    }

    /// The root value produced by the parse.
    pub fn root(&self) -> &Value<'_> {
        // Safety: see the field comment on `root`.
        unsafe { &*(self.root as *const Value<'_>) }
    }

    /// The arena backing this document's storage, for callers that want to
    /// inspect allocation statistics or hand additional allocations the same
    /// lifetime as the tree (e.g. when post-processing the root in place).
    pub fn arena(&self) -> &Arena {
        &self.arena
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("root", self.root())
            .finish()
    }
}

// Safety: a `Document` owns its arena outright (no shared ownership, no
// thread-local state) and every reachable `Value` is plain data or a
// reference into that same owned arena. Nothing in the tree is `!Send`
// beyond the raw pointer, whose only job is carrying an otherwise-Send
// reference across the lifetime-erasure boundary above.
unsafe impl Send for Document {}
