//! Bump allocator backing the AST.
//!
//! Every AST node produced by the parser is allocated here and lives for the
//! lifetime of the `Arena`. Nothing is ever freed node-by-node; the whole
//! arena is dropped at once when compilation finishes.

use bumpalo::Bump;

/// One megabyte: the minimum block size a chunk grows by.
const MIN_BLOCK_SIZE: usize = 1024 * 1024;

/// Bump-pointer storage for AST nodes.
///
/// Wraps `bumpalo::Bump`, which already grows by appending fresh chunks once
/// the current one is exhausted and hands out naturally aligned storage for
/// the small, pointer-and-integer-sized node types defined in `crate::ast`.
pub struct Arena {
    bump: Bump,
}

impl Arena {
    pub fn new() -> Self {
        Self {
            bump: Bump::with_capacity(MIN_BLOCK_SIZE),
        }
    }

    /// Allocate `value` in the arena and return a reference tied to the
    /// arena's lifetime. Never returns the same address twice within a
    /// compilation.
    pub fn alloc<T>(&self, value: T) -> &T {
        self.bump.alloc(value)
    }

    /// Allocate a slice by copying `values` into the arena.
    pub fn alloc_slice<T: Clone>(&self, values: &[T]) -> &[T] {
        self.bump.alloc_slice_clone(values)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}
