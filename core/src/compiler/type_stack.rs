use core::fmt::Write;

use smallvec::SmallVec;

use crate::String;
use crate::types::TypeTag;

/// Default depth of the compile-time type stack.
pub const DEFAULT_TYPE_STACK_DEPTH: usize = 32;

/// Compile-time mirror of the evaluation stack, holding types instead of
/// values. Never used while executing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeStack {
    items: SmallVec<[TypeTag; DEFAULT_TYPE_STACK_DEPTH]>,
    capacity: usize,
}

/// Pushing onto a full [`TypeStack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("type stack exhausted ({capacity} entries)")]
pub struct TypeStackFull {
    pub capacity: usize,
}

impl Default for TypeStack {
    fn default() -> Self {
        Self::new(DEFAULT_TYPE_STACK_DEPTH)
    }
}

impl TypeStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: SmallVec::new(),
            capacity,
        }
    }

    pub fn push(&mut self, tag: TypeTag) -> Result<(), TypeStackFull> {
        if self.items.len() >= self.capacity {
            return Err(TypeStackFull {
                capacity: self.capacity,
            });
        }
        self.items.push(tag);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<TypeTag> {
        self.items.pop()
    }

    /// Entry `depth` positions below the top (`0` is the top).
    pub fn peek(&self, depth: usize) -> Option<TypeTag> {
        let len = self.items.len();
        if depth >= len {
            None
        } else {
            Some(self.items[len - 1 - depth])
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Renders the top entries as `[t0|t1|t2]`, top first.
    ///
    /// Two entries are shown, three when the top holds a destination type.
    pub fn snapshot(&self, match_output: bool) -> String {
        let count = if match_output { 3 } else { 2 };
        let mut out = String::from("[");
        for depth in 0..count {
            let Some(tag) = self.peek(depth) else { break };
            if depth > 0 {
                out.push('|');
            }
            let _ = write!(out, "{}", tag);
        }
        out.push(']');
        out
    }
}
