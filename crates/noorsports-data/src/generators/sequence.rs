//! Sequential id assignment.

/// Monotonically increasing integer id source.
///
/// Builders take `&mut IdSequence` so that the ids they hand out depend only on
/// traversal order and the sequence's starting point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    next: i64,
}

impl IdSequence {
    /// Creates a sequence whose first id is `first`.
    pub const fn starting_at(first: i64) -> Self {
        Self { next: first }
    }

    /// Returns the current id and advances the sequence.
    pub fn next_id(&mut self) -> i64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    pub fn peek(&self) -> i64 {
        self.next
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::starting_at(1)
    }
}
