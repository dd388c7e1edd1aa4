/// Result of an indexer acquisition: one slot index, or nothing when every
/// index is handed out.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IndexHolder(Option<usize>);

impl IndexHolder {
    /// Creates a holder carrying an index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(Some(index))
    }

    /// Creates a holder carrying nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self(None)
    }

    /// Whether this holder carries no index.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// The held index.
    ///
    /// # Panics
    ///
    /// Panics when the holder is empty; check [`is_empty()`][Self::is_empty]
    /// first.
    #[must_use]
    pub fn get(&self) -> usize {
        self.0.expect("no index is held")
    }

    /// The held index, or `None` when the holder is empty.
    #[must_use]
    pub const fn into_option(self) -> Option<usize> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_what_it_was_given() {
        let holder = IndexHolder::new(42);

        assert!(!holder.is_empty());
        assert_eq!(holder.get(), 42);
        assert_eq!(holder.into_option(), Some(42));
    }

    #[test]
    fn empty_holder_holds_nothing() {
        let holder = IndexHolder::empty();

        assert!(holder.is_empty());
        assert_eq!(holder.into_option(), None);
    }

    #[test]
    #[should_panic(expected = "no index is held")]
    fn get_on_empty_panics() {
        let _ = IndexHolder::empty().get();
    }

    #[test]
    fn zero_is_an_ordinary_index() {
        let holder = IndexHolder::new(0);

        assert!(!holder.is_empty());
        assert_eq!(holder.get(), 0);
    }
}
