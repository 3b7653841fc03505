use super::OSAvlSet;
use crate::{Config, Duplicates, OSAvlMap, Ordinal};

impl<K: Ordinal> OSAvlSet<K> {
    /// Creates an empty set with capacity for at least `capacity` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlSet;
    ///
    /// let set: OSAvlSet<i32> = OSAvlSet::with_capacity(32);
    /// assert!(set.is_empty());
    /// assert!(set.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        OSAvlSet {
            map: OSAvlMap::with_capacity(capacity),
        }
    }

    /// Creates an empty set with the given [`Config`].
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        OSAvlSet {
            map: OSAvlMap::with_config(config),
        }
    }

    /// Returns the number of elements the set can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Returns how this set treats an insert of an element it already holds.
    #[must_use]
    pub const fn duplicates(&self) -> Duplicates {
        self.map.duplicates()
    }
}
