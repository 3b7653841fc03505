use super::OSAvlMap;
use crate::raw::RawOSAvlMap;
use crate::{Config, Duplicates, Ordinal};

impl<K: Ordinal, V> OSAvlMap<K, V> {
    /// Creates an empty map with capacity for at least `capacity` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let map: OSAvlMap<i32, i32> = OSAvlMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(Config::new().capacity(capacity))
    }

    /// Creates an empty map with the given [`Config`].
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::{Config, Duplicates, OSAvlMap};
    ///
    /// let mut ids = OSAvlMap::with_config(Config::new().duplicates(Duplicates::Replace));
    /// ids.insert(7u32, "first");
    /// assert_eq!(ids.insert(7, "second"), Some("first"));
    /// assert_eq!(ids[&7], "second");
    /// ```
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        OSAvlMap {
            raw: RawOSAvlMap::with_config(config),
        }
    }

    /// Returns the number of entries the map can hold without reallocating.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns how this map treats an insert of a key it already holds.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::{Duplicates, OSAvlMap};
    ///
    /// let map: OSAvlMap<u8, ()> = OSAvlMap::new();
    /// assert_eq!(map.duplicates(), Duplicates::Keep);
    /// ```
    #[must_use]
    pub const fn duplicates(&self) -> Duplicates {
        self.raw.duplicates()
    }
}
