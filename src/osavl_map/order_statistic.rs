use core::ops::{Index, IndexMut};

use super::OSAvlMap;
use crate::{Ordinal, Rank};

impl<K: Ordinal, V> OSAvlMap<K, V> {
    /// Returns the number of entries whose key is strictly less than `key`.
    ///
    /// `key` does not have to be present. Equal keys are never counted, so
    /// with duplicates this is also the zero-based rank of the first entry
    /// equal to `key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let map = OSAvlMap::from([(10, ()), (20, ()), (20, ()), (30, ())]);
    /// assert_eq!(map.count_less(&5), 0);
    /// assert_eq!(map.count_less(&20), 1);
    /// assert_eq!(map.count_less(&25), 3);
    /// assert_eq!(map.count_less(&100), 4);
    /// ```
    #[must_use]
    pub fn count_less(&self, key: &K) -> usize {
        self.raw.count_less(*key)
    }

    /// Returns the `k`-th smallest entry, counting from **1**.
    ///
    /// `select(1)` is the smallest entry and `select(len)` the largest.
    /// Returns `None` when `k` is zero or greater than the length. See
    /// [`get_by_rank`](Self::get_by_rank) for the zero-based form.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let map = OSAvlMap::from([(30, 'c'), (10, 'a'), (20, 'b')]);
    /// assert_eq!(map.select(1), Some((10, &'a')));
    /// assert_eq!(map.select(3), Some((30, &'c')));
    /// assert_eq!(map.select(0), None);
    /// assert_eq!(map.select(4), None);
    /// ```
    #[must_use]
    pub fn select(&self, k: usize) -> Option<(K, &V)> {
        self.raw.select(k)
    }

    /// Returns the entry at zero-based position `rank` in sorted order.
    ///
    /// Returns `None` if `rank` is out of bounds.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let map = OSAvlMap::from([(10, "a"), (30, "c"), (20, "b")]);
    /// assert_eq!(map.get_by_rank(1), Some((20, &"b")));
    /// assert!(map.get_by_rank(3).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<(K, &V)> {
        self.raw.select(rank.checked_add(1)?)
    }

    /// Returns the key and a mutable reference to the value at zero-based
    /// position `rank`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let mut map = OSAvlMap::from([(10, "a"), (5, "b")]);
    /// if let Some((key, value)) = map.get_by_rank_mut(0) {
    ///     assert_eq!(key, 5);
    ///     *value = "updated";
    /// }
    /// assert_eq!(map.get(&5), Some(&"updated"));
    /// ```
    #[must_use]
    pub fn get_by_rank_mut(&mut self, rank: usize) -> Option<(K, &mut V)> {
        self.raw.select_mut(rank.checked_add(1)?)
    }

    /// Removes and returns the entry at zero-based position `rank`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let mut map = OSAvlMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// assert_eq!(map.remove_by_rank(1), Some((2, "b")));
    /// assert_eq!(map.remove_by_rank(5), None);
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn remove_by_rank(&mut self, rank: usize) -> Option<(K, V)> {
        self.raw.remove_nth(rank.checked_add(1)?)
    }

    /// Returns the zero-based rank of `key`, or `None` if it is not present.
    ///
    /// With duplicates, this is the rank of the first equal entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let map = OSAvlMap::from([(10, "a"), (20, "b")]);
    /// assert_eq!(map.rank_of(&20), Some(1));
    /// assert_eq!(map.rank_of(&15), None);
    /// ```
    #[must_use]
    pub fn rank_of(&self, key: &K) -> Option<usize> {
        if self.contains_key(key) {
            Some(self.count_less(key))
        } else {
            None
        }
    }

    /// Returns the entry with the largest key that is less than or equal to
    /// `key`, or `None` if every key is greater.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let map = OSAvlMap::from([(10, 'a'), (20, 'b'), (30, 'c')]);
    /// assert_eq!(map.predecessor_or_equal(&25), Some((20, &'b')));
    /// assert_eq!(map.predecessor_or_equal(&30), Some((30, &'c')));
    /// assert_eq!(map.predecessor_or_equal(&5), None);
    /// ```
    #[must_use]
    pub fn predecessor_or_equal(&self, key: &K) -> Option<(K, &V)> {
        self.raw.predecessor_or_equal(*key)
    }
}

/// Indexes into the map by zero-based rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use lazy_ostree::{OSAvlMap, Rank};
///
/// let map = OSAvlMap::from([(1, "a"), (2, "b")]);
/// assert_eq!(map[Rank(0)], "a");
/// ```
impl<K: Ordinal, V> Index<Rank> for OSAvlMap<K, V> {
    type Output = V;

    fn index(&self, rank: Rank) -> &V {
        self.get_by_rank(rank.0).map(|(_, v)| v).expect("index out of bounds")
    }
}

/// Mutably indexes into the map by zero-based rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use lazy_ostree::{OSAvlMap, Rank};
///
/// let mut map = OSAvlMap::from([(1, 10), (2, 20)]);
/// map[Rank(1)] += 5;
/// assert_eq!(map[&2], 25);
/// ```
impl<K: Ordinal, V> IndexMut<Rank> for OSAvlMap<K, V> {
    fn index_mut(&mut self, rank: Rank) -> &mut V {
        self.get_by_rank_mut(rank.0).map(|(_, v)| v).expect("index out of bounds")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn rank_helpers_agree_with_select() {
        let map: OSAvlMap<i32, i32> = (0..50).map(|k| (k * 3, k)).collect();
        for rank in 0..50 {
            let key = i32::try_from(rank).unwrap() * 3;
            assert_eq!(map.get_by_rank(rank), map.select(rank + 1));
            assert_eq!(map.rank_of(&key), Some(rank));
            assert_eq!(map.count_less(&key), rank);
            assert_eq!(map.count_less(&(key + 1)), rank + 1);
        }
        assert_eq!(map.rank_of(&1), None);
        assert_eq!(map.get_by_rank(usize::MAX), None);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn index_past_end_panics() {
        let map = OSAvlMap::from([(1u8, ())]);
        let () = map[Rank(1)];
    }
}
