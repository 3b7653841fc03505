use super::OSAvlSet;
use crate::Ordinal;

impl<K: Ordinal> OSAvlSet<K> {
    /// Returns the number of elements strictly less than `value`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlSet;
    ///
    /// let set = OSAvlSet::from([5, 10, 15, 20]);
    /// assert_eq!(set.count_less(&15), 2);
    /// assert_eq!(set.count_less(&1), 0);
    /// ```
    #[must_use]
    pub fn count_less(&self, value: &K) -> usize {
        self.map.count_less(value)
    }

    /// Returns the `k`-th smallest element, counting from **1**, or `None`
    /// if `k` is zero or greater than the length.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlSet;
    ///
    /// let set = OSAvlSet::from([5, 10, 15, 20]);
    /// assert_eq!(set.select(3), Some(15));
    /// assert_eq!(set.select(5), None);
    /// ```
    #[must_use]
    pub fn select(&self, k: usize) -> Option<K> {
        self.map.select(k).map(|(key, ())| key)
    }

    /// Returns the element at zero-based position `rank` in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlSet;
    ///
    /// let set = OSAvlSet::from([10, 20, 30]);
    /// assert_eq!(set.get_by_rank(1), Some(20));
    /// assert!(set.get_by_rank(3).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<K> {
        self.map.get_by_rank(rank).map(|(key, ())| key)
    }

    /// Removes and returns the element at zero-based position `rank`.
    pub fn remove_by_rank(&mut self, rank: usize) -> Option<K> {
        self.map.remove_by_rank(rank).map(|(key, ())| key)
    }

    /// Returns the zero-based rank of `value`, or `None` if it is not
    /// present.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlSet;
    ///
    /// let set = OSAvlSet::from([10, 20]);
    /// assert_eq!(set.rank_of(&20), Some(1));
    /// assert_eq!(set.rank_of(&15), None);
    /// ```
    #[must_use]
    pub fn rank_of(&self, value: &K) -> Option<usize> {
        self.map.rank_of(value)
    }

    /// Returns the largest element less than or equal to `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlSet;
    ///
    /// let set = OSAvlSet::from([5, 10, 15, 20]);
    /// assert_eq!(set.predecessor_or_equal(&12), Some(10));
    /// assert_eq!(set.predecessor_or_equal(&4), None);
    /// ```
    #[must_use]
    pub fn predecessor_or_equal(&self, value: &K) -> Option<K> {
        self.map.predecessor_or_equal(value).map(|(key, ())| key)
    }
}
