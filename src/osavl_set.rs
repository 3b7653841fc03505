use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use crate::osavl_map::{IntoIter as MapIntoIter, Keys};
use crate::{OSAvlMap, Ordinal, ShiftError};

mod capacity;
mod order_statistic;

/// An ordered set of integer keys based on an AVL tree, with order-statistic
/// queries and lazy bulk shifting.
///
/// See [`OSAvlMap`]'s documentation for a detailed discussion of the
/// operations and their cost. By default the set is a multiset: inserting a
/// key that is already present stores it a second time.
///
/// # Examples
///
/// ```
/// use lazy_ostree::OSAvlSet;
///
/// let mut set = OSAvlSet::new();
/// set.insert(10);
/// set.insert(20);
/// set.insert(5);
/// set.insert(15);
///
/// assert_eq!(set.iter().collect::<Vec<_>>(), [5, 10, 15, 20]);
/// assert_eq!(set.count_less(&15), 2);
/// assert_eq!(set.select(3), Some(15));
/// assert_eq!(set.predecessor_or_equal(&12), Some(10));
///
/// set.shift_from(15, 100).unwrap();
/// assert_eq!(set.iter().collect::<Vec<_>>(), [5, 10, 115, 120]);
/// ```
///
/// A `OSAvlSet` with a known list of items can be initialized from an array:
///
/// ```
/// use lazy_ostree::OSAvlSet;
///
/// let set = OSAvlSet::from([1, 2, 3]);
/// ```
pub struct OSAvlSet<K> {
    map: OSAvlMap<K, ()>,
}

/// An iterator over the items of a `OSAvlSet`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`OSAvlSet`].
///
/// # Examples
///
/// ```
/// use lazy_ostree::OSAvlSet;
///
/// let set = OSAvlSet::from([3, 1, 2]);
/// let mut iter = set.iter();
/// assert_eq!(iter.next(), Some(1));
/// assert_eq!(iter.next_back(), Some(3));
/// assert_eq!(iter.next(), Some(2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: OSAvlSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K> {
    inner: Keys<'a, K, ()>,
}

/// An owning iterator over the items of a `OSAvlSet` in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`OSAvlSet`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: OSAvlSet#method.into_iter
pub struct IntoIter<K> {
    inner: MapIntoIter<K, ()>,
}

impl<K: Ordinal> OSAvlSet<K> {
    /// Makes a new, empty `OSAvlSet` that keeps duplicates.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> OSAvlSet<K> {
        OSAvlSet { map: OSAvlMap::new() }
    }

    /// Clears the set, removing all elements.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the number of elements in the set, counting duplicates.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlSet;
    ///
    /// let set = OSAvlSet::from([4, 4, 9]);
    /// assert_eq!(set.len(), 3);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Adds a value to the set.
    ///
    /// Returns whether a new element was stored. That is always the case
    /// with [`Duplicates::Keep`](crate::Duplicates::Keep); with
    /// [`Duplicates::Replace`](crate::Duplicates::Replace) an equal element
    /// already present makes this return `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::{Config, Duplicates, OSAvlSet};
    ///
    /// let mut bag = OSAvlSet::new();
    /// assert!(bag.insert(2));
    /// assert!(bag.insert(2));
    /// assert_eq!(bag.len(), 2);
    ///
    /// let mut set = OSAvlSet::with_config(Config::new().duplicates(Duplicates::Replace));
    /// assert!(set.insert(2));
    /// assert!(!set.insert(2));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: K) -> bool {
        self.map.insert(value, ()).is_none()
    }

    /// Removes one occurrence of `value`. Returns whether it was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlSet;
    ///
    /// let mut set = OSAvlSet::from([2, 2]);
    /// assert!(set.remove(&2));
    /// assert!(set.remove(&2));
    /// assert!(!set.remove(&2));
    /// ```
    pub fn remove(&mut self, value: &K) -> bool {
        self.map.remove(value).is_some()
    }

    /// Returns `true` if the set contains `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlSet;
    ///
    /// let set = OSAvlSet::from([1, 2, 3]);
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&4));
    /// ```
    #[must_use]
    pub fn contains(&self, value: &K) -> bool {
        self.map.contains_key(value)
    }

    /// Returns the smallest element, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlSet;
    ///
    /// let set = OSAvlSet::from([3, 1, 2]);
    /// assert_eq!(set.first(), Some(1));
    /// assert_eq!(set.last(), Some(3));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<K> {
        self.map.first_key_value().map(|(k, ())| k)
    }

    /// Returns the largest element, if any.
    #[must_use]
    pub fn last(&self) -> Option<K> {
        self.map.last_key_value().map(|(k, ())| k)
    }

    /// Removes and returns the smallest element.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlSet;
    ///
    /// let mut set = OSAvlSet::from([1, 2]);
    /// assert_eq!(set.pop_first(), Some(1));
    /// assert_eq!(set.pop_last(), Some(2));
    /// assert_eq!(set.pop_first(), None);
    /// ```
    pub fn pop_first(&mut self) -> Option<K> {
        self.map.pop_first().map(|(k, ())| k)
    }

    /// Removes and returns the largest element.
    pub fn pop_last(&mut self) -> Option<K> {
        self.map.pop_last().map(|(k, ())| k)
    }

    /// Adds `delta` to every element greater than or equal to `from`.
    ///
    /// # Errors
    ///
    /// Fails with [`ShiftError`] when `delta` is negative or the largest
    /// element would overflow `K`. The set is unchanged on error.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::{OSAvlSet, ShiftError};
    ///
    /// let mut set = OSAvlSet::from([1u8, 5, 250]);
    /// set.shift_from(5, 4).unwrap();
    /// assert_eq!(set.iter().collect::<Vec<_>>(), [1, 9, 254]);
    /// assert_eq!(set.shift_from(0, 2), Err(ShiftError::Overflow));
    /// ```
    pub fn shift_from(&mut self, from: K, delta: K) -> Result<(), ShiftError> {
        self.map.shift_from(from, delta)
    }

    /// Gets an iterator that visits the elements in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlSet;
    ///
    /// let set = OSAvlSet::from([3, 1, 2, 1]);
    /// assert_eq!(set.iter().collect::<Vec<_>>(), [1, 1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K> {
        Iter { inner: self.map.keys() }
    }
}

impl<K: Ordinal + Hash> Hash for OSAvlSet<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.map.hash(state);
    }
}

impl<K: Ordinal> PartialEq for OSAvlSet<K> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<K: Ordinal> Eq for OSAvlSet<K> {}

impl<K: Ordinal> PartialOrd for OSAvlSet<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ordinal> Ord for OSAvlSet<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.map.cmp(&other.map)
    }
}

impl<K: Ordinal> Clone for OSAvlSet<K> {
    fn clone(&self) -> Self {
        OSAvlSet { map: self.map.clone() }
    }
}

impl<K: Ordinal> fmt::Debug for OSAvlSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ordinal> Default for OSAvlSet<K> {
    fn default() -> Self {
        OSAvlSet::new()
    }
}

impl<K: Ordinal> FromIterator<K> for OSAvlSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = OSAvlSet::new();
        set.extend(iter);
        set
    }
}

impl<K: Ordinal> Extend<K> for OSAvlSet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for elem in iter {
            self.insert(elem);
        }
    }
}

impl<'a, K: 'a + Ordinal> Extend<&'a K> for OSAvlSet<K> {
    fn extend<I: IntoIterator<Item = &'a K>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<K: Ordinal, const N: usize> From<[K; N]> for OSAvlSet<K> {
    fn from(arr: [K; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<K: Ordinal> IntoIterator for OSAvlSet<K> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    /// Gets an iterator for moving out the `OSAvlSet`'s contents in
    /// ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlSet;
    ///
    /// let set = OSAvlSet::from([1, 2, 3, 4]);
    /// let v: Vec<_> = set.into_iter().collect();
    /// assert_eq!(v, [1, 2, 3, 4]);
    /// ```
    fn into_iter(self) -> IntoIter<K> {
        IntoIter {
            inner: self.map.into_iter(),
        }
    }
}

impl<'a, K: Ordinal> IntoIterator for &'a OSAvlSet<K> {
    type Item = K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<K: Ordinal> Iterator for Iter<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: Ordinal> DoubleEndedIterator for Iter<'_, K> {
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back()
    }
}

impl<K: Ordinal> ExactSizeIterator for Iter<'_, K> {}

impl<K: Ordinal> FusedIterator for Iter<'_, K> {}

impl<K: Copy> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<K: Ordinal> fmt::Debug for Iter<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<alloc::vec::Vec<_>>()).finish()
    }
}

impl<K> Iterator for IntoIter<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(k, ())| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> DoubleEndedIterator for IntoIter<K> {
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back().map(|(k, ())| k)
    }
}

impl<K> ExactSizeIterator for IntoIter<K> {}

impl<K> FusedIterator for IntoIter<K> {}

impl<K: fmt::Debug> fmt::Debug for IntoIter<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner).finish()
    }
}
