use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Index;

use crate::Ordinal;
use crate::raw::{RawIter, RawOSAvlMap};

mod capacity;
mod order_statistic;
mod shift;

/// An ordered map based on an [AVL tree], with order-statistic queries and
/// lazy bulk shifting of keys.
///
/// Keys are primitive integers (see [`Ordinal`]) ordered by their natural
/// order. On top of the usual dictionary operations the map can:
///
/// - count the keys below a bound ([`count_less`](OSAvlMap::count_less)),
/// - find the k-th smallest key ([`select`](OSAvlMap::select)),
/// - find the largest key not above a bound
///   ([`predecessor_or_equal`](OSAvlMap::predecessor_or_equal)),
/// - add a delta to every key at or above a bound
///   ([`shift_from`](OSAvlMap::shift_from)),
///
/// all in O(log n).
///
/// By default equal keys are kept side by side, making the map a multiset of
/// entries. Use [`Config`](crate::Config) with
/// [`Duplicates::Replace`](crate::Duplicates::Replace) for classic map
/// semantics.
///
/// Keys are handed out by value: a stored key may still owe part of a
/// pending shift, so the map resolves it on the way out instead of lending a
/// reference to a stale one.
///
/// # Examples
///
/// ```
/// use lazy_ostree::OSAvlMap;
///
/// // Byte offsets of lines in a text buffer.
/// let mut lines = OSAvlMap::new();
/// lines.insert(0u64, "fn main() {");
/// lines.insert(12, "    run();");
/// lines.insert(23, "}");
///
/// // Which line holds byte 15?
/// assert_eq!(lines.predecessor_or_equal(&15), Some((12, &"    run();")));
///
/// // Five bytes get inserted at offset 12: every later line moves.
/// lines.shift_from(12, 5).unwrap();
/// let offsets: Vec<u64> = lines.keys().collect();
/// assert_eq!(offsets, [0, 17, 28]);
///
/// // Line numbers are ranks.
/// assert_eq!(lines.count_less(&28), 2);
/// assert_eq!(lines.select(2), Some((17, &"    run();")));
/// ```
///
/// [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree
pub struct OSAvlMap<K, V> {
    raw: RawOSAvlMap<K, V>,
}

/// An iterator over the entries of an `OSAvlMap`, in ascending key order.
///
/// This `struct` is created by the [`iter`] method on [`OSAvlMap`]. See its
/// documentation for more.
///
/// [`iter`]: OSAvlMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: RawIter<'a, K, V>,
}

/// An iterator over the keys of an `OSAvlMap`.
///
/// This `struct` is created by the [`keys`] method on [`OSAvlMap`].
///
/// [`keys`]: OSAvlMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of an `OSAvlMap`, in key order.
///
/// This `struct` is created by the [`values`] method on [`OSAvlMap`].
///
/// [`values`]: OSAvlMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An owning iterator over the entries of an `OSAvlMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`OSAvlMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

impl<K: Ordinal, V> OSAvlMap<K, V> {
    /// Makes a new, empty `OSAvlMap` that keeps duplicate keys.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let mut map = OSAvlMap::new();
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> OSAvlMap<K, V> {
        OSAvlMap {
            raw: RawOSAvlMap::new(),
        }
    }

    /// Clears the map, removing all entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let mut a = OSAvlMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let mut a = OSAvlMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// a.insert(1, "b");
    /// assert_eq!(a.len(), 2);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// With [`Duplicates::Keep`](crate::Duplicates::Keep) (the default) a new
    /// entry is always added, after any entries with an equal key, and `None`
    /// is returned. With [`Duplicates::Replace`](crate::Duplicates::Replace)
    /// an existing entry with an equal key has its value replaced and the old
    /// value is returned.
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
    /// let mut map = OSAvlMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), None);
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.count_less(&38), 2);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value)
    }

    /// Removes one entry with the given key, returning its value. Removing
    /// a key that is not present does nothing and returns `None`.
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
    /// let mut map = OSAvlMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.raw.remove(*key).map(|(_, value)| value)
    }

    /// Removes one entry with the given key, returning the key and value.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let mut map = OSAvlMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove_entry(&1), Some((1, "a")));
    /// assert_eq!(map.remove_entry(&1), None);
    /// ```
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.raw.remove(*key)
    }

    /// Returns `true` if the map contains an entry with the given key.
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
    /// let mut map = OSAvlMap::new();
    /// map.insert(1, "a");
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// ```
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.raw.contains_key(*key)
    }

    /// Returns a reference to the value of an entry with the given key.
    ///
    /// When duplicates are kept, which of the equal entries is returned is
    /// unspecified.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let mut map = OSAvlMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.raw.get(*key)
    }

    /// Returns a mutable reference to the value of an entry with the given
    /// key.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let mut map = OSAvlMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.raw.get_mut(*key)
    }

    /// Returns the first entry in the map, the one with the smallest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let map = OSAvlMap::from([(2, "b"), (1, "a")]);
    /// assert_eq!(map.first_key_value(), Some((1, &"a")));
    /// ```
    #[must_use]
    pub fn first_key_value(&self) -> Option<(K, &V)> {
        self.raw.first_key_value()
    }

    /// Returns the last entry in the map, the one with the largest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let map = OSAvlMap::from([(2, "b"), (1, "a")]);
    /// assert_eq!(map.last_key_value(), Some((2, &"b")));
    /// ```
    #[must_use]
    pub fn last_key_value(&self) -> Option<(K, &V)> {
        self.raw.last_key_value()
    }

    /// Removes and returns the first entry in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let mut map = OSAvlMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.pop_first(), Some((1, "a")));
    /// assert_eq!(map.pop_first(), Some((2, "b")));
    /// assert_eq!(map.pop_first(), None);
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.remove_nth(1)
    }

    /// Removes and returns the last entry in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let mut map = OSAvlMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.pop_last(), Some((2, "b")));
    /// assert_eq!(map.pop_last(), Some((1, "a")));
    /// assert_eq!(map.pop_last(), None);
    /// ```
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let len = self.raw.len();
        self.raw.remove_nth(len)
    }

    /// Gets an iterator over the entries of the map, sorted by key, with
    /// every pending shift applied.
    ///
    /// # Complexity
    ///
    /// O(n) for the whole walk, O(log n) worst case per entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let mut map = OSAvlMap::new();
    /// map.insert(3, "c");
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// let entries: Vec<_> = map.iter().collect();
    /// assert_eq!(entries, [(1, &"a"), (2, &"b"), (3, &"c")]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.raw.iter(),
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let map = OSAvlMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<i32> = map.keys().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let map = OSAvlMap::from([(1, "hello"), (2, "goodbye")]);
    /// let values: Vec<&str> = map.values().copied().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

impl<K: Ordinal, V: Clone> Clone for OSAvlMap<K, V> {
    fn clone(&self) -> Self {
        OSAvlMap {
            raw: self.raw.clone(),
        }
    }
}

impl<K: Ordinal, V: PartialEq> PartialEq for OSAvlMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Ordinal, V: Eq> Eq for OSAvlMap<K, V> {}

impl<K: Ordinal, V: PartialOrd> PartialOrd for OSAvlMap<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ordinal, V: Ord> Ord for OSAvlMap<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: Ordinal + Hash, V: Hash> Hash for OSAvlMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: Ordinal, V: fmt::Debug> fmt::Debug for OSAvlMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ordinal, V> Default for OSAvlMap<K, V> {
    fn default() -> Self {
        OSAvlMap::new()
    }
}

impl<K: Ordinal, V> FromIterator<(K, V)> for OSAvlMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = OSAvlMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ordinal, V> Extend<(K, V)> for OSAvlMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Ordinal, V: Copy> Extend<(K, &'a V)> for OSAvlMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, &'a V)>>(&mut self, iter: T) {
        for (k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Ordinal, V> IntoIterator for &'a OSAvlMap<K, V> {
    type Item = (K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K: Ordinal, V> IntoIterator for OSAvlMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::OSAvlMap;
    ///
    /// let map = OSAvlMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

/// Looks up a value by key.
///
/// # Panics
///
/// Panics if the key is not present in the map.
impl<K: Ordinal, V> Index<&K> for OSAvlMap<K, V> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ordinal, V, const N: usize> From<[(K, V); N]> for OSAvlMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K: Ordinal, V> Iterator for Iter<'a, K, V> {
    type Item = (K, &'a V);

    fn next(&mut self) -> Option<(K, &'a V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: Ordinal, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K: Ordinal, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K: Ordinal, V> FusedIterator for Iter<'_, K, V> {}

impl<K: Copy, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<K: Ordinal, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K: Ordinal, V> Iterator for Keys<'_, K, V> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: Ordinal, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K: Ordinal, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K: Ordinal, V> FusedIterator for Keys<'_, K, V> {}

impl<K: Copy, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K: Ordinal, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: Ordinal, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K: Ordinal, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K: Ordinal, V> FusedIterator for Values<'_, K, V> {}

impl<K: Copy, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}
