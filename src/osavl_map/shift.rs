use super::OSAvlMap;
use crate::{Ordinal, ShiftError};

impl<K: Ordinal, V> OSAvlMap<K, V> {
    /// Adds `delta` to every key greater than or equal to `from`.
    ///
    /// The shift is applied lazily: only the O(log n) nodes on the boundary
    /// path are touched and the rest of the affected subtrees record the
    /// delta for later. Because `delta` is never negative the relative order
    /// of all keys is unchanged, so no rebalancing is needed.
    ///
    /// A `delta` of zero, or a `from` above every key, is a no-op.
    ///
    /// # Errors
    ///
    /// - [`ShiftError::NegativeDelta`] if `delta < 0`.
    /// - [`ShiftError::Overflow`] if the largest shifted key would not fit in
    ///   `K`.
    ///
    /// On error the map is left unchanged.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_ostree::{OSAvlMap, ShiftError};
    ///
    /// let mut map = OSAvlMap::from([(10, 'a'), (20, 'b'), (30, 'c')]);
    /// map.shift_from(20, 5).unwrap();
    /// assert_eq!(map.keys().collect::<Vec<_>>(), [10, 25, 35]);
    ///
    /// assert_eq!(map.shift_from(0, -1), Err(ShiftError::NegativeDelta));
    /// assert_eq!(map.shift_from(0, i32::MAX), Err(ShiftError::Overflow));
    /// assert_eq!(map.keys().collect::<Vec<_>>(), [10, 25, 35]);
    /// ```
    pub fn shift_from(&mut self, from: K, delta: K) -> Result<(), ShiftError> {
        self.raw.shift_from(from, delta)
    }
}
