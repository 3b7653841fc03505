/// A zero-based rank into the sorted order of a map or set.
///
/// `Rank(r)` addresses the same entry as `select(r + 1)`.
///
/// # Examples
///
/// ```
/// use lazy_ostree::{OSAvlMap, Rank};
///
/// let mut map = OSAvlMap::new();
/// map.insert(7, "seven");
/// map.insert(3, "three");
///
/// assert_eq!(map[Rank(0)], "three");
/// assert_eq!(map.select(1), Some((3, &"three")));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
