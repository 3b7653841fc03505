//! Construction-time settings for [`OSAvlMap`](crate::OSAvlMap) and
//! [`OSAvlSet`](crate::OSAvlSet).

/// What inserting a key that is already stored does.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Duplicates {
    /// Store another entry with the same key (multiset semantics). The new
    /// entry is placed after the existing equal keys.
    #[default]
    Keep,
    /// Overwrite the value of the stored entry and hand back the old one.
    Replace,
}

/// Settings for a new map or set.
///
/// # Examples
///
/// ```
/// use lazy_ostree::{Config, Duplicates, OSAvlMap};
///
/// let config = Config::new().capacity(64).duplicates(Duplicates::Replace);
/// let mut map = OSAvlMap::with_config(config);
///
/// assert_eq!(map.insert(1, "a"), None);
/// assert_eq!(map.insert(1, "b"), Some("a"));
/// assert_eq!(map.len(), 1);
/// assert!(map.capacity() >= 64);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Config {
    capacity: usize,
    duplicates: Duplicates,
}

impl Config {
    /// Default settings: no pre-allocation, [`Duplicates::Keep`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            capacity: 0,
            duplicates: Duplicates::Keep,
        }
    }

    /// Pre-allocate room for at least `capacity` entries.
    #[must_use]
    pub const fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Choose how equal keys are handled on insertion.
    #[must_use]
    pub const fn duplicates(mut self, duplicates: Duplicates) -> Self {
        self.duplicates = duplicates;
        self
    }

    #[must_use]
    pub(crate) const fn initial_capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub(crate) const fn duplicate_policy(&self) -> Duplicates {
        self.duplicates
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_duplicates() {
        assert_eq!(Config::new(), Config::default());
        assert_eq!(Config::new().duplicate_policy(), Duplicates::Keep);
        assert_eq!(Config::new().initial_capacity(), 0);
    }

    #[test]
    fn builder_overrides() {
        const CONFIG: Config = Config::new().capacity(8).duplicates(Duplicates::Replace);
        assert_eq!(CONFIG.initial_capacity(), 8);
        assert_eq!(CONFIG.duplicate_policy(), Duplicates::Replace);
    }
}
