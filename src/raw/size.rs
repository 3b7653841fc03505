use super::handle::Handle;

/// Cached node count of a subtree.
///
/// A tree can never hold more nodes than the arena can address, so a `Size`
/// shares the niche-packed representation of [`Handle`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Size(Handle);

impl Size {
    pub(crate) const MAX: usize = Handle::MAX;
    pub(crate) const ZERO: Self = Self::from_usize(0);

    #[inline]
    pub(crate) const fn from_usize(size: usize) -> Self {
        assert!(size <= Self::MAX, "`Size::from_usize()` - `size` > `Size::MAX`!");
        Self(Handle::from_index(size))
    }

    #[inline]
    pub(crate) const fn to_usize(self) -> usize {
        self.0.to_index()
    }

    /// Size of a subtree whose root has children of sizes `left` and `right`.
    #[inline]
    pub(crate) const fn joined(left: Self, right: Self) -> Self {
        Self::from_usize(left.to_usize() + right.to_usize() + 1)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(Size, Option<Size>);
    assert_eq_size!(Size, Handle);

    #[test]
    #[should_panic(expected = "`Size::from_usize()` - `size` > `Size::MAX`!")]
    fn size_past_max_panics() {
        let _ = Size::from_usize(Size::MAX + 1);
    }

    #[test]
    #[should_panic(expected = "`Size::from_usize()` - `size` > `Size::MAX`!")]
    fn joining_full_subtrees_panics() {
        let _ = Size::joined(Size::from_usize(Size::MAX), Size::ZERO);
    }

    #[test]
    fn leaf_has_size_one() {
        assert_eq!(Size::joined(Size::ZERO, Size::ZERO).to_usize(), 1);
    }

    proptest! {
        #[test]
        fn joined_counts_root(left in 0..Size::MAX / 2, right in 0..Size::MAX / 2) {
            let size = Size::joined(Size::from_usize(left), Size::from_usize(right));
            prop_assert_eq!(size.to_usize(), left + right + 1);
        }
    }
}
