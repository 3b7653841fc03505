use core::fmt;

/// A fixed-width integer usable as a key of [`OSAvlMap`](crate::OSAvlMap).
///
/// Keys are compared by their natural order and shifted by adding a delta of
/// the same type. Pending deltas are accumulated with wrapping arithmetic; the
/// maps only accept shifts whose final keys fit in `Self`, so the wrapped
/// intermediate sums always come back to the true key.
///
/// Implemented for every primitive integer type.
pub trait Ordinal: Copy + Ord + fmt::Debug {
    /// The additive identity, used for "no pending shift".
    const ZERO: Self;

    /// Two's complement addition, never panics.
    #[must_use]
    fn wrapping_add(self, rhs: Self) -> Self;

    /// Addition that reports overflow as `None`.
    #[must_use]
    fn checked_add(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_ordinal {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Ordinal for $ty {
                const ZERO: Self = 0;

                #[inline]
                fn wrapping_add(self, rhs: Self) -> Self {
                    <$ty>::wrapping_add(self, rhs)
                }

                #[inline]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_add(self, rhs)
                }
            }
        )*
    };
}

impl_ordinal!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
