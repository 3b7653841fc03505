use core::fmt;

/// The reason a [`shift_from`](crate::OSAvlMap::shift_from) call was
/// rejected. A rejected shift leaves the collection untouched.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ShiftError {
    /// The delta was negative. Shifting a suffix of the key space down could
    /// collide with or overtake the keys below it.
    NegativeDelta,
    /// Adding the delta to the largest affected key overflows the key type.
    Overflow,
}

impl fmt::Display for ShiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftError::NegativeDelta => write!(f, "shift delta must not be negative"),
            ShiftError::Overflow => write!(f, "shifted key would overflow the key type"),
        }
    }
}

impl core::error::Error for ShiftError {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages() {
        assert_eq!(ShiftError::NegativeDelta.to_string(), "shift delta must not be negative");
        assert_eq!(ShiftError::Overflow.to_string(), "shifted key would overflow the key type");
    }
}
