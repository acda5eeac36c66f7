//! Types for representing bus addresses.

use num_bigint::BigInt;
use std::fmt;

//===========================================================================//

/// Represents a memory bus address.
#[derive(
    Clone, Copy, Debug, Default, Hash, Eq, Ord, PartialEq, PartialOrd,
)]
pub struct Addr(u32);

impl Addr {
    /// The size of this integer type in bits.
    pub const BITS: u32 = 32;

    /// The smallest address value (0).
    pub const MIN: Addr = Addr(0);

    /// The largest address value (`(1 << BITS) - 1`).
    pub const MAX: Addr = Addr(!0);

    /// Converts a `BigInt` into an `Addr`. If the value of the `BigInt` is
    /// outside the range of `Addr`, that value is wrapped.
    pub fn wrap_bigint(value: &BigInt) -> Addr {
        Addr(u32::try_from(value & BigInt::from(0xffffffffu32)).unwrap())
    }

    /// Returns the lowest 32 bits of the address.
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Converts the address into a `usize`.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Returns true if this address is a multiple of `align` bytes.  Panics
    /// if `align` is zero.
    pub fn is_aligned_to(self, align: u32) -> bool {
        self.0 % align == 0
    }

    /// Returns an address range that starts with `self` and contains `size`
    /// distinct addresses, or `None` if `size` is zero or if such a range
    /// would have an end address greater than `Addr::MAX`.
    pub fn range_with_size(self, size: u64) -> Option<Range> {
        if size == 0 {
            None
        } else if let Ok(end) = u32::try_from(u64::from(self.0) + size - 1) {
            Some(Range { first: self, last: Addr(end) })
        } else {
            None
        }
    }
}

impl From<u8> for Addr {
    fn from(value: u8) -> Addr {
        Addr(value.into())
    }
}

impl From<u16> for Addr {
    fn from(value: u16) -> Addr {
        Addr(value.into())
    }
}

impl From<u32> for Addr {
    fn from(value: u32) -> Addr {
        Addr(value)
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.0.fmt(f)
    }
}

impl fmt::LowerHex for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.0.fmt(f)
    }
}

impl fmt::UpperHex for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.0.fmt(f)
    }
}

//===========================================================================//

/// Represents a nonempty range of bus addresses.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct Range {
    first: Addr,
    last: Addr,
}

impl Range {
    /// A range that covers all possible addresses.
    pub const FULL: Range = Range { first: Addr::MIN, last: Addr::MAX };

    /// Returns the first address in the range.
    pub fn start(self) -> Addr {
        self.first
    }

    /// Returns the last address in the range.
    pub fn end(self) -> Addr {
        self.last
    }

    /// Returns true if this range contains `addr`.
    pub fn contains(self, addr: Addr) -> bool {
        (self.first..=self.last).contains(&addr)
    }

    /// Returns true if this range and `other` have any address in common.
    pub fn overlaps(self, other: Range) -> bool {
        self.first <= other.last && other.first <= self.last
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{Addr, Range};
    use num_bigint::BigInt;

    #[test]
    fn wrap_bigint() {
        assert_eq!(Addr::wrap_bigint(&BigInt::from(0x1234)).as_u32(), 0x1234);
        let big = BigInt::from(0x7_0000_1000u64);
        assert_eq!(Addr::wrap_bigint(&big).as_u32(), 0x0000_1000);
    }

    #[test]
    fn alignment() {
        assert!(Addr::from(0x1000u16).is_aligned_to(4));
        assert!(!Addr::from(0x1002u16).is_aligned_to(4));
        assert!(Addr::from(0x1002u16).is_aligned_to(2));
        assert!(Addr::from(0x1003u16).is_aligned_to(1));
    }

    #[test]
    fn range_contains() {
        assert!(Range::FULL.contains(Addr::MIN));
        assert!(Range::FULL.contains(Addr::MAX));

        let range = Addr::from(0x1000u16).range_with_size(0x100).unwrap();
        assert!(!range.contains(Addr::from(0x0fffu16)));
        assert!(range.contains(Addr::from(0x1000u16)));
        assert!(range.contains(Addr::from(0x10ffu16)));
        assert!(!range.contains(Addr::from(0x1100u16)));
    }

    #[test]
    fn range_with_size() {
        let range = Addr::from(0x1000u16).range_with_size(0x1000).unwrap();
        assert_eq!(range.start(), Addr::from(0x1000u16));
        assert_eq!(range.end(), Addr::from(0x1fffu16));
        assert_eq!(Addr::from(0x1000u16).range_with_size(0), None);
        assert_eq!(Addr::MAX.range_with_size(2), None);
    }

    #[test]
    fn range_overlaps() {
        let low = Addr::from(0x1000u16).range_with_size(0x1000).unwrap();
        let high = Addr::from(0x2000u16).range_with_size(0x1000).unwrap();
        assert!(!low.overlaps(high));
        assert!(!high.overlaps(low));
        let mid = Addr::from(0x1800u16).range_with_size(0x1000).unwrap();
        assert!(low.overlaps(mid));
        assert!(mid.overlaps(high));
        assert!(Range::FULL.overlaps(low));
    }
}

//===========================================================================//
