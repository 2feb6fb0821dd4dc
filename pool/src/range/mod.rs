//! Closed address ranges and the operations used to reduce and subtract them.

mod difference;
mod normalize;

pub use normalize::{Normalize, NormalizeExt};

use std::{
    fmt,
    ops::{Add, RangeInclusive, Sub},
};

use thiserror::Error;

/// An unsigned integer type usable as an address.
///
/// The domain of an address type is the closed interval `[MIN, MAX]`. None of the
/// operations in this crate step past either end of the domain.
pub trait Address: Copy + Ord + fmt::Debug + Add<Output = Self> + Sub<Output = Self> {
    /// The smallest address in the domain.
    const MIN: Self;
    /// The largest address in the domain.
    const MAX: Self;
    /// The distance between two consecutive addresses.
    const ONE: Self;

    /// Widens the address to a `u128`.
    fn to_u128(self) -> u128;
}

macro_rules! impl_address {
    ($($ty:ty),+) => {
        $(
            impl Address for $ty {
                const MIN: Self = <$ty>::MIN;
                const MAX: Self = <$ty>::MAX;
                const ONE: Self = 1;

                #[inline]
                #[allow(clippy::unnecessary_cast)]
                fn to_u128(self) -> u128 {
                    self as u128
                }
            }
        )*
    };
}

impl_address!(u8, u16, u32, u64, u128, usize);

/// A closed range of addresses, `[first, last]`.
///
/// A range always contains at least one address: `first <= last` holds for every
/// value of this type. Ranges are ordered by `first`, then by `last`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        bound = "for<'a> T: serde::Serialize + serde::de::Deserialize<'a> + Address",
        try_from = "(T, T)",
        into = "(T, T)"
    )
)]
pub struct AddrRange<T> {
    pub(crate) first: T,
    pub(crate) last: T,
}

impl<T: Address> AddrRange<T> {
    /// Returns a new range `[first, last]`.
    ///
    /// # Panics
    ///
    /// Panics if `first > last`.
    #[track_caller]
    pub fn new(first: T, last: T) -> Self {
        assert!(
            first <= last,
            "range start {first:?} is greater than range end {last:?}"
        );

        Self { first, last }
    }

    /// Returns a new range `[first, last]`, or an error if `first > last`.
    pub fn try_new(first: T, last: T) -> Result<Self, RangeError> {
        if first > last {
            return Err(RangeError::Inverted);
        }

        Ok(Self { first, last })
    }

    /// Returns a range containing the single address `addr`.
    pub fn single(addr: T) -> Self {
        Self {
            first: addr,
            last: addr,
        }
    }

    /// Returns the first address of the range.
    pub fn first(&self) -> T {
        self.first
    }

    /// Returns the last address of the range.
    pub fn last(&self) -> T {
        self.last
    }

    /// Returns `true` if the range contains `addr`.
    pub fn contains(&self, addr: &T) -> bool {
        self.first <= *addr && *addr <= self.last
    }

    /// Returns the number of addresses in the range.
    ///
    /// Saturates at `u128::MAX`, which only the full `u128` domain reaches.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u128 {
        (self.last - self.first).to_u128().saturating_add(1)
    }

    /// Returns `true` if the two ranges share at least one address.
    pub fn intersects(&self, other: &Self) -> bool {
        self.first <= other.last && other.first <= self.last
    }

    /// Returns `true` if `other` starts no later than the address right after `self`.
    ///
    /// For `other` sorted after `self`, this means the two can be merged into one range.
    pub(crate) fn touches(&self, other: &Self) -> bool {
        !(other.first > self.last && other.first - self.last > T::ONE)
    }

    /// Returns an iterator over the addresses in the range.
    pub fn iter(&self) -> RangeInclusive<T>
    where
        RangeInclusive<T>: Iterator<Item = T>,
    {
        self.first..=self.last
    }
}

impl<T: Address> From<RangeInclusive<T>> for AddrRange<T> {
    /// # Panics
    ///
    /// Panics if the range is empty.
    #[track_caller]
    fn from(range: RangeInclusive<T>) -> Self {
        let (first, last) = range.into_inner();
        Self::new(first, last)
    }
}

impl<T: Address> TryFrom<(T, T)> for AddrRange<T> {
    type Error = RangeError;

    fn try_from((first, last): (T, T)) -> Result<Self, Self::Error> {
        Self::try_new(first, last)
    }
}

impl<T> From<AddrRange<T>> for (T, T) {
    fn from(range: AddrRange<T>) -> Self {
        (range.first, range.last)
    }
}

impl<T: fmt::Display + PartialEq> fmt::Display for AddrRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}

/// Errors that can occur when constructing a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    /// The start of the range is greater than its end.
    #[error("range start is greater than range end")]
    Inverted,
}

/// Set difference of two address sets.
pub trait Difference<Rhs> {
    /// The type of the difference.
    type Output;

    /// Returns the set difference of `self` and `other`.
    #[must_use]
    fn difference(&self, other: &Rhs) -> Self::Output;
}

/// Asserts that the ranges are sorted, non-adjacent and non-intersecting.
#[cfg(test)]
pub(crate) fn assert_invariants<T: Address>(ranges: &[AddrRange<T>]) {
    assert!(
        ranges
            .windows(2)
            .all(|w| w[0].last < w[1].first && w[1].first - w[0].last > T::ONE),
        "not canonical: {ranges:?}"
    );
}
