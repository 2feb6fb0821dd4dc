use std::{
    collections::{btree_set, BTreeSet},
    hash::{Hash, Hasher},
    iter::{Copied, FusedIterator},
    ops::{RangeInclusive, Sub, SubAssign},
};

use crate::range::{AddrRange, Address, Difference, Normalize, NormalizeExt};

/// A set of addresses represented using closed ranges.
///
/// A `Pool` stores the ranges it was built from as given: they may overlap, nest, or
/// be adjacent to each other. Duplicate ranges are stored once. Operations on the pool
/// see it through its canonical form, the unique sequence of ranges which are
///
/// - sorted,
/// - non-adjacent,
/// - non-intersecting.
///
/// Two pools are equal if they contain the same addresses, regardless of how their
/// ranges are laid out.
///
/// # Examples
///
/// ```
/// use pool::{AddrRange, Pool};
///
/// let pool = Pool::from([6..=12u32, 1..=17, 19..=19, 18..=18]);
///
/// assert_eq!(pool, Pool::from([1..=19]));
/// assert_eq!(pool.len(), 19);
/// assert!(!pool.is_canonical());
/// assert_eq!(pool.canonical().into_inner(), vec![AddrRange::new(1, 19)]);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        bound = "for<'a> T: serde::Serialize + serde::de::Deserialize<'a> + Address",
        from = "Vec<AddrRange<T>>",
        into = "Vec<AddrRange<T>>"
    )
)]
pub struct Pool<T> {
    /// The ranges of the pool, ordered by their first address.
    ranges: BTreeSet<AddrRange<T>>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self {
            ranges: BTreeSet::new(),
        }
    }
}

impl<T> Pool<T> {
    pub(crate) fn from_set(ranges: BTreeSet<AddrRange<T>>) -> Self {
        Self { ranges }
    }

    /// Returns the ranges of the pool.
    pub fn into_inner(self) -> Vec<AddrRange<T>> {
        self.ranges.into_iter().collect()
    }

    /// Returns the number of ranges stored in the pool.
    pub fn len_ranges(&self) -> usize {
        self.ranges.len()
    }

    /// Returns `true` if the pool contains no addresses.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Clears the pool, removing all ranges.
    pub fn clear(&mut self) {
        self.ranges.clear();
    }
}

impl<T: Address> Pool<T> {
    /// Returns a new `Pool` from the given ranges.
    pub fn new(ranges: &[AddrRange<T>]) -> Self {
        ranges.iter().copied().collect()
    }

    /// Adds a range to the pool.
    ///
    /// Returns `false` if the pool already stored this exact range.
    pub fn insert(&mut self, range: AddrRange<T>) -> bool {
        self.ranges.insert(range)
    }

    /// Returns an iterator over the ranges stored in the pool, ordered by their
    /// first address.
    ///
    /// The ranges are returned as stored. See [`Pool::normalized`] for the canonical
    /// form.
    pub fn iter_ranges(&self) -> RangeIter<'_, T> {
        RangeIter {
            iter: self.ranges.iter(),
        }
    }

    /// Returns an iterator over the canonical ranges of the pool.
    pub fn normalized(&self) -> Normalize<Copied<btree_set::Iter<'_, AddrRange<T>>>> {
        self.ranges.iter().copied().normalize()
    }

    /// Returns an iterator over the addresses in the pool, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_
    where
        RangeInclusive<T>: Iterator<Item = T>,
    {
        self.normalized().flat_map(|range| range.iter())
    }

    /// Returns the pool in canonical form.
    #[must_use]
    pub fn canonical(&self) -> Self {
        Self {
            ranges: self.normalized().collect(),
        }
    }

    /// Returns `true` if the stored ranges are already in canonical form.
    pub fn is_canonical(&self) -> bool {
        self.normalized().count() == self.ranges.len()
    }

    /// Returns the number of addresses in the pool.
    ///
    /// Saturates at `u128::MAX`.
    #[must_use]
    pub fn len(&self) -> u128 {
        self.normalized()
            .fold(0u128, |len, range| len.saturating_add(range.len()))
    }

    /// Returns `true` if the pool contains the given address.
    pub fn contains(&self, addr: &T) -> bool {
        // Only ranges starting at or before `addr` can contain it.
        self.ranges
            .range(..=AddrRange::new(*addr, T::MAX))
            .any(|range| range.contains(addr))
    }

    /// Returns the smallest address in the pool, or `None` if the pool is empty.
    pub fn min(&self) -> Option<T> {
        self.ranges.first().map(|range| range.first)
    }

    /// Returns the largest address in the pool, or `None` if the pool is empty.
    pub fn max(&self) -> Option<T> {
        self.ranges.iter().map(|range| range.last).max()
    }
}

impl<T: Address> PartialEq for Pool<T> {
    fn eq(&self, other: &Self) -> bool {
        self.normalized().eq(other.normalized())
    }
}

impl<T: Address> Eq for Pool<T> {}

impl<T: Address + Hash> Hash for Pool<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for range in self.normalized() {
            range.hash(state);
        }
    }
}

impl<T: Address> FromIterator<AddrRange<T>> for Pool<T> {
    fn from_iter<I: IntoIterator<Item = AddrRange<T>>>(iter: I) -> Self {
        Self {
            ranges: iter.into_iter().collect(),
        }
    }
}

impl<T: Address> Extend<AddrRange<T>> for Pool<T> {
    fn extend<I: IntoIterator<Item = AddrRange<T>>>(&mut self, iter: I) {
        self.ranges.extend(iter);
    }
}

impl<T: Address> From<AddrRange<T>> for Pool<T> {
    fn from(range: AddrRange<T>) -> Self {
        Self {
            ranges: BTreeSet::from([range]),
        }
    }
}

impl<T: Address> From<Vec<AddrRange<T>>> for Pool<T> {
    fn from(ranges: Vec<AddrRange<T>>) -> Self {
        ranges.into_iter().collect()
    }
}

impl<T> From<Pool<T>> for Vec<AddrRange<T>> {
    fn from(pool: Pool<T>) -> Self {
        pool.into_inner()
    }
}

impl<const N: usize, T: Address> From<[AddrRange<T>; N]> for Pool<T> {
    fn from(ranges: [AddrRange<T>; N]) -> Self {
        ranges.into_iter().collect()
    }
}

impl<const N: usize, T: Address> From<[RangeInclusive<T>; N]> for Pool<T> {
    /// # Panics
    ///
    /// Panics if any of the ranges is empty.
    #[track_caller]
    fn from(ranges: [RangeInclusive<T>; N]) -> Self {
        ranges.into_iter().map(AddrRange::from).collect()
    }
}

impl<T: Address> From<&[AddrRange<T>]> for Pool<T> {
    fn from(ranges: &[AddrRange<T>]) -> Self {
        Self::new(ranges)
    }
}

impl<T: Address> Sub<&Pool<T>> for &Pool<T> {
    type Output = Pool<T>;

    fn sub(self, rhs: &Pool<T>) -> Self::Output {
        self.difference(rhs)
    }
}

impl<T: Address> Sub<Pool<T>> for Pool<T> {
    type Output = Pool<T>;

    fn sub(self, rhs: Pool<T>) -> Self::Output {
        self.difference(&rhs)
    }
}

impl<T: Address> SubAssign<&Pool<T>> for Pool<T> {
    fn sub_assign(&mut self, rhs: &Pool<T>) {
        *self = self.difference(rhs);
    }
}

impl<T: Address> SubAssign<Pool<T>> for Pool<T> {
    fn sub_assign(&mut self, rhs: Pool<T>) {
        *self = self.difference(&rhs);
    }
}

/// An iterator over the ranges stored in a `Pool`.
#[derive(Debug, Clone)]
pub struct RangeIter<'a, T> {
    iter: btree_set::Iter<'a, AddrRange<T>>,
}

impl<T: Copy> Iterator for RangeIter<'_, T> {
    type Item = AddrRange<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T: Copy> ExactSizeIterator for RangeIter<'_, T> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<T: Copy> DoubleEndedIterator for RangeIter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().copied()
    }
}

impl<T: Copy> FusedIterator for RangeIter<'_, T> {}
