use std::collections::BTreeSet;

use crate::{
    log::{debug, trace},
    range::{AddrRange, Address, Difference},
    Pool,
};

/// Returns the ranges of `old` which are not covered by `new`.
///
/// Both iterators *MUST* yield normalized ranges, ie. sorted, non-adjacent and
/// non-intersecting. The returned ranges are normalized as well.
pub(crate) fn sweep<T, O, N>(mut old: O, mut new: N) -> BTreeSet<AddrRange<T>>
where
    T: Address,
    O: Iterator<Item = AddrRange<T>>,
    N: Iterator<Item = AddrRange<T>>,
{
    let mut diff = BTreeSet::new();

    let mut old_range = old.next();
    let mut new_range = new.next();
    // Start of the part of `old_range` which no range of `new` has covered yet.
    let mut noncovered_start = old_range.map(|range| range.first);

    while let (Some(o), Some(n)) = (old_range, new_range) {
        if o.last < n.first {
            // old: --[-----]------------
            // new: -----------[-----]---
            if let Some(start) = noncovered_start.take() {
                diff.insert(AddrRange::new(start, o.last));
            }

            old_range = old.next();
            noncovered_start = old_range.map(|range| range.first);
        } else if n.last < o.first {
            // old: -----------[-----]---
            // new: --[-----]------------
            new_range = new.next();
        } else {
            // old: --[-----------]---
            // new: -----[-----]------
            if let Some(start) = noncovered_start.take() {
                if start < n.first {
                    // `n.first > start`, so it is not the minimum address.
                    diff.insert(AddrRange::new(start, n.first - T::ONE));
                }
            }

            if n.last < o.last {
                // `n.last < o.last`, so it is not the maximum address.
                noncovered_start = Some(n.last + T::ONE);
                new_range = new.next();
            } else {
                old_range = old.next();
                noncovered_start = old_range.map(|range| range.first);
            }
        }
    }

    // `new` is exhausted, everything left in `old` is uncovered.
    if let (Some(start), Some(o)) = (noncovered_start, old_range) {
        diff.insert(AddrRange::new(start, o.last));
        trace!("flushed trailing range {:?}..={:?}", start, o.last);
    }
    diff.extend(old);

    diff
}

impl<T: Address> Difference<Pool<T>> for Pool<T> {
    type Output = Pool<T>;

    fn difference(&self, other: &Pool<T>) -> Self::Output {
        let diff = Pool::from_set(sweep(self.normalized(), other.normalized()));

        debug!(
            old = self.len_ranges(),
            new = other.len_ranges(),
            diff = diff.len_ranges(),
            "computed pool difference"
        );

        diff
    }
}

impl<T: Address> Difference<AddrRange<T>> for Pool<T> {
    type Output = Pool<T>;

    fn difference(&self, other: &AddrRange<T>) -> Self::Output {
        Pool::from_set(sweep(self.normalized(), std::iter::once(*other)))
    }
}

impl<T: Address> Difference<Pool<T>> for AddrRange<T> {
    type Output = Pool<T>;

    fn difference(&self, other: &Pool<T>) -> Self::Output {
        Pool::from_set(sweep(std::iter::once(*self), other.normalized()))
    }
}

impl<T: Address> Difference<AddrRange<T>> for AddrRange<T> {
    type Output = Pool<T>;

    fn difference(&self, other: &AddrRange<T>) -> Self::Output {
        Pool::from_set(sweep(std::iter::once(*self), std::iter::once(*other)))
    }
}
