use std::iter::{FusedIterator, Peekable};

use crate::range::{AddrRange, Address};

/// An iterator which merges overlapping and adjacent ranges.
///
/// The wrapped iterator *MUST* yield ranges sorted by their first address. Given
/// such input, `Normalize` yields ranges which are sorted, non-adjacent and
/// non-intersecting, and which cover exactly the addresses of the input.
///
/// Ranges are merged on demand: each call to `next` consumes only the input ranges
/// that fold into the yielded range.
///
/// # Examples
///
/// ```
/// use pool::range::{AddrRange, NormalizeExt};
///
/// let ranges = [
///     AddrRange::new(1u32, 4),
///     AddrRange::new(2, 3),
///     AddrRange::new(5, 8),
///     AddrRange::new(10, 12),
/// ];
///
/// let normalized = ranges.into_iter().normalize().collect::<Vec<_>>();
///
/// assert_eq!(normalized, vec![AddrRange::new(1, 8), AddrRange::new(10, 12)]);
/// ```
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Normalize<I: Iterator> {
    iter: Peekable<I>,
}

impl<I: Iterator> Normalize<I> {
    pub(crate) fn new(iter: I) -> Self {
        Self {
            iter: iter.peekable(),
        }
    }
}

impl<T, I> Iterator for Normalize<I>
where
    T: Address,
    I: Iterator<Item = AddrRange<T>>,
{
    type Item = AddrRange<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut range = self.iter.next()?;

        // `touches` never computes `range.last + 1`, which does not exist when
        // `range.last` is the maximum address.
        while let Some(next) = self.iter.next_if(|next| range.touches(next)) {
            range.last = range.last.max(next.last);
        }

        Some(range)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        (lower.min(1), upper)
    }
}

impl<T, I> FusedIterator for Normalize<I>
where
    T: Address,
    I: FusedIterator<Item = AddrRange<T>>,
{
}

/// Extension trait adding [`normalize`](NormalizeExt::normalize) to iterators of ranges.
pub trait NormalizeExt<T: Address>: Iterator<Item = AddrRange<T>> + Sized {
    /// Merges overlapping and adjacent ranges of a sorted iterator.
    ///
    /// See [`Normalize`] for details.
    fn normalize(self) -> Normalize<Self> {
        Normalize::new(self)
    }
}

impl<T: Address, I: Iterator<Item = AddrRange<T>>> NormalizeExt<T> for I {}
