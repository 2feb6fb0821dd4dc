use libfuzzer_sys::arbitrary::{Arbitrary, Result, Unstructured};

use pool::{AddrRange, Pool};

/// A range over the `u8` domain. Both ends of the domain are reachable.
#[derive(Debug, Clone, Copy)]
pub struct SmallRange(pub AddrRange<u8>);

impl<'a> Arbitrary<'a> for SmallRange {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let a = u8::arbitrary(u)?;
        let b = u8::arbitrary(u)?;

        Ok(SmallRange(AddrRange::new(a.min(b), a.max(b))))
    }

    fn size_hint(_depth: usize) -> (usize, Option<usize>) {
        (2, Some(2))
    }
}

/// A pool of up to 15 ranges, which may overlap, nest or repeat.
#[derive(Debug)]
pub struct SmallPool {
    pub ranges: Vec<AddrRange<u8>>,
}

impl From<SmallPool> for Pool<u8> {
    fn from(p: SmallPool) -> Self {
        Pool::new(&p.ranges)
    }
}

impl<'a> Arbitrary<'a> for SmallPool {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let count = u8::arbitrary(u)? % 16;

        let mut ranges = Vec::with_capacity(count as usize);
        for _ in 0..count {
            ranges.push(SmallRange::arbitrary(u)?.0);
        }

        Ok(SmallPool { ranges })
    }

    fn size_hint(_depth: usize) -> (usize, Option<usize>) {
        // 1 byte for `count` and up to 15 ranges of 2 bytes each.
        (1, Some(1 + 15 * 2))
    }
}

/// Returns the addresses of the pool, computed without normalizing it.
pub fn addresses(pool: &Pool<u8>) -> Vec<u8> {
    (u8::MIN..=u8::MAX)
        .filter(|addr| pool.iter_ranges().any(|range| range.contains(addr)))
        .collect()
}

/// Asserts that the ranges are sorted, non-adjacent and non-intersecting.
pub fn assert_invariants(ranges: &[AddrRange<u8>]) {
    assert!(ranges
        .windows(2)
        .all(|w| w[0].last() < w[1].first() && w[1].first() - w[0].last() > 1));
}
