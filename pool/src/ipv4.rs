//! Text format for pools of IPv4 addresses.
//!
//! A pool is written one range per line. Each line holds one of
//!
//! - a single address, `10.0.0.1`,
//! - a closed range, `10.0.0.1-10.0.0.20`,
//! - a CIDR block, `10.0.0.0/24`.
//!
//! Addresses are given in dotted-quad notation or as plain decimal integers. Blank
//! lines are skipped and `#` starts a comment which runs to the end of the line.
//!
//! ```
//! use pool::{Difference, Ipv4Pool};
//!
//! let old: Ipv4Pool = "10.0.0.0/24".parse().unwrap();
//! let new: Ipv4Pool = "10.0.0.16 - 10.0.0.255 # in use".parse().unwrap();
//!
//! let diff = old.difference(&new);
//!
//! assert_eq!(diff.to_string_ipv4(), "10.0.0.0-10.0.0.15\n");
//! ```

use std::{fmt, net::Ipv4Addr, str::FromStr};

use thiserror::Error;

use crate::{
    range::{AddrRange, RangeError},
    Pool,
};

/// A pool of IPv4 addresses.
pub type Ipv4Pool = Pool<u32>;

/// Errors that can occur when parsing IPv4 ranges and pools.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The address is neither a dotted quad nor a decimal integer.
    #[error("invalid address `{0}`")]
    InvalidAddress(String),
    /// The CIDR prefix length is not an integer in `0..=32`.
    #[error("invalid prefix length `{0}`")]
    InvalidPrefix(String),
    /// The range is not well formed.
    #[error(transparent)]
    Range(#[from] RangeError),
    /// A line of a pool could not be parsed.
    #[error("line {line}: {source}")]
    Line {
        /// The 1-based line number.
        line: usize,
        /// The error for the line.
        #[source]
        source: Box<ParseError>,
    },
}

fn parse_address(s: &str) -> Result<u32, ParseError> {
    let s = s.trim();

    if let Ok(addr) = s.parse::<Ipv4Addr>() {
        return Ok(addr.into());
    }

    // `u32::from_str` also accepts a leading `+`.
    if !s.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ParseError::InvalidAddress(s.to_string()));
    }

    s.parse::<u32>()
        .map_err(|_| ParseError::InvalidAddress(s.to_string()))
}

fn parse_cidr(addr: &str, prefix: &str) -> Result<AddrRange<u32>, ParseError> {
    let addr = parse_address(addr)?;
    let prefix = prefix.trim();
    let len = prefix
        .parse::<u32>()
        .ok()
        .filter(|len| *len <= 32)
        .ok_or_else(|| ParseError::InvalidPrefix(prefix.to_string()))?;

    // A shift by 32 overflows, so `/0` is handled on its own.
    let mask = u32::MAX.checked_shl(32 - len).unwrap_or(0);
    let first = addr & mask;

    Ok(AddrRange::new(first, first | !mask))
}

impl FromStr for AddrRange<u32> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((addr, prefix)) = s.split_once('/') {
            parse_cidr(addr, prefix)
        } else if let Some((first, last)) = s.split_once('-') {
            Ok(AddrRange::try_new(
                parse_address(first)?,
                parse_address(last)?,
            )?)
        } else {
            Ok(AddrRange::single(parse_address(s)?))
        }
    }
}

impl FromStr for Pool<u32> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pool = Pool::default();

        for (idx, line) in s.lines().enumerate() {
            let line = line.split_once('#').map_or(line, |(line, _)| line).trim();
            if line.is_empty() {
                continue;
            }

            let range: AddrRange<u32> = line.parse().map_err(|err| ParseError::Line {
                line: idx + 1,
                source: Box::new(err),
            })?;

            pool.insert(range);
        }

        Ok(pool)
    }
}

/// Displays a value in dotted-quad notation.
#[derive(Debug, Clone, Copy)]
pub struct Ipv4Display<'a, T>(&'a T);

impl AddrRange<u32> {
    /// Returns a value which displays the range in dotted-quad notation.
    pub fn ipv4(&self) -> Ipv4Display<'_, Self> {
        Ipv4Display(self)
    }
}

impl Pool<u32> {
    /// Returns a value which displays the canonical ranges of the pool in dotted-quad
    /// notation, one per line.
    pub fn ipv4(&self) -> Ipv4Display<'_, Self> {
        Ipv4Display(self)
    }

    /// Returns the canonical ranges of the pool in dotted-quad notation, one per line.
    pub fn to_string_ipv4(&self) -> String {
        self.ipv4().to_string()
    }
}

impl fmt::Display for Ipv4Display<'_, AddrRange<u32>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.0;
        if range.first == range.last {
            write!(f, "{}", Ipv4Addr::from(range.first))
        } else {
            write!(
                f,
                "{}-{}",
                Ipv4Addr::from(range.first),
                Ipv4Addr::from(range.last)
            )
        }
    }
}

impl fmt::Display for Ipv4Display<'_, Pool<u32>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for range in self.0.normalized() {
            writeln!(f, "{}", range.ipv4())?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::all)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("10.0.0.1", AddrRange::single(0x0a00_0001))]
    #[case("167772161", AddrRange::single(0x0a00_0001))]
    #[case("0.0.0.0", AddrRange::single(0))]
    #[case("255.255.255.255", AddrRange::single(u32::MAX))]
    #[case("10.0.0.1-10.0.0.20", AddrRange::new(0x0a00_0001, 0x0a00_0014))]
    #[case(" 10.0.0.1 - 10.0.0.20 ", AddrRange::new(0x0a00_0001, 0x0a00_0014))]
    #[case("3-14", AddrRange::new(3, 14))]
    #[case("7-7", AddrRange::single(7))]
    #[case("10.0.0.0/24", AddrRange::new(0x0a00_0000, 0x0a00_00ff))]
    #[case("10.0.0.77/24", AddrRange::new(0x0a00_0000, 0x0a00_00ff))]
    #[case("10.0.0.1/32", AddrRange::single(0x0a00_0001))]
    #[case("1.2.3.4/0", AddrRange::new(0, u32::MAX))]
    #[case("255.255.255.255/1", AddrRange::new(0x8000_0000, u32::MAX))]
    fn test_parse_range(#[case] s: &str, #[case] expected: AddrRange<u32>) {
        assert_eq!(s.parse::<AddrRange<u32>>(), Ok(expected));
    }

    #[rstest]
    #[case("", ParseError::InvalidAddress(String::new()))]
    #[case("10.0.0", ParseError::InvalidAddress("10.0.0".to_string()))]
    #[case("256.0.0.1", ParseError::InvalidAddress("256.0.0.1".to_string()))]
    #[case("4294967296", ParseError::InvalidAddress("4294967296".to_string()))]
    #[case("-5", ParseError::InvalidAddress(String::new()))]
    #[case("+5", ParseError::InvalidAddress("+5".to_string()))]
    #[case("10.0.0.1-+20", ParseError::InvalidAddress("+20".to_string()))]
    #[case("+10.0.0.0/8", ParseError::InvalidAddress("+10.0.0.0".to_string()))]
    #[case("10.0.0.0/33", ParseError::InvalidPrefix("33".to_string()))]
    #[case("10.0.0.0/x", ParseError::InvalidPrefix("x".to_string()))]
    #[case("10.0.0.20-10.0.0.1", ParseError::Range(RangeError::Inverted))]
    fn test_parse_range_errors(#[case] s: &str, #[case] expected: ParseError) {
        assert_eq!(s.parse::<AddrRange<u32>>(), Err(expected));
    }

    #[test]
    fn test_parse_pool() {
        let text = "
            # reserved
            10.0.0.0/30
            10.0.0.2 - 10.0.0.9   # overlaps the block above

            192.168.1.1
            192.168.1.1
        ";

        let pool: Ipv4Pool = text.parse().unwrap();

        assert_eq!(pool.len_ranges(), 3);
        assert_eq!(
            pool.canonical().into_inner(),
            vec![
                AddrRange::new(0x0a00_0000, 0x0a00_0009),
                AddrRange::single(0xc0a8_0101),
            ]
        );
    }

    #[test]
    fn test_parse_pool_empty() {
        assert!("".parse::<Ipv4Pool>().unwrap().is_empty());
        assert!("\n  # nothing here\n\n".parse::<Ipv4Pool>().unwrap().is_empty());
    }

    #[test]
    fn test_parse_pool_error_line() {
        let err = "10.0.0.1\n\n10.0.0.9-10.0.0.3\n"
            .parse::<Ipv4Pool>()
            .unwrap_err();

        assert_eq!(
            err,
            ParseError::Line {
                line: 3,
                source: Box::new(ParseError::Range(RangeError::Inverted)),
            }
        );
        assert_eq!(
            err.to_string(),
            "line 3: range start is greater than range end"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(AddrRange::single(0x0a00_0001).ipv4().to_string(), "10.0.0.1");
        assert_eq!(
            AddrRange::new(0, u32::MAX).ipv4().to_string(),
            "0.0.0.0-255.255.255.255"
        );

        let pool = Ipv4Pool::from([0x0a00_0005..=0x0a00_0009, 0x0a00_0000..=0x0a00_0004, 7..=7]);
        assert_eq!(pool.to_string_ipv4(), "0.0.0.7\n10.0.0.0-10.0.0.9\n");
    }

    #[test]
    fn test_display_parse_round_trip_at_domain_bounds() {
        let pool = Ipv4Pool::from([0..=0, 100..=u32::MAX]);

        assert_eq!(pool.to_string_ipv4().parse::<Ipv4Pool>().unwrap(), pool);
    }
}
