//! Pools of address ranges and their set difference.
//!
//! A [`Pool`] is a set of addresses stored as closed ranges. Pools may be built
//! from any collection of ranges, overlapping or redundant, and are reduced to
//! canonical form lazily whenever they are compared or subtracted.
//!
//! ```
//! use pool::{Difference, Pool};
//!
//! let old = Pool::from([3..=14u32]);
//! let new = Pool::from([7..=12]);
//!
//! assert_eq!(old.difference(&new), Pool::from([3..=6, 13..=14]));
//! ```

#![deny(missing_docs, unreachable_pub, unused_must_use)]
#![deny(clippy::all)]
#![forbid(unsafe_code)]

pub mod ipv4;
mod pool;
pub mod range;

pub use ipv4::Ipv4Pool;
pub use pool::{Pool, RangeIter};
pub use range::{AddrRange, Address, Difference, RangeError};

pub(crate) mod log {
    macro_rules! trace {
        ($( $tokens:tt )*) => {
            {
                #[cfg(feature = "tracing")]
                tracing::trace!($( $tokens )*);
            }
        };
    }

    macro_rules! debug {
        ($( $tokens:tt )*) => {
            {
                #[cfg(feature = "tracing")]
                tracing::debug!($( $tokens )*);
            }
        };
    }

    pub(crate) use {debug, trace};
}
