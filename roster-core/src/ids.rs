//! Integer identifiers for upstream records.
//!
//! The upstream source numbers every collection independently, so each
//! record kind gets its own newtype. All of them serialize as plain JSON
//! integers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parse the integer prefix of `raw`, ignoring leading whitespace.
///
/// Accepts an optional sign followed by at least one ASCII digit and stops
/// at the first non-digit, so `"12abc"` parses as `12` while `"abc"` and
/// `""` yield `None`. Values outside the `i64` range also yield `None`.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let digits = &rest[..digits_len];
    if negative {
        format!("-{digits}").parse().ok()
    } else {
        digits.parse().ok()
    }
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Human-readable name of the record kind this id belongs to.
            pub const ENTITY_NAME: &'static str = $entity;

            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> i64 {
                self.0
            }

            /// Lenient parse used for path segments: leading integer wins.
            pub fn parse_lenient(raw: &str) -> Option<Self> {
                parse_leading_int(raw).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

define_id!(
    /// Identifier of a user record.
    UserId,
    "user"
);
define_id!(
    /// Identifier of a post record.
    PostId,
    "post"
);
define_id!(
    /// Identifier of a comment record.
    CommentId,
    "comment"
);
