//! Strand-aware coordinate helpers
//!
//! Genomic positions throughout the crate are inclusive base positions on
//! the forward strand. Layout code works in *oriented* coordinates so that
//! transcription always runs left to right:
//!
//! | Strand | Oriented coordinate | Example (`loc = 150`) |
//! |--------|---------------------|-----------------------|
//! | [`Strand::Plus`]  | `loc`  | `150`  |
//! | [`Strand::Minus`] | `-loc` | `-150` |
//!
//! # Examples
//!
//! ```
//! use ferro_proteoform::coords::Strand;
//!
//! assert_eq!(Strand::Minus.orient(150), -150);
//! assert_eq!(Strand::Minus.deorient(-150), 150);
//! assert_eq!(Strand::Plus.oriented_span(100, 200), (100, 201));
//! assert_eq!(Strand::Minus.oriented_span(100, 200), (-200, -99));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Strand {
    #[serde(rename = "+")]
    #[default]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Strand {
    /// Parse the `+` / `-` strand symbol used by gene nodes.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "+" | "1" => Some(Strand::Plus),
            "-" | "-1" => Some(Strand::Minus),
            _ => None,
        }
    }

    /// Map a genomic position into oriented coordinates.
    #[inline]
    pub const fn orient(self, loc: i64) -> i64 {
        match self {
            Strand::Plus => loc,
            Strand::Minus => -loc,
        }
    }

    /// Inverse of [`Strand::orient`].
    #[inline]
    pub const fn deorient(self, oriented: i64) -> i64 {
        self.orient(oriented)
    }

    /// Map an inclusive genomic span to a half-open oriented span.
    #[inline]
    pub const fn oriented_span(self, bp_from: i64, bp_to: i64) -> (i64, i64) {
        match self {
            Strand::Plus => (bp_from, bp_to + 1),
            Strand::Minus => (-bp_to, -bp_from + 1),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Plus => write!(f, "+"),
            Strand::Minus => write!(f, "-"),
        }
    }
}
