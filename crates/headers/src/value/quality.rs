//! Quality factors (`q` parameters) and the preference ordering built on them.
//!
//! Content negotiation headers attach a weight in `[0, 1]` to each alternative. A value without an explicit
//! `q` parameter weighs `1`. [`sort_by_quality`] reorders an already parsed list by descending weight and keeps
//! the textual order between equal weights, so it never affects tokenizing.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::ParseFloatError;
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

/// A validated quality factor, always finite and within `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct QualityFactor(f32);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QualityError {
    #[error("{0}")]
    Number(#[from] ParseFloatError),

    #[error("quality factor {0} is not between 0 and 1")]
    OutOfRange(f32),
}

impl QualityFactor {
    /// The implicit weight of a value without a `q` parameter.
    pub const ONE: Self = Self(1.0);

    /// "not acceptable"
    pub const ZERO: Self = Self(0.0);

    pub fn new(value: f32) -> Result<Self, QualityError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(QualityError::OutOfRange(value));
        }
        // folds -0.0 into 0.0 so equality and hashing agree
        Ok(Self(value + 0.0))
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.0
    }

    /// Returns true for `q=0`, which marks a value as not acceptable.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl Default for QualityFactor {
    fn default() -> Self {
        Self::ONE
    }
}

impl FromStr for QualityFactor {
    type Err = QualityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.parse::<f32>()?)
    }
}

impl fmt::Display for QualityFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl PartialEq for QualityFactor {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for QualityFactor {}

impl Hash for QualityFactor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for QualityFactor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QualityFactor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Values that carry a preference weight.
pub trait Qualified {
    /// The explicit `q` parameter, or [`QualityFactor::ONE`] when absent.
    fn quality(&self) -> QualityFactor;
}

/// Orders `values` by descending quality factor.
///
/// The sort is stable: values with the same weight keep their original relative order.
///
/// # Example
///
/// ```
/// use micro_headers::{parse_accept_charset, sort_by_quality};
///
/// // parse_accept_charset already sorts, sorting again is a no-op
/// let charsets = parse_accept_charset("utf-8; q=0.5, utf-16; q=0.75").unwrap();
/// let sorted = sort_by_quality(charsets.clone());
/// assert_eq!(charsets, sorted);
/// assert_eq!(sorted[0].to_string(), "UTF-16; q=0.75");
/// ```
pub fn sort_by_quality<T: Qualified>(mut values: Vec<T>) -> Vec<T> {
    values.sort_by(|a, b| b.quality().cmp(&a.quality()));
    trace!(len = values.len(), "sorted values by quality");
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Weighted(&'static str, f32);

    impl Qualified for Weighted {
        fn quality(&self) -> QualityFactor {
            QualityFactor::new(self.1).unwrap()
        }
    }

    #[test]
    fn parse_valid_values() {
        assert_eq!("1".parse::<QualityFactor>().unwrap(), QualityFactor::ONE);
        assert_eq!("0".parse::<QualityFactor>().unwrap(), QualityFactor::ZERO);
        assert_eq!("0.75".parse::<QualityFactor>().unwrap().value(), 0.75);
        assert_eq!("-0".parse::<QualityFactor>().unwrap(), QualityFactor::ZERO);
    }

    #[test]
    fn parse_invalid_values() {
        let err = "abc".parse::<QualityFactor>().unwrap_err();
        assert_eq!(err.to_string(), "invalid float literal");

        let err = "1.5".parse::<QualityFactor>().unwrap_err();
        assert_eq!(err, QualityError::OutOfRange(1.5));
        assert_eq!(err.to_string(), "quality factor 1.5 is not between 0 and 1");

        assert!("NaN".parse::<QualityFactor>().is_err());
        assert!("inf".parse::<QualityFactor>().is_err());
    }

    #[test]
    fn display_is_shortest_form() {
        assert_eq!(QualityFactor::ONE.to_string(), "1");
        assert_eq!(QualityFactor::ZERO.to_string(), "0");
        assert_eq!(QualityFactor::new(0.5).unwrap().to_string(), "0.5");
        assert_eq!(QualityFactor::new(0.001).unwrap().to_string(), "0.001");
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let values = vec![Weighted("a", 0.5), Weighted("b", 1.0), Weighted("c", 0.5), Weighted("d", 1.0), Weighted("e", 0.9)];
        let sorted: Vec<_> = sort_by_quality(values).into_iter().map(|w| w.0).collect();
        assert_eq!(sorted, vec!["b", "d", "e", "a", "c"]);
    }
}
