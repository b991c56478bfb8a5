//! `Range` requests (RFC 9110 section 14.2).
//!
//! ```text
//! Range        = ranges-specifier
//! ranges-spec  = range-unit "=" range-set
//! range-set    = 1#range-spec
//! range-spec   = int-range / suffix-range
//! ```

use std::fmt;
use std::str::FromStr;

use http::HeaderName;

use crate::error::HeaderError;
use crate::grammar::{self, Flow, HeaderGrammar, Scanner, chars};
use crate::header::TypedHeader;
use crate::header::content_range::number;
use crate::utils::ensure;
use crate::value::fmt_list;

/// One element of a range set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeSpec {
    /// `first-last`, both inclusive.
    Bounded { first: u64, last: u64 },
    /// `first-`, up to the end of the representation.
    From { first: u64 },
    /// `-length`, the final `length` units.
    Suffix { length: u64 },
}

impl RangeSpec {
    /// The inclusive span this spec selects from a representation of `complete_length` units, `None` when it
    /// is not satisfiable.
    pub fn resolve(&self, complete_length: u64) -> Option<(u64, u64)> {
        let end = complete_length.checked_sub(1)?;
        match *self {
            Self::Bounded { first, last } if first <= end => Some((first, last.min(end))),
            Self::From { first } if first <= end => Some((first, end)),
            Self::Suffix { length } if length > 0 => Some((complete_length - length.min(complete_length), end)),
            _ => None,
        }
    }

    fn span(&self) -> Option<(u64, u64)> {
        match *self {
            Self::Bounded { first, last } => Some((first, last)),
            Self::From { first } => Some((first, u64::MAX)),
            Self::Suffix { .. } => None,
        }
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded { first, last } => write!(f, "{first}-{last}"),
            Self::From { first } => write!(f, "{first}-"),
            Self::Suffix { length } => write!(f, "-{length}"),
        }
    }
}

/// A validated range request: a unit and at least one non-overlapping spec.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Range {
    unit: String,
    specs: Vec<RangeSpec>,
}

impl Range {
    /// # Errors
    ///
    /// Returns an invalid value error for an empty spec list, a spec whose upper bound is below its lower
    /// bound, or two specs that overlap. Suffix specs are not checked for overlaps since their position
    /// depends on the representation length.
    pub fn new(unit: &str, specs: Vec<RangeSpec>) -> Result<Self, HeaderError> {
        crate::value::names::validate(unit, "range unit", chars::is_tchar)?;
        ensure!(!specs.is_empty(), HeaderError::invalid_value("Invalid range: no range specs"));
        for spec in &specs {
            if let RangeSpec::Bounded { first, last } = *spec {
                ensure!(
                    last >= first,
                    HeaderError::invalid_value(format!("Invalid range: upper bound {last} is less than lower bound {first}"))
                );
            }
        }

        let mut spans: Vec<(&RangeSpec, (u64, u64))> = specs.iter().filter_map(|spec| spec.span().map(|span| (spec, span))).collect();
        spans.sort_by_key(|(_, (first, _))| *first);
        for pair in spans.windows(2) {
            let (previous, (_, previous_last)) = pair[0];
            let (next, (next_first, _)) = pair[1];
            ensure!(next_first > previous_last, HeaderError::invalid_value(format!("Invalid range: {previous} overlaps {next}")));
        }
        Ok(Self { unit: unit.to_string(), specs })
    }

    /// A `bytes` range.
    ///
    /// # Errors
    ///
    /// See [`Range::new`].
    pub fn bytes(specs: Vec<RangeSpec>) -> Result<Self, HeaderError> {
        Self::new("bytes", specs)
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn specs(&self) -> &[RangeSpec] {
        &self.specs
    }

    /// The satisfiable spans for a representation of `complete_length` units, in request order.
    pub fn resolve(&self, complete_length: u64) -> Vec<(u64, u64)> {
        self.specs.iter().filter_map(|spec| spec.resolve(complete_length)).collect()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.unit)?;
        fmt_list(f, &self.specs, ", ")
    }
}

impl FromStr for Range {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_range(s)
    }
}

#[derive(Default)]
struct RangeGrammar {
    unit: Option<String>,
    specs: Vec<RangeSpec>,
}

impl RangeGrammar {
    fn range_spec(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        scanner.skip_whitespace()?;
        let spec = if scanner.consume('-') {
            RangeSpec::Suffix { length: number(scanner, "suffix length")? }
        } else {
            let first = number(scanner, "range spec")?;
            scanner.expect('-', "'-'")?;
            if scanner.peek().is_some_and(chars::is_digit) {
                RangeSpec::Bounded { first, last: number(scanner, "last position")? }
            } else {
                RangeSpec::From { first }
            }
        };
        self.specs.push(spec);
        Ok(())
    }
}

impl HeaderGrammar for RangeGrammar {
    type Output = Range;
    const LABEL: &'static str = "range unit";

    fn value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        self.unit = Some(scanner.required_token(chars::is_tchar, Self::LABEL)?.to_string());
        Ok(())
    }

    fn value_complete(&mut self, _scanner: &Scanner<'_>) -> Result<(), HeaderError> {
        Ok(())
    }

    fn finish(self, scanner: &Scanner<'_>) -> Result<Self::Output, HeaderError> {
        let Some(unit) = self.unit else {
            return Err(scanner.missing(Self::LABEL));
        };
        ensure!(!self.specs.is_empty(), scanner.missing("'='"));
        Range::new(&unit, self.specs)
    }

    /// The `=` after the unit, followed by the first spec.
    fn key_value_separator(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        ensure!(self.specs.is_empty(), scanner.invalid_character());
        scanner.advance();
        self.range_spec(scanner)?;
        Ok(Flow::Continue)
    }

    /// Further specs; the unit is not repeated, so the list stays inside one value.
    fn multi_value_separator(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        ensure!(!self.specs.is_empty(), scanner.invalid_character());
        scanner.advance();
        self.range_spec(scanner)?;
        Ok(Flow::Continue)
    }
}

/// Parses a `Range` value.
///
/// # Errors
///
/// Returns the first syntax error, or an invalid value error for reversed or overlapping specs.
///
/// # Example
///
/// ```
/// use micro_headers::{RangeSpec, parse_range};
///
/// let range = parse_range("bytes=0-499, -500").unwrap();
/// assert_eq!(range.specs(), &[RangeSpec::Bounded { first: 0, last: 499 }, RangeSpec::Suffix { length: 500 }]);
/// assert_eq!(range.resolve(10_000), vec![(0, 499), (9_500, 9_999)]);
/// ```
pub fn parse_range(text: &str) -> Result<Range, HeaderError> {
    grammar::parse(RangeGrammar::default(), text)
}

impl TypedHeader for Range {
    const NAME: HeaderName = http::header::RANGE;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_range(text)
    }
}

#[cfg(feature = "serde")]
crate::value::impl_serde_as_text!(Range);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_set() {
        let range = parse_range("bytes=0-499,500-999 , 2000-,-300").unwrap();
        assert_eq!(range.unit(), "bytes");
        assert_eq!(
            range.specs(),
            &[
                RangeSpec::Bounded { first: 0, last: 499 },
                RangeSpec::Bounded { first: 500, last: 999 },
                RangeSpec::From { first: 2000 },
                RangeSpec::Suffix { length: 300 },
            ]
        );
        assert_eq!(range.to_string(), "bytes=0-499, 500-999, 2000-, -300");
    }

    #[test]
    fn resolve_against_length() {
        let range = parse_range("bytes=0-99, 9000-, -50000").unwrap();
        assert_eq!(range.resolve(1000), vec![(0, 99), (0, 999)]);
        assert_eq!(RangeSpec::Suffix { length: 0 }.resolve(1000), None);
        assert_eq!(RangeSpec::From { first: 0 }.resolve(0), None);
    }

    #[test]
    fn resolve_at_the_numeric_limit() {
        let range = parse_range("bytes=0-18446744073709551615, -5").unwrap();
        assert_eq!(range.resolve(u64::MAX), vec![(0, u64::MAX - 1), (u64::MAX - 5, u64::MAX - 1)]);
        assert_eq!(RangeSpec::From { first: u64::MAX }.resolve(u64::MAX), None);
        assert_eq!(RangeSpec::Suffix { length: u64::MAX }.resolve(3), Some((0, 2)));

        let err = parse_range("bytes=18446744073709551615-, 0-18446744073709551615").unwrap_err();
        assert_eq!(err.to_string(), "Invalid range: 0-18446744073709551615 overlaps 18446744073709551615-");
    }

    #[test]
    fn invalid_ranges() {
        let err = parse_range("bytes=100-99").unwrap_err();
        assert_eq!(err.to_string(), "Invalid range: upper bound 99 is less than lower bound 100");

        let err = parse_range("bytes=0-499, 400-").unwrap_err();
        assert_eq!(err.to_string(), "Invalid range: 0-499 overlaps 400-");

        assert!(Range::bytes(Vec::new()).is_err());
        assert!(Range::bytes(vec![RangeSpec::Suffix { length: 10 }, RangeSpec::Suffix { length: 20 }]).is_ok());
    }

    #[test]
    fn syntax_errors() {
        assert_eq!(parse_range("bytes").unwrap_err().to_string(), "Missing '=' at 5 in \"bytes\"");
        assert_eq!(parse_range("bytes=").unwrap_err().to_string(), "Missing range spec at 6 in \"bytes=\"");
        assert_eq!(parse_range("bytes=5").unwrap_err().to_string(), "Missing '-' at 7 in \"bytes=5\"");
        assert_eq!(parse_range("bytes=0-1,").unwrap_err().to_string(), "Missing range spec at 10 in \"bytes=0-1,\"");
        assert_eq!(parse_range("bytes=0-1=2").unwrap_err().to_string(), "Invalid character '=' at 9 in \"bytes=0-1=2\"");
        assert_eq!(parse_range("bytes=a-1").unwrap_err().to_string(), "Invalid character 'a' at 6 in \"bytes=a-1\"");
    }
}
