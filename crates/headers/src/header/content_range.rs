//! `Content-Range` (RFC 9110 section 14.4).
//!
//! ```text
//! Content-Range       = range-unit SP ( range-resp / unsatisfied-range )
//! range-resp          = incl-range "/" ( complete-length / "*" )
//! unsatisfied-range   = "*/" complete-length
//! ```

use std::fmt;
use std::str::FromStr;

use http::HeaderName;

use crate::error::HeaderError;
use crate::grammar::{self, Flow, HeaderGrammar, Scanner, chars};
use crate::header::TypedHeader;
use crate::utils::ensure;

/// A byte (or other unit) span of a partial response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentRange {
    unit: String,
    range: Option<(u64, u64)>,
    complete_length: Option<u64>,
}

impl ContentRange {
    /// # Errors
    ///
    /// Returns an invalid value error when `last < first`, when `last` is not below `complete_length`, or
    /// when neither a range nor a complete length is given.
    pub fn new(unit: &str, range: Option<(u64, u64)>, complete_length: Option<u64>) -> Result<Self, HeaderError> {
        crate::value::names::validate(unit, "range unit", chars::is_tchar)?;
        if let Some((first, last)) = range {
            ensure!(
                last >= first,
                HeaderError::invalid_value(format!("Invalid range: upper bound {last} is less than lower bound {first}"))
            );
            if let Some(length) = complete_length {
                ensure!(
                    last < length,
                    HeaderError::invalid_value(format!(
                        "Invalid range: upper bound {last} is not less than the complete length {length}"
                    ))
                );
            }
        } else {
            ensure!(complete_length.is_some(), HeaderError::invalid_value("Invalid range: unsatisfied range without complete length"));
        }
        Ok(Self { unit: unit.to_string(), range, complete_length })
    }

    /// `bytes first-last/complete_length`.
    ///
    /// # Errors
    ///
    /// See [`ContentRange::new`].
    pub fn bytes(first: u64, last: u64, complete_length: Option<u64>) -> Result<Self, HeaderError> {
        Self::new("bytes", Some((first, last)), complete_length)
    }

    /// `bytes */complete_length`, sent with 416 responses.
    pub fn unsatisfied(complete_length: u64) -> Self {
        Self { unit: "bytes".to_string(), range: None, complete_length: Some(complete_length) }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// The inclusive `(first, last)` positions, `None` for an unsatisfied range.
    pub fn range(&self) -> Option<(u64, u64)> {
        self.range
    }

    pub fn complete_length(&self) -> Option<u64> {
        self.complete_length
    }

    /// Number of units in the range, `None` for an unsatisfied range or a span of more than `u64::MAX` units.
    pub fn len(&self) -> Option<u64> {
        self.range.and_then(|(first, last)| (last - first).checked_add(1))
    }

    pub fn is_unsatisfied(&self) -> bool {
        self.range.is_none()
    }
}

impl fmt::Display for ContentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.unit)?;
        match self.range {
            Some((first, last)) => write!(f, "{first}-{last}/")?,
            None => f.write_str("*/")?,
        }
        match self.complete_length {
            Some(length) => write!(f, "{length}"),
            None => f.write_str("*"),
        }
    }
}

impl FromStr for ContentRange {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_content_range(s)
    }
}

/// Reads a run of digits as a `u64`, reporting overflow as a conversion error.
pub(crate) fn number(scanner: &mut Scanner<'_>, label: &'static str) -> Result<u64, HeaderError> {
    let digits = scanner.required_token(chars::is_digit, label)?;
    digits.parse().map_err(|e| HeaderError::conversion(label, digits, e))
}

#[derive(Default)]
struct ContentRangeGrammar {
    unit: Option<String>,
    value: Option<ContentRange>,
}

impl ContentRangeGrammar {
    fn range_response(&mut self, scanner: &mut Scanner<'_>, unit: String) -> Result<(), HeaderError> {
        let range = if scanner.consume('*') {
            None
        } else {
            let first = number(scanner, "first position")?;
            scanner.expect('-', "last position")?;
            let last = number(scanner, "last position")?;
            Some((first, last))
        };
        scanner.expect('/', "complete length")?;
        let complete_length = if scanner.consume('*') { None } else { Some(number(scanner, "complete length")?) };
        self.value = Some(ContentRange::new(&unit, range, complete_length)?);
        Ok(())
    }
}

impl HeaderGrammar for ContentRangeGrammar {
    type Output = ContentRange;
    const LABEL: &'static str = "range unit";

    fn value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        self.unit = Some(scanner.required_token(chars::is_tchar, Self::LABEL)?.to_string());
        Ok(())
    }

    fn value_complete(&mut self, _scanner: &Scanner<'_>) -> Result<(), HeaderError> {
        Ok(())
    }

    fn finish(self, scanner: &Scanner<'_>) -> Result<Self::Output, HeaderError> {
        self.value.ok_or_else(|| scanner.missing("range"))
    }

    /// The space after the unit introduces the range, any later whitespace is optional.
    fn whitespace(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        scanner.skip_whitespace()?;
        if let Some(unit) = self.unit.take() {
            if scanner.is_at_end() {
                return Err(scanner.missing("range"));
            }
            self.range_response(scanner, unit)?;
        }
        Ok(Flow::Continue)
    }
}

/// Parses a `Content-Range` value.
///
/// # Errors
///
/// Returns the first syntax error, or an invalid value error for an inconsistent range.
///
/// # Example
///
/// ```
/// use micro_headers::parse_content_range;
///
/// let range = parse_content_range("bytes 0-499/1234").unwrap();
/// assert_eq!(range.range(), Some((0, 499)));
/// assert_eq!(range.complete_length(), Some(1234));
/// assert!(parse_content_range("bytes 100-99/*").is_err());
/// ```
pub fn parse_content_range(text: &str) -> Result<ContentRange, HeaderError> {
    grammar::parse(ContentRangeGrammar::default(), text)
}

impl TypedHeader for ContentRange {
    const NAME: HeaderName = http::header::CONTENT_RANGE;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_content_range(text)
    }
}

#[cfg(feature = "serde")]
crate::value::impl_serde_as_text!(ContentRange);
