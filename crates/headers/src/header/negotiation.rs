//! The proactive negotiation lists `Accept-Charset`, `Accept-Encoding` and `Accept-Language`.
//!
//! All three share one shape (RFC 9110 section 12.5):
//!
//! ```text
//! #( ( token / "*" ) [ weight ] )
//! ```
//!
//! [`NegotiationGrammar`] implements that shape once. The element type decides which characters its token may
//! contain and how the token becomes a value.

use std::fmt;

use http::HeaderName;

use crate::error::HeaderError;
use crate::grammar::{self, HeaderGrammar, ParameterBuilder, ParameterKind, Scanner, chars};
use crate::header::TypedHeader;
use crate::value::{Charset, ParameterName, Parameterized, Preference, fmt_list, sort_by_quality};

/// An element of a negotiation list.
pub(crate) trait NegotiationToken: Sized {
    const LABEL: &'static str;

    fn is_token_char(c: char) -> bool {
        chars::is_tchar(c)
    }

    /// Converts the token read at `start`.
    fn convert(token: &str, start: usize, text: &str) -> Result<Self, HeaderError>;
}

impl NegotiationToken for Charset {
    const LABEL: &'static str = "charset";

    fn is_token_char(c: char) -> bool {
        chars::is_mime_charset_char(c)
    }

    fn convert(token: &str, _start: usize, _text: &str) -> Result<Self, HeaderError> {
        Ok(Charset::from_token(token))
    }
}

pub(crate) struct NegotiationGrammar<T> {
    pending: Option<Preference<T>>,
    parameters: ParameterBuilder,
    values: Vec<Parameterized<Preference<T>>>,
}

impl<T> Default for NegotiationGrammar<T> {
    fn default() -> Self {
        Self { pending: None, parameters: ParameterBuilder::default(), values: Vec::new() }
    }
}

impl<T: NegotiationToken> HeaderGrammar for NegotiationGrammar<T> {
    type Output = Vec<Parameterized<Preference<T>>>;
    const LABEL: &'static str = T::LABEL;

    fn allow_multiple_values(&self) -> bool {
        true
    }

    fn wildcard_value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        scanner.advance();
        self.pending = Some(Preference::Any);
        Ok(())
    }

    fn value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        let start = scanner.position();
        let token = scanner.required_token(T::is_token_char, T::LABEL)?;
        self.pending = Some(Preference::Value(T::convert(token, start, scanner.text())?));
        Ok(())
    }

    fn value_complete(&mut self, _scanner: &Scanner<'_>) -> Result<(), HeaderError> {
        if let Some(value) = self.pending.take() {
            self.values.push(Parameterized::new(value).with_parameters(self.parameters.take()));
        }
        Ok(())
    }

    fn finish(self, _scanner: &Scanner<'_>) -> Result<Self::Output, HeaderError> {
        Ok(self.values)
    }

    fn parameters(&mut self) -> Option<&mut ParameterBuilder> {
        Some(&mut self.parameters)
    }

    fn parameter_kind(&self, name: &ParameterName) -> ParameterKind {
        if *name == ParameterName::Q {
            ParameterKind::Quality
        } else if name.is_extended() {
            ParameterKind::Extended
        } else {
            ParameterKind::Text
        }
    }
}

/// Parses a negotiation list and orders it by descending quality.
pub(crate) fn parse_negotiation<T: NegotiationToken>(text: &str) -> Result<Vec<Parameterized<Preference<T>>>, HeaderError> {
    grammar::parse(NegotiationGrammar::<T>::default(), text).map(sort_by_quality)
}

/// Parses an `Accept-Charset` value, sorted by descending quality.
///
/// # Errors
///
/// Returns the first syntax error, or a conversion error for a malformed `q`.
///
/// # Example
///
/// ```
/// use micro_headers::{Charset, Preference, parse_accept_charset};
///
/// let charsets = parse_accept_charset("iso-8859-5, unicode-1-1;q=0.8, *;q=0.1").unwrap();
/// assert_eq!(charsets[0].value(), &Preference::Value(Charset::new("ISO-8859-5").unwrap()));
/// assert!(charsets[2].value().is_any());
/// ```
pub fn parse_accept_charset(text: &str) -> Result<Vec<Parameterized<Preference<Charset>>>, HeaderError> {
    parse_negotiation(text)
}

/// The `Accept-Charset` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptCharset(pub Vec<Parameterized<Preference<Charset>>>);

impl fmt::Display for AcceptCharset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_list(f, &self.0, ", ")
    }
}

impl TypedHeader for AcceptCharset {
    const NAME: HeaderName = http::header::ACCEPT_CHARSET;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_accept_charset(text).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{QualityFactor, Qualified};

    #[test]
    fn sorted_by_quality() {
        let charsets = parse_accept_charset("utf-8; q=0.5, utf-16; q=0.75").unwrap();
        assert_eq!(charsets.len(), 2);
        assert_eq!(charsets[0].value(), &Preference::Value(Charset::UTF_16));
        assert_eq!(charsets[0].quality(), QualityFactor::new(0.75).unwrap());
        assert_eq!(charsets[1].value(), &Preference::Value(Charset::UTF_8));
    }

    #[test]
    fn equal_weights_keep_order() {
        let charsets = parse_accept_charset("a, b;q=0.9, c, *").unwrap();
        let rendered: Vec<String> = charsets.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["a", "c", "*", "b; q=0.9"]);
    }

    #[test]
    fn missing_elements() {
        assert_eq!(parse_accept_charset("utf-8,").unwrap_err().to_string(), "Missing charset at 6 in \"utf-8,\"");
        assert_eq!(parse_accept_charset("").unwrap_err().to_string(), "Missing charset at 0 in \"\"");
        assert_eq!(parse_accept_charset("utf-8; q").unwrap_err().to_string(), "Missing parameter value at 8 in \"utf-8; q\"");
    }

    #[test]
    fn invalid_characters() {
        assert_eq!(parse_accept_charset("utf@8").unwrap_err().to_string(), "Invalid character '@' at 3 in \"utf@8\"");
        assert_eq!(parse_accept_charset("utf-8\r").unwrap_err().to_string(), "Invalid character '\\r' at 5 in \"utf-8\r\"");
        assert_eq!(parse_accept_charset("\"utf-8\"").unwrap_err().position(), Some(0));
        assert!(parse_accept_charset("utf-8 (comment)").unwrap_err().is_comment_present());
    }

    #[test]
    fn quality_errors() {
        let err = parse_accept_charset("utf-8; q=1.5").unwrap_err();
        assert_eq!(err.to_string(), "Failed to convert \"q\" value \"1.5\", message: quality factor 1.5 is not between 0 and 1");
    }

    #[test]
    fn render_canonical() {
        let header = AcceptCharset::parse_text("utf8;Q=0.5 ,  *").unwrap();
        assert_eq!(header.to_string(), "*, UTF-8; Q=0.5");
    }
}
