//! Content codings for `Accept-Encoding` and `Content-Encoding`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use http::HeaderName;

use crate::error::HeaderError;
use crate::grammar::{self, HeaderGrammar, Scanner, chars};
use crate::header::TypedHeader;
use crate::header::negotiation::{NegotiationToken, parse_negotiation};
use crate::value::{Parameterized, Preference, Qualified, fmt_list, names};

/// A content coding. Registered codings are recognized case-insensitively; `x-gzip` and `x-compress` are
/// folded into their standard names.
#[derive(Debug, Clone)]
pub enum ContentCoding {
    Gzip,
    Deflate,
    Br,
    Zstd,
    Compress,
    Identity,
    Other(Box<str>),
}

static REGISTERED: [(&str, ContentCoding); 8] = [
    ("gzip", ContentCoding::Gzip),
    ("x-gzip", ContentCoding::Gzip),
    ("deflate", ContentCoding::Deflate),
    ("br", ContentCoding::Br),
    ("zstd", ContentCoding::Zstd),
    ("compress", ContentCoding::Compress),
    ("x-compress", ContentCoding::Compress),
    ("identity", ContentCoding::Identity),
];

impl ContentCoding {
    /// # Errors
    ///
    /// Returns an error if `name` is not a token.
    pub fn new(name: &str) -> Result<Self, HeaderError> {
        names::validate(name, "content coding", chars::is_tchar)?;
        Ok(Self::from_token(name))
    }

    fn from_token(name: &str) -> Self {
        REGISTERED
            .iter()
            .find(|(registered, _)| registered.eq_ignore_ascii_case(name))
            .map_or_else(|| Self::Other(name.into()), |(_, coding)| coding.clone())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Gzip => "gzip",
            Self::Deflate => "deflate",
            Self::Br => "br",
            Self::Zstd => "zstd",
            Self::Compress => "compress",
            Self::Identity => "identity",
            Self::Other(name) => name,
        }
    }
}

impl PartialEq for ContentCoding {
    fn eq(&self, other: &Self) -> bool {
        self.as_str().eq_ignore_ascii_case(other.as_str())
    }
}

impl Eq for ContentCoding {}

impl Hash for ContentCoding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.as_str().bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Display for ContentCoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentCoding {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl NegotiationToken for ContentCoding {
    const LABEL: &'static str = "content coding";

    fn convert(token: &str, _start: usize, _text: &str) -> Result<Self, HeaderError> {
        Ok(Self::from_token(token))
    }
}

/// Parses an `Accept-Encoding` value, sorted by descending quality.
///
/// # Errors
///
/// Returns the first syntax error, or a conversion error for a malformed `q`.
///
/// # Example
///
/// ```
/// use micro_headers::{ContentCoding, Preference, parse_accept_encoding};
///
/// let codings = parse_accept_encoding("gzip;q=0.8, deflate, br;q=0.9").unwrap();
/// let order: Vec<_> = codings.iter().map(|coding| coding.value().clone()).collect();
/// assert_eq!(order, vec![
///     Preference::Value(ContentCoding::Deflate),
///     Preference::Value(ContentCoding::Br),
///     Preference::Value(ContentCoding::Gzip),
/// ]);
/// ```
pub fn parse_accept_encoding(text: &str) -> Result<Vec<Parameterized<Preference<ContentCoding>>>, HeaderError> {
    parse_negotiation(text)
}

#[derive(Default)]
struct ContentEncodingGrammar {
    values: Vec<ContentCoding>,
}

impl HeaderGrammar for ContentEncodingGrammar {
    type Output = Vec<ContentCoding>;
    const LABEL: &'static str = "content coding";

    fn allow_multiple_values(&self) -> bool {
        true
    }

    fn value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        let token = scanner.required_token(chars::is_tchar, Self::LABEL)?;
        self.values.push(ContentCoding::from_token(token));
        Ok(())
    }

    fn value_complete(&mut self, _scanner: &Scanner<'_>) -> Result<(), HeaderError> {
        Ok(())
    }

    fn finish(self, _scanner: &Scanner<'_>) -> Result<Self::Output, HeaderError> {
        Ok(self.values)
    }
}

/// Parses a `Content-Encoding` value: the codings applied, in order.
///
/// # Errors
///
/// Returns the first syntax error. Parameters are not allowed.
pub fn parse_content_encoding(text: &str) -> Result<Vec<ContentCoding>, HeaderError> {
    grammar::parse(ContentEncodingGrammar::default(), text)
}

/// The `Accept-Encoding` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptEncoding(pub Vec<Parameterized<Preference<ContentCoding>>>);

impl AcceptEncoding {
    /// Whether `coding` is acceptable: listed, or covered by `*`, with a non-zero weight. `identity` is
    /// acceptable unless refused explicitly or through `*;q=0`.
    pub fn accepts(&self, coding: &ContentCoding) -> bool {
        let explicit = self.0.iter().find(|value| value.value().value() == Some(coding));
        let wildcard = || self.0.iter().find(|value| value.value().is_any());
        match explicit.or_else(wildcard) {
            Some(value) => !value.quality().is_zero(),
            None => *coding == ContentCoding::Identity,
        }
    }
}

impl fmt::Display for AcceptEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_list(f, &self.0, ", ")
    }
}

impl TypedHeader for AcceptEncoding {
    const NAME: HeaderName = http::header::ACCEPT_ENCODING;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_accept_encoding(text).map(Self)
    }
}

/// The `Content-Encoding` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEncoding(pub Vec<ContentCoding>);

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_list(f, &self.0, ", ")
    }
}

impl TypedHeader for ContentEncoding {
    const NAME: HeaderName = http::header::CONTENT_ENCODING;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_content_encoding(text).map(Self)
    }
}

#[cfg(feature = "serde")]
crate::value::impl_serde_as_text!(ContentCoding);
