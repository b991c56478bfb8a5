//! Media types (RFC 9110 section 8.3.1) for `Content-Type` and `Accept`.
//!
//! ```text
//! media-type = type "/" subtype parameters
//! Accept     = #( media-range [ weight ] )
//! ```
//!
//! A subtype may carry a structured syntax suffix (`application/vnd.api+json`), kept apart as
//! [`MediaType::suffix`]. Comments are skipped as RFC 2045 allows them in MIME headers.

use std::borrow::Cow;
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use http::HeaderName;

use crate::error::HeaderError;
use crate::grammar::{self, Flow, HeaderGrammar, ParameterBuilder, ParameterKind, Scanner, chars};
use crate::header::TypedHeader;
use crate::value::{Charset, ParameterName, ParameterValue, Parameters, QualityFactor, Qualified, fmt_list, sort_by_quality};

/// A media type or media range with its parameters.
#[derive(Debug, Clone)]
pub struct MediaType {
    main_type: Cow<'static, str>,
    subtype: Cow<'static, str>,
    suffix: Option<Cow<'static, str>>,
    parameters: Parameters,
}

impl MediaType {
    pub const STAR_STAR: Self = Self::from_static("*", "*");
    pub const TEXT_STAR: Self = Self::from_static("text", "*");
    pub const TEXT_PLAIN: Self = Self::from_static("text", "plain");
    pub const TEXT_HTML: Self = Self::from_static("text", "html");
    pub const TEXT_EVENT_STREAM: Self = Self::from_static("text", "event-stream");
    pub const APPLICATION_JSON: Self = Self::from_static("application", "json");
    pub const APPLICATION_OCTET_STREAM: Self = Self::from_static("application", "octet-stream");
    pub const APPLICATION_WWW_FORM_URLENCODED: Self = Self::from_static("application", "x-www-form-urlencoded");
    pub const MULTIPART_FORM_DATA: Self = Self::from_static("multipart", "form-data");

    const fn from_static(main_type: &'static str, subtype: &'static str) -> Self {
        Self { main_type: Cow::Borrowed(main_type), subtype: Cow::Borrowed(subtype), suffix: None, parameters: Parameters::new() }
    }

    /// # Errors
    ///
    /// Returns an error if either part is not a token, or for a concrete subtype under the `*` type.
    pub fn new(main_type: &str, subtype: &str) -> Result<Self, HeaderError> {
        let text = format!("{main_type}/{subtype}");
        check_token(main_type, 0, "type", &text)?;
        check_token(subtype, main_type.len() + 1, "sub type", &text)?;
        parse_content_type(&text)
    }

    /// The top-level type, `text` in `text/html`.
    pub fn main_type(&self) -> &str {
        &self.main_type
    }

    /// The subtype without its suffix, `vnd.api` in `application/vnd.api+json`.
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// The `charset` parameter.
    pub fn charset(&self) -> Option<Charset> {
        self.parameters.text(ParameterName::CHARSET.as_str()).and_then(|name| Charset::new(name).ok())
    }

    fn specificity(&self) -> u8 {
        match (self.main_type.as_ref(), self.subtype.as_ref()) {
            ("*", _) => 0,
            (_, "*") => 1,
            _ => 2,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.main_type == "*" || self.subtype == "*"
    }

    /// Whether this media range covers `other`, ignoring parameters.
    pub fn matches(&self, other: &MediaType) -> bool {
        if self.main_type == "*" {
            return true;
        }
        if !self.main_type.eq_ignore_ascii_case(&other.main_type) {
            return false;
        }
        self.subtype == "*"
            || (self.subtype.eq_ignore_ascii_case(&other.subtype) && eq_ignore_case(self.suffix(), other.suffix()))
    }

    #[must_use]
    pub fn with_parameter<V: Into<ParameterValue>>(mut self, name: ParameterName, value: V) -> Self {
        self.parameters.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_charset(self, charset: &Charset) -> Self {
        self.with_parameter(ParameterName::CHARSET, charset.name())
    }

    #[must_use]
    pub fn with_quality(self, quality: QualityFactor) -> Self {
        self.with_parameter(ParameterName::Q, quality)
    }
}

fn eq_ignore_case(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    }
}

impl PartialEq for MediaType {
    fn eq(&self, other: &Self) -> bool {
        self.main_type.eq_ignore_ascii_case(&other.main_type)
            && self.subtype.eq_ignore_ascii_case(&other.subtype)
            && eq_ignore_case(self.suffix(), other.suffix())
            && self.parameters == other.parameters
    }
}

impl Eq for MediaType {}

impl Qualified for MediaType {
    fn quality(&self) -> QualityFactor {
        self.parameters.quality().unwrap_or(QualityFactor::ONE)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.subtype)?;
        if let Some(suffix) = &self.suffix {
            write!(f, "+{suffix}")?;
        }
        write!(f, "{}", self.parameters)
    }
}

impl FromStr for MediaType {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_content_type(s)
    }
}

impl From<&mime::Mime> for MediaType {
    fn from(mime: &mime::Mime) -> Self {
        let parameters = mime
            .params()
            .map(|(name, value)| (ParameterName::from_token(name.as_str()), ParameterValue::Text(value.as_str().to_string())))
            .collect();
        Self {
            main_type: Cow::Owned(mime.type_().as_str().to_string()),
            subtype: Cow::Owned(mime.subtype().as_str().to_string()),
            suffix: mime.suffix().map(|suffix| Cow::Owned(suffix.as_str().to_string())),
            parameters,
        }
    }
}

impl TryFrom<&MediaType> for mime::Mime {
    type Error = HeaderError;

    fn try_from(media_type: &MediaType) -> Result<Self, Self::Error> {
        let text = media_type.to_string();
        text.parse::<mime::Mime>().map_err(|e| HeaderError::conversion("media type", text, e))
    }
}

/// Checks that `part`, found at `offset` in `text`, is a non-empty token.
fn check_token(part: &str, offset: usize, label: &'static str, text: &str) -> Result<(), HeaderError> {
    if part.is_empty() {
        return Err(HeaderError::missing(label, offset, text));
    }
    match part.char_indices().find(|&(_, c)| !chars::is_tchar(c)) {
        Some((position, c)) => Err(HeaderError::invalid_character(c, offset + position, text)),
        None => Ok(()),
    }
}

struct MediaTypeGrammar {
    accept: bool,
    pending: Option<(String, String, Option<String>)>,
    parameters: ParameterBuilder,
    values: Vec<MediaType>,
}

impl MediaTypeGrammar {
    fn new(accept: bool) -> Self {
        Self { accept, pending: None, parameters: ParameterBuilder::default(), values: Vec::new() }
    }

    /// Reads `/subtype[+suffix]` right after the main type.
    fn subtype(&mut self, scanner: &mut Scanner<'_>, main_type: String) -> Result<(), HeaderError> {
        match scanner.peek() {
            Some('/') => {
                scanner.advance();
            }
            Some(_) => return Err(scanner.invalid_character()),
            None => return Err(scanner.missing("sub type")),
        }
        let start = scanner.position();
        let subtype = match scanner.peek() {
            Some(c) if chars::is_whitespace(c) => return Err(scanner.invalid_character()),
            _ => scanner.required_token(chars::is_tchar, "sub type")?,
        };
        if main_type == "*" && subtype != "*" {
            return Err(scanner.invalid_character_at(start));
        }
        let (subtype, suffix) = match subtype.rsplit_once('+') {
            Some((subtype, suffix)) if !subtype.is_empty() && !suffix.is_empty() => (subtype, Some(suffix.to_string())),
            _ => (subtype, None),
        };
        self.pending = Some((main_type, subtype.to_string(), suffix));
        Ok(())
    }
}

impl HeaderGrammar for MediaTypeGrammar {
    type Output = Vec<MediaType>;
    const LABEL: &'static str = "media type";

    fn allow_multiple_values(&self) -> bool {
        self.accept
    }

    fn wildcard_value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        scanner.advance();
        self.subtype(scanner, "*".to_string())
    }

    fn value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        let main_type = scanner.required_token(chars::is_tchar, "type")?;
        self.subtype(scanner, main_type.to_string())
    }

    fn value_complete(&mut self, _scanner: &Scanner<'_>) -> Result<(), HeaderError> {
        if let Some((main_type, subtype, suffix)) = self.pending.take() {
            self.values.push(MediaType {
                main_type: Cow::Owned(main_type),
                subtype: Cow::Owned(subtype),
                suffix: suffix.map(Cow::Owned),
                parameters: self.parameters.take(),
            });
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
        if self.accept && *name == ParameterName::Q {
            ParameterKind::Quality
        } else if name.is_extended() {
            ParameterKind::Extended
        } else {
            ParameterKind::Text
        }
    }

    /// A `/` not preceded by a main type.
    fn slash(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        if self.pending.is_none() {
            return Err(scanner.missing("type"));
        }
        Err(scanner.invalid_character())
    }

    fn comment(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        scanner.skip_comment()?;
        Ok(Flow::Continue)
    }
}

/// Parses a `Content-Type` value.
///
/// # Errors
///
/// Returns an error for anything but exactly one media type.
///
/// # Example
///
/// ```
/// use micro_headers::{Charset, parse_content_type};
///
/// let media_type = parse_content_type("text/html; charset=utf-8").unwrap();
/// assert_eq!(media_type.subtype(), "html");
/// assert_eq!(media_type.charset(), Some(Charset::UTF_8));
/// ```
pub fn parse_content_type(text: &str) -> Result<MediaType, HeaderError> {
    let mut values = grammar::parse(MediaTypeGrammar::new(false), text)?;
    values.pop().ok_or_else(|| HeaderError::missing(MediaTypeGrammar::LABEL, 0, text))
}

/// Parses an `Accept` value, sorted by descending quality.
///
/// # Errors
///
/// Returns the first syntax error, or a conversion error for a malformed `q`.
pub fn parse_accept(text: &str) -> Result<Vec<MediaType>, HeaderError> {
    grammar::parse(MediaTypeGrammar::new(true), text).map(sort_by_quality)
}

/// The `Accept` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accept(pub Vec<MediaType>);

impl Accept {
    /// The most specific media range covering `media_type`, or `None` if there is none or it has `q=0`.
    pub fn find_match(&self, media_type: &MediaType) -> Option<&MediaType> {
        self.0
            .iter()
            .filter(|range| range.matches(media_type))
            .min_by_key(|range| Reverse(range.specificity()))
            .filter(|range| !range.quality().is_zero())
    }
}

impl fmt::Display for Accept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_list(f, &self.0, ", ")
    }
}

impl TypedHeader for Accept {
    const NAME: HeaderName = http::header::ACCEPT;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_accept(text).map(Self)
    }
}

impl TypedHeader for MediaType {
    const NAME: HeaderName = http::header::CONTENT_TYPE;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_content_type(text)
    }
}

#[cfg(feature = "serde")]
crate::value::impl_serde_as_text!(MediaType);
