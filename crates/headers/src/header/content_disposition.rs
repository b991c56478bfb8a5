//! `Content-Disposition` (RFC 6266, RFC 2183 for the MIME parameters, RFC 7578 for `form-data`).
//!
//! `filename*` is decoded as an RFC 8187 extended value and wins over `filename` when both are present. The
//! `*-date` parameters are parsed as dates and `size` as an integer. Comments are skipped, as in other MIME
//! headers.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use http::HeaderName;

use crate::error::HeaderError;
use crate::grammar::{self, Flow, HeaderGrammar, ParameterBuilder, ParameterKind, Scanner, chars};
use crate::header::TypedHeader;
use crate::value::{ExtendedValue, ParameterName, ParameterValue, Parameters};

#[derive(Debug, Clone)]
pub enum DispositionType {
    Inline,
    Attachment,
    FormData,
    Other(String),
}

impl DispositionType {
    fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case("inline") {
            Self::Inline
        } else if token.eq_ignore_ascii_case("attachment") {
            Self::Attachment
        } else if token.eq_ignore_ascii_case("form-data") {
            Self::FormData
        } else {
            Self::Other(token.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Inline => "inline",
            Self::Attachment => "attachment",
            Self::FormData => "form-data",
            Self::Other(token) => token,
        }
    }
}

impl PartialEq for DispositionType {
    fn eq(&self, other: &Self) -> bool {
        self.as_str().eq_ignore_ascii_case(other.as_str())
    }
}

impl Eq for DispositionType {}

impl fmt::Display for DispositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A disposition type with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    disposition: DispositionType,
    parameters: Parameters,
}

impl ContentDisposition {
    pub fn new(disposition: DispositionType) -> Self {
        Self { disposition, parameters: Parameters::new() }
    }

    pub fn inline() -> Self {
        Self::new(DispositionType::Inline)
    }

    pub fn attachment() -> Self {
        Self::new(DispositionType::Attachment)
    }

    /// A `form-data` part called `name`.
    pub fn form_data(name: &str) -> Self {
        Self::new(DispositionType::FormData).with_parameter(ParameterName::NAME, name)
    }

    pub fn disposition_type(&self) -> &DispositionType {
        &self.disposition
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn is_attachment(&self) -> bool {
        self.disposition == DispositionType::Attachment
    }

    /// The suggested file name, preferring a decodable `filename*` over `filename`.
    pub fn filename(&self) -> Option<Cow<'_, str>> {
        if let Some(text) = self.filename_ext().and_then(ExtendedValue::text) {
            return Some(Cow::Borrowed(text));
        }
        self.parameters.text(ParameterName::FILENAME.as_str()).map(Cow::Borrowed)
    }

    pub fn filename_ext(&self) -> Option<&ExtendedValue> {
        self.parameters.get(ParameterName::FILENAME_EXT.as_str()).and_then(ParameterValue::as_extended)
    }

    /// The field name of a `form-data` part.
    pub fn name(&self) -> Option<&str> {
        self.parameters.text(ParameterName::NAME.as_str())
    }

    pub fn size(&self) -> Option<u64> {
        self.parameters.get(ParameterName::SIZE.as_str()).and_then(ParameterValue::as_integer)
    }

    pub fn creation_date(&self) -> Option<SystemTime> {
        self.parameters.get(ParameterName::CREATION_DATE.as_str()).and_then(ParameterValue::as_date)
    }

    pub fn modification_date(&self) -> Option<SystemTime> {
        self.parameters.get(ParameterName::MODIFICATION_DATE.as_str()).and_then(ParameterValue::as_date)
    }

    pub fn read_date(&self) -> Option<SystemTime> {
        self.parameters.get(ParameterName::READ_DATE.as_str()).and_then(ParameterValue::as_date)
    }

    #[must_use]
    pub fn with_parameter<V: Into<ParameterValue>>(mut self, name: ParameterName, value: V) -> Self {
        self.parameters.insert(name, value);
        self
    }

    /// Sets `filename`, adding a UTF-8 `filename*` when the name is not plain ASCII.
    #[must_use]
    pub fn with_filename(self, filename: &str) -> Self {
        if filename.is_ascii() {
            return self.with_parameter(ParameterName::FILENAME, filename);
        }
        let fallback: String = filename.chars().map(|c| if c.is_ascii() { c } else { '_' }).collect();
        self.with_parameter(ParameterName::FILENAME, fallback).with_parameter(ParameterName::FILENAME_EXT, ExtendedValue::utf8(filename))
    }
}

impl fmt::Display for ContentDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.disposition, self.parameters)
    }
}

impl FromStr for ContentDisposition {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_content_disposition(s)
    }
}

#[derive(Default)]
struct ContentDispositionGrammar {
    disposition: Option<DispositionType>,
    parameters: ParameterBuilder,
    value: Option<ContentDisposition>,
}

impl HeaderGrammar for ContentDispositionGrammar {
    type Output = ContentDisposition;
    const LABEL: &'static str = "disposition type";

    fn value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        let token = scanner.required_token(chars::is_tchar, Self::LABEL)?;
        self.disposition = Some(DispositionType::from_token(token));
        Ok(())
    }

    fn value_complete(&mut self, _scanner: &Scanner<'_>) -> Result<(), HeaderError> {
        if let Some(disposition) = self.disposition.take() {
            self.value = Some(ContentDisposition { disposition, parameters: self.parameters.take() });
        }
        Ok(())
    }

    fn finish(self, scanner: &Scanner<'_>) -> Result<Self::Output, HeaderError> {
        self.value.ok_or_else(|| scanner.missing(Self::LABEL))
    }

    fn parameters(&mut self) -> Option<&mut ParameterBuilder> {
        Some(&mut self.parameters)
    }

    fn parameter_kind(&self, name: &ParameterName) -> ParameterKind {
        if name.is_extended() {
            ParameterKind::Extended
        } else if *name == ParameterName::SIZE {
            ParameterKind::Integer
        } else if *name == ParameterName::CREATION_DATE || *name == ParameterName::MODIFICATION_DATE || *name == ParameterName::READ_DATE {
            ParameterKind::Date
        } else {
            ParameterKind::Text
        }
    }

    fn comment(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        scanner.skip_comment()?;
        Ok(Flow::Continue)
    }
}

/// Parses a `Content-Disposition` value.
///
/// # Errors
///
/// Returns the first syntax error, or a conversion error for a malformed `size` or date parameter.
///
/// # Example
///
/// ```
/// use micro_headers::parse_content_disposition;
///
/// let disposition = parse_content_disposition("attachment; filename*=UTF-8''Hello.txt").unwrap();
/// assert!(disposition.is_attachment());
/// assert_eq!(disposition.filename().as_deref(), Some("Hello.txt"));
/// ```
pub fn parse_content_disposition(text: &str) -> Result<ContentDisposition, HeaderError> {
    grammar::parse(ContentDispositionGrammar::default(), text)
}

impl TypedHeader for ContentDisposition {
    const NAME: HeaderName = http::header::CONTENT_DISPOSITION;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_content_disposition(text)
    }
}

#[cfg(feature = "serde")]
crate::value::impl_serde_as_text!(ContentDisposition);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Charset;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn extended_filename() {
        let disposition = parse_content_disposition("attachment; filename=\"EURO rates\"; filename*=utf-8''%e2%82%ac%20rates").unwrap();
        assert_eq!(disposition.filename().as_deref(), Some("€ rates"));
        let ext = disposition.filename_ext().unwrap();
        assert_eq!(ext.charset(), &Charset::UTF_8);
        assert_eq!(disposition.to_string(), "attachment; filename=\"EURO rates\"; filename*=UTF-8''%E2%82%AC%20rates");
    }

    #[test]
    fn mime_parameters() {
        let disposition = parse_content_disposition(
            "Attachment; filename=genome.jpeg;\r\n modification-date=\"Wed, 12 Feb 1997 16:29:51 -0500\"; size=1024 (photo)",
        )
        .unwrap();
        assert!(disposition.is_attachment());
        assert_eq!(disposition.size(), Some(1024));
        assert_eq!(disposition.modification_date(), Some(UNIX_EPOCH + Duration::from_secs(855_782_991)));
        assert_eq!(disposition.creation_date(), None);
        assert_eq!(
            disposition.to_string(),
            "attachment; filename=genome.jpeg; modification-date=\"Wed, 12 Feb 1997 21:29:51 GMT\"; size=1024"
        );
    }

    #[test]
    fn form_data() {
        let disposition = parse_content_disposition("form-data; name=\"field1\"; filename=\"example.txt\"").unwrap();
        assert_eq!(disposition, ContentDisposition::form_data("field1").with_filename("example.txt"));
        assert_eq!(disposition.name(), Some("field1"));
    }

    #[test]
    fn non_ascii_filename() {
        let disposition = ContentDisposition::attachment().with_filename("naïve.txt");
        assert_eq!(disposition.to_string(), "attachment; filename=na_ve.txt; filename*=UTF-8''na%C3%AFve.txt");
        assert_eq!(parse_content_disposition(&disposition.to_string()).unwrap(), disposition);
    }

    #[test]
    fn errors() {
        let err = parse_content_disposition("attachment; size=big").unwrap_err();
        assert_eq!(err.to_string(), "Failed to convert \"size\" value \"big\", message: invalid digit found in string");

        let err = parse_content_disposition("attachment; filename*=UTF-8'en").unwrap_err();
        assert_eq!(err.to_string(), "Missing closing ''' in \"attachment; filename*=UTF-8'en\"");

        let err = parse_content_disposition("attachment; filename=\"a.txt").unwrap_err();
        assert_eq!(err.to_string(), "Missing closing '\"' in \"attachment; filename=\"a.txt\"");

        assert!(parse_content_disposition("inline, attachment").is_err());
    }
}
