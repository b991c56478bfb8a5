//! RFC 8187 extended parameter values: `charset'language'percent-encoded-bytes`.

use std::fmt::{self, Write};

use crate::error::HeaderError;
use crate::grammar::chars;
use crate::value::{Charset, LanguageTag};

/// A decoded extended value such as `UTF-8'en'%C2%A3%20rates`.
///
/// The raw bytes are always kept. The decoded text is only available when the charset is one this crate can
/// decode, see [`Charset::is_supported`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtendedValue {
    charset: Charset,
    language: Option<LanguageTag>,
    bytes: Vec<u8>,
    text: Option<String>,
}

impl ExtendedValue {
    /// Encodes `text` in `charset`.
    ///
    /// # Errors
    ///
    /// Returns an error if `charset` is unsupported or cannot represent `text`.
    pub fn new(charset: Charset, language: Option<LanguageTag>, text: &str) -> Result<Self, HeaderError> {
        let Some(bytes) = charset.encode(text) else {
            return Err(HeaderError::invalid_value(format!("charset {charset} cannot encode \"{text}\"")));
        };
        Ok(Self { charset, language, bytes, text: Some(text.to_string()) })
    }

    /// A UTF-8 value without language, the form most senders use.
    pub fn utf8(text: &str) -> Self {
        Self { charset: Charset::UTF_8, language: None, bytes: text.as_bytes().to_vec(), text: Some(text.to_string()) }
    }

    pub(crate) fn from_bytes(charset: Charset, language: Option<LanguageTag>, bytes: Vec<u8>, text: Option<String>) -> Self {
        Self { charset, language, bytes, text }
    }

    pub fn charset(&self) -> &Charset {
        &self.charset
    }

    pub fn language(&self) -> Option<&LanguageTag> {
        self.language.as_ref()
    }

    /// The decoded text, or `None` when the charset is not supported.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for ExtendedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'", self.charset)?;
        if let Some(language) = &self.language {
            write!(f, "{language}")?;
        }
        f.write_char('\'')?;
        for &b in &self.bytes {
            let c = char::from(b);
            if b.is_ascii() && chars::is_attr_char(c) {
                f.write_char(c)?;
            } else {
                write!(f, "%{b:02X}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_percent_encodes() {
        let value = ExtendedValue::new(Charset::UTF_8, Some(LanguageTag::new("en").unwrap()), "£ rates").unwrap();
        assert_eq!(value.to_string(), "UTF-8'en'%C2%A3%20rates");
        assert_eq!(ExtendedValue::utf8("a.txt").to_string(), "UTF-8''a.txt");
    }

    #[test]
    fn unencodable_text() {
        let err = ExtendedValue::new(Charset::US_ASCII, None, "é").unwrap_err();
        assert_eq!(err.to_string(), "charset US-ASCII cannot encode \"é\"");
    }
}
