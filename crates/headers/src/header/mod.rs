//! Grammars and value types for the supported header fields.
//!
//! Each module pairs one or more `parse_*` entry points with the values they produce. The [`TypedHeader`] trait
//! connects those values with the `http` crate so a whole header can be decoded from, or encoded into, an
//! [`http::HeaderValue`].

mod cache_control;
mod content_coding;
mod content_disposition;
mod content_range;
mod cookie;
mod entity_tag;
mod language;
mod link;
mod media_type;
mod negotiation;
mod product;
mod range;
mod set_cookie;

pub use cache_control::{CacheControl, CacheDirective, parse_cache_control};
pub use content_coding::{AcceptEncoding, ContentCoding, ContentEncoding, parse_accept_encoding, parse_content_encoding};
pub use content_disposition::{ContentDisposition, DispositionType, parse_content_disposition};
pub use content_range::{ContentRange, parse_content_range};
pub use cookie::{Cookie, Cookies, parse_cookie};
pub use entity_tag::{EntityTag, EntityTagMatch, IfMatch, IfNoneMatch, parse_entity_tag, parse_if_match, parse_if_none_match};
pub use language::{AcceptLanguage, parse_accept_language};
pub use link::{Link, LinkValue, parse_link};
pub use media_type::{Accept, MediaType, parse_accept, parse_content_type};
pub use negotiation::{AcceptCharset, parse_accept_charset};
pub use product::{ProductToken, Server, UserAgent, parse_product_tokens};
pub use range::{Range, RangeSpec, parse_range};
pub use set_cookie::{SameSite, SetCookie, parse_set_cookie};

use http::{HeaderName, HeaderValue};

use crate::error::HeaderError;

/// A header field with a typed value.
///
/// # Example
///
/// ```
/// use http::HeaderValue;
/// use micro_headers::{Accept, TypedHeader};
///
/// let accept = Accept::decode(&HeaderValue::from_static("text/html, application/json; q=0.9")).unwrap();
/// assert_eq!(accept.0.len(), 2);
/// assert_eq!(accept.encode().unwrap(), "text/html, application/json; q=0.9");
/// ```
pub trait TypedHeader: Sized + std::fmt::Display {
    const NAME: HeaderName;

    /// Parses the header value text.
    ///
    /// # Errors
    ///
    /// Returns the first syntax or conversion error found in `text`.
    fn parse_text(text: &str) -> Result<Self, HeaderError>;

    /// Parses a raw header value. The bytes have to be valid UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an invalid value error for bytes that are not UTF-8, otherwise see [`TypedHeader::parse_text`].
    fn decode(value: &HeaderValue) -> Result<Self, HeaderError> {
        let text = std::str::from_utf8(value.as_bytes())
            .map_err(|e| HeaderError::invalid_value(format!("{} header value is not valid UTF-8: {e}", Self::NAME)))?;
        Self::parse_text(text)
    }

    /// Renders the canonical header value.
    ///
    /// # Errors
    ///
    /// Returns an error if the rendered text contains bytes a header value cannot carry.
    fn encode(&self) -> Result<HeaderValue, HeaderError> {
        let text = self.to_string();
        HeaderValue::from_bytes(text.as_bytes())
            .map_err(|e| HeaderError::conversion(Self::NAME, text, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_non_utf8() {
        let value = HeaderValue::from_bytes(&[b'a', 0xFF]).unwrap();
        let err = Accept::decode(&value).unwrap_err();
        assert!(err.to_string().starts_with("accept header value is not valid UTF-8"));
    }

    #[test]
    fn encode_round_trips() {
        let disposition = ContentDisposition::decode(&HeaderValue::from_static("attachment; filename=\"a b.txt\"")).unwrap();
        let value = disposition.encode().unwrap();
        assert_eq!(value, "attachment; filename=\"a b.txt\"");
        assert_eq!(ContentDisposition::decode(&value).unwrap(), disposition);
    }
}
