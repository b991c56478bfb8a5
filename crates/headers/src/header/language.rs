//! `Accept-Language` (RFC 9110 section 12.5.4).

use std::fmt;

use http::HeaderName;

use crate::error::HeaderError;
use crate::grammar::chars;
use crate::header::TypedHeader;
use crate::header::negotiation::{NegotiationToken, parse_negotiation};
use crate::value::{LanguageTag, Parameterized, Preference, Qualified, fmt_list};

impl NegotiationToken for LanguageTag {
    const LABEL: &'static str = "language";

    fn is_token_char(c: char) -> bool {
        chars::is_language_char(c)
    }

    fn convert(token: &str, start: usize, text: &str) -> Result<Self, HeaderError> {
        LanguageTag::from_token(token, start, text)
    }
}

/// Parses an `Accept-Language` value, sorted by descending quality.
///
/// # Errors
///
/// Returns the first syntax error, including malformed language tags, or a conversion error for a
/// malformed `q`.
pub fn parse_accept_language(text: &str) -> Result<Vec<Parameterized<Preference<LanguageTag>>>, HeaderError> {
    parse_negotiation(text)
}

/// The `Accept-Language` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptLanguage(pub Vec<Parameterized<Preference<LanguageTag>>>);

impl AcceptLanguage {
    /// Picks the best of `available` by RFC 4647 basic filtering, `None` if nothing matches with a non-zero
    /// weight.
    pub fn negotiate<'a>(&self, available: &'a [LanguageTag]) -> Option<&'a LanguageTag> {
        for range in &self.0 {
            if range.quality().is_zero() {
                continue;
            }
            let found = match range.value() {
                Preference::Any => available.iter().find(|tag| !self.refuses(tag)),
                Preference::Value(prefix) => available.iter().find(|tag| prefix.matches(tag) && !self.refuses(tag)),
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }

    fn refuses(&self, tag: &LanguageTag) -> bool {
        self.0.iter().any(|range| range.quality().is_zero() && range.value().value().is_some_and(|prefix| prefix.matches(tag)))
    }
}

impl fmt::Display for AcceptLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_list(f, &self.0, ", ")
    }
}

impl TypedHeader for AcceptLanguage {
    const NAME: HeaderName = http::header::ACCEPT_LANGUAGE;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_accept_language(text).map(Self)
    }
}
