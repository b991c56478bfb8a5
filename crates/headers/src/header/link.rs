//! Web linking (RFC 8288).
//!
//! ```text
//! Link       = #link-value
//! link-value = "<" URI-Reference ">" *( OWS ";" OWS link-param )
//! link-param = token BWS [ "=" BWS ( token / quoted-string ) ]
//! ```
//!
//! The target is kept as written; resolving it against a base URI is left to the caller. `title*` is decoded
//! as an RFC 8187 extended value.

use std::fmt;
use std::str::FromStr;

use http::HeaderName;

use crate::error::HeaderError;
use crate::grammar::{self, HeaderGrammar, ParameterBuilder, Scanner, chars};
use crate::header::TypedHeader;
use crate::value::{ExtendedValue, LanguageTag, ParameterName, ParameterValue, Parameters, fmt_list};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkValue {
    target: String,
    parameters: Parameters,
}

impl LinkValue {
    /// # Errors
    ///
    /// Returns an error if `target` contains whitespace, controls or angle brackets.
    pub fn new(target: &str) -> Result<Self, HeaderError> {
        if let Some((position, character)) = target.char_indices().find(|&(_, c)| !chars::is_uri_char(c)) {
            return Err(HeaderError::invalid_character(character, position, target));
        }
        Ok(Self { target: target.to_string(), parameters: Parameters::new() })
    }

    /// The URI reference between `<` and `>`.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// The raw `rel` parameter.
    pub fn rel(&self) -> Option<&str> {
        self.parameters.text(ParameterName::REL.as_str())
    }

    /// The relation types of `rel`, which may list several separated by spaces.
    pub fn relations(&self) -> impl Iterator<Item = &str> {
        self.rel().into_iter().flat_map(str::split_ascii_whitespace)
    }

    /// Whether `relation` is one of the relation types, compared case-insensitively.
    pub fn has_rel(&self, relation: &str) -> bool {
        self.relations().any(|candidate| candidate.eq_ignore_ascii_case(relation))
    }

    pub fn anchor(&self) -> Option<&str> {
        self.parameters.text(ParameterName::ANCHOR.as_str())
    }

    /// The title, preferring a decodable `title*` over `title`.
    pub fn title(&self) -> Option<&str> {
        self.parameters
            .get(ParameterName::TITLE_EXT.as_str())
            .and_then(ParameterValue::as_extended)
            .and_then(ExtendedValue::text)
            .or_else(|| self.parameters.text(ParameterName::TITLE.as_str()))
    }

    pub fn hreflang(&self) -> Option<LanguageTag> {
        self.parameters.text(ParameterName::HREFLANG.as_str()).and_then(|tag| LanguageTag::new(tag).ok())
    }

    /// The `type` hint.
    pub fn media_type(&self) -> Option<&str> {
        self.parameters.text(ParameterName::TYPE.as_str())
    }

    #[must_use]
    pub fn with_parameter<V: Into<ParameterValue>>(mut self, name: ParameterName, value: V) -> Self {
        self.parameters.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_rel(self, rel: &str) -> Self {
        self.with_parameter(ParameterName::REL, rel)
    }
}

impl fmt::Display for LinkValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>{}", self.target, self.parameters)
    }
}

impl FromStr for LinkValue {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values = parse_link(s)?;
        match values.len() {
            1 => Ok(values.remove(0)),
            _ => Err(HeaderError::invalid_value(format!("expected a single link value in \"{s}\""))),
        }
    }
}

#[derive(Default)]
struct LinkGrammar {
    target: Option<String>,
    parameters: ParameterBuilder,
    values: Vec<LinkValue>,
}

impl HeaderGrammar for LinkGrammar {
    type Output = Vec<LinkValue>;
    const LABEL: &'static str = "link value";

    fn allow_multiple_values(&self) -> bool {
        true
    }

    fn is_value_start(&self, c: char) -> bool {
        c == '<'
    }

    fn value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        scanner.advance();
        let target = scanner.token(chars::is_uri_char);
        match scanner.peek() {
            Some('>') => {
                scanner.advance();
            }
            Some(_) => return Err(scanner.invalid_character()),
            None => return Err(HeaderError::missing_closing('>', scanner.text())),
        }
        self.target = Some(target.to_string());
        Ok(())
    }

    fn value_complete(&mut self, _scanner: &Scanner<'_>) -> Result<(), HeaderError> {
        if let Some(target) = self.target.take() {
            self.values.push(LinkValue { target, parameters: self.parameters.take() });
        }
        Ok(())
    }

    fn finish(self, _scanner: &Scanner<'_>) -> Result<Self::Output, HeaderError> {
        Ok(self.values)
    }

    fn parameters(&mut self) -> Option<&mut ParameterBuilder> {
        Some(&mut self.parameters)
    }

    /// Link parameters may stand alone, they get an empty value.
    fn parameter_without_value(&mut self, _scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        self.parameters.complete(ParameterValue::Text(String::new()));
        Ok(())
    }
}

/// Parses a `Link` value.
///
/// # Errors
///
/// Returns the first syntax error. A target without its closing `>` is reported as `Missing closing '>'`.
///
/// # Example
///
/// ```
/// use micro_headers::parse_link;
///
/// let links = parse_link("<https://example.com/?page=2>; rel=\"next\", <https://example.com/?page=9>; rel=last").unwrap();
/// assert_eq!(links.len(), 2);
/// assert!(links[0].has_rel("next"));
/// assert_eq!(links[1].target(), "https://example.com/?page=9");
/// ```
pub fn parse_link(text: &str) -> Result<Vec<LinkValue>, HeaderError> {
    grammar::parse(LinkGrammar::default(), text)
}

/// The `Link` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link(pub Vec<LinkValue>);

impl Link {
    /// The first link with relation type `relation`.
    pub fn find_rel(&self, relation: &str) -> Option<&LinkValue> {
        self.0.iter().find(|value| value.has_rel(relation))
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_list(f, &self.0, ", ")
    }
}

impl TypedHeader for Link {
    const NAME: HeaderName = http::header::LINK;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_link(text).map(Self)
    }
}

#[cfg(feature = "serde")]
crate::value::impl_serde_as_text!(LinkValue);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_list() {
        let link = Link::parse_text(
            "</TheBook/chapter2>; rel=\"previous\"; title*=UTF-8'de'letztes%20Kapitel,\r\n \
             </TheBook/chapter4>; rel=\"next start\"; title*=UTF-8'de'n%c3%a4chstes%20Kapitel",
        )
        .unwrap();
        assert_eq!(link.0.len(), 2);
        let next = link.find_rel("START").unwrap();
        assert_eq!(next.target(), "/TheBook/chapter4");
        assert_eq!(next.relations().collect::<Vec<_>>(), vec!["next", "start"]);
        assert_eq!(next.title(), Some("nächstes Kapitel"));
        assert_eq!(link.0[0].title(), Some("letztes Kapitel"));
    }

    #[test]
    fn parameters() {
        let value: LinkValue = "<https://example.org/>; rel=preconnect; crossorigin; anchor=\"#a\"; hreflang=en-US; type=\"text/html\""
            .parse()
            .unwrap();
        assert_eq!(value.rel(), Some("preconnect"));
        assert_eq!(value.parameters().text("crossorigin"), Some(""));
        assert_eq!(value.anchor(), Some("#a"));
        assert_eq!(value.hreflang().map(|tag| tag.primary().to_string()), Some("en".to_string()));
        assert_eq!(value.media_type(), Some("text/html"));
        assert!("</a>, </b>".parse::<LinkValue>().is_err());
    }

    #[test]
    fn render() {
        let value = LinkValue::new("/style.css").unwrap().with_rel("preload").with_parameter(ParameterName::TITLE, "Main styles");
        assert_eq!(value.to_string(), "</style.css>; rel=preload; title=\"Main styles\"");
        assert_eq!(parse_link(&value.to_string()).unwrap(), vec![value]);
    }

    #[test]
    fn errors() {
        assert_eq!(parse_link("<http://a.com").unwrap_err().to_string(), "Missing closing '>' in \"<http://a.com\"");
        assert_eq!(parse_link("<a b>").unwrap_err().to_string(), "Invalid character ' ' at 2 in \"<a b>\"");
        assert_eq!(parse_link("http://a.com").unwrap_err().to_string(), "Invalid character 'h' at 0 in \"http://a.com\"");
        assert_eq!(parse_link("</a>, ").unwrap_err().to_string(), "Missing link value at 6 in \"</a>, \"");
        assert!(LinkValue::new("a>b").is_err());
    }
}
