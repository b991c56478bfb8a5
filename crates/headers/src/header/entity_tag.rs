//! Entity tags for `ETag`, `If-Match` and `If-None-Match` (RFC 9110 sections 8.8.3, 13.1.1 and 13.1.2).
//!
//! ```text
//! ETag       = entity-tag / "*"
//! entity-tag = [ weak ] opaque-tag
//! weak       = %s"W/"
//! opaque-tag = DQUOTE *etagc DQUOTE
//! If-Match   = "*" / #entity-tag
//! ```
//!
//! The opaque tag has no escaping: a backslash is an ordinary `etagc`.

use std::fmt;
use std::str::FromStr;

use http::HeaderName;

use crate::error::HeaderError;
use crate::grammar::{self, HeaderGrammar, Scanner, chars};
use crate::header::TypedHeader;
use crate::utils::ensure;
use crate::value::fmt_list;

/// An entity tag, or the `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityTag(Repr);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Repr {
    Any,
    Opaque { weak: bool, tag: String },
}

impl EntityTag {
    /// The `*` wildcard.
    pub const ANY: Self = Self(Repr::Any);

    /// # Errors
    ///
    /// Returns an error if `tag` contains a character outside `etagc`.
    pub fn strong(tag: &str) -> Result<Self, HeaderError> {
        Self::new(false, tag)
    }

    /// # Errors
    ///
    /// Returns an error if `tag` contains a character outside `etagc`.
    pub fn weak(tag: &str) -> Result<Self, HeaderError> {
        Self::new(true, tag)
    }

    fn new(weak: bool, tag: &str) -> Result<Self, HeaderError> {
        if let Some((position, character)) = tag.char_indices().find(|&(_, c)| !chars::is_etagc(c)) {
            return Err(HeaderError::invalid_character(character, position, tag));
        }
        Ok(Self(Repr::Opaque { weak, tag: tag.to_string() }))
    }

    /// The opaque tag without quotes, `None` for the wildcard.
    pub fn tag(&self) -> Option<&str> {
        match &self.0 {
            Repr::Any => None,
            Repr::Opaque { tag, .. } => Some(tag),
        }
    }

    pub fn is_weak(&self) -> bool {
        matches!(self.0, Repr::Opaque { weak: true, .. })
    }

    pub fn is_any(&self) -> bool {
        matches!(self.0, Repr::Any)
    }

    /// Strong comparison: both tags are strong and identical. The wildcard equals every strong tag.
    pub fn strong_eq(&self, other: &EntityTag) -> bool {
        match (&self.0, &other.0) {
            (Repr::Opaque { weak: true, .. }, _) | (_, Repr::Opaque { weak: true, .. }) => false,
            (Repr::Opaque { tag, .. }, Repr::Opaque { tag: other, .. }) => tag == other,
            _ => true,
        }
    }

    /// Weak comparison: identical opaque tags, weakness ignored. The wildcard equals every tag.
    pub fn weak_eq(&self, other: &EntityTag) -> bool {
        match (&self.0, &other.0) {
            (Repr::Opaque { tag, .. }, Repr::Opaque { tag: other, .. }) => tag == other,
            _ => true,
        }
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Any => f.write_str("*"),
            Repr::Opaque { weak, tag } => {
                if *weak {
                    f.write_str("W/")?;
                }
                write!(f, "\"{tag}\"")
            }
        }
    }
}

impl FromStr for EntityTag {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_entity_tag(s)
    }
}

/// The condition of an `If-Match` or `If-None-Match` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityTagMatch {
    Any,
    Tags(Vec<EntityTag>),
}

impl EntityTagMatch {
    /// Whether `current` satisfies the condition under strong comparison, as `If-Match` requires.
    pub fn matches_strong(&self, current: &EntityTag) -> bool {
        match self {
            Self::Any => true,
            Self::Tags(tags) => tags.iter().any(|tag| tag.strong_eq(current)),
        }
    }

    /// Whether `current` satisfies the condition under weak comparison, as `If-None-Match` requires.
    pub fn matches_weak(&self, current: &EntityTag) -> bool {
        match self {
            Self::Any => true,
            Self::Tags(tags) => tags.iter().any(|tag| tag.weak_eq(current)),
        }
    }
}

impl fmt::Display for EntityTagMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Tags(tags) => fmt_list(f, tags, ", "),
        }
    }
}

struct EntityTagGrammar {
    multiple: bool,
    any: bool,
    tags: Vec<EntityTag>,
}

impl EntityTagGrammar {
    fn new(multiple: bool) -> Self {
        Self { multiple, any: false, tags: Vec::new() }
    }
}

impl HeaderGrammar for EntityTagGrammar {
    type Output = EntityTagMatch;
    const LABEL: &'static str = "entity tag";

    fn allow_multiple_values(&self) -> bool {
        self.multiple
    }

    /// `*` is only valid as the whole value.
    fn wildcard_value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        ensure!(!self.any && self.tags.is_empty(), scanner.invalid_character());
        scanner.advance();
        self.any = true;
        Ok(())
    }

    fn value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        ensure!(!self.any, scanner.invalid_character());
        let weak = scanner.starts_with("W/");
        if weak {
            scanner.advance();
            scanner.advance();
        }
        match scanner.peek() {
            Some('"') => {}
            Some(_) => return Err(scanner.invalid_character()),
            None => return Err(scanner.missing("opaque tag")),
        }
        let tag = scanner.quoted_text(chars::is_etagc, false)?;
        self.tags.push(EntityTag(Repr::Opaque { weak, tag }));
        Ok(())
    }

    fn value_complete(&mut self, _scanner: &Scanner<'_>) -> Result<(), HeaderError> {
        Ok(())
    }

    fn finish(self, _scanner: &Scanner<'_>) -> Result<Self::Output, HeaderError> {
        if self.any { Ok(EntityTagMatch::Any) } else { Ok(EntityTagMatch::Tags(self.tags)) }
    }
}

/// Parses an `ETag` value: one entity tag or the `*` wildcard.
///
/// # Errors
///
/// Returns the first syntax error.
///
/// # Example
///
/// ```
/// use micro_headers::{EntityTag, parse_entity_tag};
///
/// let tag = parse_entity_tag("W/\"0815\"").unwrap();
/// assert!(tag.is_weak());
/// assert_eq!(tag.tag(), Some("0815"));
/// assert_eq!(parse_entity_tag("*").unwrap(), EntityTag::ANY);
/// ```
pub fn parse_entity_tag(text: &str) -> Result<EntityTag, HeaderError> {
    match grammar::parse(EntityTagGrammar::new(false), text)? {
        EntityTagMatch::Tags(tags) => tags.into_iter().next().ok_or_else(|| HeaderError::missing("entity tag", text.len(), text)),
        EntityTagMatch::Any => Ok(EntityTag::ANY),
    }
}

/// Parses an `If-Match` value.
///
/// # Errors
///
/// Returns the first syntax error. `*` combined with other elements is an invalid character error.
pub fn parse_if_match(text: &str) -> Result<EntityTagMatch, HeaderError> {
    grammar::parse(EntityTagGrammar::new(true), text)
}

/// Parses an `If-None-Match` value, with the same grammar as [`parse_if_match`].
///
/// # Errors
///
/// Returns the first syntax error.
pub fn parse_if_none_match(text: &str) -> Result<EntityTagMatch, HeaderError> {
    grammar::parse(EntityTagGrammar::new(true), text)
}

impl TypedHeader for EntityTag {
    const NAME: HeaderName = http::header::ETAG;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_entity_tag(text)
    }
}

/// The `If-Match` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfMatch(pub EntityTagMatch);

impl IfMatch {
    /// Evaluates the precondition against the current representation, `None` when there is none.
    pub fn passes(&self, current: Option<&EntityTag>) -> bool {
        current.is_some_and(|current| self.0.matches_strong(current))
    }
}

impl fmt::Display for IfMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TypedHeader for IfMatch {
    const NAME: HeaderName = http::header::IF_MATCH;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_if_match(text).map(Self)
    }
}

/// The `If-None-Match` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfNoneMatch(pub EntityTagMatch);

impl IfNoneMatch {
    /// Evaluates the precondition against the current representation, `None` when there is none.
    pub fn passes(&self, current: Option<&EntityTag>) -> bool {
        current.is_none_or(|current| !self.0.matches_weak(current))
    }
}

impl fmt::Display for IfNoneMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TypedHeader for IfNoneMatch {
    const NAME: HeaderName = http::header::IF_NONE_MATCH;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_if_none_match(text).map(Self)
    }
}

#[cfg(feature = "serde")]
crate::value::impl_serde_as_text!(EntityTag);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_and_weak_tags() {
        let strong = parse_entity_tag("\"xyzzy\"").unwrap();
        let weak = parse_entity_tag("W/\"xyzzy\"").unwrap();
        assert!(!strong.is_weak());
        assert!(weak.weak_eq(&strong));
        assert!(!weak.strong_eq(&strong));
        assert!(strong.strong_eq(&EntityTag::strong("xyzzy").unwrap()));
        assert_eq!(weak.to_string(), "W/\"xyzzy\"");
        assert_eq!(parse_entity_tag("\"a\\b\"").unwrap().tag(), Some("a\\b"));
        assert_eq!(parse_entity_tag("\"\"").unwrap().tag(), Some(""));
    }

    #[test]
    fn entity_tag_errors() {
        assert_eq!(parse_entity_tag("xyzzy").unwrap_err().to_string(), "Invalid character 'x' at 0 in \"xyzzy\"");
        assert_eq!(parse_entity_tag("w/\"a\"").unwrap_err().to_string(), "Invalid character 'w' at 0 in \"w/\"a\"\"");
        assert_eq!(parse_entity_tag("W/").unwrap_err().to_string(), "Missing opaque tag at 2 in \"W/\"");
        assert_eq!(parse_entity_tag("\"a b\"").unwrap_err().to_string(), "Invalid character ' ' at 2 in \"\"a b\"\"");
        assert_eq!(parse_entity_tag("\"a\", \"b\"").unwrap_err().position(), Some(3));
        assert_eq!(parse_entity_tag("*, \"a\"").unwrap_err().position(), Some(1));
        assert!(EntityTag::strong("a\"b").is_err());
    }

    #[test]
    fn wildcard_entity_tag() {
        let any = parse_entity_tag(" * ").unwrap();
        assert!(any.is_any());
        assert!(!any.is_weak());
        assert_eq!(any.tag(), None);
        assert_eq!(any.to_string(), "*");
        assert_eq!(any.to_string().parse::<EntityTag>().unwrap(), EntityTag::ANY);
        assert_eq!(EntityTag::decode(&any.encode().unwrap()).unwrap(), EntityTag::ANY);

        assert!(any.weak_eq(&EntityTag::weak("v1").unwrap()));
        assert!(any.strong_eq(&EntityTag::strong("v1").unwrap()));
        assert!(!any.strong_eq(&EntityTag::weak("v1").unwrap()));
        assert_ne!(parse_entity_tag("\"*\"").unwrap(), EntityTag::ANY);
    }

    #[test]
    fn conditional_lists() {
        let tags = parse_if_match("\"xyzzy\", \"r2d2xxxx\", W/\"c3piozzzz\"").unwrap();
        let EntityTagMatch::Tags(list) = &tags else { panic!("expected tags") };
        assert_eq!(list.len(), 3);
        assert!(tags.matches_strong(&EntityTag::strong("r2d2xxxx").unwrap()));
        assert!(!tags.matches_strong(&EntityTag::strong("c3piozzzz").unwrap()));
        assert!(tags.matches_weak(&EntityTag::strong("c3piozzzz").unwrap()));
        assert_eq!(tags.to_string(), "\"xyzzy\", \"r2d2xxxx\", W/\"c3piozzzz\"");
    }

    #[test]
    fn wildcard_alone() {
        assert_eq!(parse_if_none_match(" * ").unwrap(), EntityTagMatch::Any);
        assert_eq!(parse_if_match("*, \"a\"").unwrap_err().to_string(), "Invalid character '\"' at 3 in \"*, \"a\"\"");
        assert_eq!(parse_if_match("\"a\", *").unwrap_err().to_string(), "Invalid character '*' at 5 in \"\"a\", *\"");
    }

    #[test]
    fn preconditions() {
        let current = EntityTag::weak("v1").unwrap();
        assert!(!IfMatch::parse_text("W/\"v1\"").unwrap().passes(Some(&current)));
        assert!(IfMatch::parse_text("*").unwrap().passes(Some(&current)));
        assert!(!IfMatch::parse_text("*").unwrap().passes(None));

        assert!(!IfNoneMatch::parse_text("\"v1\"").unwrap().passes(Some(&current)));
        assert!(IfNoneMatch::parse_text("\"v2\"").unwrap().passes(Some(&current)));
        assert!(!IfNoneMatch::parse_text("*").unwrap().passes(Some(&current)));
        assert!(IfNoneMatch::parse_text("*").unwrap().passes(None));
    }
}
