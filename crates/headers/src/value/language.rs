//! Language tags as used by `Accept-Language`, `hreflang` and the language field of extended values.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::HeaderError;
use crate::grammar::chars;

/// A language tag of the form `1*8ALPHA *("-" 1*8alphanum)`, compared case-insensitively.
#[derive(Debug, Clone)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// # Errors
    ///
    /// Returns an error pointing at the first character that breaks the tag syntax.
    pub fn new(tag: &str) -> Result<Self, HeaderError> {
        if tag.is_empty() {
            return Err(HeaderError::missing("language tag", 0, tag));
        }
        match find_invalid(tag) {
            Some(position) => Err(invalid_at(tag, position, tag)),
            None => Ok(Self(tag.to_string())),
        }
    }

    /// Validates a non-empty tag found at `start` within `text`, reporting offsets relative to `text`.
    pub(crate) fn from_token(tag: &str, start: usize, text: &str) -> Result<Self, HeaderError> {
        match find_invalid(tag) {
            Some(position) => Err(invalid_at(tag, position, text).shifted(start)),
            None => Ok(Self(tag.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary language subtag, `en` for `en-US`.
    pub fn primary(&self) -> &str {
        self.0.split('-').next().unwrap_or_default()
    }

    /// The subtags following the primary one.
    pub fn subtags(&self) -> impl Iterator<Item = &str> {
        self.0.split('-').skip(1)
    }

    /// Returns true if `other` is this tag or one of its more specific forms, so `en` matches `en-US`.
    pub fn matches(&self, other: &LanguageTag) -> bool {
        let (this, that) = (self.0.as_str(), other.0.as_str());
        that.len() >= this.len()
            && that[..this.len()].eq_ignore_ascii_case(this)
            && (that.len() == this.len() || that.as_bytes()[this.len()] == b'-')
    }
}

/// Byte offset of the first character breaking the tag syntax.
fn find_invalid(tag: &str) -> Option<usize> {
    let mut subtag_start = 0;
    let mut primary = true;
    for (i, c) in tag.char_indices() {
        if c == '-' {
            if i == subtag_start {
                return Some(i);
            }
            primary = false;
            subtag_start = i + 1;
            continue;
        }
        let valid = if primary { chars::is_alpha(c) } else { chars::is_alphanumeric(c) };
        if !valid || i - subtag_start >= 8 {
            return Some(i);
        }
    }
    // trailing '-'
    (subtag_start == tag.len() && !tag.is_empty()).then(|| tag.len() - 1)
}

fn invalid_at(tag: &str, position: usize, text: &str) -> HeaderError {
    let character = tag[position..].chars().next().unwrap_or('-');
    HeaderError::invalid_character(character, position, text)
}

impl PartialEq for LanguageTag {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for LanguageTag {}

impl Hash for LanguageTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LanguageTag {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for LanguageTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_tags() {
        let tag = LanguageTag::new("en-US").unwrap();
        assert_eq!(tag.primary(), "en");
        assert_eq!(tag.subtags().collect::<Vec<_>>(), vec!["US"]);
        assert_eq!(tag, LanguageTag::new("EN-us").unwrap());
        assert!(LanguageTag::new("zh-Hant-TW").is_ok());
        assert!(LanguageTag::new("de-1996").is_ok());
    }

    #[test]
    fn invalid_tags() {
        assert_eq!(LanguageTag::new("en--US").unwrap_err().to_string(), "Invalid character '-' at 3 in \"en--US\"");
        assert_eq!(LanguageTag::new("en-").unwrap_err().to_string(), "Invalid character '-' at 2 in \"en-\"");
        assert_eq!(LanguageTag::new("1en").unwrap_err().to_string(), "Invalid character '1' at 0 in \"1en\"");
        assert_eq!(LanguageTag::new("abcdefghi").unwrap_err().to_string(), "Invalid character 'i' at 8 in \"abcdefghi\"");
        assert_eq!(LanguageTag::new("").unwrap_err().to_string(), "Missing language tag at 0 in \"\"");
    }

    #[test]
    fn offsets_relative_to_the_header() {
        let err = LanguageTag::from_token("en--US", 4, "da, en--US").unwrap_err();
        assert_eq!(err.to_string(), "Invalid character '-' at 7 in \"da, en--US\"");
    }

    #[test]
    fn prefix_matching() {
        let en = LanguageTag::new("en").unwrap();
        assert!(en.matches(&LanguageTag::new("en-GB").unwrap()));
        assert!(en.matches(&LanguageTag::new("EN").unwrap()));
        assert!(!en.matches(&LanguageTag::new("eng").unwrap()));
        assert!(!LanguageTag::new("en-GB").unwrap().matches(&en));
    }
}
