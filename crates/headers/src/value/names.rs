//! Validated names: parameter names (case-insensitive) and cookie names (case-sensitive).

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::HeaderError;
use crate::grammar::chars;

/// Checks that `name` is a non-empty run of characters accepted by `predicate`.
///
/// Errors carry offsets into `name` itself.
pub(crate) fn validate(name: &str, label: &'static str, predicate: impl Fn(char) -> bool) -> Result<(), HeaderError> {
    if name.is_empty() {
        return Err(HeaderError::missing(label, 0, name));
    }
    match name.char_indices().find(|&(_, c)| !predicate(c)) {
        Some((position, character)) => Err(HeaderError::invalid_character(character, position, name)),
        None => Ok(()),
    }
}

/// The name of a `; name=value` parameter.
///
/// Names compare case-insensitively and keep their original spelling for rendering. A trailing `*` marks an
/// extended (RFC 8187) parameter.
#[derive(Debug, Clone)]
pub struct ParameterName(Cow<'static, str>);

impl ParameterName {
    pub const Q: Self = Self::from_static("q");
    pub const CHARSET: Self = Self::from_static("charset");
    pub const BOUNDARY: Self = Self::from_static("boundary");
    pub const NAME: Self = Self::from_static("name");
    pub const FILENAME: Self = Self::from_static("filename");
    pub const FILENAME_EXT: Self = Self::from_static("filename*");
    pub const CREATION_DATE: Self = Self::from_static("creation-date");
    pub const MODIFICATION_DATE: Self = Self::from_static("modification-date");
    pub const READ_DATE: Self = Self::from_static("read-date");
    pub const SIZE: Self = Self::from_static("size");
    pub const REL: Self = Self::from_static("rel");
    pub const ANCHOR: Self = Self::from_static("anchor");
    pub const TITLE: Self = Self::from_static("title");
    pub const TITLE_EXT: Self = Self::from_static("title*");
    pub const HREFLANG: Self = Self::from_static("hreflang");
    pub const TYPE: Self = Self::from_static("type");

    const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// # Errors
    ///
    /// Returns an error if `name` is empty or is not a token.
    pub fn new<S: Into<String>>(name: S) -> Result<Self, HeaderError> {
        let name = name.into();
        validate(&name, "parameter name", chars::is_tchar)?;
        Ok(Self(Cow::Owned(name)))
    }

    /// Wraps a name the scanner already read as a token.
    pub(crate) fn from_token(token: &str) -> Self {
        Self(Cow::Owned(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for RFC 8187 names such as `filename*`.
    pub fn is_extended(&self) -> bool {
        self.0.ends_with('*')
    }

    /// Case-insensitive comparison against a plain string.
    pub fn matches(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

impl PartialEq for ParameterName {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for ParameterName {}

impl Hash for ParameterName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ParameterName {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// The name of a cookie. Cookie names are tokens and compare case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CookieName(String);

impl CookieName {
    /// # Errors
    ///
    /// Returns an error if `name` is empty or is not a token.
    pub fn new<S: Into<String>>(name: S) -> Result<Self, HeaderError> {
        let name = name.into();
        validate(&name, "cookie name", chars::is_tchar)?;
        Ok(Self(name))
    }

    pub(crate) fn from_token(token: &str) -> Self {
        Self(token.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CookieName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CookieName {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
