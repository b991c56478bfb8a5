//! The `Cookie` request header (RFC 6265 section 4.2).
//!
//! ```text
//! cookie-string = cookie-pair *( ";" SP cookie-pair )
//! cookie-pair   = cookie-name "=" cookie-value
//! cookie-value  = *cookie-octet / ( DQUOTE *cookie-octet DQUOTE )
//! ```
//!
//! A quoted value keeps its quotes when rendered. Backslashes carry no escaping meaning here.

use std::fmt;
use std::str::FromStr;

use http::HeaderName;

use crate::error::HeaderError;
use crate::grammar::{self, Flow, HeaderGrammar, Scanner, chars};
use crate::header::TypedHeader;
use crate::value::{CookieName, fmt_list};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cookie {
    name: CookieName,
    value: String,
    quoted: bool,
}

impl Cookie {
    /// # Errors
    ///
    /// Returns an error if `name` is not a token or `value` contains characters outside `cookie-octet`.
    pub fn new(name: &str, value: &str) -> Result<Self, HeaderError> {
        let name = CookieName::new(name)?;
        if let Some((position, character)) = value.char_indices().find(|&(_, c)| !chars::is_cookie_octet(c)) {
            return Err(HeaderError::invalid_character(character, position, value));
        }
        Ok(Self { name, value: value.to_string(), quoted: false })
    }

    pub fn name(&self) -> &CookieName {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the value was sent in double quotes.
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    #[must_use]
    pub fn quoted(mut self) -> Self {
        self.quoted = true;
        self
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted { write!(f, "{}=\"{}\"", self.name, self.value) } else { write!(f, "{}={}", self.name, self.value) }
    }
}

impl FromStr for Cookie {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scanner = Scanner::new(s);
        let cookie = cookie_pair(&mut scanner)?;
        if !scanner.is_at_end() {
            return Err(scanner.invalid_character());
        }
        Ok(cookie)
    }
}

/// Reads `name=value` at the cursor.
pub(crate) fn cookie_pair(scanner: &mut Scanner<'_>) -> Result<Cookie, HeaderError> {
    let name = CookieName::from_token(scanner.required_token(chars::is_tchar, "cookie name")?);
    scanner.expect('=', "cookie value")?;
    let (value, quoted) = if scanner.peek() == Some('"') {
        (scanner.quoted_text(chars::is_cookie_octet, false)?, true)
    } else {
        (scanner.token(chars::is_cookie_octet).to_string(), false)
    };
    Ok(Cookie { name, value, quoted })
}

/// The cookies of a `Cookie` header, in the order they were sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookies(pub Vec<Cookie>);

impl Cookies {
    /// The first cookie called `name`.
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.0.iter().find(|cookie| cookie.name.as_str() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.0.iter()
    }
}

impl fmt::Display for Cookies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_list(f, &self.0, "; ")
    }
}

#[derive(Default)]
struct CookieGrammar {
    cookies: Vec<Cookie>,
}

impl HeaderGrammar for CookieGrammar {
    type Output = Vec<Cookie>;
    const LABEL: &'static str = "cookie";

    fn value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        self.cookies.push(cookie_pair(scanner)?);
        Ok(())
    }

    fn value_complete(&mut self, _scanner: &Scanner<'_>) -> Result<(), HeaderError> {
        Ok(())
    }

    fn finish(self, _scanner: &Scanner<'_>) -> Result<Self::Output, HeaderError> {
        Ok(self.cookies)
    }

    /// `;` separates cookies. A trailing `;` is ignored.
    fn token_separator(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        scanner.advance();
        scanner.skip_whitespace()?;
        if scanner.is_at_end() { Ok(Flow::Continue) } else { Ok(Flow::NextValue) }
    }
}

/// Parses a `Cookie` value.
///
/// # Errors
///
/// Returns the first syntax error. A name without `=` is reported as a missing cookie value.
///
/// # Example
///
/// ```
/// use micro_headers::parse_cookie;
///
/// let cookies = parse_cookie("SID=31d4d96e407aad42; lang=en-US").unwrap();
/// assert_eq!(cookies.len(), 2);
/// assert_eq!(cookies[1].value(), "en-US");
/// ```
pub fn parse_cookie(text: &str) -> Result<Vec<Cookie>, HeaderError> {
    grammar::parse(CookieGrammar::default(), text)
}

impl TypedHeader for Cookies {
    const NAME: HeaderName = http::header::COOKIE;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_cookie(text).map(Self)
    }
}

#[cfg(feature = "serde")]
crate::value::impl_serde_as_text!(Cookie);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_list() {
        let cookies = Cookies::parse_text("SID=31d4d96e407aad42; lang=en-US;theme=\"dark\";").unwrap();
        assert_eq!(cookies.0.len(), 3);
        assert_eq!(cookies.get("lang").map(Cookie::value), Some("en-US"));
        assert!(cookies.get("theme").unwrap().is_quoted());
        assert_eq!(cookies.get("Lang"), None);
        assert_eq!(cookies.to_string(), "SID=31d4d96e407aad42; lang=en-US; theme=\"dark\"");
    }

    #[test]
    fn empty_and_special_values() {
        let cookies = parse_cookie("a=; b=x=y; c=\"v1\"").unwrap();
        assert_eq!(cookies[0].value(), "");
        assert_eq!(cookies[1].value(), "x=y");
        assert_eq!(cookies[2].value(), "v1");
        assert_eq!(parse_cookie("c=\"a\\b\"").unwrap_err().position(), Some(4));
    }

    #[test]
    fn errors() {
        assert_eq!(parse_cookie("SID").unwrap_err().to_string(), "Missing cookie value at 3 in \"SID\"");
        assert_eq!(parse_cookie("a=b; ; c=d").unwrap_err().to_string(), "Missing cookie at 5 in \"a=b; ; c=d\"");
        assert_eq!(parse_cookie("a=b, c=d").unwrap_err().to_string(), "Invalid character ',' at 3 in \"a=b, c=d\"");
        assert_eq!(parse_cookie("a=\"b").unwrap_err().to_string(), "Missing closing '\"' in \"a=\"b\"");
        assert_eq!(parse_cookie("a=b c").unwrap_err().to_string(), "Invalid character 'c' at 4 in \"a=b c\"");
    }

    #[test]
    fn construction() {
        assert_eq!(Cookie::new("id", "a1").unwrap().to_string(), "id=a1");
        assert_eq!(Cookie::new("id", "a 1").unwrap_err().to_string(), "Invalid character ' ' at 1 in \"a 1\"");
        assert_eq!("id=\"a1\"".parse::<Cookie>().unwrap(), Cookie::new("id", "a1").unwrap().quoted());
    }
}
