//! The `Set-Cookie` response header (RFC 6265 section 4.1).
//!
//! ```text
//! set-cookie-string = cookie-pair *( ";" SP cookie-av )
//! ```
//!
//! Attribute names are matched case-insensitively. Unknown attributes are kept as extensions, in order.

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use http::HeaderName;

use crate::error::HeaderError;
use crate::grammar::{self, Flow, HeaderGrammar, Scanner, chars};
use crate::header::TypedHeader;
use crate::header::cookie::{Cookie, cookie_pair};
use crate::utils::ensure;
use crate::value::{format_http_date, parse_http_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SameSite {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Strict, Self::Lax, Self::None]
            .into_iter()
            .find(|same_site| same_site.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| HeaderError::conversion("SameSite", s, "expected Strict, Lax or None"))
    }
}

/// A cookie with the attributes that scope it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SetCookie {
    cookie: Cookie,
    expires: Option<SystemTime>,
    max_age: Option<i64>,
    domain: Option<String>,
    path: Option<String>,
    secure: bool,
    http_only: bool,
    same_site: Option<SameSite>,
    extensions: Vec<String>,
}

impl SetCookie {
    pub fn new(cookie: Cookie) -> Self {
        Self {
            cookie,
            expires: None,
            max_age: None,
            domain: None,
            path: None,
            secure: false,
            http_only: false,
            same_site: None,
            extensions: Vec::new(),
        }
    }

    pub fn cookie(&self) -> &Cookie {
        &self.cookie
    }

    pub fn expires(&self) -> Option<SystemTime> {
        self.expires
    }

    /// Seconds until expiry. Zero or negative values expire the cookie immediately.
    pub fn max_age(&self) -> Option<i64> {
        self.max_age
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn is_http_only(&self) -> bool {
        self.http_only
    }

    pub fn same_site(&self) -> Option<SameSite> {
        self.same_site
    }

    /// Unrecognized attributes as written, e.g. `Partitioned` or `Priority=High`.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    #[must_use]
    pub fn with_expires(mut self, expires: SystemTime) -> Self {
        self.expires = Some(expires);
        self
    }

    #[must_use]
    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    #[must_use]
    pub fn with_domain(mut self, domain: &str) -> Self {
        self.domain = Some(domain.trim_start_matches('.').to_string());
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    #[must_use]
    pub fn with_secure(mut self) -> Self {
        self.secure = true;
        self
    }

    #[must_use]
    pub fn with_http_only(mut self) -> Self {
        self.http_only = true;
        self
    }

    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    fn apply(&mut self, name: &str, value: Option<&str>, scanner: &Scanner<'_>) -> Result<(), HeaderError> {
        let required = || value.ok_or_else(|| scanner.missing("attribute value"));
        match name.to_ascii_lowercase().as_str() {
            "expires" => {
                let value = required()?;
                self.expires = Some(parse_http_date(value).map_err(|e| HeaderError::conversion(name, value, e))?);
            }
            "max-age" => {
                let value = required()?;
                self.max_age = Some(value.parse().map_err(|e| HeaderError::conversion(name, value, e))?);
            }
            "domain" => {
                let value = required()?;
                self.domain = if value.is_empty() { None } else { Some(value.trim_start_matches('.').to_string()) };
            }
            "path" => self.path = Some(required()?.to_string()),
            "samesite" => self.same_site = Some(required()?.parse()?),
            "secure" | "httponly" => {
                ensure!(
                    value.is_none(),
                    HeaderError::invalid_value(format!("Attribute \"{name}\" takes no value in \"{}\"", scanner.text()))
                );
                if name.eq_ignore_ascii_case("secure") {
                    self.secure = true;
                } else {
                    self.http_only = true;
                }
            }
            _ => self.extensions.push(match value {
                Some(value) => format!("{name}={value}"),
                None => name.to_string(),
            }),
        }
        Ok(())
    }
}

impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cookie)?;
        if let Some(expires) = self.expires {
            write!(f, "; Expires={}", format_http_date(expires))?;
        }
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={max_age}")?;
        }
        if let Some(domain) = &self.domain {
            write!(f, "; Domain={domain}")?;
        }
        if let Some(path) = &self.path {
            write!(f, "; Path={path}")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        if let Some(same_site) = self.same_site {
            write!(f, "; SameSite={same_site}")?;
        }
        for extension in &self.extensions {
            write!(f, "; {extension}")?;
        }
        Ok(())
    }
}

impl FromStr for SetCookie {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_set_cookie(s)
    }
}

#[derive(Default)]
struct SetCookieGrammar {
    value: Option<SetCookie>,
}

impl HeaderGrammar for SetCookieGrammar {
    type Output = SetCookie;
    const LABEL: &'static str = "cookie";

    fn value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        self.value = Some(SetCookie::new(cookie_pair(scanner)?));
        Ok(())
    }

    fn value_complete(&mut self, _scanner: &Scanner<'_>) -> Result<(), HeaderError> {
        Ok(())
    }

    fn finish(self, scanner: &Scanner<'_>) -> Result<Self::Output, HeaderError> {
        self.value.ok_or_else(|| scanner.missing(Self::LABEL))
    }

    /// `; name[=value]`. Values run up to the next `;` and are trimmed.
    fn token_separator(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        scanner.advance();
        scanner.skip_whitespace()?;
        if scanner.is_at_end() {
            return Ok(Flow::Continue);
        }
        let name = scanner.required_token(chars::is_tchar, "attribute name")?;
        scanner.skip_whitespace()?;
        let value = if scanner.consume('=') { Some(scanner.token(chars::is_cookie_attribute_char).trim()) } else { None };
        let Some(set_cookie) = self.value.as_mut() else {
            return Err(scanner.invalid_character());
        };
        set_cookie.apply(name, value, scanner)?;
        Ok(Flow::Continue)
    }
}

/// Parses a `Set-Cookie` value.
///
/// # Errors
///
/// Returns the first syntax error, a conversion error for a malformed `Expires`, `Max-Age` or `SameSite`, or
/// an invalid value error for a flag attribute with a value.
///
/// # Example
///
/// ```
/// use micro_headers::{SameSite, parse_set_cookie};
///
/// let set_cookie = parse_set_cookie("id=a3fWa; Max-Age=2592000; Secure; SameSite=Lax").unwrap();
/// assert_eq!(set_cookie.cookie().value(), "a3fWa");
/// assert_eq!(set_cookie.max_age(), Some(2_592_000));
/// assert_eq!(set_cookie.same_site(), Some(SameSite::Lax));
/// ```
pub fn parse_set_cookie(text: &str) -> Result<SetCookie, HeaderError> {
    grammar::parse(SetCookieGrammar::default(), text)
}

impl TypedHeader for SetCookie {
    const NAME: HeaderName = http::header::SET_COOKIE;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_set_cookie(text)
    }
}

#[cfg(feature = "serde")]
crate::value::impl_serde_as_text!(SetCookie);
