//! `Cache-Control` directives (RFC 9111 section 5.2).
//!
//! ```text
//! Cache-Control   = #cache-directive
//! cache-directive = token [ "=" ( token / quoted-string ) ]
//! ```
//!
//! Registered directives are looked up in a static table by lower-cased name before any value is converted,
//! everything else is kept as an [`CacheDirective::Extension`].

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

use http::HeaderName;

use crate::error::HeaderError;
use crate::grammar::{self, Flow, HeaderGrammar, Scanner, chars};
use crate::header::TypedHeader;
use crate::value::{fmt_list, fmt_quoted, fmt_token_or_quoted};

/// A single cache directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheDirective {
    MaxAge(u64),
    /// `max-stale` with an optional limit.
    MaxStale(Option<u64>),
    MinFresh(u64),
    /// `no-cache`, optionally qualified with field names.
    NoCache(Vec<String>),
    NoStore,
    NoTransform,
    OnlyIfCached,
    MustRevalidate,
    MustUnderstand,
    ProxyRevalidate,
    Public,
    /// `private`, optionally qualified with field names.
    Private(Vec<String>),
    SMaxAge(u64),
    Immutable,
    StaleWhileRevalidate(u64),
    StaleIfError(u64),
    Extension { name: String, value: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirectiveKind {
    MaxAge,
    MaxStale,
    MinFresh,
    NoCache,
    NoStore,
    NoTransform,
    OnlyIfCached,
    MustRevalidate,
    MustUnderstand,
    ProxyRevalidate,
    Public,
    Private,
    SMaxAge,
    Immutable,
    StaleWhileRevalidate,
    StaleIfError,
}

static DIRECTIVES: Lazy<HashMap<&'static str, DirectiveKind>> = Lazy::new(|| {
    HashMap::from([
        ("max-age", DirectiveKind::MaxAge),
        ("max-stale", DirectiveKind::MaxStale),
        ("min-fresh", DirectiveKind::MinFresh),
        ("no-cache", DirectiveKind::NoCache),
        ("no-store", DirectiveKind::NoStore),
        ("no-transform", DirectiveKind::NoTransform),
        ("only-if-cached", DirectiveKind::OnlyIfCached),
        ("must-revalidate", DirectiveKind::MustRevalidate),
        ("must-understand", DirectiveKind::MustUnderstand),
        ("proxy-revalidate", DirectiveKind::ProxyRevalidate),
        ("public", DirectiveKind::Public),
        ("private", DirectiveKind::Private),
        ("s-maxage", DirectiveKind::SMaxAge),
        ("immutable", DirectiveKind::Immutable),
        ("stale-while-revalidate", DirectiveKind::StaleWhileRevalidate),
        ("stale-if-error", DirectiveKind::StaleIfError),
    ])
});

impl CacheDirective {
    pub fn name(&self) -> &str {
        match self {
            Self::MaxAge(_) => "max-age",
            Self::MaxStale(_) => "max-stale",
            Self::MinFresh(_) => "min-fresh",
            Self::NoCache(_) => "no-cache",
            Self::NoStore => "no-store",
            Self::NoTransform => "no-transform",
            Self::OnlyIfCached => "only-if-cached",
            Self::MustRevalidate => "must-revalidate",
            Self::MustUnderstand => "must-understand",
            Self::ProxyRevalidate => "proxy-revalidate",
            Self::Public => "public",
            Self::Private(_) => "private",
            Self::SMaxAge(_) => "s-maxage",
            Self::Immutable => "immutable",
            Self::StaleWhileRevalidate(_) => "stale-while-revalidate",
            Self::StaleIfError(_) => "stale-if-error",
            Self::Extension { name, .. } => name,
        }
    }

    fn build(name: &str, argument: Option<String>, text: &str) -> Result<Self, HeaderError> {
        let Some(kind) = DIRECTIVES.get(name.to_ascii_lowercase().as_str()).copied() else {
            return Ok(Self::Extension { name: name.to_string(), value: argument });
        };
        let seconds = |argument: Option<String>| -> Result<u64, HeaderError> {
            let Some(argument) = argument else {
                return Err(HeaderError::invalid_value(format!("Directive \"{name}\" requires a value in \"{text}\"")));
            };
            argument.parse::<u64>().map_err(|e| HeaderError::conversion(name, &argument, e))
        };
        let flag = |argument: Option<String>, directive: Self| -> Result<Self, HeaderError> {
            match argument {
                Some(_) => Err(HeaderError::invalid_value(format!("Directive \"{name}\" takes no value in \"{text}\""))),
                None => Ok(directive),
            }
        };
        Ok(match kind {
            DirectiveKind::MaxAge => Self::MaxAge(seconds(argument)?),
            DirectiveKind::MaxStale => Self::MaxStale(argument.map(|argument| seconds(Some(argument))).transpose()?),
            DirectiveKind::MinFresh => Self::MinFresh(seconds(argument)?),
            DirectiveKind::SMaxAge => Self::SMaxAge(seconds(argument)?),
            DirectiveKind::StaleWhileRevalidate => Self::StaleWhileRevalidate(seconds(argument)?),
            DirectiveKind::StaleIfError => Self::StaleIfError(seconds(argument)?),
            DirectiveKind::NoCache => Self::NoCache(field_names(name, argument, text)?),
            DirectiveKind::Private => Self::Private(field_names(name, argument, text)?),
            DirectiveKind::NoStore => flag(argument, Self::NoStore)?,
            DirectiveKind::NoTransform => flag(argument, Self::NoTransform)?,
            DirectiveKind::OnlyIfCached => flag(argument, Self::OnlyIfCached)?,
            DirectiveKind::MustRevalidate => flag(argument, Self::MustRevalidate)?,
            DirectiveKind::MustUnderstand => flag(argument, Self::MustUnderstand)?,
            DirectiveKind::ProxyRevalidate => flag(argument, Self::ProxyRevalidate)?,
            DirectiveKind::Public => flag(argument, Self::Public)?,
            DirectiveKind::Immutable => flag(argument, Self::Immutable)?,
        })
    }
}

/// The optional `#field-name` list of `no-cache` and `private`.
fn field_names(name: &str, argument: Option<String>, text: &str) -> Result<Vec<String>, HeaderError> {
    let Some(argument) = argument else {
        return Ok(Vec::new());
    };
    let fields: Vec<String> = argument.split(',').map(str::trim).filter(|field| !field.is_empty()).map(str::to_string).collect();
    match fields.iter().find(|field| !field.chars().all(chars::is_tchar)) {
        Some(field) => Err(HeaderError::invalid_value(format!("Invalid field name \"{field}\" for \"{name}\" in \"{text}\""))),
        None => Ok(fields),
    }
}

impl fmt::Display for CacheDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        match self {
            Self::MaxAge(seconds)
            | Self::MinFresh(seconds)
            | Self::SMaxAge(seconds)
            | Self::StaleWhileRevalidate(seconds)
            | Self::StaleIfError(seconds)
            | Self::MaxStale(Some(seconds)) => write!(f, "={seconds}"),
            Self::NoCache(fields) | Self::Private(fields) if !fields.is_empty() => {
                f.write_str("=")?;
                fmt_quoted(f, &fields.join(", "))
            }
            Self::Extension { value: Some(value), .. } => {
                f.write_str("=")?;
                fmt_token_or_quoted(f, value)
            }
            _ => Ok(()),
        }
    }
}

#[derive(Default)]
struct CacheControlGrammar {
    pending: Option<(String, Option<String>)>,
    values: Vec<CacheDirective>,
}

impl HeaderGrammar for CacheControlGrammar {
    type Output = Vec<CacheDirective>;
    const LABEL: &'static str = "directive";

    fn allow_multiple_values(&self) -> bool {
        true
    }

    fn value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        let name = scanner.required_token(chars::is_tchar, Self::LABEL)?;
        self.pending = Some((name.to_string(), None));
        Ok(())
    }

    /// `=` introduces the directive argument.
    fn key_value_separator(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        let argument = match &mut self.pending {
            Some((_, argument)) if argument.is_none() => argument,
            _ => return Err(scanner.invalid_character()),
        };
        scanner.advance();
        let value = match scanner.peek() {
            Some('"') => scanner.quoted_text(chars::is_qdtext, true)?,
            _ => scanner.required_token(chars::is_tchar, "directive value")?.to_string(),
        };
        *argument = Some(value);
        Ok(Flow::Continue)
    }

    fn value_complete(&mut self, scanner: &Scanner<'_>) -> Result<(), HeaderError> {
        if let Some((name, argument)) = self.pending.take() {
            self.values.push(CacheDirective::build(&name, argument, scanner.text())?);
        }
        Ok(())
    }

    fn finish(self, _scanner: &Scanner<'_>) -> Result<Self::Output, HeaderError> {
        Ok(self.values)
    }
}

/// Parses a `Cache-Control` value.
///
/// # Errors
///
/// Returns the first syntax error, a conversion error for a malformed delta-seconds value, or an invalid value
/// error for a registered directive used with the wrong arity.
///
/// # Example
///
/// ```
/// use micro_headers::{CacheDirective, parse_cache_control};
///
/// let directives = parse_cache_control("public, max-age=31536000, immutable").unwrap();
/// assert_eq!(directives, vec![CacheDirective::Public, CacheDirective::MaxAge(31_536_000), CacheDirective::Immutable]);
/// ```
pub fn parse_cache_control(text: &str) -> Result<Vec<CacheDirective>, HeaderError> {
    grammar::parse(CacheControlGrammar::default(), text)
}

/// The `Cache-Control` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheControl(pub Vec<CacheDirective>);

impl CacheControl {
    pub fn max_age(&self) -> Option<u64> {
        self.0.iter().find_map(|directive| match directive {
            CacheDirective::MaxAge(seconds) => Some(*seconds),
            _ => None,
        })
    }

    pub fn s_max_age(&self) -> Option<u64> {
        self.0.iter().find_map(|directive| match directive {
            CacheDirective::SMaxAge(seconds) => Some(*seconds),
            _ => None,
        })
    }

    pub fn is_no_store(&self) -> bool {
        self.0.contains(&CacheDirective::NoStore)
    }

    /// True for an unqualified `no-cache`.
    pub fn is_no_cache(&self) -> bool {
        self.0.iter().any(|directive| matches!(directive, CacheDirective::NoCache(fields) if fields.is_empty()))
    }
}

impl fmt::Display for CacheControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_list(f, &self.0, ", ")
    }
}

impl TypedHeader for CacheControl {
    const NAME: HeaderName = http::header::CACHE_CONTROL;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_cache_control(text).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_directives() {
        let header = CacheControl::parse_text("No-Cache, no-store, max-age=0, s-maxage=\"60\", max-stale").unwrap();
        assert_eq!(
            header.0,
            vec![
                CacheDirective::NoCache(vec![]),
                CacheDirective::NoStore,
                CacheDirective::MaxAge(0),
                CacheDirective::SMaxAge(60),
                CacheDirective::MaxStale(None),
            ]
        );
        assert!(header.is_no_store());
        assert!(header.is_no_cache());
        assert_eq!(header.max_age(), Some(0));
        assert_eq!(header.to_string(), "no-cache, no-store, max-age=0, s-maxage=60, max-stale");
    }

    #[test]
    fn field_name_lists() {
        let directives = parse_cache_control("private=\"Set-Cookie, Authorization\", no-cache=Cookie").unwrap();
        assert_eq!(directives[0], CacheDirective::Private(vec!["Set-Cookie".to_string(), "Authorization".to_string()]));
        assert_eq!(directives[1], CacheDirective::NoCache(vec!["Cookie".to_string()]));
        assert_eq!(CacheControl(directives).to_string(), "private=\"Set-Cookie, Authorization\", no-cache=\"Cookie\"");
    }

    #[test]
    fn extensions() {
        let directives = parse_cache_control("community=\"UCI\", x-flag").unwrap();
        assert_eq!(directives[0], CacheDirective::Extension { name: "community".to_string(), value: Some("UCI".to_string()) });
        assert_eq!(CacheControl(directives).to_string(), "community=UCI, x-flag");
    }

    #[test]
    fn invalid_values() {
        let err = parse_cache_control("max-age=abc").unwrap_err();
        assert_eq!(err.to_string(), "Failed to convert \"max-age\" value \"abc\", message: invalid digit found in string");

        let err = parse_cache_control("max-age").unwrap_err();
        assert_eq!(err.to_string(), "Directive \"max-age\" requires a value in \"max-age\"");

        let err = parse_cache_control("no-store=1").unwrap_err();
        assert_eq!(err.to_string(), "Directive \"no-store\" takes no value in \"no-store=1\"");

        assert_eq!(parse_cache_control("max-age=").unwrap_err().to_string(), "Missing directive value at 8 in \"max-age=\"");
        assert_eq!(parse_cache_control("a=1=2").unwrap_err().position(), Some(3));
        assert_eq!(parse_cache_control("public,").unwrap_err().to_string(), "Missing directive at 7 in \"public,\"");
    }
}
