//! Product identifiers of `User-Agent` and `Server` (RFC 9110 sections 10.1.5 and 10.2.4).
//!
//! ```text
//! User-Agent = product *( RWS ( product / comment ) )
//! product    = token [ "/" product-version ]
//! ```

use std::fmt;

use http::HeaderName;

use crate::error::HeaderError;
use crate::grammar::{self, Flow, HeaderGrammar, Scanner, chars};
use crate::header::TypedHeader;
use crate::value::fmt_list;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductToken {
    Product { name: String, version: Option<String> },
    /// A comment without its parentheses, nested comments and escapes kept as written.
    Comment(String),
}

impl fmt::Display for ProductToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Product { name, version: Some(version) } => write!(f, "{name}/{version}"),
            Self::Product { name, version: None } => f.write_str(name),
            Self::Comment(comment) => write!(f, "({comment})"),
        }
    }
}

#[derive(Default)]
struct ProductGrammar {
    pending: Option<(String, Option<String>)>,
    tokens: Vec<ProductToken>,
}

impl ProductGrammar {
    fn flush(&mut self) {
        if let Some((name, version)) = self.pending.take() {
            self.tokens.push(ProductToken::Product { name, version });
        }
    }
}

impl HeaderGrammar for ProductGrammar {
    type Output = Vec<ProductToken>;
    const LABEL: &'static str = "product";

    fn value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        let name = scanner.required_token(chars::is_tchar, Self::LABEL)?;
        self.pending = Some((name.to_string(), None));
        Ok(())
    }

    fn value_complete(&mut self, _scanner: &Scanner<'_>) -> Result<(), HeaderError> {
        self.flush();
        Ok(())
    }

    fn finish(self, _scanner: &Scanner<'_>) -> Result<Self::Output, HeaderError> {
        Ok(self.tokens)
    }

    /// Whitespace separates products and comments.
    fn whitespace(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        scanner.skip_whitespace()?;
        match scanner.peek() {
            Some(c) if c == '(' || chars::is_tchar(c) => Ok(Flow::NextValue),
            _ => Ok(Flow::Continue),
        }
    }

    fn slash(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        let version = match &mut self.pending {
            Some((_, version)) if version.is_none() => version,
            _ => return Err(scanner.invalid_character()),
        };
        scanner.advance();
        *version = Some(scanner.required_token(chars::is_tchar, "product version")?.to_string());
        Ok(Flow::Continue)
    }

    fn comment(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        self.flush();
        self.tokens.push(ProductToken::Comment(scanner.comment()?));
        Ok(Flow::Produced)
    }
}

/// Parses the value of a `User-Agent` or `Server` header.
///
/// # Errors
///
/// Returns the first syntax error.
///
/// # Example
///
/// ```
/// use micro_headers::{ProductToken, parse_product_tokens};
///
/// let tokens = parse_product_tokens("CERN-LineMode/2.15 libwww/2.17b3").unwrap();
/// assert_eq!(tokens[1], ProductToken::Product { name: "libwww".to_string(), version: Some("2.17b3".to_string()) });
/// ```
pub fn parse_product_tokens(text: &str) -> Result<Vec<ProductToken>, HeaderError> {
    grammar::parse(ProductGrammar::default(), text)
}

fn product_version<'a>(tokens: &'a [ProductToken], product: &str) -> Option<&'a str> {
    tokens.iter().find_map(|token| match token {
        ProductToken::Product { name, version } if name.eq_ignore_ascii_case(product) => Some(version.as_deref().unwrap_or("")),
        _ => None,
    })
}

/// The `User-Agent` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgent(pub Vec<ProductToken>);

impl UserAgent {
    /// The version of `product`, empty when it was listed without one.
    pub fn version_of(&self, product: &str) -> Option<&str> {
        product_version(&self.0, product)
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_list(f, &self.0, " ")
    }
}

impl TypedHeader for UserAgent {
    const NAME: HeaderName = http::header::USER_AGENT;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_product_tokens(text).map(Self)
    }
}

/// The `Server` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server(pub Vec<ProductToken>);

impl Server {
    /// The version of `product`, empty when it was listed without one.
    pub fn version_of(&self, product: &str) -> Option<&str> {
        product_version(&self.0, product)
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_list(f, &self.0, " ")
    }
}

impl TypedHeader for Server {
    const NAME: HeaderName = http::header::SERVER;

    fn parse_text(text: &str) -> Result<Self, HeaderError> {
        parse_product_tokens(text).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, version: Option<&str>) -> ProductToken {
        ProductToken::Product { name: name.to_string(), version: version.map(str::to_string) }
    }

    #[test]
    fn browser_user_agent() {
        let agent = UserAgent::parse_text("Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/118.0").unwrap();
        assert_eq!(
            agent.0,
            vec![
                product("Mozilla", Some("5.0")),
                ProductToken::Comment("X11; Linux x86_64; rv:109.0".to_string()),
                product("Gecko", Some("20100101")),
                product("Firefox", Some("118.0")),
            ]
        );
        assert_eq!(agent.version_of("firefox"), Some("118.0"));
        assert_eq!(agent.to_string(), "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/118.0");
    }

    #[test]
    fn comments_anywhere() {
        let tokens = parse_product_tokens("(leading) Apache(Unix (nested)) mod_ssl").unwrap();
        assert_eq!(
            tokens,
            vec![
                ProductToken::Comment("leading".to_string()),
                product("Apache", None),
                ProductToken::Comment("Unix (nested)".to_string()),
                product("mod_ssl", None),
            ]
        );
        assert_eq!(Server(tokens).version_of("apache"), Some(""));
    }

    #[test]
    fn deeply_nested_comment() {
        let text = format!("curl/8.4.0 {}{}", "(".repeat(4000), ")".repeat(4000));
        let tokens = parse_product_tokens(&text).unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(matches!(&tokens[1], ProductToken::Comment(comment) if comment.len() == 2 * 3999));
    }

    #[test]
    fn errors() {
        assert_eq!(parse_product_tokens("").unwrap_err().to_string(), "Missing product at 0 in \"\"");
        assert_eq!(parse_product_tokens("curl/").unwrap_err().to_string(), "Missing product version at 5 in \"curl/\"");
        assert_eq!(parse_product_tokens("curl/8/1").unwrap_err().to_string(), "Invalid character '/' at 6 in \"curl/8/1\"");
        assert_eq!(parse_product_tokens("/8").unwrap_err().to_string(), "Invalid character '/' at 0 in \"/8\"");
        assert_eq!(parse_product_tokens("a, b").unwrap_err().to_string(), "Invalid character ',' at 1 in \"a, b\"");
        assert_eq!(parse_product_tokens("a (b").unwrap_err().to_string(), "Missing closing ')' in \"a (b\"");
    }
}
