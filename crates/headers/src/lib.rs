//! Typed parsers and formatters for structured HTTP header values
//!
//! This crate turns the text of a header value into validated, immutable values and renders them back into
//! canonical header text. It covers the content negotiation headers, content metadata, caching, ranges,
//! cookies, entity tags, web links and product identifiers.
//!
//! # Features
//!
//! - One shared, single pass parsing loop for every header type
//! - Precise errors: the offending character, its byte offset and the whole original value
//! - Quoted strings, comments, `q` weights and RFC 8187 extended parameters (`filename*=UTF-8''...`)
//! - Obsolete line folding (`CRLF` followed by whitespace) accepted as whitespace
//! - Values compare by meaning: case-insensitive names, parameter order ignored
//! - `Display` renders canonical text that parses back to an equal value
//! - Bridges to the `http` crate ([`TypedHeader`]) and to `mime` ([`MediaType`])
//!
//! # Example
//!
//! ```
//! use micro_headers::{MediaType, parse_accept, parse_content_type};
//!
//! let accept = parse_accept("text/html;q=0.8, application/json, */*;q=0.1").unwrap();
//! assert_eq!(accept[0], MediaType::APPLICATION_JSON);
//!
//! let content_type = parse_content_type("text/html; charset=UTF-8").unwrap();
//! assert_eq!(content_type.charset().map(|charset| charset.name().to_string()), Some("UTF-8".to_string()));
//!
//! let err = parse_content_type("text/html; charset=\"UTF-8").unwrap_err();
//! assert_eq!(err.to_string(), "Missing closing '\"' in \"text/html; charset=\"UTF-8\"");
//! ```
//!
//! # Architecture
//!
//! - [`value`]: the immutable value types shared by several headers (charsets, language tags, quality
//!   factors, parameters, extended values)
//! - the header modules, re-exported at the crate root: one `parse_*` entry point per header and the values
//!   they produce
//! - an internal grammar layer: a character scanner and the parsing loop each header plugs its hooks into
//!
//! # Error Handling
//!
//! Every parser returns [`HeaderError`]. The first violation aborts parsing, nothing partial is returned.
//!
//! # Limitations
//!
//! - Header values longer than [`MAX_HEADER_VALUE_BYTES`] are rejected
//! - Charsets other than UTF-8, US-ASCII, ISO-8859-1 and UTF-16 are kept by name but not decoded

mod error;
mod grammar;
mod header;
mod utils;
pub mod value;

pub use error::{BoxError, HeaderError};
pub use grammar::MAX_HEADER_VALUE_BYTES;
pub use header::*;
pub use value::{
    Charset, CookieName, DateError, ExtendedValue, LanguageTag, ParameterName, ParameterValue, Parameterized, Parameters, Preference,
    QualityError, QualityFactor, Qualified, sort_by_quality,
};
