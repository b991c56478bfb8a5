//! Immutable values produced by the header parsers.
//!
//! Every value here is fully validated at construction, compares by meaning rather than by spelling (case
//! folding, parameter order) and renders back to canonical header text through [`std::fmt::Display`].

mod charset;
mod date;
mod extended;
mod language;
pub(crate) mod names;
mod parameters;
mod preference;
mod quality;

pub use charset::Charset;
pub use date::DateError;
pub use extended::ExtendedValue;
pub use language::LanguageTag;
pub use names::{CookieName, ParameterName};
pub use parameters::{ParameterValue, Parameters};
pub use preference::{Parameterized, Preference};
pub use quality::{QualityError, QualityFactor, Qualified, sort_by_quality};

pub(crate) use date::{format_http_date, parse_http_date};

use std::fmt::{self, Write};

use crate::grammar::chars;

/// Writes `text` as a token when it is one, otherwise as a quoted string with `"` and `\` escaped.
pub(crate) fn fmt_token_or_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    if !text.is_empty() && text.chars().all(chars::is_tchar) {
        return f.write_str(text);
    }
    fmt_quoted(f, text)
}

/// Writes `text` as a quoted string with `"` and `\` escaped.
pub(crate) fn fmt_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in text.chars() {
        if c == '"' || c == '\\' {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    f.write_char('"')
}

/// Writes `items` separated by `separator`.
pub(crate) fn fmt_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Implements `Serialize`/`Deserialize` through the `Display` and `FromStr` forms of a value.
#[cfg(feature = "serde")]
macro_rules! impl_serde_as_text {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl serde::Serialize for $ty {
                fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }

            impl<'de> serde::Deserialize<'de> for $ty {
                fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let text = <std::borrow::Cow<'de, str> as serde::Deserialize>::deserialize(deserializer)?;
                    text.parse().map_err(serde::de::Error::custom)
                }
            }
        )+
    };
}

#[cfg(feature = "serde")]
pub(crate) use impl_serde_as_text;

#[cfg(feature = "serde")]
impl_serde_as_text!(Charset, LanguageTag, ParameterName, CookieName, QualityFactor);
