//! Character sets as named by `Accept-Charset`, the `charset` media type parameter and extended parameter
//! values.
//!
//! Names are case-insensitive. Well-known names and their aliases resolve to a shared canonical instance from a
//! static registry, so `utf8`, `UTF-8` and `Utf-8` all compare equal and render as `UTF-8`. Any other
//! syntactically valid name is kept as written. Only the registry members know how to decode bytes; for an
//! unknown charset [`Charset::decode`] returns `None`.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::HeaderError;
use crate::grammar::chars;
use crate::value::names;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Codec {
    Utf8,
    Ascii,
    Latin1,
    Utf16,
    Utf16Be,
    Utf16Le,
}

#[derive(Debug, PartialEq, Eq)]
struct Registered {
    name: &'static str,
    codec: Codec,
}

const UTF_8_ENTRY: Registered = Registered { name: "UTF-8", codec: Codec::Utf8 };
const US_ASCII_ENTRY: Registered = Registered { name: "US-ASCII", codec: Codec::Ascii };
const ISO_8859_1_ENTRY: Registered = Registered { name: "ISO-8859-1", codec: Codec::Latin1 };
const UTF_16_ENTRY: Registered = Registered { name: "UTF-16", codec: Codec::Utf16 };
const UTF_16BE_ENTRY: Registered = Registered { name: "UTF-16BE", codec: Codec::Utf16Be };
const UTF_16LE_ENTRY: Registered = Registered { name: "UTF-16LE", codec: Codec::Utf16Le };

static REGISTRY: Lazy<HashMap<&'static str, Charset>> = Lazy::new(|| {
    let aliases: [(&'static str, Charset); 16] = [
        ("utf-8", Charset::UTF_8),
        ("utf8", Charset::UTF_8),
        ("us-ascii", Charset::US_ASCII),
        ("ascii", Charset::US_ASCII),
        ("iso-ir-6", Charset::US_ASCII),
        ("iso-8859-1", Charset::ISO_8859_1),
        ("iso_8859-1", Charset::ISO_8859_1),
        ("latin1", Charset::ISO_8859_1),
        ("l1", Charset::ISO_8859_1),
        ("iso-ir-100", Charset::ISO_8859_1),
        ("ibm819", Charset::ISO_8859_1),
        ("cp819", Charset::ISO_8859_1),
        ("csisolatin1", Charset::ISO_8859_1),
        ("utf-16", Charset::UTF_16),
        ("utf-16be", Charset::UTF_16BE),
        ("utf-16le", Charset::UTF_16LE),
    ];
    aliases.into_iter().collect()
});

/// A character set name, canonicalized when it is one of the registered charsets.
#[derive(Debug, Clone)]
pub struct Charset(Repr);

#[derive(Debug, Clone)]
enum Repr {
    Registered(&'static Registered),
    Other(Box<str>),
}

impl Charset {
    pub const UTF_8: Self = Self(Repr::Registered(&UTF_8_ENTRY));
    pub const US_ASCII: Self = Self(Repr::Registered(&US_ASCII_ENTRY));
    pub const ISO_8859_1: Self = Self(Repr::Registered(&ISO_8859_1_ENTRY));
    pub const UTF_16: Self = Self(Repr::Registered(&UTF_16_ENTRY));
    pub const UTF_16BE: Self = Self(Repr::Registered(&UTF_16BE_ENTRY));
    pub const UTF_16LE: Self = Self(Repr::Registered(&UTF_16LE_ENTRY));

    /// Looks up or creates the charset called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is empty or contains a character outside the `mime-charset` set.
    pub fn new(name: &str) -> Result<Self, HeaderError> {
        names::validate(name, "charset", chars::is_mime_charset_char)?;
        Ok(Self::from_token(name))
    }

    /// Resolves an already validated name.
    pub(crate) fn from_token(name: &str) -> Self {
        match REGISTRY.get(name.to_ascii_lowercase().as_str()) {
            Some(charset) => charset.clone(),
            None => Self(Repr::Other(name.into())),
        }
    }

    pub fn name(&self) -> &str {
        match &self.0 {
            Repr::Registered(registered) => registered.name,
            Repr::Other(name) => name,
        }
    }

    /// Returns true if this charset can decode and encode text.
    pub fn is_supported(&self) -> bool {
        matches!(self.0, Repr::Registered(_))
    }

    /// Decodes `bytes`, returning `None` for an unsupported charset or bytes that are invalid for it.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        let Repr::Registered(registered) = &self.0 else {
            return None;
        };
        match registered.codec {
            Codec::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
            Codec::Ascii => bytes.is_ascii().then(|| bytes.iter().map(|&b| char::from(b)).collect()),
            Codec::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            Codec::Utf16 => match bytes {
                [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
                [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
                _ => decode_utf16(bytes, u16::from_be_bytes),
            },
            Codec::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            Codec::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
        }
    }

    /// Encodes `text`, returning `None` for an unsupported charset or text it cannot represent.
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        let Repr::Registered(registered) = &self.0 else {
            return None;
        };
        match registered.codec {
            Codec::Utf8 => Some(text.as_bytes().to_vec()),
            Codec::Ascii => text.is_ascii().then(|| text.as_bytes().to_vec()),
            Codec::Latin1 => text.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect(),
            Codec::Utf16 => {
                let mut bytes = vec![0xFE, 0xFF];
                bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
                Some(bytes)
            }
            Codec::Utf16Be => Some(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            Codec::Utf16Le => Some(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units).collect::<Result<String, _>>().ok()
}

impl PartialEq for Charset {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Repr::Registered(a), Repr::Registered(b)) => a == b,
            _ => self.name().eq_ignore_ascii_case(other.name()),
        }
    }
}

impl Eq for Charset {}

impl Hash for Charset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.name().bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Charset {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_names_are_canonical() {
        assert_eq!(Charset::new("utf8").unwrap(), Charset::UTF_8);
        assert_eq!(Charset::new("Utf-8").unwrap().to_string(), "UTF-8");
        assert_eq!(Charset::new("latin1").unwrap(), Charset::ISO_8859_1);
        assert!(Charset::new("us-ascii").unwrap().is_supported());
    }

    #[test]
    fn unknown_names_are_kept() {
        let charset = Charset::new("Shift_JIS").unwrap();
        assert_eq!(charset.to_string(), "Shift_JIS");
        assert_eq!(charset, Charset::new("shift_jis").unwrap());
        assert!(!charset.is_supported());
        assert_eq!(charset.decode(b"abc"), None);
    }

    #[test]
    fn invalid_names() {
        assert_eq!(Charset::new("utf@8").unwrap_err().to_string(), "Invalid character '@' at 3 in \"utf@8\"");
        assert_eq!(Charset::new("").unwrap_err().to_string(), "Missing charset at 0 in \"\"");
    }

    #[test]
    fn decode_and_encode() {
        assert_eq!(Charset::UTF_8.decode("€ rates".as_bytes()).as_deref(), Some("€ rates"));
        assert_eq!(Charset::UTF_8.decode(&[0xC3]), None);
        assert_eq!(Charset::ISO_8859_1.decode(&[0xA3, b'1']).as_deref(), Some("£1"));
        assert_eq!(Charset::US_ASCII.decode(&[0xA3]), None);
        assert_eq!(Charset::UTF_16LE.decode(&[b'h', 0, b'i', 0]).as_deref(), Some("hi"));
        assert_eq!(Charset::UTF_16.decode(&[0xFF, 0xFE, b'h', 0]).as_deref(), Some("h"));
        assert_eq!(Charset::UTF_16BE.decode(&[0, b'h', 0]), None);

        assert_eq!(Charset::ISO_8859_1.encode("£1"), Some(vec![0xA3, b'1']));
        assert_eq!(Charset::ISO_8859_1.encode("€"), None);
        assert_eq!(Charset::US_ASCII.encode("é"), None);
        assert_eq!(Charset::UTF_16BE.encode("h"), Some(vec![0, b'h']));
    }
}
