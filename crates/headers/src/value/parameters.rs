//! Ordered `; name=value` parameter collections.
//!
//! A [`Parameters`] keeps insertion order for rendering while equality ignores it. Names are unique under
//! case-insensitive comparison: inserting a name that is already present replaces the earlier value in place.

use std::fmt::{self, Write};
use std::time::SystemTime;

use crate::value::{ExtendedValue, ParameterName, QualityFactor, fmt_token_or_quoted, format_http_date};

/// A parameter value, typed according to the parameter it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
    Text(String),
    Quality(QualityFactor),
    Integer(u64),
    Date(SystemTime),
    Extended(ExtendedValue),
}

impl ParameterValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_quality(&self) -> Option<QualityFactor> {
        match self {
            Self::Quality(quality) => Some(*quality),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<u64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<SystemTime> {
        match self {
            Self::Date(time) => Some(*time),
            _ => None,
        }
    }

    pub fn as_extended(&self) -> Option<&ExtendedValue> {
        match self {
            Self::Extended(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<QualityFactor> for ParameterValue {
    fn from(value: QualityFactor) -> Self {
        Self::Quality(value)
    }
}

impl From<u64> for ParameterValue {
    fn from(value: u64) -> Self {
        Self::Integer(value)
    }
}

impl From<SystemTime> for ParameterValue {
    fn from(value: SystemTime) -> Self {
        Self::Date(value)
    }
}

impl From<ExtendedValue> for ParameterValue {
    fn from(value: ExtendedValue) -> Self {
        Self::Extended(value)
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => fmt_token_or_quoted(f, text),
            Self::Quality(quality) => write!(f, "{quality}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Date(time) => write!(f, "\"{}\"", format_http_date(*time)),
            Self::Extended(value) => write!(f, "{value}"),
        }
    }
}

/// Parameters attached to a header value, in the order they were given.
#[derive(Debug, Clone, Default)]
pub struct Parameters(Vec<(ParameterName, ParameterValue)>);

impl Parameters {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Looks up a parameter by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.0.iter().find(|(key, _)| key.matches(name)).map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The text of a plain parameter.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParameterValue::as_text)
    }

    /// The `q` parameter, if present.
    pub fn quality(&self) -> Option<QualityFactor> {
        self.get(ParameterName::Q.as_str()).and_then(ParameterValue::as_quality)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParameterName, &ParameterValue)> {
        self.0.iter().map(|(name, value)| (name, value))
    }

    /// Sets `name`, replacing the value of an existing parameter with the same name in place.
    pub fn insert<V: Into<ParameterValue>>(&mut self, name: ParameterName, value: V) {
        let value = value.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<ParameterValue> {
        let index = self.0.iter().position(|(key, _)| key.matches(name))?;
        Some(self.0.remove(index).1)
    }

    /// Returns a copy with `name` set.
    #[must_use]
    pub fn with<V: Into<ParameterValue>>(mut self, name: ParameterName, value: V) -> Self {
        self.insert(name, value);
        self
    }
}

impl PartialEq for Parameters {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self.0.iter().all(|(name, value)| other.0.iter().any(|(key, other_value)| key == name && other_value == value))
    }
}

impl Eq for Parameters {}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.0 {
            f.write_str("; ")?;
            write!(f, "{name}")?;
            f.write_char('=')?;
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

impl FromIterator<(ParameterName, ParameterValue)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (ParameterName, ParameterValue)>>(iter: I) -> Self {
        let mut parameters = Self::new();
        for (name, value) in iter {
            parameters.insert(name, value);
        }
        parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_replace_in_place() {
        let mut parameters = Parameters::new();
        parameters.insert(ParameterName::CHARSET, "utf-8");
        parameters.insert(ParameterName::BOUNDARY, "x");
        parameters.insert(ParameterName::new("Charset").unwrap(), "latin1");
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters.text("charset"), Some("latin1"));
        assert_eq!(parameters.to_string(), "; charset=latin1; boundary=x");
    }

    #[test]
    fn equality_ignores_order() {
        let a = Parameters::new().with(ParameterName::CHARSET, "utf-8").with(ParameterName::Q, QualityFactor::ONE);
        let b = Parameters::new().with(ParameterName::Q, QualityFactor::ONE).with(ParameterName::CHARSET, "utf-8");
        assert_eq!(a, b);
        assert_ne!(a, Parameters::new().with(ParameterName::CHARSET, "utf-8"));
    }

    #[test]
    fn text_is_quoted_when_needed() {
        let parameters = Parameters::new()
            .with(ParameterName::TITLE, "a \"quoted\" title")
            .with(ParameterName::NAME, "")
            .with(ParameterName::REL, "next");
        assert_eq!(parameters.to_string(), "; title=\"a \\\"quoted\\\" title\"; name=\"\"; rel=next");
    }

    #[test]
    fn remove_by_name() {
        let mut parameters = Parameters::new().with(ParameterName::SIZE, 10u64);
        assert_eq!(parameters.remove("SIZE"), Some(ParameterValue::Integer(10)));
        assert!(parameters.is_empty());
    }
}
