//! Wrappers shared by the content negotiation headers.

use std::fmt;

use crate::value::{ParameterName, ParameterValue, Parameters, QualityFactor, Qualified};

/// Either the `*` wildcard or a concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Preference<T> {
    Any,
    Value(T),
}

impl<T> Preference<T> {
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Any => None,
            Self::Value(value) => Some(value),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Preference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Value(value) => fmt::Display::fmt(value, f),
        }
    }
}

/// A value followed by its parameters, like `gzip; q=0.8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameterized<T> {
    value: T,
    parameters: Parameters,
}

impl<T> Parameterized<T> {
    pub fn new(value: T) -> Self {
        Self { value, parameters: Parameters::new() }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    #[must_use]
    pub fn with_parameter<V: Into<ParameterValue>>(mut self, name: ParameterName, value: V) -> Self {
        self.parameters.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_quality(self, quality: QualityFactor) -> Self {
        self.with_parameter(ParameterName::Q, quality)
    }

    pub fn into_parts(self) -> (T, Parameters) {
        (self.value, self.parameters)
    }
}

impl<T> Qualified for Parameterized<T> {
    fn quality(&self) -> QualityFactor {
        self.parameters.quality().unwrap_or(QualityFactor::ONE)
    }
}

impl<T: fmt::Display> fmt::Display for Parameterized<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.parameters)
    }
}
