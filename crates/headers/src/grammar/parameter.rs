//! Accumulation and typing of `; name=value` parameters while a value is being parsed.

use std::mem;

use crate::error::HeaderError;
use crate::grammar::Scanner;
use crate::value::{ParameterName, ParameterValue, Parameters, QualityFactor, parse_http_date};

/// How the raw text of a parameter value is turned into a [`ParameterValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParameterKind {
    Text,
    Quality,
    Integer,
    Date,
    Extended,
}

impl ParameterKind {
    /// Converts the raw (unquoted, unescaped) text of parameter `name`.
    ///
    /// # Errors
    ///
    /// Conversion failures are reported as `Failed to convert "name" value "raw", message: cause`.
    pub(crate) fn coerce(self, name: &ParameterName, raw: String) -> Result<ParameterValue, HeaderError> {
        match self {
            Self::Text => Ok(ParameterValue::Text(raw)),
            Self::Quality => {
                raw.parse::<QualityFactor>().map(ParameterValue::Quality).map_err(|e| HeaderError::conversion(name, &raw, e))
            }
            Self::Integer => raw.parse::<u64>().map(ParameterValue::Integer).map_err(|e| HeaderError::conversion(name, &raw, e)),
            Self::Date => parse_http_date(&raw).map(ParameterValue::Date).map_err(|e| HeaderError::conversion(name, &raw, e)),
            Self::Extended => {
                // quoted form, e.g. filename*="UTF-8''a%20b"
                let mut scanner = Scanner::new(&raw);
                let value = scanner
                    .encoded_text()
                    .and_then(|value| if scanner.is_at_end() { Ok(value) } else { Err(scanner.invalid_character()) })
                    .map_err(|e| HeaderError::conversion(name, &raw, e))?;
                Ok(ParameterValue::Extended(value))
            }
        }
    }
}

/// Parameters of the value currently being parsed, plus the name awaiting its value.
#[derive(Debug, Default)]
pub(crate) struct ParameterBuilder {
    pending: Option<ParameterName>,
    parameters: Parameters,
}

impl ParameterBuilder {
    pub(crate) fn begin(&mut self, name: ParameterName) {
        self.pending = Some(name);
    }

    pub(crate) fn pending(&self) -> Option<&ParameterName> {
        self.pending.as_ref()
    }

    /// Stores `value` under the pending name.
    pub(crate) fn complete(&mut self, value: ParameterValue) {
        if let Some(name) = self.pending.take() {
            self.parameters.insert(name, value);
        }
    }

    /// Hands out the collected parameters and resets for the next value.
    pub(crate) fn take(&mut self) -> Parameters {
        self.pending = None;
        mem::take(&mut self.parameters)
    }
}
