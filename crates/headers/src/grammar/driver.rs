//! The shared parsing loop and the hook trait each header grammar implements.
//!
//! [`parse`] walks the header value once, left to right. It owns the control flow: where a value must start,
//! which delimiter was met, when a value is complete. A [`HeaderGrammar`] only decides what each of those
//! events means for its header type through a fixed set of hooks, each of which moves the shared [`Scanner`]
//! forward.
//!
//! ```text
//!            ┌──────────── NextValue ◄──────────────┐
//!            ▼                                      │
//!   value start ── value() / wildcard_value() ──► trailer ── end of text ──► finish()
//!                                                  │  ▲
//!                  ; = , / ( whitespace hooks ─────┘  └── Continue
//! ```
//!
//! Default hooks reject everything optional: a grammar that does not override [`HeaderGrammar::slash`] treats
//! `/` as an invalid character, one that does not expose parameters treats `;` the same way, and comments are
//! refused with [`HeaderError::CommentPresent`].

use tracing::trace;

use super::chars::{self, CR, DQUOTE, HTAB, SP};
use super::parameter::{ParameterBuilder, ParameterKind};
use super::Scanner;
use crate::error::HeaderError;
use crate::utils::ensure;
use crate::value::ParameterName;

/// Header values longer than this are rejected before any scanning.
pub const MAX_HEADER_VALUE_BYTES: usize = 8 * 1024;

/// What the driver does after a hook returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Keep dispatching on the next character.
    Continue,
    /// The current value is complete and another one starts here.
    NextValue,
    /// The hook produced a complete value on its own (a comment standing in for a value).
    Produced,
}

/// Per-header-type reactions to the events of the parsing loop.
pub(crate) trait HeaderGrammar: Sized {
    type Output;

    /// Names the value in `Missing ...` errors.
    const LABEL: &'static str;

    fn allow_multiple_values(&self) -> bool {
        false
    }

    fn is_value_start(&self, c: char) -> bool {
        c == DQUOTE || chars::is_tchar(c)
    }

    /// Whether `\` escapes characters in quoted parameter values.
    fn escaping_supported(&self) -> bool {
        true
    }

    /// A `*` that is not the first character of a longer token.
    fn wildcard_value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        Err(scanner.invalid_character())
    }

    /// Reads a value starting at the cursor.
    fn value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError>;

    /// The value and its trailing parameters are done.
    fn value_complete(&mut self, scanner: &Scanner<'_>) -> Result<(), HeaderError>;

    /// A value was required but the text ended or a separator came first.
    fn missing_value(&self, scanner: &Scanner<'_>) -> HeaderError {
        scanner.missing(Self::LABEL)
    }

    /// Builds the result once the whole text was consumed.
    fn finish(self, scanner: &Scanner<'_>) -> Result<Self::Output, HeaderError>;

    /// The parameter collector, `None` for grammars without parameters.
    fn parameters(&mut self) -> Option<&mut ParameterBuilder> {
        None
    }

    fn parameter_kind(&self, name: &ParameterName) -> ParameterKind {
        if name.is_extended() { ParameterKind::Extended } else { ParameterKind::Text }
    }

    fn parameter_name(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        let start = scanner.position();
        let name = scanner.token(chars::is_tchar);
        if name.is_empty() {
            return Err(scanner.missing("parameter name"));
        }
        let Some(parameters) = self.parameters() else {
            return Err(scanner.invalid_character_at(start));
        };
        parameters.begin(ParameterName::from_token(name));
        Ok(())
    }

    fn quoted_parameter_value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        let name = pending_parameter(self, scanner)?;
        let kind = self.parameter_kind(&name);
        let raw = if self.escaping_supported() {
            scanner.quoted_text(chars::is_qdtext, true)?
        } else {
            scanner.quoted_text(chars::is_qdtext_or_backslash, false)?
        };
        let value = kind.coerce(&name, raw)?;
        if let Some(parameters) = self.parameters() {
            parameters.complete(value);
        }
        Ok(())
    }

    fn unquoted_parameter_value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        let name = pending_parameter(self, scanner)?;
        let value = match self.parameter_kind(&name) {
            ParameterKind::Extended => scanner.encoded_text()?.into(),
            kind => {
                let raw = scanner.required_token(chars::is_tchar, "parameter value")?;
                kind.coerce(&name, raw.to_string())?
            }
        };
        if let Some(parameters) = self.parameters() {
            parameters.complete(value);
        }
        Ok(())
    }

    /// A parameter name without `=`.
    fn parameter_without_value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
        Err(scanner.missing("parameter value"))
    }

    fn whitespace(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        scanner.skip_whitespace()?;
        Ok(Flow::Continue)
    }

    /// `;`: by default starts a parameter. A `;` with nothing after it is ignored.
    fn token_separator(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        ensure!(self.parameters().is_some(), scanner.invalid_character());
        scanner.advance();
        scanner.skip_whitespace()?;
        if matches!(scanner.peek(), None | Some(';' | ',')) {
            return Ok(Flow::Continue);
        }
        self.parameter_name(scanner)?;
        scanner.skip_whitespace()?;
        if scanner.consume('=') {
            scanner.skip_whitespace()?;
            if scanner.peek() == Some(DQUOTE) {
                self.quoted_parameter_value(scanner)?;
            } else {
                self.unquoted_parameter_value(scanner)?;
            }
        } else {
            self.parameter_without_value(scanner)?;
        }
        Ok(Flow::Continue)
    }

    /// `=` outside of a parameter.
    fn key_value_separator(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        Err(scanner.invalid_character())
    }

    /// `,`: the next list element starts, if the header is a list.
    fn multi_value_separator(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        ensure!(self.allow_multiple_values(), scanner.invalid_character());
        scanner.advance();
        Ok(Flow::NextValue)
    }

    fn slash(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        Err(scanner.invalid_character())
    }

    /// `(`: rejected unless the grammar accepts comments.
    fn comment(&mut self, scanner: &mut Scanner<'_>) -> Result<Flow, HeaderError> {
        Err(HeaderError::comment_present(scanner.position(), scanner.text()))
    }
}

fn pending_parameter<G: HeaderGrammar>(grammar: &mut G, scanner: &Scanner<'_>) -> Result<ParameterName, HeaderError> {
    grammar.parameters().and_then(|parameters| parameters.pending().cloned()).ok_or_else(|| scanner.invalid_character())
}

/// Parses `text` with `grammar`.
///
/// # Errors
///
/// Returns the first error found. Nothing is returned for a partially valid value.
pub(crate) fn parse<G: HeaderGrammar>(mut grammar: G, text: &str) -> Result<G::Output, HeaderError> {
    ensure!(text.len() <= MAX_HEADER_VALUE_BYTES, HeaderError::too_large(text.len(), MAX_HEADER_VALUE_BYTES));
    trace!(grammar = G::LABEL, len = text.len(), "parsing header value");

    let mut scanner = Scanner::new(text);
    let mut values = 0usize;
    loop {
        start_value(&mut grammar, &mut scanner)?;
        let more = trailer(&mut grammar, &mut scanner)?;
        grammar.value_complete(&scanner)?;
        values += 1;
        if !more {
            break;
        }
    }

    trace!(grammar = G::LABEL, values, "parsed header value");
    grammar.finish(&scanner)
}

/// Dispatches until a value has been read.
fn start_value<G: HeaderGrammar>(grammar: &mut G, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
    loop {
        let Some(c) = scanner.peek() else {
            return Err(grammar.missing_value(scanner));
        };
        match c {
            SP | HTAB | CR => {
                scanner.skip_whitespace()?;
            }
            '*' if !scanner.peek_second().is_some_and(chars::is_tchar) => return grammar.wildcard_value(scanner),
            '(' => {
                let position = scanner.position();
                if grammar.comment(scanner)? == Flow::Produced {
                    return Ok(());
                }
                ensure!(scanner.position() > position, scanner.invalid_character());
            }
            '/' => {
                grammar.slash(scanner)?;
                return Ok(());
            }
            c if grammar.is_value_start(c) => return grammar.value(scanner),
            ',' | ';' => return Err(grammar.missing_value(scanner)),
            _ => return Err(scanner.invalid_character()),
        }
    }
}

/// Dispatches on the delimiters after a value.
///
/// # Returns
///
/// `true` when another value follows, `false` at the end of the text.
fn trailer<G: HeaderGrammar>(grammar: &mut G, scanner: &mut Scanner<'_>) -> Result<bool, HeaderError> {
    while let Some(c) = scanner.peek() {
        let position = scanner.position();
        let flow = match c {
            SP | HTAB | CR => grammar.whitespace(scanner)?,
            ';' => grammar.token_separator(scanner)?,
            '=' => grammar.key_value_separator(scanner)?,
            ',' => grammar.multi_value_separator(scanner)?,
            '/' => grammar.slash(scanner)?,
            '(' => grammar.comment(scanner)?,
            _ => return Err(scanner.invalid_character()),
        };
        if flow == Flow::NextValue {
            return Ok(true);
        }
        // every hook that continues has to consume input
        ensure!(scanner.position() > position, scanner.invalid_character_at(position));
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A comma separated list of tokens with parameters, used to exercise the default hooks.
    #[derive(Default)]
    struct TokenList {
        pending: Option<String>,
        parameters: ParameterBuilder,
        values: Vec<(String, usize)>,
    }

    impl HeaderGrammar for TokenList {
        type Output = Vec<(String, usize)>;
        const LABEL: &'static str = "token";

        fn allow_multiple_values(&self) -> bool {
            true
        }

        fn value(&mut self, scanner: &mut Scanner<'_>) -> Result<(), HeaderError> {
            self.pending = Some(scanner.required_token(chars::is_tchar, Self::LABEL)?.to_string());
            Ok(())
        }

        fn value_complete(&mut self, _scanner: &Scanner<'_>) -> Result<(), HeaderError> {
            if let Some(token) = self.pending.take() {
                self.values.push((token, self.parameters.take().len()));
            }
            Ok(())
        }

        fn finish(self, _scanner: &Scanner<'_>) -> Result<Self::Output, HeaderError> {
            Ok(self.values)
        }

        fn parameters(&mut self) -> Option<&mut ParameterBuilder> {
            Some(&mut self.parameters)
        }
    }

    fn tokens(text: &str) -> Result<Vec<(String, usize)>, HeaderError> {
        parse(TokenList::default(), text)
    }

    fn error(text: &str) -> String {
        tokens(text).unwrap_err().to_string()
    }

    #[test]
    fn list_with_parameters() {
        let values = tokens(" a ; x=1; y=\"2\" ,b,\r\n c;").unwrap();
        assert_eq!(values, vec![("a".to_string(), 2), ("b".to_string(), 0), ("c".to_string(), 0)]);
    }

    #[test]
    fn empty_elements_are_missing_values() {
        assert_eq!(error(""), "Missing token at 0 in \"\"");
        assert_eq!(error("a,"), "Missing token at 2 in \"a,\"");
        assert_eq!(error("a, ,b"), "Missing token at 3 in \"a, ,b\"");
        assert_eq!(error(", a"), "Missing token at 0 in \", a\"");
    }

    #[test]
    fn default_hooks_reject() {
        assert_eq!(error("a/b"), "Invalid character '/' at 1 in \"a/b\"");
        assert_eq!(error("a=b"), "Invalid character '=' at 1 in \"a=b\"");
        assert_eq!(error("*"), "Invalid character '*' at 0 in \"*\"");
        assert_eq!(error("a@"), "Invalid character '@' at 1 in \"a@\"");
        assert_eq!(error("a (c)"), "Comment present at 2 in \"a (c)\"");
        assert!(tokens("(c) a").unwrap_err().is_comment_present());
    }

    #[test]
    fn parameter_errors() {
        assert_eq!(error("a; =1"), "Missing parameter name at 3 in \"a; =1\"");
        assert_eq!(error("a; x"), "Missing parameter value at 4 in \"a; x\"");
        assert_eq!(error("a; x="), "Missing parameter value at 5 in \"a; x=\"");
        assert_eq!(error("a; x=\"1"), "Missing closing '\"' in \"a; x=\"1\"");
    }

    #[test]
    fn extended_parameters() {
        assert_eq!(tokens("a; t*=UTF-8''x%20y").unwrap(), vec![("a".to_string(), 1)]);
        assert_eq!(error("a; t*=''x"), "Missing charset at 6 in \"a; t*=''x\"");
    }

    #[test]
    fn bare_carriage_return() {
        assert_eq!(error("a\r"), "Invalid character '\\r' at 1 in \"a\r\"");
        assert_eq!(error("a\r\nb"), "Invalid character '\\r' at 1 in \"a\r\nb\"");
    }

    #[test]
    fn oversized_values() {
        let text = "a".repeat(MAX_HEADER_VALUE_BYTES + 1);
        assert!(matches!(tokens(&text), Err(HeaderError::TooLarge { current_size: 8193, max_size: 8192 })));
    }
}
