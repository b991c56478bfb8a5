//! Cursor over a header value with the lexical primitives shared by all grammars.
//!
//! The [`Scanner`] never allocates for tokens: [`Scanner::token`] hands back a slice of the original text.
//! Quoted strings, comments and extended values are copied out because their content may differ from the
//! raw text (escapes, percent-encoding).
//!
//! Whitespace handling follows RFC 9110 optional whitespace plus the obsolete line folding of RFC 9112 section
//! 5.2: `CRLF` followed by `SP` or `HTAB` counts as whitespace, any other `CR` is an invalid character.

use tracing::debug;

use super::chars::{self, CR, DQUOTE, HTAB, LF, SP};
use crate::error::HeaderError;
use crate::value::{Charset, ExtendedValue, LanguageTag};

#[derive(Debug)]
pub(crate) struct Scanner<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, position: 0 }
    }

    /// The complete header value, used in error messages.
    #[inline]
    pub(crate) fn text(&self) -> &'a str {
        self.text
    }

    /// Byte offset of the cursor.
    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.text.len()
    }

    #[inline]
    pub(crate) fn rest(&self) -> &'a str {
        &self.text[self.position..]
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character after the one under the cursor.
    pub(crate) fn peek_second(&self) -> Option<char> {
        let mut rest = self.rest().chars();
        rest.next();
        rest.next()
    }

    pub(crate) fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    /// Moves past the character under the cursor and returns it.
    pub(crate) fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Moves past `expected` if it is under the cursor.
    pub(crate) fn consume(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Moves past `expected`, failing with a `Missing {label}` error at the end of the text or an invalid
    /// character error on anything else.
    pub(crate) fn expect(&mut self, expected: char, label: &'static str) -> Result<(), HeaderError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.position += c.len_utf8();
                Ok(())
            }
            Some(_) => Err(self.invalid_character()),
            None => Err(self.missing(label)),
        }
    }

    /// Skips optional whitespace including folded lines.
    ///
    /// # Returns
    ///
    /// Whether any whitespace was skipped.
    ///
    /// # Errors
    ///
    /// A `CR` that does not start a `CRLF` fold followed by `SP` or `HTAB` is reported at its own position.
    pub(crate) fn skip_whitespace(&mut self) -> Result<bool, HeaderError> {
        let start = self.position;
        let text = self.text;
        let bytes = text.as_bytes();
        loop {
            match self.peek() {
                Some(SP | HTAB) => self.position += 1,
                Some(CR) => {
                    let folded = bytes.get(self.position + 1) == Some(&(LF as u8))
                        && matches!(bytes.get(self.position + 2), Some(&b' ' | &b'\t'));
                    if !folded {
                        return Err(self.invalid_character());
                    }
                    self.position += 3;
                }
                _ => break,
            }
        }
        Ok(self.position > start)
    }

    /// Reads the longest run of characters accepted by `predicate`, possibly empty.
    pub(crate) fn token(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !predicate(c)).unwrap_or(rest.len());
        self.position += len;
        &rest[..len]
    }

    /// Reads a non-empty token, reporting `Missing {label}` at the end of the text and an invalid character
    /// when the cursor sits on a character the token cannot start with.
    pub(crate) fn required_token(&mut self, predicate: impl Fn(char) -> bool, label: &'static str) -> Result<&'a str, HeaderError> {
        let token = self.token(predicate);
        if !token.is_empty() {
            return Ok(token);
        }
        if self.is_at_end() { Err(self.missing(label)) } else { Err(self.invalid_character()) }
    }

    /// Reads a quoted string starting at the cursor and returns its content.
    ///
    /// # Arguments
    ///
    /// * `predicate` - The characters allowed between the quotes
    /// * `escaping_supported` - Whether `\` takes the next character literally; the escaped character is not
    ///   checked against `predicate`
    ///
    /// # Errors
    ///
    /// Returns `Missing closing '"'` when the text ends inside the string and an invalid character error for
    /// any character rejected by `predicate`.
    pub(crate) fn quoted_text(&mut self, predicate: impl Fn(char) -> bool, escaping_supported: bool) -> Result<String, HeaderError> {
        self.expect(DQUOTE, "quoted string")?;
        let mut value = String::new();
        loop {
            let position = self.position;
            match self.advance() {
                None => return Err(HeaderError::missing_closing(DQUOTE, self.text)),
                Some(DQUOTE) => return Ok(value),
                Some('\\') if escaping_supported => match self.advance() {
                    Some(c) => value.push(c),
                    None => return Err(HeaderError::missing_closing(DQUOTE, self.text)),
                },
                Some(c) if predicate(c) => value.push(c),
                Some(_) => return Err(self.invalid_character_at(position)),
            }
        }
    }

    /// Reads a parenthesized comment and returns its content without the outer parentheses.
    ///
    /// Nested comments and quoted substrings are kept verbatim, escapes included.
    pub(crate) fn comment(&mut self) -> Result<String, HeaderError> {
        let mut content = String::new();
        self.scan_comment(&mut Some(&mut content))?;
        Ok(content)
    }

    /// Moves past a parenthesized comment.
    pub(crate) fn skip_comment(&mut self) -> Result<(), HeaderError> {
        self.scan_comment(&mut None)
    }

    fn scan_comment(&mut self, out: &mut Option<&mut String>) -> Result<(), HeaderError> {
        self.expect('(', "comment")?;
        // nesting level, the outer parenthesis included
        let mut depth = 1usize;
        loop {
            let position = self.position;
            match self.advance() {
                None => return Err(HeaderError::missing_closing(')', self.text)),
                Some(')') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                    push(out, ')');
                }
                Some('(') => {
                    depth += 1;
                    push(out, '(');
                }
                Some(quote @ (DQUOTE | '\'')) => {
                    push(out, quote);
                    self.scan_comment_quote(quote, out)?;
                }
                Some('\\') => {
                    push(out, '\\');
                    match self.advance() {
                        Some(c) => push(out, c),
                        None => return Err(HeaderError::missing_closing(')', self.text)),
                    }
                }
                Some(c) if chars::is_ctext(c) => push(out, c),
                Some(_) => return Err(self.invalid_character_at(position)),
            }
        }
    }

    fn scan_comment_quote(&mut self, quote: char, out: &mut Option<&mut String>) -> Result<(), HeaderError> {
        loop {
            let position = self.position;
            match self.advance() {
                None => return Err(HeaderError::missing_closing(quote, self.text)),
                Some(c) if c == quote => {
                    push(out, c);
                    return Ok(());
                }
                Some('\\') => {
                    push(out, '\\');
                    match self.advance() {
                        Some(c) => push(out, c),
                        None => return Err(HeaderError::missing_closing(quote, self.text)),
                    }
                }
                Some(c) if c == HTAB || !c.is_control() => push(out, c),
                Some(_) => return Err(self.invalid_character_at(position)),
            }
        }
    }

    /// Reads an RFC 8187 extended value `charset'[language]'value-chars`.
    ///
    /// Percent-encoded octets are decoded with the named charset. For a charset this crate cannot decode the
    /// bytes are kept and the text is left empty.
    ///
    /// # Errors
    ///
    /// * `Missing charset` when the charset field is empty
    /// * `Missing closing '''` when the language field is not terminated
    /// * an invalid character error for a broken `%HH` escape
    /// * an invalid value error when the bytes are not valid in a supported charset
    pub(crate) fn encoded_text(&mut self) -> Result<ExtendedValue, HeaderError> {
        let start = self.position;
        let charset = self.token(chars::is_mime_charset_char);
        if charset.is_empty() {
            return Err(match self.peek() {
                Some('\'') | None => self.missing("charset"),
                Some(_) => self.invalid_character(),
            });
        }
        self.expect('\'', "language")?;

        let language_start = self.position;
        let language = self.token(chars::is_language_char);
        let language = if language.is_empty() { None } else { Some(LanguageTag::from_token(language, language_start, self.text)?) };
        match self.peek() {
            Some('\'') => self.position += 1,
            Some(_) => return Err(self.invalid_character()),
            None => return Err(HeaderError::missing_closing('\'', self.text)),
        }

        let mut bytes = Vec::new();
        while let Some(c) = self.peek() {
            if chars::is_attr_char(c) {
                // attr-chars are ASCII
                bytes.push(c as u8);
                self.position += 1;
            } else if c == '%' {
                bytes.push(self.percent_escape()?);
            } else {
                break;
            }
        }

        let charset = Charset::from_token(charset);
        let text = if charset.is_supported() {
            match charset.decode(&bytes) {
                Some(text) => Some(text),
                None => {
                    return Err(HeaderError::invalid_value(format!(
                        "Invalid {charset} encoded text at {start} in \"{}\"",
                        self.text
                    )));
                }
            }
        } else {
            debug!(%charset, "keeping extended value in an unsupported charset undecoded");
            None
        };
        Ok(ExtendedValue::from_bytes(charset, language, bytes, text))
    }

    fn percent_escape(&mut self) -> Result<u8, HeaderError> {
        let percent = self.position;
        self.position += 1;
        let mut byte = 0u8;
        for _ in 0..2 {
            match self.peek().and_then(|c| c.to_digit(16)) {
                Some(digit) => {
                    byte = byte * 16 + digit as u8;
                    self.position += 1;
                }
                None if self.is_at_end() => return Err(self.invalid_character_at(percent)),
                None => return Err(self.invalid_character()),
            }
        }
        Ok(byte)
    }

    /// An invalid character error for the character under the cursor.
    pub(crate) fn invalid_character(&self) -> HeaderError {
        self.invalid_character_at(self.position)
    }

    pub(crate) fn invalid_character_at(&self, position: usize) -> HeaderError {
        match self.text[position..].chars().next() {
            Some(c) => HeaderError::invalid_character(c, position, self.text),
            None => HeaderError::missing("character", position, self.text),
        }
    }

    /// A `Missing {label}` error at the cursor.
    pub(crate) fn missing(&self, label: &'static str) -> HeaderError {
        HeaderError::missing(label, self.position, self.text)
    }
}

fn push(out: &mut Option<&mut String>, c: char) {
    if let Some(out) = out {
        out.push(c);
    }
}
