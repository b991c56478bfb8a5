//! Character classes used by the header grammars.
//!
//! Every predicate takes a `char` so it can be handed straight to [`Scanner::token`](super::Scanner::token)
//! and [`Scanner::quoted_text`](super::Scanner::quoted_text). Characters outside ASCII only ever match the
//! `obs-text` based classes (`qdtext`, `ctext`, `etagc`).

/// SP: US-ASCII space (32)
pub(crate) const SP: char = ' ';

/// HTAB: US-ASCII horizontal tab (9)
pub(crate) const HTAB: char = '\t';

/// CR: US-ASCII carriage return (13)
pub(crate) const CR: char = '\r';

/// LF: US-ASCII line feed (10)
pub(crate) const LF: char = '\n';

/// DQUOTE: US-ASCII double quote (34)
pub(crate) const DQUOTE: char = '"';

/// ALPHA: `A-Z / a-z`
#[inline]
pub(crate) fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// DIGIT: `0-9`
#[inline]
pub(crate) fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
pub(crate) fn is_alphanumeric(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// OWS members: SP and HTAB. CR is handled by the scanner because it only counts as part of a fold.
#[inline]
pub(crate) fn is_whitespace(c: char) -> bool {
    c == SP || c == HTAB
}

/// obs-text: `%x80-FF`, widened to any non-ASCII character since the input is already decoded.
#[inline]
pub(crate) fn is_obs_text(c: char) -> bool {
    !c.is_ascii()
}

/// VCHAR: visible US-ASCII `%x21-7E`.
#[inline]
pub(crate) fn is_vchar(c: char) -> bool {
    c.is_ascii_graphic()
}

/// tchar from RFC 9110 section 5.6.2:
///
/// ```text
/// tchar = "!" / "#" / "$" / "%" / "&" / "'" / "*" / "+" / "-" / "." /
///         "^" / "_" / "`" / "|" / "~" / DIGIT / ALPHA
/// ```
#[inline]
pub(crate) fn is_tchar(c: char) -> bool {
    is_alphanumeric(c) || matches!(c, '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' | '^' | '_' | '`' | '|' | '~')
}

/// qdtext: `HTAB / SP / %x21 / %x23-5B / %x5D-7E / obs-text`.
#[inline]
pub(crate) fn is_qdtext(c: char) -> bool {
    is_whitespace(c) || c == '!' || ('#'..='[').contains(&c) || (']'..='~').contains(&c) || is_obs_text(c)
}

/// qdtext that also admits the backslash, for grammars where `\` is an ordinary character.
#[inline]
pub(crate) fn is_qdtext_or_backslash(c: char) -> bool {
    is_qdtext(c) || c == '\\'
}

/// ctext: `HTAB / SP / %x21-27 / %x2A-5B / %x5D-7E / obs-text`.
#[inline]
pub(crate) fn is_ctext(c: char) -> bool {
    is_whitespace(c) || ('!'..='\'').contains(&c) || ('*'..='[').contains(&c) || (']'..='~').contains(&c) || is_obs_text(c)
}

/// attr-char from RFC 8187, the characters that appear unencoded in an extended value.
#[inline]
pub(crate) fn is_attr_char(c: char) -> bool {
    is_alphanumeric(c) || matches!(c, '!' | '#' | '$' | '&' | '+' | '-' | '.' | '^' | '_' | '`' | '|' | '~')
}

/// mime-charset chars from RFC 2978.
#[inline]
pub(crate) fn is_mime_charset_char(c: char) -> bool {
    is_alphanumeric(c) || matches!(c, '!' | '#' | '$' | '%' | '&' | '+' | '-' | '^' | '_' | '`' | '{' | '}' | '~')
}

/// Language-Tag characters (RFC 5646): letters, digits and the subtag separator.
#[inline]
pub(crate) fn is_language_char(c: char) -> bool {
    is_alphanumeric(c) || c == '-'
}

/// cookie-octet from RFC 6265: `%x21 / %x23-2B / %x2D-3A / %x3C-5B / %x5D-7E`.
#[inline]
pub(crate) fn is_cookie_octet(c: char) -> bool {
    c == '!' || ('#'..='+').contains(&c) || ('-'..=':').contains(&c) || ('<'..='[').contains(&c) || (']'..='~').contains(&c)
}

/// av-octet from RFC 6265: any CHAR except CTLs or `;`.
#[inline]
pub(crate) fn is_cookie_attribute_char(c: char) -> bool {
    c.is_ascii() && !c.is_ascii_control() && c != ';'
}

/// etagc: `%x21 / %x23-7E / obs-text`.
#[inline]
pub(crate) fn is_etagc(c: char) -> bool {
    c == '!' || ('#'..='~').contains(&c) || is_obs_text(c)
}

/// Characters accepted inside a `<URI-reference>` of a Link header.
#[inline]
pub(crate) fn is_uri_char(c: char) -> bool {
    is_vchar(c) && c != '<' && c != '>'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_chars() {
        assert!("gzip".chars().all(is_tchar));
        assert!("x-custom_1.0~".chars().all(is_tchar));
        for c in ['(', ')', ',', '/', ':', ';', '<', '=', '>', '?', '@', '[', '\\', ']', '{', '}', '"', ' ', '\t'] {
            assert!(!is_tchar(c), "{c:?} must not be a tchar");
        }
    }

    #[test]
    fn quoted_text_chars() {
        assert!(is_qdtext(' '));
        assert!(is_qdtext('ü'));
        assert!(!is_qdtext('"'));
        assert!(!is_qdtext('\\'));
        assert!(is_qdtext_or_backslash('\\'));
        assert!(!is_qdtext('\r'));
    }

    #[test]
    fn comment_chars() {
        assert!(is_ctext('a'));
        assert!(!is_ctext('('));
        assert!(!is_ctext(')'));
        assert!(!is_ctext('\\'));
    }

    #[test]
    fn cookie_octets() {
        assert!("abc123!#$%&'()*+-./:<=>?@[]^_`{|}~".chars().all(is_cookie_octet));
        for c in [' ', '"', ',', ';', '\\'] {
            assert!(!is_cookie_octet(c), "{c:?} must not be a cookie-octet");
        }
    }

    #[test]
    fn attr_chars() {
        assert!("UTF-8".chars().all(is_attr_char));
        assert!(!is_attr_char('%'));
        assert!(!is_attr_char('\''));
        assert!(!is_attr_char('*'));
    }
}
