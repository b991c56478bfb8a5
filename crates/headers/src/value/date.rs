//! HTTP dates for `Expires`, the `*-date` disposition parameters and similar fields.
//!
//! Parsing accepts the three formats of RFC 9110 section 5.6.7 through `httpdate`, plus the RFC 5322 form with
//! a numeric zone (`Wed, 12 Feb 1997 16:29:51 -0500`) that MIME bodies still carry. Rendering always uses the
//! IMF-fixdate form in GMT.

use std::time::{Duration, SystemTime};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DateError {
    #[error(transparent)]
    Format(#[from] httpdate::Error),

    #[error("date is out of range")]
    OutOfRange,
}

/// Parses an HTTP date.
///
/// # Errors
///
/// Returns an error if `text` matches none of the accepted formats.
pub(crate) fn parse_http_date(text: &str) -> Result<SystemTime, DateError> {
    if let Some((local, offset)) = split_zone_offset(text) {
        let local = httpdate::parse_http_date(&format!("{local} GMT"))?;
        let shifted = if offset.is_negative() {
            local.checked_add(Duration::from_secs(offset.unsigned_abs()))
        } else {
            local.checked_sub(Duration::from_secs(offset.unsigned_abs()))
        };
        return shifted.ok_or(DateError::OutOfRange);
    }
    Ok(httpdate::parse_http_date(text)?)
}

/// Renders `time` as an IMF-fixdate.
pub(crate) fn format_http_date(time: SystemTime) -> String {
    httpdate::fmt_http_date(time)
}

/// Splits `... HH:MM:SS +hhmm` into the local part and the zone offset in seconds east of UTC.
fn split_zone_offset(text: &str) -> Option<(&str, i64)> {
    let (local, zone) = text.rsplit_once(' ')?;
    let (sign, digits) = match zone.as_bytes() {
        [b'+', digits @ ..] => (1, digits),
        [b'-', digits @ ..] => (-1, digits),
        _ => return None,
    };
    if digits.len() != 4 || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let hours = i64::from(digits[0] - b'0') * 10 + i64::from(digits[1] - b'0');
    let minutes = i64::from(digits[2] - b'0') * 10 + i64::from(digits[3] - b'0');
    if minutes >= 60 {
        return None;
    }
    Some((local, sign * (hours * 3600 + minutes * 60)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    // Wed, 12 Feb 1997 21:29:51 GMT
    const FEB_12_1997: u64 = 855_782_991;

    #[test]
    fn parse_gmt() {
        let time = parse_http_date("Wed, 12 Feb 1997 21:29:51 GMT").unwrap();
        assert_eq!(time, UNIX_EPOCH + Duration::from_secs(FEB_12_1997));
    }

    #[test]
    fn parse_numeric_zone() {
        let time = parse_http_date("Wed, 12 Feb 1997 16:29:51 -0500").unwrap();
        assert_eq!(time, UNIX_EPOCH + Duration::from_secs(FEB_12_1997));

        let time = parse_http_date("Wed, 12 Feb 1997 22:59:51 +0130").unwrap();
        assert_eq!(time, UNIX_EPOCH + Duration::from_secs(FEB_12_1997));
    }

    #[test]
    fn format_is_imf_fixdate() {
        let text = format_http_date(UNIX_EPOCH + Duration::from_secs(FEB_12_1997));
        assert_eq!(text, "Wed, 12 Feb 1997 21:29:51 GMT");
    }

    #[test]
    fn invalid_dates() {
        assert!(parse_http_date("yesterday").is_err());
        assert!(parse_http_date("Wed, 12 Feb 1997 16:29:51 -05").is_err());
        assert!(parse_http_date("Wed, 12 Feb 1997 16:29:51 +0575").is_err());
    }
}
