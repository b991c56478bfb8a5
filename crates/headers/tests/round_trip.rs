use http::HeaderValue;
use micro_headers::{
    Accept, AcceptCharset, AcceptEncoding, AcceptLanguage, CacheControl, ContentDisposition, ContentEncoding, ContentRange, Cookies,
    EntityTag, HeaderError, IfMatch, IfNoneMatch, Link, MAX_HEADER_VALUE_BYTES, MediaType, ParameterName, QualityFactor, Range, Server,
    SetCookie, TypedHeader, UserAgent, parse_accept, parse_accept_charset, parse_content_disposition, parse_content_range,
    parse_content_type, parse_entity_tag,
};

fn assert_round_trip<H: TypedHeader + PartialEq + std::fmt::Debug>(text: &str) {
    let parsed = H::decode(&HeaderValue::from_str(text).unwrap()).unwrap();
    let encoded = parsed.encode().unwrap();
    let reparsed = H::decode(&encoded).unwrap();
    assert_eq!(reparsed, parsed, "{} value {text:?} rendered as {encoded:?}", H::NAME);
}

#[test]
fn rendered_values_parse_back() {
    assert_round_trip::<Accept>("text/html, application/xhtml+xml, application/xml;q=0.9, */*;q=0.8");
    assert_round_trip::<AcceptCharset>("utf-8, iso-8859-1;q=0.5, *;q=0.1");
    assert_round_trip::<AcceptEncoding>("gzip;q=1.0, identity; q=0.5, *;q=0");
    assert_round_trip::<AcceptLanguage>("da, en-gb;q=0.8, en;q=0.7");
    assert_round_trip::<CacheControl>("max-age=3600, no-cache=\"Set-Cookie, Authorization\", private, x-ext=\"a b\"");
    assert_round_trip::<ContentDisposition>("form-data; name=\"upload\"; filename*=UTF-8'en'%C2%A3%20rates.txt; size=12");
    assert_round_trip::<ContentEncoding>("gzip, br");
    assert_round_trip::<ContentRange>("bytes 21010-47021/47022");
    assert_round_trip::<Cookies>("SID=31d4d96e407aad42; lang=en-US; theme=\"dark\"");
    assert_round_trip::<EntityTag>("W/\"67ab43\"");
    assert_round_trip::<EntityTag>("*");
    assert_round_trip::<IfMatch>("\"xyzzy\", \"r2d2xxxx\"");
    assert_round_trip::<IfNoneMatch>("*");
    assert_round_trip::<Link>("<https://example.com/a>; rel=\"next\"; title*=UTF-8'de'n%c3%a4chstes, </b>; rel=prev");
    assert_round_trip::<MediaType>("multipart/form-data; boundary=\"----WebKit Form\"");
    assert_round_trip::<Range>("bytes=0-499, 1000-, -200");
    assert_round_trip::<Server>("Apache/2.4.1 (Unix)");
    assert_round_trip::<SetCookie>("id=a3fWa; Expires=Thu, 21 Oct 2021 07:28:00 GMT; Domain=example.com; Secure; SameSite=Lax");
    assert_round_trip::<UserAgent>("curl/8.4.0");
}

#[test]
fn folded_whitespace_does_not_change_results() {
    let plain = parse_accept_charset("utf-8; q=0.5, utf-16; q=0.75").unwrap();
    let folded = parse_accept_charset("utf-8;\r\n q=0.5,\r\n\tutf-16;\r\n q=0.75").unwrap();
    assert_eq!(plain, folded);

    let plain = parse_content_disposition("attachment; filename=a.txt").unwrap();
    let folded = parse_content_disposition("attachment;\r\n filename=a.txt").unwrap();
    assert_eq!(plain, folded);
}

#[test]
fn trailing_semicolon_is_ignored() {
    assert_eq!(parse_accept_charset("utf-8;").unwrap(), parse_accept_charset("utf-8").unwrap());
    assert_eq!(parse_content_type("text/plain ; ").unwrap(), MediaType::TEXT_PLAIN);
}

#[test]
fn oversized_values_are_rejected_up_front() {
    let text = format!("text/plain; x=\"{}\"", "a".repeat(MAX_HEADER_VALUE_BYTES));
    let err = parse_content_type(&text).unwrap_err();
    assert!(matches!(err, HeaderError::TooLarge { .. }));
    assert_eq!(err.to_string(), format!("header value size too large, current: {} exceed the limit 8192", text.len()));
}

#[test]
fn boundary_values_stay_within_limits() {
    let nested = format!("text/html {}{}, */*;q=0.1", "(".repeat(4000), ")".repeat(4000));
    assert!(nested.len() < MAX_HEADER_VALUE_BYTES);
    let any = MediaType::STAR_STAR.with_parameter(ParameterName::Q, QualityFactor::new(0.1).unwrap());
    assert_eq!(parse_accept(&nested).unwrap(), vec![MediaType::TEXT_HTML, any]);

    let range = parse_content_range("bytes 0-18446744073709551615/*").unwrap();
    assert_eq!(range.len(), None);
    assert_eq!(parse_entity_tag("*").unwrap(), EntityTag::ANY);
}

#[test]
fn errors_report_the_whole_value() {
    let err = parse_content_type("text/html; charset=\"UTF-8").unwrap_err();
    assert_eq!(err.to_string(), "Missing closing '\"' in \"text/html; charset=\"UTF-8\"");
    assert_eq!(err.position(), None);

    let err = parse_accept_charset("utf-8, , utf-16").unwrap_err();
    assert_eq!(err.to_string(), "Missing charset at 7 in \"utf-8, , utf-16\"");
}

#[cfg(feature = "serde")]
#[test]
fn serde_uses_header_text() {
    let media_type = parse_content_type("application/json; charset=utf-8").unwrap();
    let json = serde_json::to_string(&media_type).unwrap();
    assert_eq!(json, "\"application/json; charset=utf-8\"");
    assert_eq!(serde_json::from_str::<MediaType>(&json).unwrap(), media_type);
    assert!(serde_json::from_str::<MediaType>("\"text\"").is_err());
}
