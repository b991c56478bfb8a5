/// A header value to benchmark.
#[derive(Debug, Copy, Clone)]
pub struct Sample {
    name: &'static str,
    shape: Shape,
    header: Header,
    value: &'static str,
}

impl Sample {
    pub const fn new(name: &'static str, shape: Shape, header: Header, value: &'static str) -> Self {
        Self { name, shape, header, value }
    }

    pub const fn token(name: &'static str, header: Header, value: &'static str) -> Self {
        Self::new(name, Shape::Token, header, value)
    }

    pub const fn parameterized(name: &'static str, header: Header, value: &'static str) -> Self {
        Self::new(name, Shape::Parameterized, header, value)
    }

    pub const fn list(name: &'static str, header: Header, value: &'static str) -> Self {
        Self::new(name, Shape::List, header, value)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn value(&self) -> &'static str {
        self.value
    }
}

/// How much structure a sample carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// A single token, the fast path.
    Token,
    /// One value with parameters, quoted strings or extended values.
    Parameterized,
    /// A comma separated list that gets sorted by quality.
    List,
}

/// The header grammar a sample is parsed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Header {
    Accept,
    AcceptEncoding,
    AcceptLanguage,
    CacheControl,
    ContentDisposition,
    ContentType,
    Cookie,
    SetCookie,
    Link,
    UserAgent,
}

pub static SAMPLES: [Sample; 12] = [
    Sample::token("content_type_plain", Header::ContentType, "application/json"),
    Sample::token("cache_control_no_store", Header::CacheControl, "no-store"),
    Sample::parameterized("content_type_charset", Header::ContentType, "text/html; charset=\"UTF-8\""),
    Sample::parameterized(
        "content_disposition_extended",
        Header::ContentDisposition,
        "attachment; filename=\"EURO rates\"; filename*=utf-8''%e2%82%ac%20rates",
    ),
    Sample::parameterized(
        "set_cookie_attributes",
        Header::SetCookie,
        "SID=31d4d96e407aad42; Expires=Wed, 21 Oct 2015 07:28:00 GMT; Path=/; Secure; HttpOnly; SameSite=Lax",
    ),
    Sample::list(
        "accept_browser",
        Header::Accept,
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
    ),
    Sample::list("accept_encoding", Header::AcceptEncoding, "gzip, deflate, br, zstd;q=0.9, *;q=0.1"),
    Sample::list("accept_language", Header::AcceptLanguage, "fr-CH, fr;q=0.9, en;q=0.8, de;q=0.7, *;q=0.5"),
    Sample::list("cache_control_response", Header::CacheControl, "public, max-age=31536000, immutable, stale-if-error=86400"),
    Sample::list("cookie_session", Header::Cookie, "SID=31d4d96e407aad42; lang=en-US; theme=\"dark\"; _ga=GA1.2.1234567890.1234567890"),
    Sample::list(
        "link_pagination",
        Header::Link,
        "<https://api.example.com/items?page=2>; rel=\"next\", <https://api.example.com/items?page=34>; rel=\"last\"",
    ),
    Sample::list(
        "user_agent_browser",
        Header::UserAgent,
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36",
    ),
];
