use http::{HeaderMap, HeaderValue};
use micro_headers::{Accept, AcceptLanguage, ContentDisposition, HeaderError, LanguageTag, MediaType, SetCookie, TypedHeader};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut headers = HeaderMap::new();
    headers.insert(Accept::NAME, HeaderValue::from_static("text/html;q=0.8, application/json, */*;q=0.1"));
    headers.insert(AcceptLanguage::NAME, HeaderValue::from_static("fr-CH, fr;q=0.9, en;q=0.8, *;q=0.5"));
    headers.insert(ContentDisposition::NAME, HeaderValue::from_static("attachment; filename*=UTF-8''%E2%82%AC%20rates.csv"));
    headers.insert(SetCookie::NAME, HeaderValue::from_static("id=a3fWa; Max-Age=2592000; Secure; SameSite=Lax"));
    headers.insert(MediaType::NAME, HeaderValue::from_static("text/html; charset=\"UTF-8"));

    match decode::<Accept>(&headers) {
        Ok(Some(accept)) => {
            let chosen = accept.find_match(&MediaType::APPLICATION_JSON);
            info!(accept = %accept, chosen = ?chosen.map(ToString::to_string), "negotiated media type");
        }
        Ok(None) => warn!("no accept header"),
        Err(e) => error!(cause = %e, "invalid accept header"),
    }

    if let Ok(Some(languages)) = decode::<AcceptLanguage>(&headers) {
        let available: Vec<LanguageTag> = ["de", "en-US"].into_iter().filter_map(|tag| LanguageTag::new(tag).ok()).collect();
        info!(language = ?languages.negotiate(&available).map(LanguageTag::as_str), "negotiated language");
    }

    if let Ok(Some(disposition)) = decode::<ContentDisposition>(&headers) {
        info!(filename = ?disposition.filename(), rendered = %disposition, "content disposition");
    }

    if let Ok(Some(set_cookie)) = decode::<SetCookie>(&headers) {
        info!(name = %set_cookie.cookie().name(), max_age = ?set_cookie.max_age(), "set cookie");
    }

    if let Err(e) = decode::<MediaType>(&headers) {
        error!(cause = %e, position = ?e.position(), "invalid content type");
    }
}

fn decode<H: TypedHeader>(headers: &HeaderMap) -> Result<Option<H>, HeaderError> {
    headers.get(H::NAME).map(H::decode).transpose()
}
