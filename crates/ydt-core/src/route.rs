//! Route shapes
//!
//! Shorts live under `/shorts/<id>`; the same video plays on the regular watch
//! page at `/watch?v=<id>`.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::url::{extract_path, query_param, strip_query_keys};

pub const SHORTS_ROUTE: &str = "/shorts";
pub const WATCH_ROUTE: &str = "/watch";
/// Canonical video-id query parameter.
pub const VIDEO_PARAM: &str = "v";
/// Value of the one-shot redirect flag when set.
pub const FLAG_VALUE: &str = "1";

/// Characters left alone by form-urlencoded serialization.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Whether `path` is the Shorts route (`/shorts` or anything below it).
pub fn is_short_route(path: &str) -> bool {
    match path.strip_prefix(SHORTS_ROUTE) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Video id of a Shorts path: the second non-empty segment, decoded.
pub fn short_video_id(path: &str) -> Option<String> {
    let segment = path.split('/').filter(|s| !s.is_empty()).nth(1)?;
    let id = percent_decode_str(segment).decode_utf8_lossy();
    if id.is_empty() {
        None
    } else {
        Some(id.into_owned())
    }
}

/// Whether the address already names a video through `v`.
/// An empty `v` does not count.
pub fn has_canonical_param(url: &str) -> bool {
    query_param(url, VIDEO_PARAM).is_some_and(|v| !v.is_empty())
}

/// Form-urlencode a query value: spaces become `+`.
fn encode_query_value(value: &str) -> String {
    value
        .split(' ')
        .map(|part| utf8_percent_encode(part, QUERY_VALUE).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// Canonical watch URL for `id`, carrying the redirect flag.
pub fn watch_url(origin: &str, id: &str, flag: &str) -> String {
    format!(
        "{}{}?{}={}&{}={}",
        origin,
        WATCH_ROUTE,
        VIDEO_PARAM,
        encode_query_value(id),
        flag,
        FLAG_VALUE
    )
}

/// Whether the redirect flag is set on `url`.
pub fn has_redirect_flag(url: &str, flag: &str) -> bool {
    query_param(url, flag).as_deref() == Some(FLAG_VALUE)
}

/// `url` with every occurrence of the redirect flag removed.
pub fn strip_redirect_flag(url: &str, flag: &str) -> Option<String> {
    strip_query_keys(url, &[flag])
}

/// Whether a full address points at the Shorts route.
pub fn is_short_url(url: &str) -> bool {
    is_short_route(extract_path(url))
}
