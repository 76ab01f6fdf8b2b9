//! Address slicing
//!
//! `location.href` is always absolute, so the helpers here cut it into
//! origin, path, query and fragment by position instead of running a full
//! URL parser. Slices borrow from the input; only rewrites allocate.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

const AUTHORITY_END: [char; 3] = ['/', '?', '#'];
const PATH_END: [char; 2] = ['?', '#'];

/// Byte offset where the host begins, i.e. just past `scheme://`.
/// `None` for relative addresses.
fn authority_start(url: &str) -> Option<usize> {
    let sep = url.find("://")?;
    let scheme = &url[..sep];
    let valid = scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(sep + 3)
}

/// `https://host[:port]` of an absolute address, or `""`.
pub fn extract_origin(url: &str) -> &str {
    let Some(start) = authority_start(url) else {
        return "";
    };
    match url[start..].find(AUTHORITY_END) {
        Some(len) => &url[..start + len],
        None => url,
    }
}

/// Path of an address, `/` when it has none. Relative addresses are read
/// from their first byte.
pub fn extract_path(url: &str) -> &str {
    let rest = match authority_start(url) {
        Some(start) => match url[start..].find(AUTHORITY_END) {
            Some(len) => &url[start + len..],
            None => return "/",
        },
        None => url,
    };
    let path = rest.find(PATH_END).map_or(rest, |end| &rest[..end]);
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

/// `(address, "#fragment")`; the second half is empty without a `#`.
fn split_fragment(url: &str) -> (&str, &str) {
    match url.find('#') {
        Some(hash) => url.split_at(hash),
        None => (url, ""),
    }
}

/// Raw query between `?` and the fragment.
pub fn extract_query(url: &str) -> &str {
    let (head, _) = split_fragment(url);
    head.split_once('?').map_or("", |(_, query)| query)
}

/// Decode a form-encoded query component.
fn decode_component(raw: &str) -> Cow<'_, str> {
    if raw.contains('+') {
        let spaced = raw.replace('+', " ");
        Cow::Owned(percent_decode_str(&spaced).decode_utf8_lossy().into_owned())
    } else {
        percent_decode_str(raw).decode_utf8_lossy()
    }
}

fn split_pair(pair: &str) -> (&str, &str) {
    match pair.find('=') {
        Some(eq_pos) => (&pair[..eq_pos], &pair[eq_pos + 1..]),
        None => (pair, ""),
    }
}

/// First value for `key`, decoded. Mirrors `URLSearchParams.get`.
pub fn query_param(url: &str, key: &str) -> Option<String> {
    extract_query(url)
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(split_pair)
        .find(|(k, _)| decode_component(k) == key)
        .map(|(_, v)| decode_component(v).into_owned())
}

/// Drop every query pair whose decoded key is in `keys`, keeping the others
/// byte-for-byte along with the fragment. `None` when nothing matched.
pub fn strip_query_keys(url: &str, keys: &[&str]) -> Option<String> {
    let (head, fragment) = split_fragment(url);
    let (base, query) = head.split_once('?')?;
    let listed = |pair: &str| {
        let key = decode_component(split_pair(pair).0);
        keys.iter().any(|k| key == *k)
    };
    if !query.split('&').any(listed) {
        return None;
    }

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty() && !listed(*pair))
        .collect();
    let mut out = String::with_capacity(url.len());
    out.push_str(base);
    if !kept.is_empty() {
        out.push('?');
        out.push_str(&kept.join("&"));
    }
    out.push_str(fragment);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_origin() {
        assert_eq!(
            extract_origin("https://www.youtube.com/shorts/abc"),
            "https://www.youtube.com"
        );
        assert_eq!(
            extract_origin("https://m.youtube.com:8443?x=1"),
            "https://m.youtube.com:8443"
        );
        assert_eq!(extract_origin("https://www.youtube.com"), "https://www.youtube.com");
        assert_eq!(extract_origin("/watch?v=1"), "");
        assert_eq!(extract_origin("/watch?next=https://example.com/"), "");
    }

    #[test]
    fn test_extract_path() {
        assert_eq!(extract_path("https://www.youtube.com/shorts/abc?feature=share"), "/shorts/abc");
        assert_eq!(extract_path("https://www.youtube.com/"), "/");
        assert_eq!(extract_path("https://www.youtube.com"), "/");
        assert_eq!(extract_path("https://www.youtube.com?query"), "/");
        assert_eq!(extract_path("https://www.youtube.com#top"), "/");
        assert_eq!(extract_path("/watch?v=abc"), "/watch");
        assert_eq!(extract_path("?v=abc"), "/");
    }

    #[test]
    fn test_extract_query() {
        assert_eq!(extract_query("https://x.com/watch?v=a&t=1#frag"), "v=a&t=1");
        assert_eq!(extract_query("https://x.com/watch#frag?no"), "");
        assert_eq!(extract_query("https://x.com/watch"), "");
    }

    #[test]
    fn test_query_param() {
        let url = "https://www.youtube.com/watch?v=abc123&ydt_pause=1&q=a+b%21";
        assert_eq!(query_param(url, "v").as_deref(), Some("abc123"));
        assert_eq!(query_param(url, "ydt_pause").as_deref(), Some("1"));
        assert_eq!(query_param(url, "q").as_deref(), Some("a b!"));
        assert_eq!(query_param(url, "missing"), None);
        assert_eq!(query_param("https://x.com/?v=", "v").as_deref(), Some(""));
        assert_eq!(query_param("https://x.com/?v&v=2", "v").as_deref(), Some(""));
    }

    #[test]
    fn test_strip_query_keys() {
        assert_eq!(
            strip_query_keys("https://x.com/watch?v=abc123&ydt_pause=1", &["ydt_pause"]).as_deref(),
            Some("https://x.com/watch?v=abc123")
        );
        assert_eq!(
            strip_query_keys("https://x.com/watch?ydt_pause=1#t=3", &["ydt_pause"]).as_deref(),
            Some("https://x.com/watch#t=3")
        );
        assert_eq!(
            strip_query_keys("https://x.com/watch?ydt_pause=1&v=a&t=9s#c", &["ydt_pause"]).as_deref(),
            Some("https://x.com/watch?v=a&t=9s#c")
        );
        assert_eq!(strip_query_keys("https://x.com/watch?v=a", &["ydt_pause"]), None);
        assert_eq!(strip_query_keys("https://x.com/watch", &["ydt_pause"]), None);
        assert_eq!(strip_query_keys("https://x.com/watch#a?ydt_pause=1", &["ydt_pause"]), None);
        assert_eq!(
            strip_query_keys("https://x.com/watch?ydt_pause=1&&v=a&ydt_pause=1", &["ydt_pause"]).as_deref(),
            Some("https://x.com/watch?v=a")
        );
    }
}
