// crates/storyreel-core/src/helpers/youtube.rs
//
// Third-party video host recognition and id extraction.
//
// Supported source shapes:
//   https://youtu.be/<id>                      short link, id is the first path segment
//   https://www.youtube.com/watch?v=<id>       full host, `v` query parameter
//   https://www.youtube.com/embed/<id>         embed path segment
//   https://www.youtube.com/shorts/<id>        shorts path segment
//   https://www.youtube-nocookie.com/embed/<id>
//
// Scheme is optional, `www.` / `m.` / `music.` prefixes are ignored, and the
// fragment is dropped before anything is inspected.

/// Hosts whose URLs are embedded rather than played natively.
const FULL_HOSTS:  [&str; 2] = ["youtube.com", "youtube-nocookie.com"];
const SHORT_HOSTS: [&str; 1] = ["youtu.be"];

struct SplitUrl<'a> {
    host:  String,
    path:  &'a str,
    query: &'a str,
}

fn split_url(url: &str) -> Option<SplitUrl<'_>> {
    let url = url.trim();
    let url = url.split('#').next().unwrap_or(url);
    let rest = match url.find("://") {
        Some(i) => &url[i + 3..],
        None    => url.strip_prefix("//").unwrap_or(url),
    };
    let host_end = rest.find(['/', '?']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(host_end);
    // Drop credentials and port.
    let host = authority.rsplit('@').next().unwrap_or(authority);
    let host = host.split(':').next().unwrap_or(host).to_ascii_lowercase();
    if host.is_empty() {
        return None;
    }
    let host = match ["www.", "m.", "music."].iter().find(|p| host.starts_with(**p)) {
        Some(prefix) => host[prefix.len()..].to_string(),
        None         => host,
    };

    let (path, query) = match tail.find('?') {
        Some(i) => (&tail[..i], &tail[i + 1..]),
        None    => (tail, ""),
    };
    Some(SplitUrl { host, path, query })
}

fn valid_id(candidate: &str) -> Option<String> {
    let ok = !candidate.is_empty()
        && candidate.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    ok.then(|| candidate.to_string())
}

/// True when `url` points at a recognised third-party video host.
///
/// Used by the classifier to reclassify `type: "video"` records that were
/// given a YouTube link instead of a file.
pub fn is_third_party_host(url: &str) -> bool {
    split_url(url)
        .map(|u| FULL_HOSTS.contains(&u.host.as_str()) || SHORT_HOSTS.contains(&u.host.as_str()))
        .unwrap_or(false)
}

/// Extract the video id from any supported URL shape.
///
/// ```
/// use storyreel_core::helpers::youtube::extract_video_id;
/// assert_eq!(extract_video_id("https://youtu.be/abc123").as_deref(), Some("abc123"));
/// assert_eq!(extract_video_id("https://www.youtube.com/watch?v=abc123").as_deref(), Some("abc123"));
/// assert_eq!(extract_video_id("https://www.youtube.com/embed/abc123").as_deref(), Some("abc123"));
/// assert_eq!(extract_video_id("https://vimeo.com/123"), None);
/// ```
pub fn extract_video_id(url: &str) -> Option<String> {
    let u = split_url(url)?;
    let mut segments = u.path.split('/').filter(|s| !s.is_empty());

    if SHORT_HOSTS.contains(&u.host.as_str()) {
        return valid_id(segments.next()?);
    }
    if !FULL_HOSTS.contains(&u.host.as_str()) {
        return None;
    }

    match segments.next() {
        Some("watch") | None => u
            .query
            .split('&')
            .find_map(|pair| pair.strip_prefix("v="))
            .and_then(valid_id),
        Some("embed") | Some("shorts") | Some("v") | Some("live") => valid_id(segments.next()?),
        Some(_) => None,
    }
}
