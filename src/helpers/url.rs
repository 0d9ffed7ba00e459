//! URL helper functions

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/garden/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    url_for_root(&config.root, path)
}

/// `url_for` against an explicit root
pub fn url_for_root(root: &str, path: &str) -> String {
    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about/") // -> "https://example.com/garden/about/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Site-relative href of a note, each segment percent-encoded
pub fn note_href(root: &str, url: &str) -> String {
    url_for_root(root, &encode_path(url))
}

/// Percent-encode every segment of a logical path, keeping the `/` separators
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Decode a percent-encoded string, lossy on invalid UTF-8
pub fn decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Human label for a note: the last segment of its logical path.
///
/// Logical paths are stored decoded, so the segment is used as is.
pub fn label_for(url: &str) -> String {
    url.rsplit('/').next().unwrap_or(url).to_string()
}

/// Resolve `target` against the directory holding `current`.
///
/// A leading `/` resolves from the content root. `.` and empty segments are
/// dropped, `..` climbs one level and stops at the root. Returns `None` when
/// nothing is left.
///
/// # Examples
/// ```ignore
/// resolve_relative("notes/source", "../ideas/x") // -> Some("ideas/x")
/// ```
pub fn resolve_relative(current: &str, target: &str) -> Option<String> {
    let mut segments: Vec<&str> = if target.starts_with('/') {
        Vec::new()
    } else {
        let mut dir: Vec<&str> = current.split('/').filter(|s| !s.is_empty()).collect();
        dir.pop();
        dir
    };

    for part in target.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(part),
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com".to_string(),
            root: "/garden/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/garden/css/style.css");
        assert_eq!(url_for(&config, ""), "/garden/");
        assert_eq!(url_for_root("/", "ideas/x"), "/ideas/x");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/about/"),
            "https://example.com/garden/about/"
        );
    }

    #[test]
    fn test_note_href_encodes_segments() {
        assert_eq!(note_href("/", "ideas/my note"), "/ideas/my%20note");
        assert_eq!(note_href("/", "c#/notes"), "/c%23/notes");
    }

    #[test]
    fn test_label_for_is_last_segment() {
        assert_eq!(label_for("ideas/my note"), "my note");
        assert_eq!(label_for("plain"), "plain");
    }

    #[test]
    fn test_label_for_keeps_literal_percent() {
        assert_eq!(label_for("stats/100%25"), "100%25");
        assert_eq!(label_for("100%"), "100%");
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(
            resolve_relative("notes/source", "target").as_deref(),
            Some("notes/target")
        );
        assert_eq!(
            resolve_relative("notes/source", "../ideas/x").as_deref(),
            Some("ideas/x")
        );
        assert_eq!(
            resolve_relative("notes/source", "./sub/y").as_deref(),
            Some("notes/sub/y")
        );
        assert_eq!(
            resolve_relative("notes/deep/source", "/top").as_deref(),
            Some("top")
        );
        // Climbing past the root stops at the root
        assert_eq!(
            resolve_relative("source", "../../x").as_deref(),
            Some("x")
        );
        assert_eq!(resolve_relative("source", ".."), None);
    }
}
