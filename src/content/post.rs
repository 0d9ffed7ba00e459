//! Note model

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::FrontMatter;

/// A note in the garden
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Logical path, e.g. `ideas/zettelkasten` (unique)
    pub url: String,

    /// Display name
    pub title: String,

    /// Raw markdown body, front-matter stripped
    pub content: String,

    /// Outbound links, in order of first appearance
    pub links: Vec<String>,

    /// Notes linking here. Derived by the graph builder, never authored.
    pub backlinks: IndexSet<String>,

    /// SEO metadata
    pub metadata: PostMetadata,
}

impl Post {
    /// Create a post with default metadata and no links
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        let url = url.into();
        let content = content.into();
        let metadata = PostMetadata::derived(&url, &content, DEFAULT_DESCRIPTION_LENGTH);
        Self {
            title: metadata.title.clone(),
            url,
            content,
            links: Vec::new(),
            backlinks: IndexSet::new(),
            metadata,
        }
    }

    /// Builder-style helper to set outbound links
    pub fn with_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.links = links.into_iter().map(Into::into).collect();
        self
    }
}

/// Description length used when no site config is around
pub const DEFAULT_DESCRIPTION_LENGTH: usize = 280;

/// Page metadata. `title` and `description` always resolve; the rest are
/// emitted only when the note sets them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetadata {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_sitename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_card_type: Option<String>,
}

impl PostMetadata {
    /// Metadata computed from the path and body alone
    pub fn derived(url: &str, body: &str, description_length: usize) -> Self {
        Self {
            title: default_title(url),
            description: truncate_chars(body, description_length),
            ..Default::default()
        }
    }

    /// Resolve front-matter against the computed defaults, field by field
    pub fn resolve(fm: FrontMatter, url: &str, body: &str, description_length: usize) -> Self {
        Self {
            title: fm.title.unwrap_or_else(|| default_title(url)),
            description: fm
                .description
                .unwrap_or_else(|| truncate_chars(body, description_length)),
            canonical: fm.canonical,
            og_url: fm.og_url,
            og_title: fm.og_title,
            og_description: fm.og_description,
            og_image: fm.og_image,
            og_sitename: fm.og_sitename,
            twitter_handle: fm.twitter_handle,
            twitter_site: fm.twitter_site,
            twitter_card_type: fm.twitter_card_type,
        }
    }
}

/// The last segment of a logical path
pub fn default_title(url: &str) -> String {
    url.rsplit('/').next().unwrap_or(url).to_string()
}

fn truncate_chars(s: &str, length: usize) -> String {
    s.chars().take(length).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_title_is_last_segment() {
        assert_eq!(default_title("ideas/zettelkasten"), "zettelkasten");
        assert_eq!(default_title("index"), "index");
    }

    #[test]
    fn test_resolve_overrides_field_by_field() {
        let fm = FrontMatter {
            description: Some("Custom".to_string()),
            og_title: Some("OG".to_string()),
            ..Default::default()
        };
        let meta = PostMetadata::resolve(fm, "a/b", "body text", 280);
        // Absent title falls back on its own
        assert_eq!(meta.title, "b");
        assert_eq!(meta.description, "Custom");
        assert_eq!(meta.og_title.as_deref(), Some("OG"));
        assert_eq!(meta.og_url, None);
    }

    #[test]
    fn test_description_truncates_by_chars() {
        let body = "é".repeat(300);
        let meta = PostMetadata::derived("x", &body, 280);
        assert_eq!(meta.description.chars().count(), 280);
    }

    #[test]
    fn test_metadata_serializes_camel_case_and_skips_absent() {
        let meta = PostMetadata {
            title: "T".to_string(),
            description: "D".to_string(),
            twitter_card_type: Some("summary".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["twitterCardType"], "summary");
        assert!(json.get("ogUrl").is_none());
    }
}
