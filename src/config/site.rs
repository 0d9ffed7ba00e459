//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Writing
    /// Number of body characters used when a note has no description
    pub description_length: usize,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Graph
    #[serde(default)]
    pub graph: GraphConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Digital Garden".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),

            description_length: 280,
            highlight: HighlightConfig::default(),

            graph: GraphConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}

/// Link graph section configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Render the neighborhood graph under each note
    pub enable: bool,
    /// Height of the graph canvas in pixels
    pub height: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            enable: true,
            height: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.public_dir, "public");
        assert_eq!(config.description_length, 280);
        assert!(config.graph.enable);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Garden
author: Test User
content_dir: notes
graph:
  enable: false
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Garden");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.content_dir, "notes");
        assert!(!config.graph.enable);
        // Untouched sections keep their defaults
        assert_eq!(config.graph.height, 256);
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let yaml = "title: X\ntheme: landscape\nper_page: 10\n";
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "X");
        assert_eq!(config.content_dir, "content");
    }
}
