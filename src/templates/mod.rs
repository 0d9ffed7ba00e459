//! Built-in garden theme templates using Tera template engine
//!
//! All templates are embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::PostMetadata;

/// Template renderer with the embedded garden theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all garden templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Values are escaped explicitly in the templates; rendered note HTML
        // must go through untouched
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("garden/layout.html")),
            ("note.html", include_str!("garden/note.html")),
            ("index.html", include_str!("garden/index.html")),
            ("macros.html", include_str!("garden/macros.html")),
            // Partials
            (
                "partials/head.html",
                include_str!("garden/partials/head.html"),
            ),
            (
                "partials/backlinks.html",
                include_str!("garden/partials/backlinks.html"),
            ),
            (
                "partials/graph.html",
                include_str!("garden/partials/graph.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub root: String,
    pub graph_height: u32,
}

impl From<&SiteConfig> for ConfigData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: config.root.clone(),
            graph_height: config.graph.height,
        }
    }
}

/// Head metadata. Absent fields serialize as null so templates can test them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeoData {
    pub description: String,
    pub canonical: Option<String>,
    pub og_url: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub og_sitename: Option<String>,
    pub twitter_handle: Option<String>,
    pub twitter_site: Option<String>,
    pub twitter_card_type: Option<String>,
}

impl From<&PostMetadata> for SeoData {
    fn from(meta: &PostMetadata) -> Self {
        Self {
            description: meta.description.clone(),
            canonical: meta.canonical.clone(),
            og_url: meta.og_url.clone(),
            og_title: meta.og_title.clone(),
            og_description: meta.og_description.clone(),
            og_image: meta.og_image.clone(),
            og_sitename: meta.og_sitename.clone(),
            twitter_handle: meta.twitter_handle.clone(),
            twitter_site: meta.twitter_site.clone(),
            twitter_card_type: meta.twitter_card_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteData {
    pub url: String,
    pub title: String,
    /// Rendered HTML body
    pub content: String,
    pub is_empty: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BacklinkData {
    pub url: String,
    pub href: String,
    pub label: String,
    /// Rendered preview of the linking note, if it has content
    pub preview: Option<String>,
}

/// One entry of the note tree on the index page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavNode {
    pub name: String,
    /// Set when a note lives at this path
    pub href: Option<String>,
    pub children: Vec<NavNode>,
}
