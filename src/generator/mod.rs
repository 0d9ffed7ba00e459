//! Generator module - renders every note, the index and the graph snapshot
//! using the built-in Tera templates

use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::content::{paths, MarkdownRenderer, Post};
use crate::graph::GraphSnapshot;
use crate::helpers::{full_url_for, label_for, note_href};
use crate::templates::{BacklinkData, ConfigData, NavNode, NoteData, SeoData, TemplateRenderer};
use crate::Garden;

/// Where the snapshot endpoint lands inside the public directory
pub const GRAPH_ENDPOINT: &str = "api/content-graph.json";

/// Static site generator using Tera templates
pub struct Generator {
    garden: Garden,
    renderer: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(garden: &Garden) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let markdown = MarkdownRenderer::from_config(&garden.config);

        Ok(Self {
            garden: garden.clone(),
            renderer,
            markdown,
        })
    }

    /// Generate the entire site from a built snapshot
    pub fn generate(&self, snapshot: &GraphSnapshot) -> Result<()> {
        let public_dir = &self.garden.public_dir;
        fs::create_dir_all(public_dir)
            .with_context(|| format!("Failed to create {:?}", public_dir))?;

        // Copy images and other attachments next to the notes
        self.copy_content_assets()?;

        let config_data = ConfigData::from(&self.garden.config);

        let mut written = 0;
        for post in snapshot.posts() {
            match self.generate_note_page(post, snapshot, &config_data) {
                Ok(()) => written += 1,
                Err(e) => tracing::warn!("Skipping page {}: {:#}", post.url, e),
            }
        }
        tracing::info!("Rendered {} of {} notes", written, snapshot.len());

        self.generate_index_page(snapshot, &config_data)?;
        self.generate_graph_endpoint(snapshot)?;

        Ok(())
    }

    /// Create a base context with common variables
    fn create_base_context(&self, config_data: &ConfigData) -> Context {
        let now = chrono::Local::now();
        let mut context = Context::new();
        context.insert("config", config_data);
        context.insert("current_year", &now.format("%Y").to_string());
        context.insert("built_at", &now.format("%Y-%m-%d %H:%M").to_string());
        context
    }

    /// Render one note to `public/{url}/index.html`
    fn generate_note_page(
        &self,
        post: &Post,
        snapshot: &GraphSnapshot,
        config_data: &ConfigData,
    ) -> Result<()> {
        let root = &self.garden.config.root;
        let content = self.markdown.render(&post.content, &post.url, snapshot)?;

        let backlinks: Vec<BacklinkData> = post
            .backlinks
            .iter()
            .map(|url| BacklinkData {
                url: url.clone(),
                href: note_href(root, url),
                label: label_for(url),
                preview: snapshot
                    .get(url)
                    .filter(|source| !source.content.trim().is_empty())
                    .map(|source| self.markdown.render_preview(&source.content)),
            })
            .collect();

        let neighborhood = snapshot.neighborhood(&post.url).map(|n| n.dedup());
        let show_graph = self.garden.config.graph.enable
            && neighborhood.as_ref().map_or(false, |n| n.len() > 1);
        let graph_json = match neighborhood {
            Some(ref n) if show_graph => script_safe_json(&serde_json::to_string(n)?),
            _ => String::from("[]"),
        };

        let mut context = self.create_base_context(config_data);
        context.insert(
            "page_title",
            &format!("{} - {}", post.metadata.title, self.garden.config.title),
        );
        context.insert("seo", &SeoData::from(&post.metadata));
        context.insert(
            "note",
            &NoteData {
                url: post.url.clone(),
                title: post.title.clone(),
                content,
                is_empty: post.content.trim().is_empty(),
            },
        );
        context.insert("backlinks", &backlinks);
        context.insert("show_graph", &show_graph);
        context.insert("graph_json", &graph_json);

        let html = self.renderer.render("note.html", &context)?;
        let output_path = self.garden.public_dir.join(&post.url).join("index.html");
        write_file(&output_path, &html)?;

        tracing::debug!("Generated: {}", post.url);
        Ok(())
    }

    /// Generate the landing page listing every note as a folder tree
    fn generate_index_page(&self, snapshot: &GraphSnapshot, config_data: &ConfigData) -> Result<()> {
        let config = &self.garden.config;
        let urls: Vec<&str> = snapshot.posts().map(|p| p.url.as_str()).collect();
        let link_count: usize = snapshot.posts().map(|p| p.links.len()).sum();

        let mut context = self.create_base_context(config_data);
        context.insert("page_title", &config.title);
        context.insert(
            "seo",
            &SeoData {
                description: config.description.clone(),
                canonical: Some(full_url_for(config, "/")),
                og_title: Some(config.title.clone()),
                og_sitename: Some(config.title.clone()),
                ..Default::default()
            },
        );
        context.insert("nav", &build_nav_tree(&urls, &config.root));
        context.insert("note_count", &snapshot.len());
        context.insert("link_count", &link_count);

        let html = self.renderer.render("index.html", &context)?;
        write_file(&self.garden.public_dir.join("index.html"), &html)?;

        tracing::debug!("Generated: index.html");
        Ok(())
    }

    /// Write the snapshot consumed by client-side graph views
    fn generate_graph_endpoint(&self, snapshot: &GraphSnapshot) -> Result<()> {
        let json = snapshot.to_json()?;
        write_file(&self.garden.public_dir.join(GRAPH_ENDPOINT), &json)?;

        tracing::debug!("Generated: {}", GRAPH_ENDPOINT);
        Ok(())
    }

    /// Copy every non-markdown file from the content directory
    fn copy_content_assets(&self) -> Result<()> {
        let content_dir = &self.garden.content_dir;
        if !content_dir.is_dir() {
            return Ok(());
        }

        let walker = WalkDir::new(content_dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !paths::is_hidden(e.file_name()));

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() || paths::is_markdown_file(path) {
                continue;
            }

            let relative = path.strip_prefix(content_dir)?;
            let dest = self.garden.public_dir.join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::copy(path, &dest).with_context(|| format!("Failed to copy {:?}", path))?;
        }

        Ok(())
    }
}

/// Build the folder tree shown on the index page.
///
/// Folders come before notes at every level; a note and a folder sharing a
/// name collapse into one linked entry.
pub fn build_nav_tree(urls: &[&str], root: &str) -> Vec<NavNode> {
    let mut tree: Vec<NavNode> = Vec::new();

    for url in urls {
        let segments: Vec<&str> = url.split('/').collect();
        let mut level = &mut tree;

        for (i, segment) in segments.iter().enumerate() {
            let name = segment.to_string();
            let pos = match level.iter().position(|n| n.name == name) {
                Some(pos) => pos,
                None => {
                    level.push(NavNode {
                        name,
                        href: None,
                        children: Vec::new(),
                    });
                    level.len() - 1
                }
            };

            if i == segments.len() - 1 {
                level[pos].href = Some(note_href(root, url));
            }
            level = &mut level[pos].children;
        }
    }

    sort_nav(&mut tree);
    tree
}

fn sort_nav(nodes: &mut [NavNode]) {
    nodes.sort_by(|a, b| {
        a.children
            .is_empty()
            .cmp(&b.children.is_empty())
            .then_with(|| a.name.cmp(&b.name))
    });
    for node in nodes.iter_mut() {
        sort_nav(&mut node.children);
    }
}

/// Keep embedded JSON from closing its `<script>` element
fn script_safe_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_tree_nests_folders() {
        let tree = build_nav_tree(&["zebra", "ideas/garden", "ideas/notes/a"], "/");

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "ideas");
        assert_eq!(tree[0].href, None);
        assert_eq!(tree[0].children[0].name, "notes");
        assert_eq!(tree[0].children[1].name, "garden");
        assert_eq!(tree[0].children[1].href.as_deref(), Some("/ideas/garden"));
        assert_eq!(tree[1].name, "zebra");
        assert_eq!(tree[1].href.as_deref(), Some("/zebra"));
    }

    #[test]
    fn test_nav_tree_note_and_folder_share_entry() {
        let tree = build_nav_tree(&["ideas", "ideas/garden"], "/wiki/");

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].href.as_deref(), Some("/wiki/ideas"));
        assert_eq!(tree[0].children.len(), 1);
    }

    #[test]
    fn test_nav_tree_labels_are_literal_segments() {
        let tree = build_nav_tree(&["my note", "100%25"], "/");
        assert_eq!(tree[0].name, "100%25");
        assert_eq!(tree[0].href.as_deref(), Some("/100%2525"));
        assert_eq!(tree[1].name, "my note");
        assert_eq!(tree[1].href.as_deref(), Some("/my%20note"));
    }

    #[test]
    fn test_script_safe_json() {
        assert_eq!(
            script_safe_json(r#"{"label":"</script>"}"#),
            r#"{"label":"<\/script>"}"#
        );
    }
}
