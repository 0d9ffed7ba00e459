//! garden-rs: a static site generator for interlinked markdown notes
//!
//! Notes are read from a content directory, rendered with built-in Tera
//! templates, and overlaid with a link graph: every page lists its
//! backlinks and draws the notes within two hops of it.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod graph;
pub mod helpers;
pub mod server;
pub mod templates;
pub mod watcher;

use anyhow::Result;
use std::path::{Path, PathBuf};

use graph::GraphSnapshot;

/// A garden rooted at a directory holding `_config.yml`
#[derive(Clone)]
pub struct Garden {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Notes directory
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Garden {
    /// Open a garden from a directory. A missing `_config.yml` means defaults.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        })
    }

    /// Load every note and build the link graph
    pub fn snapshot(&self) -> GraphSnapshot {
        let loader = content::loader::ContentLoader::new(self);
        GraphSnapshot::build(loader.load_posts())
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<GraphSnapshot> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
