//! Content loader - loads notes from the content directory

use anyhow::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::links::extract_links;
use super::{paths, ContentError, FrontMatter, Post, PostMetadata};
use crate::Garden;

/// Loads notes from the content directory
pub struct ContentLoader {
    content_dir: PathBuf,
    description_length: usize,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new(garden: &Garden) -> Self {
        Self::with_root(&garden.content_dir, garden.config.description_length)
    }

    /// Create a loader over an explicit content root
    pub fn with_root<P: AsRef<Path>>(content_dir: P, description_length: usize) -> Self {
        Self {
            content_dir: content_dir.as_ref().to_path_buf(),
            description_length,
        }
    }

    /// Logical paths of every note, sorted
    pub fn enumerate_paths(&self) -> Vec<String> {
        paths::enumerate(&self.content_dir)
    }

    /// Load every note, with outbound links extracted.
    ///
    /// Notes that fail to load are logged and left out.
    pub fn load_posts(&self) -> Vec<Post> {
        let mut posts = Vec::new();

        for url in self.enumerate_paths() {
            match self.load_post(&url) {
                Ok(Some(post)) => posts.push(post),
                Ok(None) => {
                    tracing::debug!("Note vanished during load: {}", url);
                }
                Err(e) => {
                    tracing::warn!("Failed to load note {}: {}", url, e);
                }
            }
        }

        posts
    }

    /// Load a single note by logical path.
    ///
    /// Returns `Ok(None)` when no such note exists. Malformed front-matter
    /// never fails the note: the whole file becomes the body and metadata is
    /// derived from the path and text.
    pub fn load_post(&self, url: &str) -> Result<Option<Post>> {
        let path = match paths::source_path(&self.content_dir, url) {
            Ok(path) => path,
            Err(ContentError::OutsideRoot(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // Symlinks could lead outside the content root
        if !paths::is_regular_file_within(&self.content_dir, &path) {
            return Ok(None);
        }

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ContentError::Io(e).into()),
        };

        let (content, metadata) = match FrontMatter::parse(&raw) {
            Ok((fm, body)) => {
                let metadata = PostMetadata::resolve(fm, url, body, self.description_length);
                (body.to_string(), metadata)
            }
            Err(e) => {
                tracing::warn!("{} in {:?}, rendering as plain content", e, path);
                let metadata = PostMetadata::derived(url, &raw, self.description_length);
                (raw.clone(), metadata)
            }
        };

        let links = extract_links(&content, url);

        Ok(Some(Post {
            url: url.to_string(),
            title: metadata.title.clone(),
            content,
            links,
            backlinks: Default::default(),
            metadata,
        }))
    }
}
