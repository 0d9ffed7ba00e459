//! Graph snapshot - the immutable link graph of one build

use indexmap::IndexMap;
use serde::Serialize;

use crate::content::Post;

/// Every note of a build with its backlinks resolved.
///
/// Built once from the loaded notes and handed by reference to everything
/// that renders a page. Nothing mutates it afterwards; a rebuild produces a
/// fresh snapshot.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    posts: IndexMap<String, Post>,
}

/// JSON body of the snapshot endpoint
#[derive(Debug, Serialize)]
pub struct SnapshotDocument<'a> {
    pub graph: Vec<&'a Post>,
}

impl GraphSnapshot {
    /// Build the snapshot, deriving `backlinks` for every note by inverting
    /// the `links` relation once over the whole corpus.
    ///
    /// Authored backlinks are discarded. Links to missing notes are kept on
    /// the source note but produce no backlink anywhere.
    pub fn build(posts: Vec<Post>) -> Self {
        let mut posts: IndexMap<String, Post> = posts
            .into_iter()
            .map(|mut post| {
                post.backlinks.clear();
                (post.url.clone(), post)
            })
            .collect();

        let edges: Vec<(String, String)> = posts
            .values()
            .flat_map(|post| {
                post.links
                    .iter()
                    .map(move |target| (post.url.clone(), target.clone()))
            })
            .collect();

        for (source, target) in edges {
            if let Some(target_post) = posts.get_mut(&target) {
                target_post.backlinks.insert(source);
            }
        }

        tracing::debug!("Built link graph with {} notes", posts.len());

        Self { posts }
    }

    /// Look up a note by logical path
    pub fn get(&self, url: &str) -> Option<&Post> {
        self.posts.get(url)
    }

    /// Whether a note exists
    pub fn contains(&self, url: &str) -> bool {
        self.posts.contains_key(url)
    }

    /// All notes in load order
    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.values()
    }

    /// Number of notes
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the snapshot holds no notes
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// (source, target) pairs whose target is not a note
    pub fn dangling_links(&self) -> Vec<(&str, &str)> {
        self.posts
            .values()
            .flat_map(|post| {
                post.links
                    .iter()
                    .filter(|target| !self.posts.contains_key(target.as_str()))
                    .map(move |target| (post.url.as_str(), target.as_str()))
            })
            .collect()
    }

    /// Notes with neither outbound links nor backlinks
    pub fn orphans(&self) -> Vec<&Post> {
        self.posts
            .values()
            .filter(|post| post.links.is_empty() && post.backlinks.is_empty())
            .collect()
    }

    /// The serializable endpoint body
    pub fn document(&self) -> SnapshotDocument<'_> {
        SnapshotDocument {
            graph: self.posts.values().collect(),
        }
    }

    /// The endpoint body as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.document())
    }
}
