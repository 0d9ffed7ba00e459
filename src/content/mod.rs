//! Content module - handles notes, front-matter, links and rendering

mod error;
mod frontmatter;
pub mod links;
pub mod loader;
mod markdown;
pub mod paths;
mod post;

pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use post::{default_title, Post, PostMetadata, DEFAULT_DESCRIPTION_LENGTH};
