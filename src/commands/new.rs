//! Create a new note

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::paths;
use crate::Garden;

/// Create `content/[dir/]slug.md` with the title in its front matter
pub fn create_note(garden: &Garden, title: &str, dir: Option<&str>) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let url = match dir.map(|d| d.trim_matches('/')).filter(|d| !d.is_empty()) {
        Some(dir) => format!("{}/{}", dir, slug),
        None => slug,
    };
    let file_path = paths::source_path(&garden.content_dir, &url)?;

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = format!("---\ntitle: {}\n---\n\n", serde_yaml::to_string(title)?.trim_end());
    fs::write(&file_path, content)?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}
