//! Mapping between note files and their logical paths

use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use super::ContentError;

/// Enumerate the logical path of every markdown file under `root`.
///
/// Nested directories are joined with `/` and the `.md` suffix is dropped.
/// The result is sorted and free of duplicates. Hidden entries are skipped
/// and symlinks are not followed, so the walk stays inside `root`.
pub fn enumerate(root: &Path) -> Vec<String> {
    if !root.is_dir() {
        return Vec::new();
    }

    let mut paths: Vec<String> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_markdown_file(e.path()))
        .filter_map(|e| logical_path(root, e.path()))
        .collect();

    paths.sort();
    paths.dedup();
    paths
}

/// Logical path of a markdown file under `root`
pub fn logical_path(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let segments: Vec<String> = relative
        .components()
        .map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Option<_>>()?;

    let joined = segments.join("/");
    let url = joined.strip_suffix(".md")?;
    if url.is_empty() || url.ends_with('/') {
        return None;
    }
    Some(url.to_string())
}

/// Source file for a logical path. Rejects paths that would leave `root`.
pub fn source_path(root: &Path, url: &str) -> Result<PathBuf, ContentError> {
    let segments: Vec<&str> = url.split('/').collect();
    let valid = !url.is_empty()
        && segments
            .iter()
            .all(|s| !s.is_empty() && *s != "." && *s != ".." && !s.contains('\\'));
    if !valid {
        return Err(ContentError::OutsideRoot(url.to_string()));
    }

    let mut path = root.to_path_buf();
    for segment in &segments[..segments.len() - 1] {
        path.push(segment);
    }
    path.push(format!("{}.md", segments[segments.len() - 1]));
    Ok(path)
}

/// Check if a file is a markdown file
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension().map(|e| e == "md").unwrap_or(false)
}

/// True when `path` is a regular file under `root` reached without passing
/// through a symlink
pub fn is_regular_file_within(root: &Path, path: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };

    let mut current = root.to_path_buf();
    for component in relative.components() {
        current.push(component);
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => return false,
            Ok(_) => {}
            Err(_) => return false,
        }
    }

    fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_file())
        .unwrap_or(false)
}

/// Dotfiles and dot-directories
pub fn is_hidden(name: &OsStr) -> bool {
    name.to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("ideas/deep")).unwrap();
        fs::create_dir_all(root.join(".obsidian")).unwrap();
        fs::write(root.join("index.md"), "home").unwrap();
        fs::write(root.join("ideas/zettelkasten.md"), "z").unwrap();
        fs::write(root.join("ideas/deep/nested note.md"), "n").unwrap();
        fs::write(root.join("ideas/image.png"), [0u8; 4]).unwrap();
        fs::write(root.join("notes.markdown"), "not picked").unwrap();
        fs::write(root.join(".obsidian/workspace.md"), "hidden").unwrap();
        temp
    }

    #[test]
    fn test_enumerate_flattens_tree() {
        let temp = create_tree();
        let paths = enumerate(temp.path());
        assert_eq!(
            paths,
            vec![
                "ideas/deep/nested note".to_string(),
                "ideas/zettelkasten".to_string(),
                "index".to_string(),
            ]
        );
    }

    #[test]
    fn test_enumerate_is_idempotent() {
        let temp = create_tree();
        assert_eq!(enumerate(temp.path()), enumerate(temp.path()));
    }

    #[test]
    fn test_enumerate_missing_root() {
        let temp = TempDir::new().unwrap();
        assert!(enumerate(&temp.path().join("nope")).is_empty());
    }

    #[test]
    fn test_source_path_round_trips_logical_path() {
        let root = Path::new("/garden/content");
        let path = source_path(root, "ideas/zettelkasten").unwrap();
        assert_eq!(path, root.join("ideas").join("zettelkasten.md"));
        assert_eq!(
            logical_path(root, &path).as_deref(),
            Some("ideas/zettelkasten")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_enumerate_skips_symlinks_leaving_root() {
        use std::os::unix::fs::symlink;

        let outside = TempDir::new().unwrap();
        fs::create_dir_all(outside.path().join("private")).unwrap();
        fs::write(outside.path().join("private/secret.md"), "s").unwrap();
        fs::write(outside.path().join("loose.md"), "l").unwrap();

        let temp = create_tree();
        symlink(outside.path().join("private"), temp.path().join("linked")).unwrap();
        symlink(outside.path().join("loose.md"), temp.path().join("loose.md")).unwrap();

        let paths = enumerate(temp.path());
        assert!(!paths.iter().any(|p| p.starts_with("linked")));
        assert!(!paths.contains(&"loose".to_string()));
        assert_eq!(paths.len(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_regular_file_within_rejects_symlinks() {
        use std::os::unix::fs::symlink;

        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("loose.md"), "l").unwrap();

        let temp = create_tree();
        let root = temp.path();
        symlink(outside.path(), root.join("linked")).unwrap();
        symlink(outside.path().join("loose.md"), root.join("loose.md")).unwrap();

        assert!(is_regular_file_within(root, &root.join("index.md")));
        assert!(is_regular_file_within(root, &root.join("ideas/zettelkasten.md")));
        assert!(!is_regular_file_within(root, &root.join("loose.md")));
        assert!(!is_regular_file_within(root, &root.join("linked/loose.md")));
        assert!(!is_regular_file_within(root, &root.join("ideas")));
        assert!(!is_regular_file_within(root, &outside.path().join("loose.md")));
    }

    #[test]
    fn test_source_path_rejects_escapes() {
        let root = Path::new("/garden/content");
        assert!(source_path(root, "../secrets").is_err());
        assert!(source_path(root, "a/../../b").is_err());
        assert!(source_path(root, "/etc/passwd").is_err());
        assert!(source_path(root, "").is_err());
    }
}
