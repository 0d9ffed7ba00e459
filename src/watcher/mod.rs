//! Debounced file watcher shared by `generate --watch` and the dev server

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::commands::generate;
use crate::graph::GraphSnapshot;
use crate::Garden;

/// Quiet period before a burst of events triggers a rebuild
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Watch the content directory and `_config.yml`, rebuilding the site after
/// every debounced batch of relevant changes. Blocks until the watcher
/// channel closes.
pub fn watch<F>(garden: &Garden, on_rebuild: F) -> Result<()>
where
    F: FnMut(GraphSnapshot),
{
    let (tx, rx) = channel::<DebounceEventResult>();
    let mut debouncer = new_debouncer(DEBOUNCE, tx)?;

    let mut watching = false;
    if garden.content_dir.is_dir() {
        debouncer
            .watcher()
            .watch(&garden.content_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", garden.content_dir);
        watching = true;
    } else {
        tracing::warn!("Content directory {:?} not found", garden.content_dir);
    }

    let config_path = garden.base_dir.join("_config.yml");
    if config_path.is_file() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
        watching = true;
    }

    if !watching {
        anyhow::bail!("Nothing to watch under {:?}", garden.base_dir);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut rebuilder = Rebuilder::new(garden, on_rebuild);
    for result in rx {
        match result {
            Ok(events) => {
                let paths: Vec<PathBuf> = events.into_iter().map(|e| e.path).collect();
                rebuilder.handle_batch(&paths);
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

/// Turns batches of changed paths into rebuilds
struct Rebuilder<F> {
    garden: Garden,
    /// The garden's base directory, as given and canonicalized
    roots: Vec<PathBuf>,
    on_rebuild: F,
}

impl<F> Rebuilder<F>
where
    F: FnMut(GraphSnapshot),
{
    fn new(garden: &Garden, on_rebuild: F) -> Self {
        let mut roots = vec![garden.base_dir.clone()];
        if let Ok(canonical) = garden.base_dir.canonicalize() {
            if canonical != garden.base_dir {
                roots.push(canonical);
            }
        }

        Self {
            garden: garden.clone(),
            roots,
            on_rebuild,
        }
    }

    /// Rebuild once if any path in the batch matters. Returns whether a
    /// build succeeded.
    fn handle_batch(&mut self, paths: &[PathBuf]) -> bool {
        let relevant: Vec<&PathBuf> = paths
            .iter()
            .filter(|p| is_relevant(&self.roots, p))
            .collect();
        if relevant.is_empty() {
            return false;
        }

        for path in &relevant {
            tracing::info!("File changed: {}", path.display());
        }

        match generate::reload(&self.garden).and_then(|g| generate::run(&g)) {
            Ok(snapshot) => {
                tracing::info!("Regenerated successfully");
                (self.on_rebuild)(snapshot);
                true
            }
            Err(e) => {
                tracing::error!("Generation failed: {:#}", e);
                false
            }
        }
    }
}

/// Editor swap files and dot-entries inside the garden don't trigger
/// rebuilds. Only the part of `path` below one of `roots` is inspected, so a
/// garden living under a dot-directory still rebuilds.
pub(crate) fn is_relevant(roots: &[PathBuf], path: &Path) -> bool {
    let relative = roots
        .iter()
        .find_map(|root| path.strip_prefix(root).ok())
        .unwrap_or_else(|| path.file_name().map(Path::new).unwrap_or(path));

    let hidden = relative.components().any(|c| match c {
        Component::Normal(name) => name.to_str().map_or(false, |s| s.starts_with('.')),
        _ => false,
    });
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

    !hidden && !name.ends_with('~') && !name.ends_with(".swp")
}
