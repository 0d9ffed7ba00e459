//! Generate static files

use anyhow::Result;
use std::time::Instant;

use crate::generator::Generator;
use crate::graph::GraphSnapshot;
use crate::watcher;
use crate::Garden;

/// Build the whole site and return the snapshot it was rendered from
pub fn run(garden: &Garden) -> Result<GraphSnapshot> {
    let start = Instant::now();

    let snapshot = garden.snapshot();
    let link_count: usize = snapshot.posts().map(|p| p.links.len()).sum();
    tracing::info!("Loaded {} notes with {} links", snapshot.len(), link_count);

    let dangling = snapshot.dangling_links();
    if !dangling.is_empty() {
        tracing::info!("{} links point at missing notes", dangling.len());
    }

    let generator = Generator::new(garden)?;
    generator.generate(&snapshot)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(snapshot)
}

/// Watch the content directory and config, regenerating on change
pub async fn watch(garden: &Garden) -> Result<()> {
    let garden = garden.clone();
    tokio::task::spawn_blocking(move || watcher::watch(&garden, |_| {})).await?
}

/// Re-read `_config.yml` so config edits apply to the next build
pub(crate) fn reload(garden: &Garden) -> Result<Garden> {
    Garden::new(&garden.base_dir)
}
