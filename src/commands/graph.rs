//! Print the neighborhood of one note

use anyhow::Result;

use crate::Garden;

/// Print the cytoscape elements around `url` as JSON.
///
/// `raw` keeps the duplicate nodes and edges the expansion emits.
pub fn run(garden: &Garden, url: &str, raw: bool) -> Result<()> {
    let url = url.trim_matches('/').trim_end_matches(".md");
    let snapshot = garden.snapshot();

    let Some(neighborhood) = snapshot.neighborhood(url) else {
        anyhow::bail!("No note at {}", url);
    };
    let neighborhood = if raw {
        neighborhood
    } else {
        neighborhood.dedup()
    };

    tracing::debug!("{} elements around {}", neighborhood.len(), url);
    println!("{}", serde_json::to_string_pretty(&neighborhood)?);

    Ok(())
}
