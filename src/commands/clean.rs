//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Garden;

/// Remove the public directory
pub fn run(garden: &Garden) -> Result<()> {
    if garden.public_dir.exists() {
        fs::remove_dir_all(&garden.public_dir)?;
        tracing::info!("Deleted: {:?}", garden.public_dir);
    } else {
        tracing::debug!("Nothing to clean at {:?}", garden.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_public_dir() {
        let dir = TempDir::new().unwrap();
        let garden = Garden::new(dir.path()).unwrap();
        fs::create_dir_all(garden.public_dir.join("a")).unwrap();
        fs::write(garden.public_dir.join("a/index.html"), "x").unwrap();

        run(&garden).unwrap();
        assert!(!garden.public_dir.exists());

        // Cleaning twice is fine
        run(&garden).unwrap();
    }
}
