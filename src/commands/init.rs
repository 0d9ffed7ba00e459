//! Initialize a new garden

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# Garden Configuration

# Site
title: Digital Garden
description: ''
author: John Doe
language: en

# URL
## Set `root` when the garden is served from a subdirectory
url: http://example.com
root: /

# Directory
content_dir: content
public_dir: public

# Writing
description_length: 280
highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: true

# Graph
graph:
  enable: true
  height: 256
"#;

const INDEX_NOTE: &str = r#"---
title: Welcome
description: The entry point of this garden
---

Welcome to your garden! Notes live in `content/` and link to each other with
plain markdown links such as [the second note](ideas/linking.md) or with
wikilinks like [[ideas/linking|this one]].

Every page lists its ==backlinks== and draws the notes around it.
"#;

const LINKING_NOTE: &str = r#"Links are resolved relative to the current note, so
[going back](../index.md) works from inside a folder.

| Syntax | Result |
| --- | --- |
| `[text](note.md)` | internal link with preview |
| `==text==` | highlight |
"#;

/// Initialize a new garden in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("A garden already exists in {:?}", target_dir);
    }

    fs::create_dir_all(target_dir.join("content/ideas"))?;
    fs::write(&config_path, CONFIG_TEMPLATE)?;
    fs::write(target_dir.join("content/index.md"), INDEX_NOTE)?;
    fs::write(target_dir.join("content/ideas/linking.md"), LINKING_NOTE)?;

    tracing::debug!("Wrote sample notes to {:?}", target_dir.join("content"));
    Ok(())
}
