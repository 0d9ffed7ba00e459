//! List garden content

use anyhow::Result;

use crate::graph::GraphSnapshot;
use crate::Garden;

/// List garden content by type
pub fn run(garden: &Garden, content_type: &str) -> Result<()> {
    let snapshot = garden.snapshot();
    for line in report(&snapshot, content_type)? {
        println!("{}", line);
    }
    Ok(())
}

/// Lines printed by `list`
pub fn report(snapshot: &GraphSnapshot, content_type: &str) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    match content_type {
        "note" | "notes" => {
            lines.push(format!("Notes ({}):", snapshot.len()));
            for post in snapshot.posts() {
                lines.push(format!("  {} [{}]", post.title, post.url));
            }
        }
        "link" | "links" => {
            let count: usize = snapshot.posts().map(|p| p.links.len()).sum();
            lines.push(format!("Links ({}):", count));
            for post in snapshot.posts() {
                for link in &post.links {
                    lines.push(format!("  {} -> {}", post.url, link));
                }
            }
        }
        "backlink" | "backlinks" => {
            lines.push("Backlinks:".to_string());
            for post in snapshot.posts().filter(|p| !p.backlinks.is_empty()) {
                let sources: Vec<&str> = post.backlinks.iter().map(String::as_str).collect();
                lines.push(format!("  {} <- {}", post.url, sources.join(", ")));
            }
        }
        "dangling" => {
            let dangling = snapshot.dangling_links();
            lines.push(format!("Dangling links ({}):", dangling.len()));
            for (source, target) in dangling {
                lines.push(format!("  {} -> {}", source, target));
            }
        }
        "orphan" | "orphans" => {
            let orphans = snapshot.orphans();
            lines.push(format!("Orphans ({}):", orphans.len()));
            for post in orphans {
                lines.push(format!("  {}", post.url));
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: notes, links, backlinks, dangling, orphans",
                content_type
            );
        }
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Post;

    fn snapshot() -> GraphSnapshot {
        GraphSnapshot::build(vec![
            Post::new("a", "x").with_links(["b", "ghost"]),
            Post::new("b", "y"),
            Post::new("lonely", "z"),
        ])
    }

    #[test]
    fn test_report_notes() {
        let lines = report(&snapshot(), "notes").unwrap();
        assert_eq!(lines[0], "Notes (3):");
        assert_eq!(lines[1], "  a [a]");
    }

    #[test]
    fn test_report_backlinks_and_dangling() {
        let snapshot = snapshot();
        assert_eq!(report(&snapshot, "backlinks").unwrap(), vec!["Backlinks:", "  b <- a"]);
        assert_eq!(
            report(&snapshot, "dangling").unwrap(),
            vec!["Dangling links (1):", "  a -> ghost"]
        );
        assert_eq!(
            report(&snapshot, "orphans").unwrap(),
            vec!["Orphans (1):", "  lonely"]
        );
    }

    #[test]
    fn test_report_unknown_type() {
        assert!(report(&snapshot(), "tags").is_err());
    }
}
