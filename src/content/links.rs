//! Outbound link extraction
//!
//! A note links to another note with a markdown link whose target ends in
//! `.md` (`[text](../ideas/x.md)`) or with a wikilink (`[[ideas/x]]`,
//! `[[x|shown text]]`). Both resolve relative to the linking note's
//! directory. Wikilinks are rewritten into markdown links up front so the
//! extractor and the renderer only deal with one syntax.

use indexmap::IndexSet;
use lazy_static::lazy_static;
use pulldown_cmark::{Event, Options, Parser, Tag};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::ops::Range;

use crate::helpers::{decode, resolve_relative};

lazy_static! {
    // (!)?          - embed marker, left untouched
    // \[\[          - opening [[
    // ([^\]\|#]+)   - target
    // (?:#[^\]\|]*)? - heading reference, dropped
    // (?:\|([^\]]+))? - display text
    // \]\]          - closing ]]
    static ref WIKILINK: Regex =
        Regex::new(r"(!?)\[\[([^\]\|#]+)(?:#[^\]\|]*)?(?:\|([^\]]+))?\]\]").unwrap();
    static ref INLINE_CODE: Regex = Regex::new(r"`[^`\n]*`").unwrap();
    static ref SCHEME: Regex = Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").unwrap();
}

/// Parser options shared by link extraction and rendering
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_GFM
}

/// Resolve a link destination found in note `current`.
///
/// Returns the target's logical path when `href` points at another note
/// (ends with `.md` and has no URL scheme), `None` for anything else.
pub fn resolve_link(current: &str, href: &str) -> Option<String> {
    if !href.ends_with(".md") || SCHEME.is_match(href) {
        return None;
    }
    let target = href.strip_suffix(".md")?;
    let resolved = resolve_relative(current, target)?;
    Some(
        resolved
            .split('/')
            .map(decode)
            .collect::<Vec<_>>()
            .join("/"),
    )
}

/// Rewrite `[[target|text]]` into `[text](<target.md>)`, outside of code
pub fn expand_wikilinks(markdown: &str) -> Cow<'_, str> {
    if !markdown.contains("[[") {
        return Cow::Borrowed(markdown);
    }

    let code = code_ranges(markdown);
    WIKILINK.replace_all(markdown, |caps: &Captures| {
        let whole = &caps[0];
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        let is_embed = !caps[1].is_empty();
        if is_embed || code.iter().any(|r| r.contains(&start)) {
            return whole.to_string();
        }

        let target = caps[2].trim();
        let text = caps.get(3).map(|m| m.as_str().trim()).unwrap_or(target);
        format!("[{}](<{}.md>)", text, target)
    })
}

/// Byte ranges covered by fenced code blocks and inline code spans
fn code_ranges(markdown: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut fence: Option<(usize, &str)> = None;
    let mut offset = 0;

    for line in markdown.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let marker = if trimmed.starts_with("```") {
            Some("```")
        } else if trimmed.starts_with("~~~") {
            Some("~~~")
        } else {
            None
        };

        match (fence, marker) {
            (None, Some(m)) => fence = Some((offset, m)),
            (Some((start, open)), Some(m)) if m == open => {
                ranges.push(start..offset + line.len());
                fence = None;
            }
            (None, None) => {
                for m in INLINE_CODE.find_iter(line) {
                    ranges.push(offset + m.start()..offset + m.end());
                }
            }
            _ => {}
        }
        offset += line.len();
    }

    // An unclosed fence runs to the end of the document
    if let Some((start, _)) = fence {
        ranges.push(start..markdown.len());
    }

    ranges
}

/// Extract the ordered, de-duplicated outbound links of note `current`
pub fn extract_links(markdown: &str, current: &str) -> Vec<String> {
    let source = expand_wikilinks(markdown);
    let mut links = IndexSet::new();

    for event in Parser::new_ext(&source, markdown_options()) {
        if let Event::Start(Tag::Link { dest_url, .. }) = event {
            if let Some(target) = resolve_link(current, &dest_url) {
                links.insert(target);
            }
        }
    }

    links.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_link() {
        assert_eq!(
            resolve_link("notes/a", "b.md").as_deref(),
            Some("notes/b")
        );
        assert_eq!(
            resolve_link("notes/a", "../ideas/my%20idea.md").as_deref(),
            Some("ideas/my idea")
        );
        assert_eq!(resolve_link("notes/a", "https://example.com/readme.md"), None);
        assert_eq!(resolve_link("notes/a", "https://example.com"), None);
        assert_eq!(resolve_link("notes/a", "image.png"), None);
        assert_eq!(resolve_link("notes/a", "b.md#section"), None);
    }

    #[test]
    fn test_extract_markdown_links() {
        let md = "See [B](b.md), [C](../c.md), [site](https://x.org) and [B again](b.md).";
        assert_eq!(extract_links(md, "dir/a"), vec!["dir/b", "c"]);
    }

    #[test]
    fn test_images_are_not_links() {
        let md = "![diagram](figure.md)";
        assert!(extract_links(md, "a").is_empty());
    }

    #[test]
    fn test_extract_wikilinks() {
        let md = "Links to [[Note B]] and [[ideas/c|the C note]] and [[d#heading]].";
        assert_eq!(
            extract_links(md, "a"),
            vec!["Note B", "ideas/c", "d"]
        );
    }

    #[test]
    fn test_wikilinks_in_code_are_ignored() {
        let md = "```\n[[in fence]]\n```\n\nInline `[[in code]]` but [[real]].\n";
        assert_eq!(extract_links(md, "a"), vec!["real"]);
    }

    #[test]
    fn test_expand_wikilinks() {
        assert_eq!(
            expand_wikilinks("[[My Note|shown]]"),
            "[shown](<My Note.md>)"
        );
        assert_eq!(expand_wikilinks("![[image.png]]"), "![[image.png]]");
        assert!(matches!(expand_wikilinks("no links"), Cow::Borrowed(_)));
    }
}
