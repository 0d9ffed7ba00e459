//! Markdown rendering with syntax highlighting and note-aware links

use anyhow::Result;
use lazy_static::lazy_static;
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, LinkType, Parser, Tag, TagEnd, TextMergeStream,
};
use regex::Regex;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::links::{expand_wikilinks, markdown_options, resolve_link};
use crate::config::SiteConfig;
use crate::graph::GraphSnapshot;
use crate::helpers::note_href;

lazy_static! {
    static ref HIGHLIGHT_MARK: Regex = Regex::new(r"==([^=]+)==").unwrap();
}

/// Link opened but not yet closed while walking events
enum OpenLink {
    Note { url: String },
    External,
}

/// Fenced or indented code block being collected
struct CodeBlock {
    lang: Option<String>,
    content: String,
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
    line_numbers: bool,
    root: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: "base16-ocean.dark".to_string(),
            highlight: true,
            line_numbers: true,
            root: "/".to_string(),
        }
    }

    /// Create with the site's highlight settings and root
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            theme_name: config.highlight.theme.clone(),
            highlight: config.highlight.enable,
            line_numbers: config.highlight.line_number,
            root: config.root.clone(),
            ..Self::new()
        }
    }

    /// Render the body of note `current` to HTML.
    ///
    /// Links ending in `.md` are resolved against `current` and looked up in
    /// `graph`; they become internal anchors, with a hidden preview of the
    /// target appended when the target exists and has content. Every other
    /// link renders as a plain anchor. `==text==` becomes a highlight span.
    /// Raw HTML passes through untouched.
    pub fn render(&self, markdown: &str, current: &str, graph: &GraphSnapshot) -> Result<String> {
        let source = expand_wikilinks(markdown);
        let parser = TextMergeStream::new(Parser::new_ext(&source, markdown_options()));

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<CodeBlock> = None;
        let mut open_links: Vec<OpenLink> = Vec::new();
        let mut image_depth = 0usize;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) => {
                            let lang = lang.split_whitespace().next().unwrap_or("").to_string();
                            if lang.is_empty() {
                                None
                            } else {
                                Some(lang)
                            }
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some(CodeBlock {
                        lang,
                        content: String::new(),
                    });
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(block) = code_block.take() {
                        let highlighted = self.highlight_code(&block.content, block.lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some(block) = code_block.as_mut() {
                        block.content.push_str(&text);
                    }
                }
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    ..
                }) => {
                    let title_attr = if title.is_empty() {
                        String::new()
                    } else {
                        format!(r#" title="{}""#, html_escape(&title))
                    };

                    match resolve_link(current, &dest_url) {
                        Some(url) => {
                            let class = if graph.contains(&url) {
                                "internal-link"
                            } else {
                                "internal-link dangling"
                            };
                            events.push(Event::InlineHtml(CowStr::from(format!(
                                r#"<span class="wikilink"><a href="{}" class="{}" data-note="{}"{}>"#,
                                html_escape(&note_href(&self.root, &url)),
                                class,
                                html_escape(&url),
                                title_attr
                            ))));
                            open_links.push(OpenLink::Note { url });
                        }
                        None => {
                            let href = if link_type == LinkType::Email {
                                format!("mailto:{}", dest_url)
                            } else {
                                dest_url.to_string()
                            };
                            events.push(Event::InlineHtml(CowStr::from(format!(
                                r#"<a href="{}" class="external-link"{}>"#,
                                html_escape(&href),
                                title_attr
                            ))));
                            open_links.push(OpenLink::External);
                        }
                    }
                }
                Event::End(TagEnd::Link) => match open_links.pop() {
                    Some(OpenLink::Note { url }) => {
                        let popup = graph
                            .get(&url)
                            .filter(|post| !post.content.trim().is_empty())
                            .map(|post| {
                                format!(
                                    r#"<span class="linkPopup hidden" role="tooltip">{}</span>"#,
                                    self.render_preview(&post.content)
                                )
                            })
                            .unwrap_or_default();
                        events.push(Event::InlineHtml(CowStr::from(format!(
                            "</a>{}</span>",
                            popup
                        ))));
                    }
                    Some(OpenLink::External) | None => {
                        events.push(Event::InlineHtml(CowStr::Borrowed("</a>")));
                    }
                },
                Event::Start(Tag::Image { .. }) => {
                    image_depth += 1;
                    events.push(event);
                }
                Event::End(TagEnd::Image) => {
                    image_depth = image_depth.saturating_sub(1);
                    events.push(event);
                }
                Event::Text(text) if image_depth == 0 && text.contains("==") => {
                    events.push(Event::InlineHtml(CowStr::from(highlight_marks(&text))));
                }
                Event::Start(Tag::Table(_)) => {
                    events.push(Event::Html(CowStr::Borrowed(
                        "<div class=\"table-wrapper\">\n",
                    )));
                    events.push(event);
                }
                Event::End(TagEnd::Table) => {
                    events.push(event);
                    events.push(Event::Html(CowStr::Borrowed("</div>\n")));
                }
                event => events.push(paragraph_as_div(event)),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Plain rendering used for hover previews: no link annotation, no
    /// highlighting of code
    pub fn render_preview(&self, markdown: &str) -> String {
        let source = expand_wikilinks(markdown);
        let parser = Parser::new_ext(&source, markdown_options()).map(paragraph_as_div);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        html_output
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");
        let plain = || {
            format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            )
        };

        if !self.highlight {
            return plain();
        }

        // Try to find syntax for the language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Some(theme) = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
        else {
            return plain();
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => {
                if self.line_numbers {
                    self.add_line_numbers(&highlighted, lang)
                } else {
                    format!(
                        r#"<pre><code class="language-{}">{}</code></pre>"#,
                        html_escape(lang),
                        highlighted
                    )
                }
            }
            Err(e) => {
                tracing::debug!("Highlighting failed for {}: {}", lang, e);
                plain()
            }
        }
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        let lines: Vec<&str> = code.lines().collect();

        let gutter = (1..=lines.len())
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<figure class="code-block {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
            html_escape(lang),
            gutter,
            lines.join("\n")
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Paragraphs render as `<div class="paragraph">`. A `<p>` would be closed
/// by the browser at the first block element inside a link preview.
fn paragraph_as_div(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Start(Tag::Paragraph) => Event::Html(CowStr::Borrowed("<div class=\"paragraph\">")),
        Event::End(TagEnd::Paragraph) => Event::Html(CowStr::Borrowed("</div>\n")),
        event => event,
    }
}

/// Escape text and turn `==marked==` runs into highlight spans
fn highlight_marks(text: &str) -> String {
    HIGHLIGHT_MARK
        .replace_all(&html_escape(text), r#"<span class="highlight">$1</span>"#)
        .into_owned()
}

/// Simple HTML escaping
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
