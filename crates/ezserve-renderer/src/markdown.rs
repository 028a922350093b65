//! Markdown to HTML conversion.
//!
//! pulldown-cmark with tables, footnotes, strikethrough and task lists,
//! plus slugified `id` anchors injected on headings so in-page links and
//! tables of contents work without a separate pass.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html::push_html};

/// Convert markdown text to an HTML body fragment.
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options);
    let events = inject_heading_anchors(parser);

    let mut html = String::with_capacity(markdown.len() * 2);
    push_html(&mut html, events.into_iter());
    html
}

/// Slugify heading text for use as an `id` attribute.
///
/// Lowercases, collapses non-alphanumeric runs into single hyphens,
/// strips leading/trailing hyphens.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut prev_hyphen = true;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn heading_level_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Buffer heading events and re-emit them with an `id` anchor.
fn inject_heading_anchors<'a>(parser: Parser<'a>) -> Vec<Event<'a>> {
    let mut events: Vec<Event<'a>> = Vec::new();
    let mut in_heading: Option<HeadingLevel> = None;
    let mut heading_text = String::new();
    let mut heading_events: Vec<Event<'a>> = Vec::new();

    for event in parser {
        match &event {
            Event::Start(Tag::Heading { level, .. }) => {
                in_heading = Some(*level);
                heading_text.clear();
                heading_events.clear();
                heading_events.push(event);
            }
            Event::End(TagEnd::Heading(level)) if in_heading == Some(*level) => {
                let slug = slugify(&heading_text);
                let level_num = heading_level_num(*level);

                if slug.is_empty() {
                    events.extend(heading_events.drain(..));
                    events.push(event);
                } else {
                    events.push(Event::Html(
                        format!("<h{level_num} id=\"{slug}\">").into(),
                    ));
                    // Inner events minus the buffered Start(Heading)
                    for e in heading_events.drain(..).skip(1) {
                        events.push(e);
                    }
                    events.push(Event::Html(format!("</h{level_num}>").into()));
                }
                in_heading = None;
            }
            Event::Text(text) if in_heading.is_some() => {
                heading_text.push_str(text);
                heading_events.push(event);
            }
            Event::Code(code) if in_heading.is_some() => {
                heading_text.push_str(code);
                heading_events.push(event);
            }
            _ if in_heading.is_some() => {
                heading_events.push(event);
            }
            _ => {
                events.push(event);
            }
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_basic_conversion() {
        let html = markdown_to_html("# Hello\n\nWorld");
        assert!(html.contains(r#"<h1 id="hello">"#));
        assert!(html.contains("<p>World</p>"));
    }

    #[test]
    fn test_heading_anchor_slug() {
        let html = markdown_to_html("## The Water System\n");
        assert!(html.contains(r#"<h2 id="the-water-system">"#));
    }

    #[test]
    fn test_tables() {
        let html = markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_footnotes() {
        let html = markdown_to_html("text[^1]\n\n[^1]: the note\n");
        assert!(html.contains("footnote"));
        assert!(html.contains("the note"));
    }

    #[test]
    fn test_blockquote_soft_breaks_keep_newlines() {
        let html = markdown_to_html("> ez-Note\n> continued line\n");
        assert!(html.contains("<blockquote>"));
        assert!(html.contains("ez-Note\ncontinued line"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Leading & Trailing  "), "leading-trailing");
        assert_eq!(slugify("CamelCase123"), "camelcase123");
    }

    #[test]
    fn test_malformed_markdown_degrades() {
        let html = markdown_to_html("[broken link(\n\n****\n");
        assert!(!html.is_empty());
    }
}
