//! Markdown rendering for blog and project bodies.
//!
//! Bodies are written in the dashboard editor. Raw HTML in the source is shown
//! as text rather than injected into the page, and link or image targets with
//! a scheme other than http, https or mailto are replaced by `#`.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html::push_html};

/// Whether a link or image destination is safe to emit. Relative paths and
/// fragments pass; a scheme must be http, https or mailto.
fn is_safe_destination(dest: &str) -> bool {
    // Browsers ignore whitespace and control characters inside a scheme.
    let compact: String = dest
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    let end = compact.find(['/', '?', '#']).unwrap_or(compact.len());
    match compact[..end].split_once(':') {
        Some((scheme, _)) => matches!(scheme, "http" | "https" | "mailto"),
        None => true,
    }
}

fn checked(dest: CowStr<'_>) -> CowStr<'_> {
    if is_safe_destination(&dest) {
        dest
    } else {
        CowStr::Borrowed("#")
    }
}

/// Render Markdown to HTML with tables, strikethrough and task lists enabled.
pub fn render(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) => Event::Start(Tag::Link {
            link_type,
            dest_url: checked(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image { link_type, dest_url, title, id }) => Event::Start(Tag::Image {
            link_type,
            dest_url: checked(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    push_html(&mut out, parser);
    out
}

/// First paragraph of plain text, cut to `max_chars`, for list excerpts.
pub fn excerpt(source: &str, max_chars: usize) -> String {
    let text: String = Parser::new(source)
        .take_while(|event| !matches!(event, Event::End(pulldown_cmark::TagEnd::Paragraph)))
        .filter_map(|event| match event {
            Event::Text(text) | Event::Code(text) => Some(text.into_string()),
            Event::SoftBreak | Event::HardBreak => Some(" ".to_string()),
            _ => None,
        })
        .collect();

    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}
