//! HTML rendering.
//!
//! Pages are assembled from small string builders. Every value that came from
//! the backend or the visitor goes through [`esc`] before it is interpolated.

pub mod auth;
pub mod dashboard;
pub mod layout;
pub mod site;

use chrono::{DateTime, Utc};

use crate::search::{PageSlice, page_window};

/// Escape text for use in HTML content and double-quoted attributes.
pub fn esc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Only http(s) and site-relative URLs are rendered as links or images.
pub fn safe_url(url: &str) -> Option<String> {
    let url = url.trim();
    let allowed = url.starts_with("https://")
        || url.starts_with("http://")
        || (url.starts_with('/') && !url.starts_with("//"));
    allowed.then(|| esc(url))
}

pub fn format_date(date: &Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

/// Inline error banner shown above forms and lists.
pub fn banner(error: Option<&str>) -> String {
    match error {
        Some(message) => format!(
            r#"<div class="banner banner-error" role="alert">{}</div>"#,
            esc(message)
        ),
        None => String::new(),
    }
}

/// Pager links. `link` maps a page number to its href (already escaped).
pub fn pager<T>(slice: &PageSlice<T>, link: impl Fn(usize) -> String) -> String {
    if slice.total_pages <= 1 {
        return String::new();
    }
    let mut html = String::from(r#"<nav class="pager" aria-label="Pagination">"#);
    if slice.has_prev {
        html.push_str(&format!(r#"<a rel="prev" href="{}">Previous</a>"#, link(slice.page - 1)));
    }
    for page in page_window(slice.page, slice.total_pages, 5) {
        if page == slice.page {
            html.push_str(&format!(r#"<span aria-current="page">{page}</span>"#));
        } else {
            html.push_str(&format!(r#"<a href="{}">{page}</a>"#, link(page)));
        }
    }
    if slice.has_next {
        html.push_str(&format!(r#"<a rel="next" href="{}">Next</a>"#, link(slice.page + 1)));
    }
    html.push_str("</nav>");
    html
}

/// Text input with label, value preserved across re-renders.
pub fn text_field(name: &str, label: &str, value: &str, required: bool) -> String {
    format!(
        r#"<label>{label}<input type="text" name="{name}" value="{}"{}></label>"#,
        esc(value),
        if required { " required" } else { "" },
        label = esc(label),
        name = esc(name),
    )
}

pub fn textarea(name: &str, label: &str, value: &str, rows: u8) -> String {
    format!(
        r#"<label>{label}<textarea name="{name}" rows="{rows}">{}</textarea></label>"#,
        esc(value),
        label = esc(label),
        name = esc(name),
    )
}

pub fn checkbox(name: &str, label: &str, checked: bool) -> String {
    format!(
        r#"<label class="check"><input type="checkbox" name="{}"{}> {}</label>"#,
        esc(name),
        if checked { " checked" } else { "" },
        esc(label),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::paginate;

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            esc(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn unsafe_urls_are_dropped() {
        assert_eq!(safe_url("javascript:alert(1)"), None);
        assert_eq!(safe_url("//evil.example/x"), None);
        assert_eq!(safe_url("/uploads/a.png").as_deref(), Some("/uploads/a.png"));
        assert!(safe_url("https://example.com/?a=1&b=2").unwrap().contains("&amp;"));
    }

    #[test]
    fn pager_marks_current_page() {
        let slice = paginate((1..=20).collect::<Vec<u32>>(), 2, 5);
        let html = pager(&slice, |p| format!("?page={p}"));
        assert!(html.contains(r#"<span aria-current="page">2</span>"#));
        assert!(html.contains(r#"href="?page=1">Previous"#));
        assert!(html.contains(r#"href="?page=3">Next"#));
    }

    #[test]
    fn single_page_has_no_pager() {
        let slice = paginate(vec![1, 2], 1, 5);
        assert!(pager(&slice, |p| p.to_string()).is_empty());
    }

    #[test]
    fn fields_escape_values() {
        let html = text_field("title", "Title", r#""><script>"#, true);
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
        assert!(html.contains(" required"));
    }
}
