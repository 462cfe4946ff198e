//! Note content processing: escaping, Markdown rendering, and the small
//! presentation helpers shared by the handlers (dates, tag links, tag cloud
//! sizing).

use chrono::{DateTime, Utc};
use pulldown_cmark::{Options, Parser};

// ============================================================================
// Text Escaping
// ============================================================================

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape and keep line breaks, for plain text shown inside HTML.
pub fn html_escape_multiline(s: &str) -> String {
    html_escape(s).replace('\n', "<br>")
}

// ============================================================================
// Markdown Rendering
// ============================================================================

pub fn render_markdown(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(content, options);
    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    // Raw HTML in notes is allowed but sanitized
    ammonia::clean(&html_output)
}

// ============================================================================
// Presentation Helpers
// ============================================================================

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

pub fn tag_href(tag: &str) -> String {
    format!("/tags/{}", urlencoding::encode(tag))
}

/// Tag chips linking to each tag's page.
pub fn tag_chips(tags: &[String]) -> String {
    tags.iter()
        .map(|t| {
            format!(
                r#"<a class="tag-chip {}" href="{}">{}</a>"#,
                tag_color_class(t),
                tag_href(t),
                html_escape(t)
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Font size bucket for a tag cloud entry, relative to the most used tag.
pub fn tag_size_class(count: usize, max: usize) -> &'static str {
    if max <= 1 {
        return "tag-size-base";
    }
    let ratio = count as f64 / max as f64;
    if ratio >= 0.8 {
        "tag-size-xl"
    } else if ratio >= 0.6 {
        "tag-size-lg"
    } else if ratio >= 0.4 {
        "tag-size-md"
    } else if ratio >= 0.2 {
        "tag-size-base"
    } else {
        "tag-size-sm"
    }
}

const TAG_COLORS: [&str; 8] = [
    "tag-blue",
    "tag-green",
    "tag-yellow",
    "tag-violet",
    "tag-magenta",
    "tag-orange",
    "tag-red",
    "tag-cyan",
];

/// Deterministic color class so a tag looks the same on every page.
pub fn tag_color_class(tag: &str) -> &'static str {
    let hash = tag
        .chars()
        .fold(0i32, |h, c| h.wrapping_shl(5).wrapping_sub(h).wrapping_add(c as i32));
    TAG_COLORS[(hash.unsigned_abs() as usize) % TAG_COLORS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_render_markdown_sanitizes() {
        let html = render_markdown("# Title\n\n<script>alert(1)</script>\n\n~~old~~");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<del>old</del>"));
    }

    #[test]
    fn test_tag_size_buckets() {
        assert_eq!(tag_size_class(1, 1), "tag-size-base");
        assert_eq!(tag_size_class(10, 10), "tag-size-xl");
        assert_eq!(tag_size_class(6, 10), "tag-size-lg");
        assert_eq!(tag_size_class(4, 10), "tag-size-md");
        assert_eq!(tag_size_class(2, 10), "tag-size-base");
        assert_eq!(tag_size_class(1, 10), "tag-size-sm");
    }

    #[test]
    fn test_tag_color_is_stable() {
        assert_eq!(tag_color_class("rust"), tag_color_class("rust"));
        assert!(TAG_COLORS.contains(&tag_color_class("机器学习")));
    }

    #[test]
    fn test_tag_href_encodes() {
        assert_eq!(tag_href("c++ tips"), "/tags/c%2B%2B%20tips");
    }
}
