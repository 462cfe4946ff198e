//! HTML rendering of a [`ThinkableView`].
//!
//! Each annotation becomes a toggle link plus, only while expanded, its body.
//! The toggle links carry the whole display state in the query string, so
//! the page works without any client-side script.
//!
//! Text is handed to the caller's `render_text` unchanged: escaping (or
//! Markdown rendering) is the caller's decision.

use crate::thinkable::{Positioned, ThinkableView};

pub const SHOW_LABEL: &str = "Show reasoning";
pub const HIDE_LABEL: &str = "Hide reasoning";

pub fn render_thinkable<F>(view: &ThinkableView, base_href: &str, render_text: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut html = String::from(r#"<div class="thinkable-content">"#);

    for part in view.positioned() {
        match part {
            Positioned::Text(body) => {
                html.push_str("<span>");
                html.push_str(&render_text(body));
                html.push_str("</span>");
            }
            Positioned::Annotation { position, body } => {
                let expanded = view.state().is_expanded(position);
                html.push_str(&format!(
                    r##"<div class="think-block" id="thought-{pos}">
                        <a class="think-toggle{cls}" href="{base}?{query}#thought-{pos}"><span class="chevron">&#9656;</span> {label}</a>"##,
                    pos = position,
                    cls = if expanded { " expanded" } else { "" },
                    base = base_href,
                    query = view.toggled_query(position),
                    label = if expanded { HIDE_LABEL } else { SHOW_LABEL },
                ));
                if expanded {
                    html.push_str(r#"<div class="think-content">"#);
                    html.push_str(&render_text(body));
                    html.push_str("</div>");
                }
                html.push_str("</div>");
            }
        }
    }

    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::html_escape;
    use crate::thinkable::fingerprint;

    const CONTENT: &str = "intro<think>first</think>middle<think>second</think>";

    #[test]
    fn test_collapsed_hides_bodies() {
        let view = ThinkableView::new(CONTENT);
        let html = render_thinkable(&view, "/notes/n1", html_escape);
        assert!(html.contains("intro"));
        assert!(html.contains("middle"));
        assert!(!html.contains("first"));
        assert!(!html.contains("second"));
        assert_eq!(html.matches(SHOW_LABEL).count(), 2);
    }

    #[test]
    fn test_expanded_shows_only_that_body() {
        let view = ThinkableView::restore(CONTENT, Some(&fingerprint(CONTENT)), &[1]);
        let html = render_thinkable(&view, "/notes/n1", html_escape);
        assert!(!html.contains("first"));
        assert!(html.contains(r#"<div class="think-content">second</div>"#));
        assert_eq!(html.matches(HIDE_LABEL).count(), 1);
        assert_eq!(html.matches(SHOW_LABEL).count(), 1);
    }

    #[test]
    fn test_text_goes_through_caller_renderer() {
        let view = ThinkableView::new("<b>bold</b>");
        let raw = render_thinkable(&view, "/x", |s| s.to_string());
        assert!(raw.contains("<span><b>bold</b></span>"));
        let escaped = render_thinkable(&view, "/x", html_escape);
        assert!(escaped.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn test_toggle_link_targets_next_state() {
        let view = ThinkableView::new(CONTENT);
        let html = render_thinkable(&view, "/notes/n1", html_escape);
        let fp = fingerprint(CONTENT);
        assert!(html.contains(&format!("/notes/n1?rev={}&open=0#thought-0", fp)));
        assert!(html.contains(&format!("/notes/n1?rev={}&open=1#thought-1", fp)));
    }
}
