//! Markdown to display-safe HTML.
//!
//! Raw HTML in the model output is escaped rather than passed through, and
//! links or images with a script-capable scheme lose their target.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let events = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let lowered = url.trim().to_ascii_lowercase();
    let unsafe_scheme = ["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme));
    if unsafe_scheme {
        CowStr::Borrowed("#")
    } else {
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_common_markdown() {
        let html = markdown_to_html("## Your week\n\nYou slept **7h 30m** on average.\n\n- Keep a schedule\n");
        assert!(html.contains("<h2>Your week</h2>"));
        assert!(html.contains("<strong>7h 30m</strong>"));
        assert!(html.contains("<li>Keep a schedule</li>"));
    }

    #[test]
    fn escapes_raw_html() {
        let html = markdown_to_html("Hello <script>alert(1)</script> there\n\n<div onclick=\"x\">block</div>\n");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<div"));
    }

    #[test]
    fn neutralizes_script_links() {
        let html = markdown_to_html("[click](javascript:alert(1)) and [docs](https://example.com)");
        assert!(!html.contains("javascript:"));
        assert!(html.contains("href=\"#\""));
        assert!(html.contains("href=\"https://example.com\""));
    }
}
