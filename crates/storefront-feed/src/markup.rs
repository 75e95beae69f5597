//! Text-to-HTML helpers shared by the site generator and the card renderers.

use pulldown_cmark::{html, Options, Parser};

/// Escape text for use in HTML content and double- or single-quoted attributes.
pub fn escape_html(text: &str) -> String {
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

/// Render owner-written copy (Markdown) to HTML.
pub fn rich_text(markdown: &str) -> String {
    if markdown.trim().is_empty() {
        return String::new();
    }

    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(markdown, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}

/// Render the light markup used in feed cells.
///
/// Escapes the text, turns each line break into a paragraph gap and
/// `**text**` into bold. An unpaired `**` is left as-is. The runtime script
/// applies the same rules in the browser.
pub fn inline_markup(text: &str) -> String {
    let escaped = escape_html(&text.replace("\r\n", "\n")).replace('\n', "<br><br>");

    let parts: Vec<&str> = escaped.split("**").collect();
    let closed = if parts.len() % 2 == 1 {
        parts.len()
    } else {
        parts.len() - 1
    };

    let mut out = String::with_capacity(escaped.len());
    for (i, part) in parts.iter().enumerate() {
        if i % 2 == 0 {
            out.push_str(part);
        } else if i < closed {
            out.push_str("<strong>");
            out.push_str(part);
            out.push_str("</strong>");
        } else {
            out.push_str("**");
            out.push_str(part);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn renders_markdown_copy() {
        let html = rich_text("**The Trap**\n\n* one\n* two");

        assert!(html.contains("<strong>The Trap</strong>"));
        assert!(html.contains("<li>one</li>"));
        assert_eq!(rich_text("   "), "");
    }

    #[test]
    fn inline_markup_handles_bold_and_breaks() {
        assert_eq!(
            inline_markup("**Hello** world\r\nnext"),
            "<strong>Hello</strong> world<br><br>next"
        );
    }

    #[test]
    fn inline_markup_leaves_unpaired_marker() {
        assert_eq!(inline_markup("a**b**c**d"), "a<strong>b</strong>c**d");
        assert_eq!(inline_markup("<b>"), "&lt;b&gt;");
    }
}
