//! HTML preview of markdown text.
//!
//! Rendering goes through [`encode`], so the preview shows exactly the
//! structure that would be pushed to the remote document.

use super::block::{ContentBlock, HeadingLevel};
use super::encode::encode;

/// Renders markdown text to an HTML fragment.
pub fn render_html(text: &str) -> String {
    let blocks = encode(text);
    let mut html = String::new();
    let mut open_list: Option<&'static str> = None;

    for block in &blocks {
        let wanted = match block {
            ContentBlock::BulletedItem(_) => Some("ul"),
            ContentBlock::NumberedItem(_) => Some("ol"),
            _ => None,
        };
        if open_list != wanted {
            if let Some(tag) = open_list {
                html.push_str(&format!("</{}>\n", tag));
            }
            if let Some(tag) = wanted {
                html.push_str(&format!("<{}>\n", tag));
            }
            open_list = wanted;
        }

        match block {
            ContentBlock::Paragraph(text) => push_element(&mut html, "p", text),
            ContentBlock::Heading { level, text } => {
                let tag = match level {
                    HeadingLevel::One => "h1",
                    HeadingLevel::Two => "h2",
                    HeadingLevel::Three => "h3",
                };
                push_element(&mut html, tag, text);
            }
            ContentBlock::BulletedItem(text) | ContentBlock::NumberedItem(text) => {
                push_element(&mut html, "li", text)
            }
            ContentBlock::Quote(text) => push_element(&mut html, "blockquote", text),
            ContentBlock::Code { language, text } => {
                html.push_str(&format!(
                    "<pre><code class=\"language-{}\">{}</code></pre>\n",
                    escape(&language.replace(' ', "-")),
                    escape(text)
                ));
            }
        }
    }

    if let Some(tag) = open_list {
        html.push_str(&format!("</{}>\n", tag));
    }
    html
}

fn push_element(html: &mut String, tag: &str, text: &str) {
    html.push_str(&format!("<{tag}>{}</{tag}>\n", escape(text)));
}

fn escape(text: &str) -> String {
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
