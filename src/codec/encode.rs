//! Markdown text to blocks.

use super::block::{ContentBlock, HeadingLevel};

/// Marker that opens and closes a code block.
pub const FENCE: &str = "```";

/// Classification of a single source line.
///
/// Fences and headings must start at the first column; list items and
/// quotes may be indented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    Blank,
    Fence { language: &'a str },
    Heading { depth: usize, text: &'a str },
    Bullet(&'a str),
    Numbered(&'a str),
    Quote(&'a str),
    Text,
}

pub(crate) fn classify(line: &str) -> Line<'_> {
    let body = line.trim_start();
    if body.is_empty() {
        return Line::Blank;
    }

    if let Some(rest) = line.strip_prefix(FENCE) {
        return Line::Fence {
            language: rest.trim(),
        };
    }

    if line.starts_with('#') {
        let rest = line.trim_start_matches('#');
        return Line::Heading {
            depth: line.len() - rest.len(),
            text: rest.trim(),
        };
    }

    if let Some(text) = body.strip_prefix(['-', '*', '+']).and_then(item_text) {
        return Line::Bullet(text);
    }

    let digits = body.len() - body.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(text) = body[digits..].strip_prefix('.').and_then(item_text) {
            return Line::Numbered(text);
        }
    }

    if let Some(rest) = body.strip_prefix('>') {
        return Line::Quote(rest.trim());
    }

    Line::Text
}

/// A list marker counts only when followed by whitespace, so `-x`, `1.5`
/// or a lone `-` stay plain text.
fn item_text(rest: &str) -> Option<&str> {
    match rest.chars().next() {
        Some(c) if c.is_whitespace() => Some(rest.trim_start()),
        _ => None,
    }
}

fn is_fence(line: &str) -> bool {
    line.starts_with(FENCE)
}

/// Parses markdown text into an ordered block sequence.
///
/// Never fails: any line that isn't a recognized marker becomes part of a
/// paragraph. Blank lines only separate paragraphs. Consecutive text lines
/// are trimmed and joined with a single space; a marker line ends the
/// paragraph without being consumed by it.
pub fn encode(text: &str) -> Vec<ContentBlock> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;

        match classify(line) {
            Line::Blank => {}
            Line::Fence { language } => {
                let mut code = Vec::new();
                while i < lines.len() {
                    let next = lines[i];
                    i += 1;
                    if is_fence(next) {
                        break;
                    }
                    code.push(next);
                }
                blocks.push(ContentBlock::code(language, code.join("\n")));
            }
            Line::Heading { depth, text } => {
                blocks.push(ContentBlock::heading(HeadingLevel::from_depth(depth), text));
            }
            Line::Bullet(text) => blocks.push(ContentBlock::bulleted(text)),
            Line::Numbered(text) => blocks.push(ContentBlock::numbered(text)),
            Line::Quote(text) => blocks.push(ContentBlock::quote(text)),
            Line::Text => {
                let mut parts = vec![line.trim()];
                while i < lines.len() {
                    match classify(lines[i]) {
                        Line::Blank => {
                            i += 1;
                            break;
                        }
                        Line::Text => {
                            parts.push(lines[i].trim());
                            i += 1;
                        }
                        _ => break,
                    }
                }
                blocks.push(ContentBlock::paragraph(parts.join(" ")));
            }
        }
    }

    blocks
}
