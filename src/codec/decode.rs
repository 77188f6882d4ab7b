//! Blocks to markdown text.

use super::block::{ContentBlock, HeadingLevel};
use super::encode::{classify, encode, Line, FENCE};

/// Renders a block sequence as markdown text.
///
/// Each block becomes one line, or a fenced group of lines for code.
/// Numbered items are renumbered from 1, and the counter restarts after any
/// other block. Level-3 headings are written as bare text with no `###`
/// prefix. The output ends with a newline unless no block produced a line.
pub fn decode(blocks: &[ContentBlock]) -> String {
    let mut normalized = Vec::with_capacity(blocks.len());
    for block in blocks {
        flatten_plain(block, &mut normalized);
    }

    let mut lines: Vec<String> = Vec::new();
    let mut counter = 1;
    let mut previous_plain = false;

    for block in &normalized {
        match block {
            ContentBlock::Paragraph(text)
            | ContentBlock::Heading {
                level: HeadingLevel::Three,
                text,
            } => {
                // Two bare lines in a row would merge into one paragraph.
                if previous_plain {
                    lines.push(String::new());
                }
                lines.push(text.clone());
            }
            ContentBlock::Heading {
                level: HeadingLevel::One,
                text,
            } => lines.push(format!("# {}", text)),
            ContentBlock::Heading {
                level: HeadingLevel::Two,
                text,
            } => lines.push(format!("## {}", text)),
            ContentBlock::BulletedItem(text) => lines.push(format!("- {}", text)),
            ContentBlock::NumberedItem(text) => {
                lines.push(format!("{}. {}", counter, text));
                counter += 1;
            }
            ContentBlock::Quote(text) => lines.push(format!("> {}", text)),
            ContentBlock::Code { language, text } => {
                lines.push(format!("{}{}", FENCE, language));
                lines.extend(text.split('\n').map(str::to_string));
                lines.push(FENCE.to_string());
            }
        }

        if !matches!(block, ContentBlock::NumberedItem(_)) {
            counter = 1;
        }
        previous_plain = block.is_plain_line();
    }

    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Bare-text blocks are written verbatim, so their payload must already read
/// back as a single paragraph line. Anything else (blank, multi-line, padded,
/// or starting with a block marker) is replaced by what its text parses to.
fn flatten_plain(block: &ContentBlock, out: &mut Vec<ContentBlock>) {
    if block.is_plain_line() && !reads_back_as_paragraph(block.text()) {
        for inner in encode(block.text()) {
            flatten_plain(&inner, out);
        }
    } else {
        out.push(block.clone());
    }
}

fn reads_back_as_paragraph(text: &str) -> bool {
    !text.contains('\n') && text.trim() == text && classify(text) == Line::Text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(text: &str) -> String {
        decode(&encode(text))
    }

    #[test]
    fn test_empty_blocks_decode_to_empty_string() {
        assert_eq!(decode(&[]), "");
    }

    #[test]
    fn test_numbering_restarts_after_other_block() {
        let blocks = vec![
            ContentBlock::numbered("a"),
            ContentBlock::numbered("b"),
            ContentBlock::paragraph("x"),
            ContentBlock::numbered("c"),
        ];
        assert_eq!(decode(&blocks), "1. a\n2. b\nx\n1. c\n");
    }

    #[test]
    fn test_level_three_heading_decodes_to_bare_text() {
        let blocks = encode("#### deep");
        assert_eq!(blocks, vec![ContentBlock::heading(HeadingLevel::Three, "deep")]);
        assert_eq!(decode(&blocks), "deep\n");
    }

    #[test]
    fn test_every_kind() {
        let blocks = vec![
            ContentBlock::heading(HeadingLevel::One, "Title"),
            ContentBlock::heading(HeadingLevel::Two, "Section"),
            ContentBlock::paragraph("Body text."),
            ContentBlock::bulleted("point"),
            ContentBlock::numbered("step"),
            ContentBlock::quote("wise words"),
            ContentBlock::code("rust", "let a = 1;\nlet b = 2;"),
        ];
        assert_eq!(
            decode(&blocks),
            "# Title\n## Section\nBody text.\n- point\n1. step\n> wise words\n```rust\nlet a = 1;\nlet b = 2;\n```\n"
        );
    }

    #[test]
    fn test_empty_code_block_keeps_one_line() {
        let blocks = vec![ContentBlock::code("plain text", "")];
        assert_eq!(decode(&blocks), "```plain text\n\n```\n");
        assert_eq!(encode(&decode(&blocks)), blocks);
    }

    #[test]
    fn test_adjacent_paragraphs_stay_separate() {
        let blocks = vec![ContentBlock::paragraph("one"), ContentBlock::paragraph("two")];
        assert_eq!(decode(&blocks), "one\n\ntwo\n");
        assert_eq!(encode(&decode(&blocks)), blocks);
    }

    #[test]
    fn test_blank_paragraphs_are_dropped() {
        let blocks = vec![
            ContentBlock::numbered("a"),
            ContentBlock::paragraph(""),
            ContentBlock::paragraph("   "),
            ContentBlock::numbered("b"),
        ];
        assert_eq!(decode(&blocks), "1. a\n2. b\n");
    }

    #[test]
    fn test_marker_text_in_plain_block_is_normalized() {
        let blocks = vec![
            ContentBlock::numbered("a"),
            ContentBlock::heading(HeadingLevel::Three, "1. b"),
            ContentBlock::paragraph("  padded\nacross lines"),
        ];
        assert_eq!(decode(&blocks), "1. a\n2. b\npadded across lines\n");
    }

    #[test]
    fn test_restricted_roundtrip_preserves_kind_and_text() {
        let blocks = vec![
            ContentBlock::heading(HeadingLevel::One, "Doc"),
            ContentBlock::paragraph("Intro paragraph."),
            ContentBlock::heading(HeadingLevel::Two, "Part"),
            ContentBlock::bulleted("alpha"),
            ContentBlock::bulleted("beta"),
            ContentBlock::quote("quoted"),
            ContentBlock::code("plain text", "line one\n  indented\n"),
            ContentBlock::paragraph("Closing."),
            ContentBlock::paragraph("Another."),
        ];
        assert_eq!(encode(&decode(&blocks)), blocks);
    }

    #[test]
    fn test_numbered_and_level_three_are_lossy() {
        let blocks = vec![
            ContentBlock::heading(HeadingLevel::Three, "minor"),
            ContentBlock::numbered("x"),
        ];
        assert_eq!(
            encode(&decode(&blocks)),
            vec![ContentBlock::paragraph("minor"), ContentBlock::numbered("x")]
        );
    }

    #[test]
    fn test_roundtrip_is_idempotent() {
        let samples = [
            "",
            "\n\n",
            "# Title\n\nSome text.\n",
            "a\n\nb\n",
            "### x\ny\n",
            "1.\nfoo\n",
            "  # indented heading\n",
            "```rust\nfn main() {}\n",
            "```\n\n\n```\n",
            "- a\n* b\n+ c\n  - nested\n",
            "> quoted\n>\n",
            "####\n",
            "1. a\n\n\n2. b\nplain\n3. c",
            "text   \n   more\n# H\n",
            "a\r\nb\r\n",
            "### 1. tricky\n### ```\nafter fence\n",
            "### # nested\n- - dash\n>> double\n",
            "intro\n```js\nconsole.log(1)\n```\noutro\n",
            "#\n##\n###\n-\n1.\n>\n",
        ];
        for sample in samples {
            let once = roundtrip(sample);
            assert_eq!(roundtrip(&once), once, "not stable for {:?}", sample);
        }
    }

    #[test]
    fn test_roundtrip_normalizes_document() {
        let text = "# Notes\n\n\n5. first\n9. second\n\nwrapped\nparagraph\n#### minor\n";
        assert_eq!(
            roundtrip(text),
            "# Notes\n1. first\n2. second\nwrapped paragraph\n\nminor\n"
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        const PIECES: &[&str] = &[
            " ", "\t", "a", "b", "#", "-", "*", "+", "1", "2", ".", ">", "`", "```", "\n", "\r\n",
        ];
        const LANGUAGES: &[&str] = &["rust", "plain text", "js"];

        fn arb_text() -> impl Strategy<Value = String> {
            prop::collection::vec(prop::sample::select(PIECES), 0..30).prop_map(|p| p.concat())
        }

        fn arb_words() -> impl Strategy<Value = String> {
            prop::collection::vec("[abcxyz]{1,5}", 1..5).prop_map(|w| w.join(" "))
        }

        fn arb_code_line() -> impl Strategy<Value = String> {
            "[ a#`1.>\t-]{0,10}".prop_filter("closes the fence", |l| !l.starts_with(FENCE))
        }

        fn arb_block() -> impl Strategy<Value = ContentBlock> {
            prop_oneof![
                arb_words().prop_map(|t| ContentBlock::paragraph(t)),
                arb_words().prop_map(|t| ContentBlock::heading(HeadingLevel::One, t)),
                arb_words().prop_map(|t| ContentBlock::heading(HeadingLevel::Two, t)),
                arb_words().prop_map(|t| ContentBlock::bulleted(t)),
                arb_words().prop_map(|t| ContentBlock::quote(t)),
                (
                    prop::sample::select(LANGUAGES),
                    prop::collection::vec(arb_code_line(), 1..5),
                )
                    .prop_map(|(language, lines)| ContentBlock::code(language, lines.join("\n"))),
            ]
        }

        proptest! {
            #[test]
            fn prop_roundtrip_is_idempotent(text in arb_text()) {
                let once = roundtrip(&text);
                prop_assert_eq!(roundtrip(&once), once);
            }

            #[test]
            fn prop_restricted_blocks_survive_roundtrip(
                blocks in prop::collection::vec(arb_block(), 0..9)
            ) {
                prop_assert_eq!(encode(&decode(&blocks)), blocks);
            }
        }
    }
}
