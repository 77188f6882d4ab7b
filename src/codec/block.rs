//! Typed content blocks.

use serde::Serialize;

/// Language tag used for code blocks that don't name one.
pub const DEFAULT_CODE_LANGUAGE: &str = "plain text";

/// Heading level, clamped to the three levels the remote service supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HeadingLevel {
    One,
    Two,
    Three,
}

impl HeadingLevel {
    /// Clamps a markdown heading depth (number of `#`) to a level.
    ///
    /// Depth 1 and 2 map directly; anything else becomes level 3.
    pub fn from_depth(depth: usize) -> Self {
        match depth {
            1 => HeadingLevel::One,
            2 => HeadingLevel::Two,
            _ => HeadingLevel::Three,
        }
    }
}

/// The kinds of block the codec models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletedListItem,
    NumberedListItem,
    Quote,
    Code,
}

impl BlockKind {
    /// Returns the remote type name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Heading1 => "heading_1",
            BlockKind::Heading2 => "heading_2",
            BlockKind::Heading3 => "heading_3",
            BlockKind::BulletedListItem => "bulleted_list_item",
            BlockKind::NumberedListItem => "numbered_list_item",
            BlockKind::Quote => "quote",
            BlockKind::Code => "code",
        }
    }

    /// Parse from a remote type name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paragraph" => Some(BlockKind::Paragraph),
            "heading_1" => Some(BlockKind::Heading1),
            "heading_2" => Some(BlockKind::Heading2),
            "heading_3" => Some(BlockKind::Heading3),
            "bulleted_list_item" => Some(BlockKind::BulletedListItem),
            "numbered_list_item" => Some(BlockKind::NumberedListItem),
            "quote" => Some(BlockKind::Quote),
            "code" => Some(BlockKind::Code),
            _ => None,
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flat unit of document content.
///
/// Every block carries a single plain-text payload; there is no inline
/// formatting and no nesting. Blocks have no identity of their own: order in
/// the surrounding sequence is all that matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Paragraph(String),
    Heading { level: HeadingLevel, text: String },
    BulletedItem(String),
    NumberedItem(String),
    Quote(String),
    Code { language: String, text: String },
}

impl ContentBlock {
    pub fn paragraph(text: impl Into<String>) -> Self {
        ContentBlock::Paragraph(text.into())
    }

    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        ContentBlock::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn bulleted(text: impl Into<String>) -> Self {
        ContentBlock::BulletedItem(text.into())
    }

    pub fn numbered(text: impl Into<String>) -> Self {
        ContentBlock::NumberedItem(text.into())
    }

    pub fn quote(text: impl Into<String>) -> Self {
        ContentBlock::Quote(text.into())
    }

    /// Creates a code block; an empty language falls back to
    /// [`DEFAULT_CODE_LANGUAGE`].
    pub fn code(language: impl Into<String>, text: impl Into<String>) -> Self {
        let language = language.into();
        ContentBlock::Code {
            language: if language.trim().is_empty() {
                DEFAULT_CODE_LANGUAGE.to_string()
            } else {
                language
            },
            text: text.into(),
        }
    }

    /// Creates a block of the given kind with an empty payload.
    pub fn empty(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Paragraph => ContentBlock::paragraph(""),
            BlockKind::Heading1 => ContentBlock::heading(HeadingLevel::One, ""),
            BlockKind::Heading2 => ContentBlock::heading(HeadingLevel::Two, ""),
            BlockKind::Heading3 => ContentBlock::heading(HeadingLevel::Three, ""),
            BlockKind::BulletedListItem => ContentBlock::bulleted(""),
            BlockKind::NumberedListItem => ContentBlock::numbered(""),
            BlockKind::Quote => ContentBlock::quote(""),
            BlockKind::Code => ContentBlock::code(DEFAULT_CODE_LANGUAGE, ""),
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            ContentBlock::Paragraph(_) => BlockKind::Paragraph,
            ContentBlock::Heading { level, .. } => match level {
                HeadingLevel::One => BlockKind::Heading1,
                HeadingLevel::Two => BlockKind::Heading2,
                HeadingLevel::Three => BlockKind::Heading3,
            },
            ContentBlock::BulletedItem(_) => BlockKind::BulletedListItem,
            ContentBlock::NumberedItem(_) => BlockKind::NumberedListItem,
            ContentBlock::Quote(_) => BlockKind::Quote,
            ContentBlock::Code { .. } => BlockKind::Code,
        }
    }

    /// The block's plain-text payload.
    pub fn text(&self) -> &str {
        match self {
            ContentBlock::Paragraph(text)
            | ContentBlock::Heading { text, .. }
            | ContentBlock::BulletedItem(text)
            | ContentBlock::NumberedItem(text)
            | ContentBlock::Quote(text)
            | ContentBlock::Code { text, .. } => text,
        }
    }

    /// True for blocks that decode to an unmarked line of text.
    pub(crate) fn is_plain_line(&self) -> bool {
        matches!(
            self,
            ContentBlock::Paragraph(_)
                | ContentBlock::Heading {
                    level: HeadingLevel::Three,
                    ..
                }
        )
    }
}
