//! JSON shapes exchanged with the remote service.
//!
//! Incoming blocks are loosely typed records keyed by their `type`:
//!
//! ```json
//! { "id": "…", "type": "quote", "quote": { "rich_text": [ { "plain_text": "…" } ] } }
//! ```
//!
//! They are narrowed to [`ContentBlock`] as soon as they arrive. Outgoing
//! blocks use the same shape with `text.content` rich-text items.

use serde_json::{json, Map, Value};

use crate::codec::{BlockKind, ContentBlock, HeadingLevel, DEFAULT_CODE_LANGUAGE};

/// Longest content the service accepts in a single rich-text item.
pub const RICH_TEXT_ITEM_LIMIT: usize = 2000;

/// A remote block that could not be narrowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedBlock {
    /// Block id, when the record had one
    pub id: Option<String>,
    /// The recognized kind, if the `type` field named one
    pub kind: Option<BlockKind>,
    pub reason: String,
}

impl MalformedBlock {
    /// The block to use in place of the malformed one, if any.
    ///
    /// A recognized kind keeps its place with an empty payload; an
    /// unrecognized record is dropped.
    pub fn placeholder(&self) -> Option<ContentBlock> {
        self.kind.map(ContentBlock::empty)
    }
}

impl std::fmt::Display for MalformedBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "block {}: {}",
            self.id.as_deref().unwrap_or("<no id>"),
            self.reason
        )
    }
}

/// Returns the `id` of a remote block record.
pub fn block_id(value: &Value) -> Option<&str> {
    value.get("id").and_then(Value::as_str)
}

/// Narrows a remote block record to a [`ContentBlock`].
pub fn narrow_block(value: &Value) -> Result<ContentBlock, MalformedBlock> {
    let id = block_id(value).map(str::to_string);
    let malformed = |kind: Option<BlockKind>, reason: String| MalformedBlock {
        id: id.clone(),
        kind,
        reason,
    };

    let type_name = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(None, "missing type".to_string()))?;
    let kind = BlockKind::parse(type_name)
        .ok_or_else(|| malformed(None, format!("unsupported block type '{}'", type_name)))?;

    let payload = value
        .get(type_name)
        .and_then(Value::as_object)
        .ok_or_else(|| malformed(Some(kind), format!("missing '{}' payload", type_name)))?;
    let rich_text = payload
        .get("rich_text")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(Some(kind), "missing rich_text".to_string()))?;
    let text = plain_text(rich_text);

    Ok(match kind {
        BlockKind::Paragraph => ContentBlock::paragraph(text),
        BlockKind::Heading1 => ContentBlock::heading(HeadingLevel::One, text),
        BlockKind::Heading2 => ContentBlock::heading(HeadingLevel::Two, text),
        BlockKind::Heading3 => ContentBlock::heading(HeadingLevel::Three, text),
        BlockKind::BulletedListItem => ContentBlock::bulleted(text),
        BlockKind::NumberedListItem => ContentBlock::numbered(text),
        BlockKind::Quote => ContentBlock::quote(text),
        BlockKind::Code => {
            let language = payload
                .get("language")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_CODE_LANGUAGE);
            ContentBlock::code(language, text)
        }
    })
}

/// Concatenates the text of rich-text items, ignoring their formatting.
fn plain_text(items: &[Value]) -> String {
    items
        .iter()
        .filter_map(|item| {
            item.get("plain_text")
                .and_then(Value::as_str)
                .or_else(|| item.pointer("/text/content").and_then(Value::as_str))
        })
        .collect()
}

/// Builds the outgoing JSON record for a block.
pub fn block_to_remote(block: &ContentBlock) -> Value {
    let kind = block.kind();
    let mut payload = Map::new();
    payload.insert("rich_text".to_string(), rich_text(block.text()));
    if let ContentBlock::Code { language, .. } = block {
        payload.insert("language".to_string(), Value::String(language.clone()));
    }

    let mut record = Map::new();
    record.insert("object".to_string(), json!("block"));
    record.insert("type".to_string(), json!(kind.as_str()));
    record.insert(kind.as_str().to_string(), Value::Object(payload));
    Value::Object(record)
}

/// Splits text into rich-text items no longer than the per-item limit.
fn rich_text(content: &str) -> Value {
    let chars: Vec<char> = content.chars().collect();
    if chars.is_empty() {
        return json!([text_item("")]);
    }
    Value::Array(
        chars
            .chunks(RICH_TEXT_ITEM_LIMIT)
            .map(|chunk| text_item(&chunk.iter().collect::<String>()))
            .collect(),
    )
}

fn text_item(content: &str) -> Value {
    json!({ "type": "text", "text": { "content": content } })
}
