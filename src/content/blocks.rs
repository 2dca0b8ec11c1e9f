//! Rich-text content blocks
//!
//! A body is an ordered list of typed nodes. Text blocks carry a style,
//! inline spans and, when they belong to a list, a list kind and nesting
//! level. Embedded images are their own node type. Anything else is kept
//! as an [`ContentBlock::Unknown`] so the renderer can dispatch it to a
//! fallback handler instead of failing the whole document.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::model::ImageRef;

/// A single body node, tagged by `_type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum ContentBlock {
    /// `_type: "block"` (paragraphs, headings, quotes, list items)
    Text(TextBlock),
    /// `_type: "image"`
    Image(ImageRef),
    /// Any other `_type`, kept verbatim
    Unknown { kind: String, raw: Value },
}

impl ContentBlock {
    /// The `_type` tag this node was decoded from
    pub fn kind(&self) -> &str {
        match self {
            ContentBlock::Text(_) => "block",
            ContentBlock::Image(_) => "image",
            ContentBlock::Unknown { kind, .. } => kind,
        }
    }

    /// Convenience constructor for a plain paragraph
    pub fn paragraph(text: &str) -> Self {
        ContentBlock::Text(TextBlock::new("normal", vec![Span::plain(text)]))
    }
}

impl TryFrom<Value> for ContentBlock {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let kind = value
            .get("_type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match kind.as_str() {
            "block" => serde_json::from_value(value).map(ContentBlock::Text),
            "image" => serde_json::from_value(value).map(ContentBlock::Image),
            _ => Ok(ContentBlock::Unknown { kind, raw: value }),
        }
    }
}

impl From<ContentBlock> for Value {
    fn from(block: ContentBlock) -> Self {
        let (kind, value) = match block {
            ContentBlock::Text(text) => ("block", serde_json::to_value(text)),
            ContentBlock::Image(image) => ("image", serde_json::to_value(image)),
            ContentBlock::Unknown { raw, .. } => return raw,
        };

        let mut value = value.unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            map.insert("_type".to_string(), Value::String(kind.to_string()));
        }
        value
    }
}

/// A text block with inline spans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default = "default_style")]
    pub style: String,

    #[serde(default)]
    pub children: Vec<Span>,

    #[serde(rename = "markDefs", default)]
    pub mark_defs: Vec<MarkDef>,

    #[serde(rename = "listItem", default, skip_serializing_if = "Option::is_none")]
    pub list_item: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

fn default_style() -> String {
    "normal".to_string()
}

impl TextBlock {
    pub fn new(style: &str, children: Vec<Span>) -> Self {
        Self {
            style: style.to_string(),
            children,
            mark_defs: Vec::new(),
            list_item: None,
            level: None,
        }
    }

    /// Turn this block into a list item
    pub fn in_list(mut self, kind: &str, level: u32) -> Self {
        self.list_item = Some(kind.to_string());
        self.level = Some(level);
        self
    }

    pub fn is_list_item(&self) -> bool {
        self.list_item.is_some()
    }

    /// Nesting depth, starting at 1
    pub fn depth(&self) -> u32 {
        self.level.unwrap_or(1).max(1)
    }

    /// Text of all spans, concatenated
    pub fn plain_text(&self) -> String {
        self.children
            .iter()
            .filter(|c| c.is_text())
            .map(|c| c.text.as_str())
            .collect()
    }

    /// Look up a mark definition by its key
    pub fn mark_def(&self, key: &str) -> Option<&MarkDef> {
        self.mark_defs.iter().find(|d| d.key == key)
    }
}

/// An inline run of text with marks applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "_type", default = "default_span_type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

fn default_span_type() -> String {
    "span".to_string()
}

impl Span {
    pub fn plain(text: &str) -> Self {
        Self {
            kind: default_span_type(),
            text: text.to_string(),
            marks: Vec::new(),
        }
    }

    pub fn marked(text: &str, marks: &[&str]) -> Self {
        Self {
            kind: default_span_type(),
            text: text.to_string(),
            marks: marks.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == "span"
    }
}

/// Annotation definition referenced from span marks (e.g. links)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(default)]
    pub href: Option<String>,
}

/// Accept `null` wherever a block list is expected
pub fn nullable<'de, D>(deserializer: D) -> Result<Vec<ContentBlock>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ContentBlock>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Plain text of every text block, joined with spaces
pub fn plain_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter_map(|b| match b {
            ContentBlock::Text(text) => Some(text.plain_text()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whitespace-delimited token count of the body's text
pub fn word_count(blocks: &[ContentBlock]) -> usize {
    plain_text(blocks).split_whitespace().count()
}

/// Estimated reading time in whole minutes, rounded up
pub fn reading_time(blocks: &[ContentBlock], words_per_minute: u32) -> u32 {
    let words = word_count(blocks) as u32;
    words.div_ceil(words_per_minute.max(1))
}
