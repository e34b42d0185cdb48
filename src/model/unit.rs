//! Assembled unit records (one per slide or page).

use serde::{Deserialize, Serialize};

/// What a unit stands for in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Slide,
    Page,
}

impl UnitKind {
    /// Heading label for the unit.
    pub fn label(&self) -> &'static str {
        match self {
            UnitKind::Slide => "Slide",
            UnitKind::Page => "Page",
        }
    }
}

/// Kind of an opaque block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Table,
    Diagram,
}

/// Opaque tagged span of markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    content: String,
}

impl Block {
    /// Create a block; blank content yields no block.
    pub fn new(kind: BlockKind, content: impl AsRef<str>) -> Option<Self> {
        let content = content.as_ref().trim();
        if content.is_empty() {
            None
        } else {
            Some(Self {
                kind,
                content: content.to_string(),
            })
        }
    }

    /// Trimmed interior content.
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// One body part of a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyPart {
    Text(String),
    Block(Block),
}

/// A slide or page record ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub kind: UnitKind,

    /// 1-based sequence number
    pub index: u32,

    pub title: Option<String>,

    pub body: Vec<BodyPart>,

    /// Whether the body text came from OCR
    pub ocr_applied: bool,
}

impl Unit {
    /// Create an empty unit.
    pub fn new(kind: UnitKind, index: u32) -> Self {
        Self {
            kind,
            index,
            title: None,
            body: Vec::new(),
            ocr_applied: false,
        }
    }

    /// Append a text part.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.body.push(BodyPart::Text(text.into()));
    }

    /// Append a block part.
    pub fn push_block(&mut self, block: Block) {
        self.body.push(BodyPart::Block(block));
    }

    /// Number of blocks of the given kind in the body.
    pub fn block_count(&self, kind: BlockKind) -> usize {
        self.body
            .iter()
            .filter(|p| matches!(p, BodyPart::Block(b) if b.kind == kind))
            .count()
    }
}
