//! Structural records produced by format readers.

use super::{Element, TableModel};
use crate::detect::SourceFormat;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A slide deck: slides of positioned elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideDeck {
    #[serde(default)]
    pub slides: Vec<SlideRecord>,
}

/// One slide's top-level elements in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideRecord {
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl SlideRecord {
    /// Create a slide from elements.
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }
}

/// A page-based document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSource {
    /// Opaque handle passed to the OCR collaborator
    #[serde(default)]
    pub handle: String,

    #[serde(default)]
    pub pages: Vec<PageRecord>,

    /// Tables by 1-based page number
    #[serde(default, deserialize_with = "page_keyed_tables")]
    pub tables: BTreeMap<u32, Vec<TableModel>>,
}

impl PageSource {
    /// Create a page source with the given handle.
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            ..Default::default()
        }
    }

    /// Add a page with native text.
    pub fn with_page(mut self, number: Option<u32>, text: impl Into<String>) -> Self {
        self.pages.push(PageRecord {
            number,
            text: text.into(),
        });
        self
    }

    /// Add a table to a page.
    pub fn with_table(mut self, page: u32, table: TableModel) -> Self {
        self.tables.entry(page).or_default().push(table);
        self
    }

    /// Tables supplied for a page; absence is an empty slice.
    pub fn tables_for(&self, page: u32) -> &[TableModel] {
        self.tables.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }
}

// Map keys arrive as strings once the record is buffered for the `kind` tag.
fn page_keyed_tables<'de, D>(deserializer: D) -> Result<BTreeMap<u32, Vec<TableModel>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Vec<TableModel>>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(page, tables)| {
            page.trim()
                .parse::<u32>()
                .map(|number| (number, tables))
                .map_err(|_| serde::de::Error::custom(format!("invalid page number key {:?}", page)))
        })
        .collect()
}

/// One page's native text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// 1-based page number, if the reader reports one
    #[serde(default)]
    pub number: Option<u32>,

    #[serde(default)]
    pub text: String,
}

/// A source document in structural form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceDocument {
    Slides(SlideDeck),
    Pages(PageSource),
}

impl SourceDocument {
    /// Source format this record stands for.
    pub fn format(&self) -> SourceFormat {
        match self {
            SourceDocument::Slides(_) => SourceFormat::Pptx,
            SourceDocument::Pages(_) => SourceFormat::Pdf,
        }
    }

    /// Number of slides or pages.
    pub fn unit_count(&self) -> usize {
        match self {
            SourceDocument::Slides(deck) => deck.slides.len(),
            SourceDocument::Pages(pages) => pages.pages.len(),
        }
    }
}

impl From<SlideDeck> for SourceDocument {
    fn from(deck: SlideDeck) -> Self {
        SourceDocument::Slides(deck)
    }
}

impl From<PageSource> for SourceDocument {
    fn from(pages: PageSource) -> Self {
        SourceDocument::Pages(pages)
    }
}
