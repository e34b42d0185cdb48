//! Page assembly with OCR fallback.

use super::{AssembleOptions, HeadingStyle};
use crate::model::{Block, BlockKind, PageRecord, PageSource, Unit, UnitKind};
use crate::ocr::OcrCapability;
use crate::render::render_table;
use rayon::prelude::*;

fn tables_heading(style: HeadingStyle) -> &'static str {
    match style {
        HeadingStyle::Decorated => "### 📊 Tables",
        HeadingStyle::Plain => "### Tables",
    }
}

/// Assemble one page into a unit.
///
/// `position` is the zero-based position of the page in the source; it is
/// also the page index handed to OCR.
pub fn assemble_page(
    source: &PageSource,
    page: &PageRecord,
    position: usize,
    ocr: &OcrCapability,
    options: &AssembleOptions,
) -> Unit {
    let number = page.number.unwrap_or(position as u32 + 1);
    let mut unit = Unit::new(UnitKind::Page, number);

    let mut text = page.text.trim().to_string();
    if text.is_empty() {
        let recognized = ocr.page_text(&source.handle, position);
        let recognized = recognized.trim();
        if !recognized.is_empty() {
            log::info!("OCR fallback applied: page {}", number);
            text = recognized.to_string();
            unit.ocr_applied = true;
        }
    }
    if !text.is_empty() {
        unit.push_text(text);
    }

    let blocks: Vec<Block> = source
        .tables_for(number)
        .iter()
        .filter_map(|table| Block::new(BlockKind::Table, render_table(table)))
        .collect();
    if !blocks.is_empty() {
        unit.push_text(tables_heading(options.heading_style));
        for block in blocks {
            unit.push_block(block);
        }
    }

    unit
}

/// Assemble every page of a source, preserving page order.
pub fn assemble_pages(
    source: &PageSource,
    ocr: &OcrCapability,
    options: &AssembleOptions,
) -> Vec<Unit> {
    if options.parallel {
        source
            .pages
            .par_iter()
            .enumerate()
            .map(|(i, page)| assemble_page(source, page, i, ocr, options))
            .collect()
    } else {
        source
            .pages
            .iter()
            .enumerate()
            .map(|(i, page)| assemble_page(source, page, i, ocr, options))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BodyPart, TableModel};

    #[test]
    fn test_page_number_fallback() {
        let source = PageSource::new("doc.pdf")
            .with_page(Some(7), "seven")
            .with_page(None, "second");
        let units = assemble_pages(&source, &OcrCapability::disabled(), &AssembleOptions::default());
        assert_eq!(units[0].index, 7);
        assert_eq!(units[1].index, 2);
    }

    #[test]
    fn test_empty_page_without_ocr() {
        let source = PageSource::new("doc.pdf").with_page(Some(1), "   ");
        let unit = assemble_page(
            &source,
            &source.pages[0],
            0,
            &OcrCapability::disabled(),
            &AssembleOptions::default(),
        );
        assert!(unit.body.is_empty());
        assert!(!unit.ocr_applied);
    }

    #[test]
    fn test_tables_section() {
        let source = PageSource::new("doc.pdf")
            .with_page(Some(1), "text")
            .with_table(1, TableModel::from_rows([["h"], ["v"]]))
            .with_table(1, TableModel::new());
        let options = AssembleOptions::default().with_heading_style(HeadingStyle::Plain);
        let unit = assemble_page(&source, &source.pages[0], 0, &OcrCapability::disabled(), &options);

        assert_eq!(unit.body.len(), 3);
        assert_eq!(unit.body[1], BodyPart::Text("### Tables".into()));
        assert_eq!(unit.block_count(BlockKind::Table), 1);
    }
}
