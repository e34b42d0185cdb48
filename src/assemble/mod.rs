//! Unit assembly: turning structural records into annotated markdown.
//!
//! Slides go through shape collection (flatten, classify, order) and
//! become bullet lists plus table/diagram blocks. Pages carry their native
//! text, falling back to OCR when it is empty, followed by their tables.
//! Each unit renders as a heading, its body, and a `---` separator.

mod options;
mod page;
pub mod shapes;
mod slide;

pub use options::{AssembleOptions, HeadingStyle, Locale};
pub use page::{assemble_page, assemble_pages};
pub use shapes::{ShapeKind, ShapeNode, ShapePayload};
pub use slide::{assemble_slide, assemble_slides};

use crate::model::{BodyPart, SourceDocument, Unit, UnitKind};
use crate::ocr::OcrCapability;
use unicode_normalization::UnicodeNormalization;

/// Heading line for a unit.
pub fn unit_heading(unit: &Unit, style: HeadingStyle) -> String {
    let marker = match (style, unit.kind) {
        (HeadingStyle::Plain, _) => "",
        (HeadingStyle::Decorated, UnitKind::Slide) => "🖼 ",
        (HeadingStyle::Decorated, UnitKind::Page) => "📄 ",
    };
    match (&unit.title, unit.kind) {
        (Some(title), UnitKind::Slide) => {
            format!("## {}{} {}: {}", marker, unit.kind.label(), unit.index, title)
        }
        _ => format!("## {}{} {}", marker, unit.kind.label(), unit.index),
    }
}

/// Render one unit: heading, blank line, body parts joined by blank lines,
/// then the `---` separator.
pub fn render_unit(unit: &Unit, options: &AssembleOptions) -> String {
    let body = if unit.body.is_empty() {
        options.locale.no_content().to_string()
    } else {
        unit.body
            .iter()
            .map(|part| match part {
                BodyPart::Text(text) => text.clone(),
                BodyPart::Block(block) => block.render(),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    let rendered = format!(
        "{}\n\n{}\n\n---\n\n",
        unit_heading(unit, options.heading_style),
        body
    );
    if options.normalize_unicode {
        rendered.nfc().collect()
    } else {
        rendered
    }
}

/// Concatenate rendered units into one document.
pub fn render_units(units: &[Unit], options: &AssembleOptions) -> String {
    units.iter().map(|u| render_unit(u, options)).collect()
}

/// Assemble a source document into units.
pub fn assemble_units(
    doc: &SourceDocument,
    ocr: &OcrCapability,
    options: &AssembleOptions,
) -> Vec<Unit> {
    match doc {
        SourceDocument::Slides(deck) => assemble_slides(deck, options),
        SourceDocument::Pages(pages) => assemble_pages(pages, ocr, options),
    }
}

/// Assemble and render a source document.
pub fn assemble_document(
    doc: &SourceDocument,
    ocr: &OcrCapability,
    options: &AssembleOptions,
) -> String {
    render_units(&assemble_units(doc, ocr, options), options)
}
