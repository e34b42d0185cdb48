//! Slide assembly.

use super::shapes::{collect_shapes, ShapePayload};
use super::AssembleOptions;
use crate::model::{Block, BlockKind, SlideDeck, SlideRecord, Unit, UnitKind};
use crate::render::render_table;
use rayon::prelude::*;

/// Assemble one slide into a unit.
///
/// `index` is the 1-based slide number.
pub fn assemble_slide(slide: &SlideRecord, index: u32, options: &AssembleOptions) -> Unit {
    let mut unit = Unit::new(UnitKind::Slide, index);

    for shape in collect_shapes(&slide.elements, options.locale) {
        match shape.payload {
            ShapePayload::Table(table) => match Block::new(BlockKind::Table, render_table(&table)) {
                Some(block) => unit.push_block(block),
                None => log::debug!("slide {}: empty table omitted", index),
            },
            ShapePayload::Chart { caption } | ShapePayload::SmartArt { caption } => {
                if let Some(block) = Block::new(BlockKind::Diagram, &caption) {
                    unit.push_block(block);
                }
            }
            ShapePayload::Title { text, role } => {
                if role.is_heading() && unit.title.is_none() && !text.is_empty() {
                    unit.title = Some(text);
                }
            }
            ShapePayload::Text(paragraphs) => {
                for para in paragraphs {
                    let text = para.text.trim();
                    if text.is_empty() {
                        continue;
                    }
                    let indent = "  ".repeat(para.level as usize);
                    unit.push_text(format!("{}- {}", indent, text));
                }
            }
        }
    }

    unit
}

/// Assemble every slide of a deck, preserving slide order.
pub fn assemble_slides(deck: &SlideDeck, options: &AssembleOptions) -> Vec<Unit> {
    if options.parallel {
        deck.slides
            .par_iter()
            .enumerate()
            .map(|(i, slide)| assemble_slide(slide, i as u32 + 1, options))
            .collect()
    } else {
        deck.slides
            .iter()
            .enumerate()
            .map(|(i, slide)| assemble_slide(slide, i as u32 + 1, options))
            .collect()
    }
}
