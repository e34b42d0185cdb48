//! Data model for structural source records and assembled units.

mod element;
mod source;
mod table;
mod unit;

pub use element::{Element, ElementKind, PlaceholderRole, Position, TextParagraph};
pub use source::{PageRecord, PageSource, SlideDeck, SlideRecord, SourceDocument};
pub use table::{TableCell, TableModel, TableRow};
pub use unit::{Block, BlockKind, BodyPart, Unit, UnitKind};
