//! Rendering and rewriting of assembled markdown.

pub mod block;
mod json;
pub mod normalize;
pub mod refine;
mod result;
mod table;

pub use block::{count_blocks, wrap, wrap_diagram, wrap_table, BlockSpan};
pub use json::{to_json, JsonFormat};
pub use normalize::{
    extract_reservation_codes, normalize, normalize_amounts, normalize_dates, NormalizeOptions,
};
pub use refine::{MarkdownRefiner, RefineOptions, RefinePass};
pub use result::ConversionMeta;
pub use table::{escape_cell, render_table};
