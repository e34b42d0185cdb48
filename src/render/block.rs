//! Opaque delimiter blocks for tables and diagrams.
//!
//! A block is an open delimiter line, its content, and the matching close
//! delimiter line. Blocks never nest; an open delimiter without a matching
//! close does not form a block.

use crate::model::{Block, BlockKind};
use std::ops::Range;

/// Opening delimiter of a table block.
pub const TABLE_OPEN: &str = "[[TABLE]]";
/// Closing delimiter of a table block.
pub const TABLE_CLOSE: &str = "[[/TABLE]]";
/// Opening delimiter of a diagram block.
pub const DIAGRAM_OPEN: &str = "[[DIAGRAM]]";
/// Closing delimiter of a diagram block.
pub const DIAGRAM_CLOSE: &str = "[[/DIAGRAM]]";

impl BlockKind {
    /// Opening delimiter line.
    pub fn open(&self) -> &'static str {
        match self {
            BlockKind::Table => TABLE_OPEN,
            BlockKind::Diagram => DIAGRAM_OPEN,
        }
    }

    /// Closing delimiter line.
    pub fn close(&self) -> &'static str {
        match self {
            BlockKind::Table => TABLE_CLOSE,
            BlockKind::Diagram => DIAGRAM_CLOSE,
        }
    }

    fn from_open(line: &str) -> Option<Self> {
        match line {
            TABLE_OPEN => Some(BlockKind::Table),
            DIAGRAM_OPEN => Some(BlockKind::Diagram),
            _ => None,
        }
    }
}

impl Block {
    /// Render the block with its delimiters.
    pub fn render(&self) -> String {
        format!("{}\n{}\n{}", self.kind.open(), self.content(), self.kind.close())
    }
}

/// Wrap content in the delimiter pair for `kind`.
///
/// Blank content yields an empty string.
pub fn wrap(kind: BlockKind, content: &str) -> String {
    Block::new(kind, content)
        .map(|b| b.render())
        .unwrap_or_default()
}

/// Wrap a rendered table.
pub fn wrap_table(content: &str) -> String {
    wrap(BlockKind::Table, content)
}

/// Wrap a diagram caption.
pub fn wrap_diagram(content: &str) -> String {
    wrap(BlockKind::Diagram, content)
}

/// A complete block found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSpan {
    pub kind: BlockKind,
    /// Line indices covered, delimiters included
    pub lines: Range<usize>,
    /// Byte range covered, from the open delimiter to the end of the close delimiter
    pub bytes: Range<usize>,
}

/// Find every complete block in `text`.
pub fn block_spans(text: &str) -> Vec<BlockSpan> {
    let mut spans = Vec::new();
    let mut open: Option<(BlockKind, usize, usize)> = None;
    let mut offset = 0;

    for (idx, line) in text.split('\n').enumerate() {
        let start = offset;
        let end = start + line.len();
        offset = end + 1;

        let trimmed = line.trim();
        if let Some(kind) = BlockKind::from_open(trimmed) {
            // an earlier unmatched open is dropped
            open = Some((kind, idx, start));
            continue;
        }
        if let Some((kind, first, first_byte)) = open {
            if trimmed == kind.close() {
                spans.push(BlockSpan {
                    kind,
                    lines: first..idx + 1,
                    bytes: first_byte..end,
                });
                open = None;
            }
        }
    }

    spans
}

/// Per-line flags marking lines that belong to a complete block.
///
/// Indices match `text.split('\n')`.
pub fn protected_lines(text: &str) -> Vec<bool> {
    let mut mask = vec![false; text.split('\n').count()];
    for span in block_spans(text) {
        for flag in &mut mask[span.lines] {
            *flag = true;
        }
    }
    mask
}

/// Count complete blocks of a kind.
pub fn count_blocks(text: &str, kind: BlockKind) -> usize {
    block_spans(text).iter().filter(|s| s.kind == kind).count()
}

/// Apply `f` to every stretch of text outside complete blocks.
///
/// Block interiors and delimiters are copied unchanged.
pub fn map_outside_blocks<F>(text: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let spans = block_spans(text);
    if spans.is_empty() {
        return f(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        out.push_str(&f(&text[cursor..span.bytes.start]));
        out.push_str(&text[span.bytes.clone()]);
        cursor = span.bytes.end;
    }
    out.push_str(&f(&text[cursor..]));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap() {
        assert_eq!(wrap_table("  | a |\n"), "[[TABLE]]\n| a |\n[[/TABLE]]");
        assert_eq!(wrap_diagram("SmartArt"), "[[DIAGRAM]]\nSmartArt\n[[/DIAGRAM]]");
        assert_eq!(wrap_table(" \n\t "), "");
    }

    #[test]
    fn test_block_spans() {
        let text = "intro\n[[TABLE]]\n| a |\n[[/TABLE]]\nmid\n[[DIAGRAM]]\nchart\n[[/DIAGRAM]]";
        let spans = block_spans(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].kind, BlockKind::Table);
        assert_eq!(spans[0].lines, 1..4);
        assert_eq!(&text[spans[0].bytes.clone()], "[[TABLE]]\n| a |\n[[/TABLE]]");
        assert_eq!(spans[1].kind, BlockKind::Diagram);
        assert_eq!(count_blocks(text, BlockKind::Table), 1);
        assert_eq!(count_blocks(text, BlockKind::Diagram), 1);
    }

    #[test]
    fn test_unmatched_open_is_not_a_block() {
        let text = "[[TABLE]]\nstray\n[[DIAGRAM]]\nx\n[[/DIAGRAM]]\n[[TABLE]]\nno close";
        let spans = block_spans(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, BlockKind::Diagram);
        assert_eq!(
            protected_lines(text),
            vec![false, false, true, true, true, false, false]
        );
    }

    #[test]
    fn test_mismatched_close_is_ignored() {
        let text = "[[TABLE]]\nx\n[[/DIAGRAM]]\n[[/TABLE]]";
        let spans = block_spans(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].lines, 0..4);
    }

    #[test]
    fn test_map_outside_blocks() {
        let text = "a\n[[TABLE]]\na\n[[/TABLE]]\na";
        let out = map_outside_blocks(text, |s| s.replace('a', "b"));
        assert_eq!(out, "b\n[[TABLE]]\na\n[[/TABLE]]\nb");
    }
}
