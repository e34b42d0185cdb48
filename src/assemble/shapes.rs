//! Shape collection: flattening, classification and reading order.

use super::Locale;
use crate::model::{Element, ElementKind, PlaceholderRole, Position, TableModel, TextParagraph};
use std::cmp::Ordering;

/// Kind of a classified shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Table,
    Chart,
    SmartArt,
    Text,
    TitlePlaceholder,
}

/// Content carried by a classified shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapePayload {
    Table(TableModel),
    Chart { caption: String },
    SmartArt { caption: String },
    Text(Vec<TextParagraph>),
    Title { text: String, role: PlaceholderRole },
}

/// A leaf visual element after flattening and classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeNode {
    pub position: Option<Position>,
    pub payload: ShapePayload,
}

impl ShapeNode {
    /// Kind of this shape.
    pub fn kind(&self) -> ShapeKind {
        match self.payload {
            ShapePayload::Table(_) => ShapeKind::Table,
            ShapePayload::Chart { .. } => ShapeKind::Chart,
            ShapePayload::SmartArt { .. } => ShapeKind::SmartArt,
            ShapePayload::Text(_) => ShapeKind::Text,
            ShapePayload::Title { .. } => ShapeKind::TitlePlaceholder,
        }
    }

    fn sort_key(&self) -> Option<(f64, f64)> {
        self.position
            .filter(Position::is_finite)
            .map(|p| (p.top, p.left))
    }
}

/// Expand groups into their children, keeping document order.
///
/// Unreadable elements are skipped with a warning.
pub fn flatten(elements: &[Element]) -> Vec<&Element> {
    let mut leaves = Vec::new();
    let mut stack = vec![elements.iter()];

    while let Some(iter) = stack.last_mut() {
        let Some(element) = iter.next() else {
            stack.pop();
            continue;
        };

        match &element.kind {
            ElementKind::Group { children } => stack.push(children.iter()),
            ElementKind::Unreadable { reason } => {
                log::warn!(
                    "skipping unreadable element {} at depth {}: {}",
                    element.name.as_deref().unwrap_or("<unnamed>"),
                    stack.len() - 1,
                    reason
                );
            }
            _ => leaves.push(element),
        }
    }

    leaves
}

/// Classify a leaf element.
///
/// Pictures and groups produce no node.
pub fn classify(element: &Element, locale: Locale) -> Option<ShapeNode> {
    let payload = match &element.kind {
        ElementKind::Table { table } => ShapePayload::Table(table.clone()),
        ElementKind::Chart { title } => {
            let caption = title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(locale.chart_placeholder());
            ShapePayload::Chart {
                caption: caption.to_string(),
            }
        }
        ElementKind::GraphicFrame => ShapePayload::SmartArt {
            caption: locale.smartart_placeholder().to_string(),
        },
        ElementKind::Text {
            paragraphs,
            placeholder: Some(role),
        } if role.is_title_role() => ShapePayload::Title {
            text: paragraphs
                .iter()
                .map(|p| p.text.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            role: *role,
        },
        ElementKind::Text { paragraphs, .. } => ShapePayload::Text(paragraphs.clone()),
        ElementKind::Picture | ElementKind::Group { .. } | ElementKind::Unreadable { .. } => {
            return None
        }
    };

    Some(ShapeNode {
        position: element.position,
        payload,
    })
}

/// Sort shapes top-to-bottom, then left-to-right.
///
/// The sort is stable. If any shape lacks a usable position the whole set
/// keeps its encounter order.
pub fn order(mut nodes: Vec<ShapeNode>) -> Vec<ShapeNode> {
    let keys: Option<Vec<(f64, f64)>> = nodes.iter().map(ShapeNode::sort_key).collect();
    if keys.is_none() {
        log::warn!(
            "{} shapes without usable positions; keeping document order",
            nodes.iter().filter(|n| n.sort_key().is_none()).count()
        );
        return nodes;
    }

    nodes.sort_by(|a, b| match (a.sort_key(), b.sort_key()) {
        (Some((at, al)), Some((bt, bl))) => at
            .partial_cmp(&bt)
            .unwrap_or(Ordering::Equal)
            .then(al.partial_cmp(&bl).unwrap_or(Ordering::Equal)),
        _ => Ordering::Equal,
    });
    nodes
}

/// Flatten, classify and order a slide's elements.
pub fn collect_shapes(elements: &[Element], locale: Locale) -> Vec<ShapeNode> {
    let nodes = flatten(elements)
        .into_iter()
        .filter_map(|e| classify(e, locale))
        .collect();
    order(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(node: &ShapeNode) -> &str {
        match &node.payload {
            ShapePayload::Text(p) => &p[0].text,
            _ => "",
        }
    }

    #[test]
    fn test_flatten_nested_groups() {
        let elements = vec![
            Element::text(["a"]),
            Element::group(vec![
                Element::text(["b"]),
                Element::group(vec![Element::text(["c"])]),
                Element::text(["d"]),
            ]),
            Element::text(["e"]),
        ];
        let leaves = flatten(&elements);
        let texts: Vec<String> = leaves
            .iter()
            .filter_map(|e| classify(e, Locale::English))
            .map(|n| text_of(&n).to_string())
            .collect();
        assert_eq!(texts, vec!["a", "b", "c", "d", "e"]);
        assert!(leaves.iter().all(|e| !e.is_group()));
    }

    #[test]
    fn test_flatten_skips_unreadable() {
        let elements = vec![
            Element::group(vec![Element::unreadable("corrupt"), Element::text(["ok"])]),
            Element::unreadable("bad"),
        ];
        assert_eq!(flatten(&elements).len(), 1);
    }

    #[test]
    fn test_classify() {
        let loc = Locale::Korean;
        assert_eq!(classify(&Element::picture(), loc), None);
        assert_eq!(
            classify(&Element::chart(Some("  Sales ".into())), loc).unwrap().payload,
            ShapePayload::Chart { caption: "Sales".into() }
        );
        assert_eq!(
            classify(&Element::chart(Some("  ".into())), loc).unwrap().payload,
            ShapePayload::Chart { caption: "차트/다이어그램".into() }
        );
        assert_eq!(
            classify(&Element::graphic_frame(), Locale::English).unwrap().kind(),
            ShapeKind::SmartArt
        );
        assert_eq!(
            classify(&Element::placeholder(PlaceholderRole::Footer, "ACME"), loc)
                .unwrap()
                .kind(),
            ShapeKind::TitlePlaceholder
        );
        assert_eq!(
            classify(&Element::placeholder(PlaceholderRole::Subtitle, "sub"), loc)
                .unwrap()
                .kind(),
            ShapeKind::Text
        );
    }

    #[test]
    fn test_reading_order() {
        let elements = vec![
            Element::text(["third"]).at(10.0, 5.0),
            Element::text(["first"]).at(5.0, 100.0),
            Element::text(["second"]).at(10.0, 2.0),
        ];
        let shapes = collect_shapes(&elements, Locale::English);
        let texts: Vec<&str> = shapes.iter().map(text_of).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_missing_position_keeps_encounter_order() {
        let elements = vec![
            Element::text(["b"]).at(10.0, 0.0),
            Element::text(["a"]),
            Element::text(["c"]).at(0.0, 0.0),
        ];
        let shapes = collect_shapes(&elements, Locale::English);
        let texts: Vec<&str> = shapes.iter().map(text_of).collect();
        assert_eq!(texts, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_nan_position_keeps_encounter_order() {
        let elements = vec![
            Element::text(["b"]).at(10.0, 0.0),
            Element::text(["a"]).at(f64::NAN, 0.0),
        ];
        let shapes = collect_shapes(&elements, Locale::English);
        let texts: Vec<&str> = shapes.iter().map(text_of).collect();
        assert_eq!(texts, vec!["b", "a"]);
    }
}
