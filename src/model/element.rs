//! Visual element types for slide-structured sources.

use super::TableModel;
use serde::{Deserialize, Serialize};

/// Page-local position of an element's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Distance from the top edge
    pub top: f64,
    /// Distance from the left edge
    pub left: f64,
}

impl Position {
    /// Create a new position.
    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    /// Whether both coordinates can be compared.
    pub fn is_finite(&self) -> bool {
        self.top.is_finite() && self.left.is_finite()
    }
}

/// Role of a text placeholder on a slide layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderRole {
    Title,
    CenterTitle,
    Subtitle,
    VerticalTitle,
    SlideNumber,
    Footer,
    Header,
    Date,
    Body,
    #[serde(other)]
    Other,
}

impl PlaceholderRole {
    /// Roles captured separately from the slide body.
    pub fn is_title_role(&self) -> bool {
        matches!(
            self,
            PlaceholderRole::Title
                | PlaceholderRole::CenterTitle
                | PlaceholderRole::SlideNumber
                | PlaceholderRole::Footer
        )
    }

    /// Roles whose text may become the slide title.
    pub fn is_heading(&self) -> bool {
        matches!(self, PlaceholderRole::Title | PlaceholderRole::CenterTitle)
    }
}

/// A paragraph inside a text frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextParagraph {
    /// Paragraph text
    #[serde(default)]
    pub text: String,

    /// Outline level (0 = top level)
    #[serde(default)]
    pub level: u8,
}

impl TextParagraph {
    /// Create a top-level paragraph.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: 0,
        }
    }

    /// Set the outline level.
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }
}

/// A visual element as reported by the format reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Element name from the source, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Position on the slide
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    /// What the element exposes
    #[serde(flatten)]
    pub kind: ElementKind,
}

/// Structure exposed by an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    /// Container of nested elements
    Group {
        #[serde(default)]
        children: Vec<Element>,
    },

    /// Tabular structure
    Table { table: TableModel },

    /// Chart structure with an optional title
    Chart {
        #[serde(default)]
        title: Option<String>,
    },

    /// Generic graphic frame with neither table nor chart (SmartArt and friends)
    GraphicFrame,

    /// Text frame
    Text {
        #[serde(default)]
        paragraphs: Vec<TextParagraph>,
        #[serde(default)]
        placeholder: Option<PlaceholderRole>,
    },

    /// Picture without a text frame
    Picture,

    /// Element the reader could not interpret
    Unreadable {
        #[serde(default)]
        reason: String,
    },
}

impl Element {
    fn from_kind(kind: ElementKind) -> Self {
        Self {
            name: None,
            position: None,
            kind,
        }
    }

    /// Create a group element.
    pub fn group(children: Vec<Element>) -> Self {
        Self::from_kind(ElementKind::Group { children })
    }

    /// Create a text frame with one paragraph per line.
    pub fn text<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self::from_kind(ElementKind::Text {
            paragraphs: lines.into_iter().map(TextParagraph::new).collect(),
            placeholder: None,
        })
    }

    /// Create a text frame from paragraphs.
    pub fn paragraphs(paragraphs: Vec<TextParagraph>) -> Self {
        Self::from_kind(ElementKind::Text {
            paragraphs,
            placeholder: None,
        })
    }

    /// Create a placeholder text frame with a single paragraph.
    pub fn placeholder(role: PlaceholderRole, text: impl Into<String>) -> Self {
        Self::from_kind(ElementKind::Text {
            paragraphs: vec![TextParagraph::new(text)],
            placeholder: Some(role),
        })
    }

    /// Create a title placeholder.
    pub fn title(text: impl Into<String>) -> Self {
        Self::placeholder(PlaceholderRole::Title, text)
    }

    /// Create a table element.
    pub fn table(table: TableModel) -> Self {
        Self::from_kind(ElementKind::Table { table })
    }

    /// Create a chart element.
    pub fn chart(title: Option<String>) -> Self {
        Self::from_kind(ElementKind::Chart { title })
    }

    /// Create a generic graphic frame.
    pub fn graphic_frame() -> Self {
        Self::from_kind(ElementKind::GraphicFrame)
    }

    /// Create a picture.
    pub fn picture() -> Self {
        Self::from_kind(ElementKind::Picture)
    }

    /// Create an element the reader failed on.
    pub fn unreadable(reason: impl Into<String>) -> Self {
        Self::from_kind(ElementKind::Unreadable {
            reason: reason.into(),
        })
    }

    /// Set the position.
    pub fn at(mut self, top: f64, left: f64) -> Self {
        self.position = Some(Position::new(top, left));
        self
    }

    /// Set the element name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Check if this element is a group.
    pub fn is_group(&self) -> bool {
        matches!(self.kind, ElementKind::Group { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_roles() {
        assert!(PlaceholderRole::Title.is_title_role());
        assert!(PlaceholderRole::SlideNumber.is_title_role());
        assert!(PlaceholderRole::Footer.is_title_role());
        assert!(!PlaceholderRole::Body.is_title_role());
        assert!(!PlaceholderRole::Subtitle.is_title_role());

        assert!(PlaceholderRole::CenterTitle.is_heading());
        assert!(!PlaceholderRole::Footer.is_heading());
    }

    #[test]
    fn test_element_json() {
        let json = r#"{
            "type": "group",
            "position": {"top": 1.0, "left": 2.0},
            "children": [
                {"type": "text", "paragraphs": [{"text": "a", "level": 1}]},
                {"type": "text", "placeholder": "center_title", "paragraphs": [{"text": "T"}]},
                {"type": "chart", "title": "Sales"},
                {"type": "graphic_frame"},
                {"type": "picture"}
            ]
        }"#;
        let element: Element = serde_json::from_str(json).unwrap();
        assert!(element.is_group());
        assert_eq!(element.position, Some(Position::new(1.0, 2.0)));

        let ElementKind::Group { children } = element.kind else {
            panic!("expected group");
        };
        assert_eq!(children.len(), 5);
        assert!(matches!(
            &children[1].kind,
            ElementKind::Text {
                placeholder: Some(PlaceholderRole::CenterTitle),
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_placeholder_role() {
        let role: PlaceholderRole = serde_json::from_str("\"picture_placeholder\"").unwrap();
        assert_eq!(role, PlaceholderRole::Other);
    }

    #[test]
    fn test_position_finite() {
        assert!(Position::new(0.0, 1.0).is_finite());
        assert!(!Position::new(f64::NAN, 1.0).is_finite());
    }
}
