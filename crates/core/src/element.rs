//! Element descriptors placed inside bands.
//!
//! Elements are drawing instructions for the rendering backend. The only
//! thing this crate interprets is *where their text comes from*: fixed
//! labels, attributes of the bound object, or report-level system fields.

use banded_types::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Style {
    pub font_name: Option<String>,
    pub font_size: Option<f32>,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<Color>,
    pub align: TextAlign,
}

/// Values supplied by the report itself rather than by the bound object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SystemField {
    ReportTitle,
    ReportAuthor,
    /// 1-based position of the bound object within its collection.
    ObjectIndex,
    /// Size of the collection the band is iterating.
    ObjectCount,
    /// The time of binding; honours the element's date format.
    Now,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", deny_unknown_fields)]
pub enum ElementKind {
    Label {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    ObjectValue {
        attribute_name: String,
        /// Date pattern handed to the report's date formatter.
        #[serde(default)]
        format: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    SystemField {
        field: SystemField,
        #[serde(default)]
        format: Option<String>,
    },
    Line,
    Rect {
        #[serde(default)]
        fill: bool,
    },
    Image {
        uri: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Element {
    pub kind: ElementKind,
    #[serde(default)]
    pub left: f32,
    #[serde(default)]
    pub top: f32,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub style: Style,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            left: 0.0,
            top: 0.0,
            width: None,
            height: None,
            style: Style::default(),
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Label { text: text.into() })
    }

    /// Text read from `attribute_name` on the bound object.
    pub fn object_value(attribute_name: impl Into<String>) -> Self {
        Self::new(ElementKind::ObjectValue {
            attribute_name: attribute_name.into(),
            format: None,
        })
    }

    pub fn system_field(field: SystemField) -> Self {
        Self::new(ElementKind::SystemField { field, format: None })
    }

    pub fn line() -> Self {
        Self::new(ElementKind::Line)
    }

    pub fn rect(fill: bool) -> Self {
        Self::new(ElementKind::Rect { fill })
    }

    pub fn image(uri: impl Into<String>) -> Self {
        Self::new(ElementKind::Image { uri: uri.into() })
    }

    pub fn at(mut self, left: f32, top: f32) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Sets the date pattern of an object value or system field. No-op for other kinds.
    pub fn with_format(mut self, pattern: impl Into<String>) -> Self {
        match &mut self.kind {
            ElementKind::ObjectValue { format, .. } | ElementKind::SystemField { format, .. } => {
                *format = Some(pattern.into());
            }
            _ => {}
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_object_value() {
        let element: Element = serde_json::from_value(json!({
            "kind": { "type": "objectValue", "attributeName": "created", "format": "%Y" },
            "left": 10,
            "style": { "bold": true }
        }))
        .unwrap();
        assert_eq!(element, Element::object_value("created").with_format("%Y").at(10.0, 0.0).with_style(Style {
            bold: true,
            ..Style::default()
        }));
    }

    #[test]
    fn test_unknown_element_options_are_rejected() {
        let result = serde_json::from_value::<Element>(json!({
            "kind": { "type": "label", "text": "x" },
            "colour": "#000"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_with_format_ignores_labels() {
        let label = Element::label("Total").with_format("%Y");
        assert_eq!(label.kind, ElementKind::Label { text: "Total".into() });
    }
}
