//! Bands: the rectangular, horizontal regions a report is made of.
//!
//! A band stored on a report is a template. The composer clones it once per
//! repetition (per object for detail bands, per boundary for group headers
//! and footers) and attaches the bound object to the clone. Bands own all of
//! their data, so a clone never shares mutable state with its template.

use crate::element::Element;
use banded_types::{CM, Color, Object};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
    pub dash: Option<Vec<f32>>,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: 1.0,
            color: Color::BLACK,
            dash: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Border configuration. `all` applies to every side without its own stroke.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Borders {
    pub top: Option<Stroke>,
    pub right: Option<Stroke>,
    pub bottom: Option<Stroke>,
    pub left: Option<Stroke>,
    pub all: Option<Stroke>,
}

impl Borders {
    pub fn all(stroke: Stroke) -> Self {
        Self {
            all: Some(stroke),
            ..Self::default()
        }
    }

    /// The stroke a backend should draw on `side`.
    pub fn effective(&self, side: Side) -> Option<&Stroke> {
        let specific = match side {
            Side::Top => &self.top,
            Side::Right => &self.right,
            Side::Bottom => &self.bottom,
            Side::Left => &self.left,
        };
        specific.as_ref().or(self.all.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Band {
    pub height: f32,
    pub visible: bool,
    pub borders: Borders,
    pub elements: Vec<Element>,
    pub child_bands: Vec<Band>,
    /// Rendering this band must start on a fresh page.
    pub force_new_page: bool,
}

impl Default for Band {
    fn default() -> Self {
        Self {
            height: CM,
            visible: true,
            borders: Borders::default(),
            elements: Vec::new(),
            child_bands: Vec::new(),
            force_new_page: false,
        }
    }
}

impl Band {
    pub fn new(height: f32) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_elements(mut self, elements: impl IntoIterator<Item = Element>) -> Self {
        self.elements.extend(elements);
        self
    }

    pub fn with_child(mut self, child: Band) -> Self {
        self.child_bands.push(child);
        self
    }

    pub fn with_borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn force_new_page(mut self, force: bool) -> Self {
        self.force_new_page = force;
        self
    }

    /// Height including nested child bands.
    pub fn total_height(&self) -> f32 {
        self.height + self.child_bands.iter().map(Band::total_height).sum::<f32>()
    }

    /// An independent deep copy for one repetition of this template.
    pub fn clone_band(&self) -> Band {
        self.clone()
    }
}

/// One logical row accumulated into a [`TableBand`].
#[derive(Debug, Clone)]
pub struct TableRow {
    /// Position of the object within the collection being iterated.
    pub index: usize,
    pub object: Object,
}

/// A detail band that grows by rows instead of being repeated per object.
///
/// The band's elements describe one row; how rows are laid out inside the
/// region is up to the rendering backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TableBand {
    pub band: Band,
    #[serde(skip)]
    rows: Vec<TableRow>,
}

impl TableBand {
    pub fn new(band: Band) -> Self {
        Self {
            band,
            rows: Vec::new(),
        }
    }

    /// Accumulates one object as a row of this instance.
    pub fn append_row(&mut self, index: usize, object: Object) {
        self.rows.push(TableRow { index, object });
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A fresh, row-less instance of this template.
    pub fn instantiate(&self) -> TableBand {
        TableBand::new(self.band.clone())
    }

    pub fn into_parts(self) -> (Band, Vec<TableRow>) {
        (self.band, self.rows)
    }
}

impl Deref for TableBand {
    type Target = Band;

    fn deref(&self) -> &Band {
        &self.band
    }
}

impl DerefMut for TableBand {
    fn deref_mut(&mut self) -> &mut Band {
        &mut self.band
    }
}

/// How the detail slot turns objects into bands.
#[derive(Debug, Clone)]
pub enum DetailBand {
    /// The band is cloned once per object.
    Repeated(Band),
    /// Objects accumulate as rows of one band per group segment.
    Table(TableBand),
}

impl DetailBand {
    pub fn band(&self) -> &Band {
        match self {
            DetailBand::Repeated(band) => band,
            DetailBand::Table(table) => &table.band,
        }
    }
}

impl From<Band> for DetailBand {
    fn from(band: Band) -> Self {
        DetailBand::Repeated(band)
    }
}

impl From<TableBand> for DetailBand {
    fn from(table: TableBand) -> Self {
        DetailBand::Table(table)
    }
}
