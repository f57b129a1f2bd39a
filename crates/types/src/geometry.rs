//! Length units, page sizes and margins.
//!
//! All lengths are expressed in points (1/72 inch). The unit constants
//! let report definitions read naturally, e.g. `2.0 * CM`.

use serde::{Deserialize, Deserializer, Serialize, de};

pub const PT: f32 = 1.0;
pub const INCH: f32 = 72.0;
pub const CM: f32 = INCH / 2.54;
pub const MM: f32 = CM / 10.0;

/// Parse a length with an optional unit suffix (e.g. "10pt", "5mm", "1.5cm", "12").
///
/// Values without a unit are taken to be points.
pub fn parse_length(input: &str) -> Result<f32, String> {
    let input = input.trim();
    let (number, scale) = [("pt", PT), ("px", PT), ("in", INCH), ("cm", CM), ("mm", MM)]
        .iter()
        .find_map(|(suffix, scale)| input.strip_suffix(suffix).map(|n| (n, *scale)))
        .unwrap_or((input, PT));

    number
        .trim()
        .parse::<f32>()
        .map(|v| v * scale)
        .map_err(|e| format!("Invalid length '{}': {}", input, e))
}

/// Physical page dimensions as a `(width, height)` pair in points.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

impl PageSize {
    pub const A4: PageSize = PageSize { width: 21.0 * CM, height: 29.7 * CM };
    pub const LETTER: PageSize = PageSize { width: 8.5 * INCH, height: 11.0 * INCH };
    pub const LEGAL: PageSize = PageSize { width: 8.5 * INCH, height: 14.0 * INCH };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns this size with width and height swapped.
    pub const fn landscape(self) -> Self {
        Self { width: self.height, height: self.width }
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }

    /// Looks up a well-known page size by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "a4" => Some(Self::A4),
            "letter" => Some(Self::LETTER),
            "legal" => Some(Self::LEGAL),
            _ => None,
        }
    }
}

/// Swaps the components of a page size. A pure transform: `landscape(landscape(p)) == p`.
pub const fn landscape(size: PageSize) -> PageSize {
    size.landscape()
}

impl From<(f32, f32)> for PageSize {
    fn from((width, height): (f32, f32)) -> Self {
        Self { width, height }
    }
}

impl From<PageSize> for (f32, f32) {
    fn from(size: PageSize) -> Self {
        (size.width, size.height)
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PageSizeDef {
            Name(String),
            Pair(f32, f32),
            Map { width: f32, height: f32 },
        }

        match PageSizeDef::deserialize(deserializer)? {
            PageSizeDef::Name(name) => Self::from_name(&name)
                .ok_or_else(|| de::Error::custom(format!("Unknown page size: {}", name))),
            PageSizeDef::Pair(width, height) | PageSizeDef::Map { width, height } => {
                Ok(Self { width, height })
            }
        }
    }
}

/// Page margins in points.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self::all(CM)
    }
}

impl Margins {
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }

    /// Parse CSS-style margin shorthand (1, 2, or 4 values, each with optional unit)
    fn parse_shorthand(input: &str) -> Result<Self, String> {
        let values = input
            .split_whitespace()
            .map(parse_length)
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [all] => Ok(Self::all(*all)),
            [vertical, horizontal] => Ok(Self {
                top: *vertical,
                bottom: *vertical,
                left: *horizontal,
                right: *horizontal,
            }),
            [top, right, bottom, left] => Ok(Self {
                top: *top,
                bottom: *bottom,
                left: *left,
                right: *right,
            }),
            _ => Err(format!(
                "Invalid margin shorthand '{}': expected 1, 2 or 4 values",
                input
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Margins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum MarginsDef {
            Shorthand(String),
            Uniform(f32),
            Map {
                #[serde(default = "default_margin")]
                top: f32,
                #[serde(default = "default_margin")]
                bottom: f32,
                #[serde(default = "default_margin")]
                left: f32,
                #[serde(default = "default_margin")]
                right: f32,
            },
        }

        match MarginsDef::deserialize(deserializer)? {
            MarginsDef::Shorthand(s) => Self::parse_shorthand(&s).map_err(de::Error::custom),
            MarginsDef::Uniform(v) => Ok(Self::all(v)),
            MarginsDef::Map {
                top,
                bottom,
                left,
                right,
            } => Ok(Self {
                top,
                bottom,
                left,
                right,
            }),
        }
    }
}

fn default_margin() -> f32 {
    CM
}
