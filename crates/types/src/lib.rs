//! Foundation types shared by every banded crate.
//!
//! - **geometry**: length units, page sizes and margins
//! - **color**: RGBA colors with hex parsing
//! - **value** / **record**: the dynamic data model report bands bind to
//! - **attribute**: uniform attribute resolution over records

pub mod attribute;
pub mod color;
pub mod geometry;
pub mod record;
pub mod value;

pub use attribute::{AttributeError, resolve, resolve_path, resolve_value};
pub use color::Color;
pub use geometry::{CM, INCH, MM, Margins, PT, PageSize, landscape, parse_length};
pub use record::{AccessorTable, Adapted, JsonRecord, Member, Object, Record};
pub use value::Value;
