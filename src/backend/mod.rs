//! Reference output backends.

pub mod json;
pub mod text;

pub use json::JsonGenerator;
pub use text::{TextGenerator, TextReport};

use banded_core::GeneratorRegistry;

/// A registry with the built-in `text` and `json` backends.
pub fn default_registry() -> GeneratorRegistry {
    GeneratorRegistry::new()
        .with("text", TextGenerator::default())
        .with("json", JsonGenerator::pretty())
}
