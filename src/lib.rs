//! Normalize ambient type declarations into a declaration model and diff two
//! models of the same construct.
//!
//! ```text
//! SourceFile ──builder──▶ DeclarationMap ─┐
//!                                         ├─compare──▶ ResultComparison ──format──▶ report line
//! SourceFile ──builder──▶ DeclarationMap ─┘
//! ```
//!
//! - [`syntax`] - syntax tree produced by an external declaration parser
//! - [`model`] - the declaration model
//! - [`builder`] - syntax tree to declaration model
//! - [`difference`] - difference taxonomy and comparison results
//! - [`compare`] - structural diff of two models
//! - [`format`] - report formatters

pub mod builder;
pub mod compare;
pub mod difference;
pub mod error;
pub mod format;
pub mod model;
pub mod syntax;
pub mod tracing_config;

use std::path::Path;

pub use builder::build_declarations;
pub use compare::{
    compare_classes, compare_declarations, compare_functions, compare_interfaces,
    compare_namespaces, Alignment, CompareOptions,
};
pub use difference::{Difference, DifferenceCode, DifferenceKind, ResultComparison};
pub use error::{Error, Result};
pub use format::{CsvFormatter, Formatter};
pub use model::{Class, DeclarationMap, Function, Interface, Namespace, Property, PropertyType};
pub use syntax::SourceFile;

// ── Core API ───────────────────────────────────────────────────────

/// Build both sources and compare every construct they declare.
pub fn compare_sources(
    reference: &SourceFile,
    candidate: &SourceFile,
    options: &CompareOptions,
) -> Vec<ResultComparison> {
    let reference = build_declarations(reference);
    let candidate = build_declarations(candidate);
    compare_declarations(&reference, &candidate, options)
}

/// Deserialize a syntax tree from its JSON form.
pub fn source_file_from_json(input: &str) -> serde_json::Result<SourceFile> {
    serde_json::from_str(input)
}

/// Read a JSON syntax tree from disk.
pub fn load_source_file(path: &Path) -> Result<SourceFile> {
    let input = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut file = source_file_from_json(&input).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    if file.file_name.is_none() {
        file.file_name = Some(path.display().to_string());
    }
    Ok(file)
}
