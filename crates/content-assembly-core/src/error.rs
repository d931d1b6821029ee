//! Configuration errors raised by the assembly engine.
//!
//! Every variant is fatal: a builder that hits one returns it immediately
//! and no [`StructuralGraph`](crate::models::StructuralGraph) is produced.
//! Data-quality findings are not errors and live in the validator instead.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("unknown content structure: '{0}'")]
    UnknownContentStructure(String),

    #[error("unknown resource type: '{0}'")]
    UnknownResourceType(String),

    #[error("unknown grouping mode: '{0}'. Must be default, filename, or filename_with_ocr")]
    UnknownGroupingMode(String),

    #[error("unknown {field} value: '{value}'")]
    UnknownAccessValue { field: &'static str, value: String },

    #[error("invalid {flag} flag for '{filename}': '{value}' (expected yes or no)")]
    InvalidFlag {
        filename: String,
        flag: &'static str,
        value: String,
    },

    #[error("manifest resource {sequence} lists no files")]
    EmptyResource { sequence: u32 },
}

/// Convenience alias for engine results.
pub type AssemblyResult<T> = std::result::Result<T, AssemblyError>;
