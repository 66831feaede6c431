//! Typed errors raised by the cleaning pipeline.

/// The input table does not have the shape the pipeline needs.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}
