//! Error types for the ummvar crate.

use netcdf_parser::NetCdfError;
use thiserror::Error;

/// Errors that abort record generation.
///
/// A missing attribute is never an error; rules report it as an absent
/// field. These variants cover inputs the mapping tables cannot express.
#[derive(Error, Debug)]
pub enum UmmVarError {
    #[error("Unmapped datatype '{datatype}' for variable {variable}")]
    UnmappedDatatype { variable: String, datatype: String },

    #[error("Unknown coverage_content_type '{value}' for variable {variable}")]
    UnknownCoverageContentType { variable: String, value: String },

    #[error("Invalid geospatial bound {attribute}='{value}' for variable {variable}")]
    InvalidGeospatialBound {
        variable: String,
        attribute: String,
        value: String,
    },

    #[error("Failed to read granule: {0}")]
    Granule(#[from] NetCdfError),

    #[error("Invalid UMM-Var schema: {0}")]
    Schema(String),

    #[error("Invalid standard name table: {0}")]
    Vocabulary(String),

    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for ummvar operations.
pub type Result<T> = std::result::Result<T, UmmVarError>;
