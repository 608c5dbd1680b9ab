//! UMM-Var record generation.
//!
//! Maps the per-variable attributes of a NetCDF-4 granule onto records of
//! the NASA Unified Metadata Model for Variables (UMM-Var 1.8.1).
//!
//! # Architecture
//!
//! - [`walker`] flattens the group tree, deepest groups first
//! - [`rules`] holds one extraction rule per UMM-Var property
//! - [`record`] runs the rules the schema declares, in schema order
//! - [`granule`] ties file reading, walking and record building together
//!
//! The schema catalog and the CF vocabulary table are loaded once and
//! shared read-only by every record.

pub mod datatype;
pub mod encode;
pub mod error;
pub mod granule;
pub mod record;
pub mod rules;
pub mod schema;
pub mod vocabulary;
pub mod walker;

// Re-exports
pub use datatype::umm_datatype;
pub use error::{Result, UmmVarError};
pub use granule::{filter_by_name, GranuleProcessor};
pub use record::{Record, RecordBuilder};
pub use rules::UmmField;
pub use schema::{schema_document_url, SchemaCatalog, UMM_VAR_URL, UMM_VAR_VERSION};
pub use vocabulary::VocabularyTable;
pub use walker::{walk, VariableContext};
