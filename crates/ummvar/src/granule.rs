//! Granule processor: file in, ordered UMM-Var records out.

use std::path::Path;
use std::time::Instant;

use netcdf_parser::{open_granule, Group};
use tracing::info;

use crate::error::Result;
use crate::record::{Record, RecordBuilder};
use crate::schema::SchemaCatalog;
use crate::vocabulary::VocabularyTable;
use crate::walker::walk;

/// Converts every variable of a granule into a UMM-Var record.
///
/// Holds shared references to the schema catalog and vocabulary, so one
/// processor can be reused across granules.
pub struct GranuleProcessor<'a> {
    builder: RecordBuilder<'a>,
}

impl<'a> GranuleProcessor<'a> {
    pub fn new(schema: &'a SchemaCatalog, vocabulary: &'a VocabularyTable) -> Self {
        Self {
            builder: RecordBuilder::new(schema, vocabulary),
        }
    }

    /// Open a granule file and convert all of its variables.
    ///
    /// The file is closed before records are built. Either every record is
    /// produced or an error is returned.
    pub fn process_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Record>> {
        let path = path.as_ref();
        let start = Instant::now();

        let root = open_granule(path)?;
        let records = self.process_group(&root)?;

        info!(
            path = %path.display(),
            records = records.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Generated UMM-Var records"
        );
        Ok(records)
    }

    /// Convert all variables under an in-memory group tree, deepest groups
    /// first.
    pub fn process_group(&self, root: &Group) -> Result<Vec<Record>> {
        walk(root)
            .iter()
            .map(|ctx| self.builder.build(ctx))
            .collect()
    }
}

/// Keep only the records whose `Name` equals `name`.
pub fn filter_by_name(records: Vec<Record>, name: &str) -> Vec<Record> {
    records
        .into_iter()
        .filter(|r| r.name() == Some(name))
        .collect()
}
