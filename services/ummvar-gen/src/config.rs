//! Generator configuration.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cmr_client::{CmrEnvironment, DEFAULT_TOKEN_PATH};
use ummvar::schema_document_url;

/// Where the CF standard name table is published.
pub const CF_TABLE_URL: &str =
    "https://cfconventions.org/Data/cf-standard-names/current/src/cf-standard-name-table.xml";

/// File name of the bundled CF table under `resources/`.
pub const CF_TABLE_FILE: &str = "cf-standard-name-table.xml";

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Where to download the UMM-Var JSON schema from
    pub schema_url: String,

    /// Local schema document; takes precedence over `schema_url`
    pub schema_path: Option<PathBuf>,

    /// CF standard name table XML; the bundled copy is used when unset
    pub cf_table_path: Option<PathBuf>,

    /// Where to download the CF table from when no local copy exists
    pub cf_table_url: String,

    /// Launchpad token file for the ops environment
    pub token_path: String,

    /// Target CMR environment
    pub environment: CmrEnvironment,
}

impl GeneratorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("CMR_ENVIRONMENT") {
            Some(value) => value
                .parse()
                .context("Invalid CMR_ENVIRONMENT")?,
            None => CmrEnvironment::Ops,
        };

        Ok(Self {
            schema_url: lookup("UMMVAR_SCHEMA_URL").unwrap_or_else(schema_document_url),
            schema_path: lookup("UMMVAR_SCHEMA_PATH").map(PathBuf::from),
            cf_table_path: lookup("UMMVAR_CF_TABLE_PATH").map(PathBuf::from),
            cf_table_url: lookup("UMMVAR_CF_TABLE_URL").unwrap_or_else(|| CF_TABLE_URL.to_string()),
            token_path: lookup("UMMVAR_TOKEN_PATH").unwrap_or_else(|| DEFAULT_TOKEN_PATH.to_string()),
            environment,
        })
    }

    /// Local CF table to read, if any.
    ///
    /// An explicit path is returned as-is. Otherwise `resources/` next to
    /// the executable is searched, then the one in the source tree.
    pub fn cf_table(&self) -> Option<PathBuf> {
        if let Some(path) = &self.cf_table_path {
            return Some(path.clone());
        }
        let beside_exe = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("resources").join(CF_TABLE_FILE)));
        let in_tree = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("resources")
            .join(CF_TABLE_FILE);

        beside_exe
            .into_iter()
            .chain(std::iter::once(in_tree))
            .find(|path| path.is_file())
    }
}
