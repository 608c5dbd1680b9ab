//! Launchpad token file.
//!
//! The token is provisioned as a small JSON document next to the deployment
//! (`/launchpad_token_ngap_<env>.json`) or under the operator's `~/certs`.
//! Some provisioning scripts leave keys with no value behind (`"expires":,`),
//! so those lines are dropped and parsing retried before giving up.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::environment::CmrEnvironment;
use crate::error::{CmrError, CmrResult};

pub const DEFAULT_TOKEN_PATH: &str = "/launchpad_token_ngap_ops.json";
pub const FALLBACK_TOKEN_PATH: &str = "~/certs/launchpad_token_ngap_ops.json";

/// Pick the token file for `environment`.
///
/// `primary` is used when it exists, otherwise [`FALLBACK_TOKEN_PATH`]. For
/// environments other than ops the `ops.json` suffix is swapped for
/// `<env>.json` after the file has been chosen.
pub fn resolve_token_path(primary: &str, environment: CmrEnvironment) -> CmrResult<PathBuf> {
    let candidates = [primary, FALLBACK_TOKEN_PATH];
    let chosen = candidates
        .iter()
        .map(|p| shellexpand::tilde(p).into_owned())
        .find(|p| Path::new(p).is_file())
        .ok_or_else(|| CmrError::Token("A launchpad token is not available".to_string()))?;

    let path = match environment {
        CmrEnvironment::Ops => chosen,
        env => chosen.replace("ops.json", &format!("{}.json", env)),
    };
    Ok(PathBuf::from(path))
}

/// Read the `token` field of a launchpad token file.
///
/// Returns `Ok(None)` when the document parses but carries no token.
pub fn read_launchpad_token(primary: &str, environment: CmrEnvironment) -> CmrResult<Option<String>> {
    let path = resolve_token_path(primary, environment)?;
    debug!(path = %path.display(), environment = %environment, "Reading launchpad token");
    let text = std::fs::read_to_string(&path)?;
    parse_token(&text)
}

/// Parse token file contents, tolerating lines with an empty value.
pub fn parse_token(text: &str) -> CmrResult<Option<String>> {
    let document: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => {
            let cleaned = text
                .lines()
                .filter(|line| !line.replace(' ', "").contains("\":,"))
                .collect::<Vec<_>>()
                .join("\n");
            serde_json::from_str(&cleaned)?
        }
    };

    Ok(document
        .get("token")
        .and_then(Value::as_str)
        .map(str::to_string))
}
