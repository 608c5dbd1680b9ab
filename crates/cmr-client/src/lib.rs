//! Minimal client for the NASA Common Metadata Repository (CMR).
//!
//! Covers what publishing UMM-Var records needs and nothing more:
//! environment hosts, the launchpad token file, resolving a collection's
//! `ShortName` and PUTting variable documents. Requests are sent once;
//! there is no retry or session handling.

pub mod client;
pub mod environment;
pub mod error;
pub mod token;

pub use client::{fetch_document, native_id, CmrClient, UMM_VAR_CONTENT_TYPE};
pub use environment::CmrEnvironment;
pub use error::{CmrError, CmrResult};
pub use token::{parse_token, read_launchpad_token, resolve_token_path, DEFAULT_TOKEN_PATH};
