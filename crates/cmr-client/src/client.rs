//! CMR search and ingest requests.

use std::time::Duration;

use reqwest::{header, Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::environment::CmrEnvironment;
use crate::error::{CmrError, CmrResult};

/// Content type CMR expects for UMM-Var 1.8.1 documents.
pub const UMM_VAR_CONTENT_TYPE: &str = "application/vnd.nasa.cmr.umm+json;version=1.8.1";

/// Native id of a variable in CMR: `<ShortName>-<name>`.
///
/// A leading `/` is dropped and remaining separators become `_`, so grouped
/// names stay a single URL path segment.
pub fn native_id(short_name: &str, variable_name: &str) -> String {
    let name = variable_name.trim_start_matches('/').replace('/', "_");
    format!("{}-{}", short_name, name)
}

/// Authenticated client for one CMR environment.
pub struct CmrClient {
    client: Client,
    base_url: String,
    token: String,
}

impl CmrClient {
    pub fn new(environment: CmrEnvironment, token: impl Into<String>) -> CmrResult<Self> {
        Self::with_base_url(environment.base_url(), token)
    }

    /// Client against an arbitrary base URL, e.g. a local CMR.
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> CmrResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn collection_url(&self, concept_id: &str) -> String {
        format!("{}/search/concepts/{}.umm_json", self.base_url, concept_id)
    }

    pub fn ingest_url(&self, concept_id: &str, native_id: &str) -> String {
        format!(
            "{}/ingest/collections/{}/variables/{}",
            self.base_url, concept_id, native_id
        )
    }

    /// Look up the `ShortName` of a collection by concept id.
    #[instrument(skip(self))]
    pub async fn collection_short_name(&self, concept_id: &str) -> CmrResult<String> {
        let url = self.collection_url(concept_id);
        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, &self.token)
            .send()
            .await?;
        let body = json_body(&url, response).await?;

        let short_name = body
            .get("ShortName")
            .and_then(Value::as_str)
            .ok_or_else(|| CmrError::MissingShortName(concept_id.to_string()))?;

        debug!(concept_id = %concept_id, short_name = %short_name, "Resolved collection");
        Ok(short_name.to_string())
    }

    /// PUT one UMM-Var record under `concept_id`, returning CMR's response
    /// document.
    pub async fn ingest_variable<T: Serialize + ?Sized>(
        &self,
        concept_id: &str,
        native_id: &str,
        record: &T,
    ) -> CmrResult<Value> {
        let url = self.ingest_url(concept_id, native_id);
        let payload = serde_json::to_vec(record)?;

        let response = self
            .client
            .put(&url)
            .header(header::AUTHORIZATION, &self.token)
            .header(header::CONTENT_TYPE, UMM_VAR_CONTENT_TYPE)
            .header(header::ACCEPT, "application/json")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;
        info!(
            native_id = %native_id,
            status = status.as_u16(),
            "Ingested variable"
        );
        Ok(body)
    }
}

/// Download a reference document such as the UMM-Var JSON schema or the CF
/// standard name table.
pub async fn fetch_document(url: &str) -> CmrResult<String> {
    let response = Client::new().get(url).send().await?;
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(CmrError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body: text,
        });
    }
    debug!(url = %url, bytes = text.len(), "Fetched document");
    Ok(text)
}

async fn json_body(url: &str, response: Response) -> CmrResult<Value> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(CmrError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body: text,
        });
    }
    Ok(serde_json::from_str(&text)?)
}
