//! Publishing records to CMR.

use anyhow::{Context, Result};
use cmr_client::{native_id, CmrClient};
use serde_json::{Map, Value};
use tracing::info;
use ummvar::Record;

/// Ingest every record under `collection`, one request at a time.
///
/// Returns CMR's response per native id, in record order. A failed request
/// aborts the run; records already sent stay ingested.
pub async fn publish_records(
    client: &CmrClient,
    collection: &str,
    records: &[Record],
) -> Result<Map<String, Value>> {
    let short_name = client
        .collection_short_name(collection)
        .await
        .with_context(|| format!("Failed to resolve collection {}", collection))?;

    info!(
        collection = %collection,
        short_name = %short_name,
        records = records.len(),
        "Publishing UMM-Var records"
    );

    let mut ingest_log = Map::new();
    for record in records {
        let name = record
            .name()
            .context("UMM-Var record has no Name")?;
        let id = native_id(&short_name, name);
        let response = client
            .ingest_variable(collection, &id, record)
            .await
            .with_context(|| format!("Failed to ingest {}", id))?;
        ingest_log.insert(id, response);
    }

    Ok(ingest_log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use cmr_client::UMM_VAR_CONTENT_TYPE;
    use serde_json::json;
    use test_utils::{l2p_swath_tree, CF_TABLE_XML, UMM_VAR_SCHEMA_JSON};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use ummvar::{GranuleProcessor, SchemaCatalog, VocabularyTable};

    const SHORT_NAME: &str = "VIIRS_NPP-OSPO-L2P-v2.61";

    #[derive(Debug, Clone)]
    struct Request {
        method: String,
        path: String,
        headers: Vec<(String, String)>,
        body: String,
    }

    impl Request {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        }
    }

    type Requests = Arc<Mutex<Vec<Request>>>;

    /// Serve a minimal CMR on localhost, recording every request.
    async fn start_cmr() -> (String, Requests) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests: Requests = Arc::default();

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    let _ = handle(socket, recorded).await;
                });
            }
        });

        (format!("http://{}", addr), requests)
    }

    async fn handle(mut socket: TcpStream, recorded: Requests) -> std::io::Result<()> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let head_end = loop {
            let n = socket.read(&mut chunk).await?;
            if n == 0 {
                return Ok(());
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
        let mut lines = head.split("\r\n");
        let mut request_line = lines.next().unwrap_or_default().split_whitespace();
        let method = request_line.next().unwrap_or_default().to_string();
        let path = request_line.next().unwrap_or_default().to_string();
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect();

        let content_length = headers
            .iter()
            .find(|(k, _)| k == "content-length")
            .and_then(|(_, v)| v.parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < head_end + content_length {
            let n = socket.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = String::from_utf8_lossy(&buf[head_end..]).into_owned();

        let (status, response) = if path.contains("C404-") {
            ("404 Not Found", json!({"errors": ["Concept not found"]}))
        } else if method == "GET" {
            ("200 OK", json!({"ShortName": SHORT_NAME, "Version": "2.61"}))
        } else {
            let count = recorded.lock().unwrap().len();
            ("201 Created", json!({"concept-id": format!("V{}-POCLOUD", count), "revision-id": 1}))
        };

        recorded.lock().unwrap().push(Request {
            method,
            path,
            headers,
            body,
        });

        let payload = response.to_string();
        let reply = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            payload.len(),
            payload
        );
        socket.write_all(reply.as_bytes()).await?;
        socket.shutdown().await
    }

    fn swath_records() -> Vec<Record> {
        let schema = SchemaCatalog::from_schema_json(UMM_VAR_SCHEMA_JSON).unwrap();
        let vocabulary = VocabularyTable::from_xml(CF_TABLE_XML).unwrap();
        GranuleProcessor::new(&schema, &vocabulary)
            .process_group(&l2p_swath_tree())
            .unwrap()
    }

    #[tokio::test]
    async fn test_publish_resolves_short_name_then_puts_each_record() {
        let (base_url, requests) = start_cmr().await;
        let client = CmrClient::with_base_url(base_url, "token-abc").unwrap();
        let records = swath_records();

        let log = publish_records(&client, "C1234-POCLOUD", &records).await.unwrap();

        let expected_ids: Vec<String> = [
            "geophysical_data_sea_surface_temperature",
            "geophysical_data_l2p_flags",
            "lat",
            "lon",
            "time",
        ]
        .iter()
        .map(|name| format!("{}-{}", SHORT_NAME, name))
        .collect();
        assert_eq!(log.keys().cloned().collect::<Vec<_>>(), expected_ids);
        assert_eq!(log[&expected_ids[0]]["concept-id"], json!("V1-POCLOUD"));

        let requests = requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1 + records.len());

        let lookup = &requests[0];
        assert_eq!(lookup.method, "GET");
        assert_eq!(lookup.path, "/search/concepts/C1234-POCLOUD.umm_json");
        assert_eq!(lookup.header("authorization"), Some("token-abc"));

        for ((put, id), record) in requests[1..].iter().zip(&expected_ids).zip(&records) {
            assert_eq!(put.method, "PUT");
            assert_eq!(put.path, format!("/ingest/collections/C1234-POCLOUD/variables/{}", id));
            assert_eq!(put.header("content-type"), Some(UMM_VAR_CONTENT_TYPE));
            assert_eq!(put.header("accept"), Some("application/json"));
            assert_eq!(put.header("authorization"), Some("token-abc"));

            let sent: Value = serde_json::from_str(&put.body).unwrap();
            assert_eq!(sent, record.to_json());
        }
    }

    #[tokio::test]
    async fn test_unknown_collection_sends_no_records() {
        let (base_url, requests) = start_cmr().await;
        let client = CmrClient::with_base_url(base_url, "token-abc").unwrap();

        let err = publish_records(&client, "C404-POCLOUD", &swath_records())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("C404-POCLOUD"), "{}", err);

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
    }
}
