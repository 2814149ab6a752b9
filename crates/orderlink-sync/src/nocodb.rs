use crate::api::{PageRequest, RecordsApi};
use crate::error::ApiError;
use orderlink_config::RemoteConfig;
use orderlink_core::{LinkRequest, Record, RecordId, TableId};
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use url::Url;

const API_PREFIX: [&str; 2] = ["api", "v2"];
const USER_AGENT: &str = "orderlink";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ERROR_BODY: usize = 200;

/// Blocking client for the NocoDB v2 data API.
#[derive(Clone)]
pub struct NocoDbClient {
    http: Client,
    api_base: Url,
    token: String,
}

impl fmt::Debug for NocoDbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NocoDbClient")
            .field("api_base", &self.api_base.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    list: Option<Vec<Record>>,
}

impl NocoDbClient {
    pub fn new(remote: &RemoteConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(remote.timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(remote.timeout))
            .build()?;
        Ok(Self {
            http,
            api_base: api_base(&remote.base_url)?,
            token: remote.token.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        join_segments(&self.api_base, segments)
    }
}

impl RecordsApi for NocoDbClient {
    fn list_records(&self, table: &TableId, page: PageRequest) -> Result<Vec<Record>, ApiError> {
        let url = self.endpoint(&["tables", table.as_str(), "records"])?;
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .query(&[("limit", page.limit), ("offset", page.offset)])
            .send()?;
        let body: ListResponse = ensure_success(response)?.json()?;
        Ok(body.list.unwrap_or_default())
    }

    fn link_records(
        &self,
        table: &TableId,
        link_field_id: &str,
        request: &LinkRequest,
    ) -> Result<(), ApiError> {
        let client_id = request.client.to_string();
        let url = self.endpoint(&[
            "tables",
            table.as_str(),
            "links",
            link_field_id,
            "records",
            &client_id,
        ])?;
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .json(&request.payload())
            .send()?;
        ensure_success(response)?;
        Ok(())
    }

    fn get_record(&self, table: &TableId, id: &RecordId) -> Result<Record, ApiError> {
        let record_id = id.to_string();
        let url = self.endpoint(&["tables", table.as_str(), "records", &record_id])?;
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()?;
        Ok(ensure_success(response)?.json()?)
    }
}

fn api_base(base_url: &Url) -> Result<Url, ApiError> {
    join_segments(base_url, &API_PREFIX)
}

fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| ApiError::Decode(format!("base url cannot carry a path: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message: error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string()),
    })
}

fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        for key in ["message", "msg", "error"] {
            if let Some(Value::String(message)) = map.get(key) {
                if !message.trim().is_empty() {
                    return Some(message.trim().to_string());
                }
            }
        }
    }
    Some(truncate(trimmed, MAX_ERROR_BODY))
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
