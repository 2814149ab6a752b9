#![allow(dead_code)]

use orderlink_config::{AppConfig, PacingConfig, RemoteConfig, TablesConfig};
use orderlink_core::{LinkRequest, Record, RecordId, TableId};
use orderlink_sync::{
    ApiError, LinkProgress, PageRequest, ProgressReporter, RecordsApi, StageEvent,
};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

pub const CLIENTS: &str = "m_clients";
pub const ORDERS: &str = "m_orders";
pub const LINK_FIELD: &str = "c_orders";

#[derive(Debug, Clone, PartialEq)]
pub struct LinkCall {
    pub table: String,
    pub link_field_id: String,
    pub client: RecordId,
    pub payload: Value,
}

/// In-memory records service. Serves pages out of fixed tables and records
/// every call it receives.
#[derive(Default)]
pub struct FakeApi {
    tables: HashMap<String, Vec<Record>>,
    failing_tables: HashSet<String>,
    failing_clients: HashSet<RecordId>,
    pub page_requests: RefCell<Vec<(String, PageRequest)>>,
    pub link_calls: RefCell<Vec<LinkCall>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: &str, records: Vec<Record>) -> Self {
        self.tables.insert(table.to_string(), records);
        self
    }

    pub fn failing_table(mut self, table: &str) -> Self {
        self.failing_tables.insert(table.to_string());
        self
    }

    pub fn failing_client(mut self, id: RecordId) -> Self {
        self.failing_clients.insert(id);
        self
    }

    pub fn page_requests_for(&self, table: &str) -> Vec<PageRequest> {
        self.page_requests
            .borrow()
            .iter()
            .filter(|(name, _)| name == table)
            .map(|(_, page)| *page)
            .collect()
    }

    pub fn linked_clients(&self) -> Vec<RecordId> {
        self.link_calls
            .borrow()
            .iter()
            .map(|call| call.client.clone())
            .collect()
    }
}

impl RecordsApi for FakeApi {
    fn list_records(&self, table: &TableId, page: PageRequest) -> Result<Vec<Record>, ApiError> {
        self.page_requests
            .borrow_mut()
            .push((table.to_string(), page));
        if self.failing_tables.contains(table.as_str()) {
            return Err(ApiError::Status {
                status: 500,
                message: "table unavailable".to_string(),
            });
        }
        let rows = self.tables.get(table.as_str()).cloned().unwrap_or_default();
        Ok(rows
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .collect())
    }

    fn link_records(
        &self,
        table: &TableId,
        link_field_id: &str,
        request: &LinkRequest,
    ) -> Result<(), ApiError> {
        self.link_calls.borrow_mut().push(LinkCall {
            table: table.to_string(),
            link_field_id: link_field_id.to_string(),
            client: request.client.clone(),
            payload: request.payload(),
        });
        if self.failing_clients.contains(&request.client) {
            return Err(ApiError::Status {
                status: 422,
                message: format!("cannot link client {}", request.client),
            });
        }
        Ok(())
    }

    fn get_record(&self, table: &TableId, id: &RecordId) -> Result<Record, ApiError> {
        self.tables
            .get(table.as_str())
            .and_then(|rows| rows.iter().find(|row| row.id().as_ref() == Some(id)))
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: "Record not found".to_string(),
            })
    }
}

#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub stages: Vec<StageEvent>,
    pub progress: Vec<(usize, usize, String)>,
}

impl ProgressReporter for RecordingReporter {
    fn stage(&mut self, event: StageEvent) {
        self.stages.push(event);
    }

    fn linked(&mut self, progress: &LinkProgress<'_>) {
        self.progress.push((
            progress.updated,
            progress.percent(),
            progress.email.to_string(),
        ));
    }
}

pub fn records(value: Value) -> Vec<Record> {
    serde_json::from_value(value).expect("records")
}

pub fn pacing(page_size: usize) -> PacingConfig {
    PacingConfig {
        page_size,
        page_delay: Duration::ZERO,
        link_delay: Duration::ZERO,
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        remote: RemoteConfig {
            base_url: url::Url::parse("https://nocodb.test").expect("url"),
            token: "token".to_string(),
            timeout: Duration::from_secs(60),
        },
        tables: TablesConfig {
            clients_table: TableId::new(CLIENTS).expect("table"),
            orders_table: TableId::new(ORDERS).expect("table"),
            client_email_field: "email".to_string(),
            order_email_field: "email".to_string(),
            relation_field_id: LINK_FIELD.to_string(),
            relation_field_name: "Orders".to_string(),
        },
        pacing: pacing(100),
    }
}
