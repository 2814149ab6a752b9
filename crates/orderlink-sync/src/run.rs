use crate::api::RecordsApi;
use crate::error::{Result, SyncError};
use crate::fetch::fetch_all;
use crate::link::{submit_links, LinkFailure, LinkSettings};
use crate::progress::{ProgressReporter, StageEvent};
use orderlink_config::AppConfig;
use orderlink_core::{group_by_email, Record, RecordId, RunOutcome, RunSummary, TableId};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub dry_run: bool,
    /// Overrides `pacing.page_size` for this run.
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub outcome: RunOutcome,
    pub failures: Vec<LinkFailure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Clients,
    Orders,
}

impl Collection {
    pub fn label(self) -> &'static str {
        match self {
            Collection::Clients => "clients",
            Collection::Orders => "orders",
        }
    }

    pub fn table(self, config: &AppConfig) -> &TableId {
        match self {
            Collection::Clients => &config.tables.clients_table,
            Collection::Orders => &config.tables.orders_table,
        }
    }
}

/// Fetches both tables, groups orders by email and links them to clients.
/// Fetch failures abort the run; link failures are counted in the report.
pub fn run_sync<A, R>(
    api: &A,
    config: &AppConfig,
    options: RunOptions,
    reporter: &mut R,
) -> Result<RunReport>
where
    A: RecordsApi + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let mut pacing = config.pacing;
    if let Some(page_size) = options.page_size {
        pacing.page_size = page_size;
    }
    let tables = &config.tables;

    let clients = load(api, config, Collection::Clients, &pacing)?;
    reporter.stage(StageEvent::ClientsLoaded {
        count: clients.len(),
    });

    let orders = load(api, config, Collection::Orders, &pacing)?;
    reporter.stage(StageEvent::OrdersLoaded {
        count: orders.len(),
    });

    let grouping = group_by_email(&orders, &tables.order_email_field);
    if grouping.without_id > 0 {
        warn!(
            count = grouping.without_id,
            "orders with an email but no id were ignored"
        );
    }
    reporter.stage(StageEvent::OrdersGrouped {
        unique_emails: grouping.index.unique_emails(),
        without_email: grouping.without_email,
    });

    reporter.stage(StageEvent::LinkingStarted {
        clients: clients.len(),
        dry_run: options.dry_run,
    });
    let settings = LinkSettings {
        table: &tables.clients_table,
        link_field_id: &tables.relation_field_id,
        link_field_name: &tables.relation_field_name,
        email_field: &tables.client_email_field,
        delay: pacing.link_delay,
        dry_run: options.dry_run,
    };
    let outcome = submit_links(api, &clients, &grouping.index, &settings, reporter);

    let summary = RunSummary {
        total_orders: orders.len(),
        total_clients: clients.len(),
        unique_order_emails: grouping.index.unique_emails(),
        orders_without_email: grouping.without_email,
        orders_without_id: grouping.without_id,
        clients_updated: outcome.updated,
        clients_skipped: outcome.skipped,
        clients_failed: outcome.failed,
        dry_run: options.dry_run,
    };
    info!(
        updated = summary.clients_updated,
        skipped = summary.clients_skipped,
        failed = summary.clients_failed,
        "sync finished"
    );

    Ok(RunReport {
        outcome: summary.outcome(),
        summary,
        failures: outcome.failures,
    })
}

/// Reads a single record; used for diagnostics, not by the pipeline.
pub fn fetch_record<A>(
    api: &A,
    config: &AppConfig,
    collection: Collection,
    id: &RecordId,
) -> Result<Record>
where
    A: RecordsApi + ?Sized,
{
    api.get_record(collection.table(config), id)
        .map_err(|source| SyncError::Record {
            collection: collection.label().to_string(),
            id: id.clone(),
            source,
        })
}

fn load<A>(
    api: &A,
    config: &AppConfig,
    collection: Collection,
    pacing: &orderlink_config::PacingConfig,
) -> Result<Vec<Record>>
where
    A: RecordsApi + ?Sized,
{
    info!(collection = collection.label(), "loading records");
    fetch_all(api, collection.table(config), collection.label(), pacing)
}
