use crate::api::RecordsApi;
use crate::error::SubmissionError;
use crate::pause;
use crate::progress::{LinkProgress, ProgressReporter};
use orderlink_core::{EmailIndex, LinkRequest, NormalizedEmail, Record, RecordId, TableId};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Failures beyond this count are only counted, not kept in detail.
pub const MAX_REPORTED_FAILURES: usize = 5;
pub const PROGRESS_INTERVAL: usize = 10;

#[derive(Debug, Clone)]
pub struct LinkSettings<'a> {
    pub table: &'a TableId,
    pub link_field_id: &'a str,
    /// Display name of the link field, only used in diagnostics.
    pub link_field_name: &'a str,
    pub email_field: &'a str,
    pub delay: Duration,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkFailure {
    pub client: RecordId,
    pub email: NormalizedEmail,
    pub status: Option<u16>,
    pub message: String,
}

impl From<&SubmissionError> for LinkFailure {
    fn from(err: &SubmissionError) -> Self {
        Self {
            client: err.client.clone(),
            email: err.email.clone(),
            status: err.source.status(),
            message: err.source.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkOutcome {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<LinkFailure>,
}

pub fn should_report_progress(updated: usize) -> bool {
    updated == 1 || (updated > 0 && updated % PROGRESS_INTERVAL == 0)
}

/// Sends one link request per client whose email matches indexed orders.
/// A failed request is recorded and the loop moves on to the next client.
pub fn submit_links<A, R>(
    api: &A,
    clients: &[Record],
    index: &EmailIndex,
    settings: &LinkSettings<'_>,
    reporter: &mut R,
) -> LinkOutcome
where
    A: RecordsApi + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let mut outcome = LinkOutcome::default();
    let total = clients.len();

    for (position, client) in clients.iter().enumerate() {
        let Some(email) = client.email(settings.email_field) else {
            outcome.skipped += 1;
            continue;
        };
        let targets = index.get(&email);
        if targets.is_empty() {
            outcome.skipped += 1;
            continue;
        }
        let Some(client_id) = client.id() else {
            warn!(email = %email, "client record has no id; skipping");
            outcome.skipped += 1;
            continue;
        };

        let request = LinkRequest::new(client_id, targets.to_vec());
        let result = if settings.dry_run {
            debug!(client = %request.client, orders = request.len(), "dry run: link not sent");
            Ok(())
        } else {
            submit_one(api, settings, &email, &request)
        };

        match result {
            Ok(()) => {
                outcome.updated += 1;
                if should_report_progress(outcome.updated) {
                    reporter.linked(&LinkProgress {
                        updated: outcome.updated,
                        position: position + 1,
                        total,
                        email: &email,
                        orders: request.len(),
                    });
                }
            }
            Err(err) => {
                outcome.failed += 1;
                warn!(error = %err, "link request failed");
                if outcome.failed == 1 {
                    let endpoint = format!(
                        "POST /tables/{}/links/{}/records/{}",
                        settings.table, settings.link_field_id, request.client
                    );
                    let payload = request.payload();
                    warn!(
                        %endpoint,
                        %payload,
                        field = settings.link_field_name,
                        "first link failure; check the link field id and table"
                    );
                }
                if outcome.failures.len() < MAX_REPORTED_FAILURES {
                    outcome.failures.push(LinkFailure::from(&err));
                }
            }
        }

        if !settings.dry_run {
            pause(settings.delay);
        }
    }

    outcome
}

fn submit_one<A>(
    api: &A,
    settings: &LinkSettings<'_>,
    email: &NormalizedEmail,
    request: &LinkRequest,
) -> Result<(), SubmissionError>
where
    A: RecordsApi + ?Sized,
{
    api.link_records(settings.table, settings.link_field_id, request)
        .map_err(|source| SubmissionError {
            client: request.client.clone(),
            email: email.clone(),
            orders: request.len(),
            source,
        })
}
