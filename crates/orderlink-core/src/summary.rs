use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "errors", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    CompletedWithErrors(usize),
}

/// Counters for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total_orders: usize,
    pub total_clients: usize,
    pub unique_order_emails: usize,
    pub orders_without_email: usize,
    pub orders_without_id: usize,
    pub clients_updated: usize,
    pub clients_skipped: usize,
    pub clients_failed: usize,
    pub dry_run: bool,
}

impl RunSummary {
    pub fn outcome(&self) -> RunOutcome {
        if self.clients_failed == 0 {
            RunOutcome::Completed
        } else {
            RunOutcome::CompletedWithErrors(self.clients_failed)
        }
    }
}
