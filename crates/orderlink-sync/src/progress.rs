use orderlink_core::NormalizedEmail;
use tracing::info;

/// Milestones of a run, emitted once each in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    ClientsLoaded {
        count: usize,
    },
    OrdersLoaded {
        count: usize,
    },
    OrdersGrouped {
        unique_emails: usize,
        without_email: usize,
    },
    LinkingStarted {
        clients: usize,
        dry_run: bool,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct LinkProgress<'a> {
    pub updated: usize,
    pub position: usize,
    pub total: usize,
    pub email: &'a NormalizedEmail,
    pub orders: usize,
}

impl LinkProgress<'_> {
    /// Share of clients processed so far, rounded to the nearest percent.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 100;
        }
        (self.position * 100 + self.total / 2) / self.total
    }
}

pub trait ProgressReporter {
    fn stage(&mut self, _event: StageEvent) {}

    /// Called for the 1st successful update and every 10th after that.
    fn linked(&mut self, progress: &LinkProgress<'_>);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn stage(&mut self, event: StageEvent) {
        match event {
            StageEvent::ClientsLoaded { count } => info!(count, "clients loaded"),
            StageEvent::OrdersLoaded { count } => info!(count, "orders loaded"),
            StageEvent::OrdersGrouped {
                unique_emails,
                without_email,
            } => info!(unique_emails, without_email, "orders grouped by email"),
            StageEvent::LinkingStarted { clients, dry_run } => {
                info!(clients, dry_run, "linking orders to clients")
            }
        }
    }

    fn linked(&mut self, progress: &LinkProgress<'_>) {
        info!(
            updated = progress.updated,
            percent = progress.percent(),
            email = %progress.email,
            orders = progress.orders,
            "clients updated"
        );
    }
}
