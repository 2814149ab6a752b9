pub mod api;
pub mod error;
pub mod fetch;
pub mod link;
pub mod nocodb;
pub mod progress;
pub mod run;

pub use api::{PageRequest, RecordsApi};
pub use error::{ApiError, Result, SubmissionError, SyncError};
pub use fetch::fetch_all;
pub use link::{submit_links, LinkFailure, LinkOutcome, LinkSettings};
pub use nocodb::NocoDbClient;
pub use progress::{LinkProgress, ProgressReporter, StageEvent, TracingProgress};
pub use run::{fetch_record, run_sync, Collection, RunOptions, RunReport};

use std::thread;
use std::time::Duration;

pub(crate) fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}
