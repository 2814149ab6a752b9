pub mod domain;
pub mod error;
pub mod index;
pub mod link;
pub mod summary;

pub use domain::*;
pub use error::CoreError;
pub use index::{group_by_email, EmailIndex, Grouping};
pub use link::{LinkRequest, LINK_TARGET_KEY};
pub use summary::{RunOutcome, RunSummary};
