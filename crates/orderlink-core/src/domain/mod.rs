pub mod email;
pub mod ids;
pub mod record;

pub use email::{email_from_value, normalize_email, NormalizedEmail};
pub use ids::{RecordId, TableId};
pub use record::{Record, RECORD_ID_FIELD};
