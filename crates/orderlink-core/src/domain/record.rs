use crate::domain::email::{email_from_value, NormalizedEmail};
use crate::domain::ids::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the service-assigned identifier on fetched rows.
pub const RECORD_ID_FIELD: &str = "id";

/// One row of a remote table, kept as the raw field map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn id(&self) -> Option<RecordId> {
        self.0.get(RECORD_ID_FIELD).and_then(RecordId::from_value)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn email(&self, field: &str) -> Option<NormalizedEmail> {
        self.field(field).and_then(email_from_value)
    }
}
