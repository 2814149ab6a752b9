use crate::domain::RecordId;
use serde_json::{Map, Value};

/// Key of each association object accepted by the NocoDB v2 links endpoint
/// (`POST /tables/{table}/links/{field}/records/{id}`). The endpoint expects
/// capital-I `Id` regardless of how fetched rows spell their own id field.
pub const LINK_TARGET_KEY: &str = "Id";

/// Orders to associate with one client in a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    pub client: RecordId,
    pub targets: Vec<RecordId>,
}

impl LinkRequest {
    pub fn new(client: RecordId, targets: Vec<RecordId>) -> Self {
        Self { client, targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn payload(&self) -> Value {
        Value::Array(
            self.targets
                .iter()
                .map(|id| {
                    let mut entry = Map::with_capacity(1);
                    entry.insert(LINK_TARGET_KEY.to_string(), id.to_value());
                    Value::Object(entry)
                })
                .collect(),
        )
    }
}
