use crate::error::ApiError;
use orderlink_core::{LinkRequest, Record, RecordId, TableId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

/// Remote table operations the pipeline depends on.
pub trait RecordsApi {
    fn list_records(&self, table: &TableId, page: PageRequest) -> Result<Vec<Record>, ApiError>;

    /// Links `request.targets` to `request.client` through `link_field_id`.
    fn link_records(
        &self,
        table: &TableId,
        link_field_id: &str,
        request: &LinkRequest,
    ) -> Result<(), ApiError>;

    fn get_record(&self, table: &TableId, id: &RecordId) -> Result<Record, ApiError>;
}
