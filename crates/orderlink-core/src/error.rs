use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("table id is required")]
    EmptyTableId,
    #[error("invalid record id: {0:?}")]
    InvalidRecordId(String),
}
