use crate::api::{PageRequest, RecordsApi};
use crate::error::{Result, SyncError};
use crate::pause;
use orderlink_config::PacingConfig;
use orderlink_core::{Record, TableId};
use tracing::debug;

/// Reads a whole table page by page. Stops on the first short or empty
/// page; any failed page aborts with no partial result.
pub fn fetch_all<A>(
    api: &A,
    table: &TableId,
    collection: &str,
    pacing: &PacingConfig,
) -> Result<Vec<Record>>
where
    A: RecordsApi + ?Sized,
{
    let page_size = pacing.page_size.max(1);
    let mut records = Vec::new();
    let mut page = 0usize;

    loop {
        let offset = page * page_size;
        let batch = api
            .list_records(
                table,
                PageRequest {
                    limit: page_size,
                    offset,
                },
            )
            .map_err(|source| SyncError::Fetch {
                collection: collection.to_string(),
                offset,
                source,
            })?;
        page += 1;

        let count = batch.len();
        if count == 0 {
            break;
        }
        records.extend(batch);
        debug!(collection, page, total = records.len(), "page fetched");

        if count < page_size {
            break;
        }
        pause(pacing.page_delay);
    }

    Ok(records)
}
