//! Range reads over the archive table (downstream readers, admin and tests).

use crate::client::ClickHouseClient;
use crate::store::{SuppRow, COLUMNS};
use supp_core::{Error, Result};

/// Rows with `start <= date_time <= end`, oldest first.
///
/// `FINAL` collapses rows a retried insert may have written twice.
pub async fn records_between(
    client: &ClickHouseClient,
    start: i64,
    end: i64,
) -> Result<Vec<SuppRow>> {
    let rows: Vec<SuppRow> = client
        .inner()
        .query(&format!(
            "SELECT {} FROM {} FINAL WHERE date_time >= ? AND date_time <= ? ORDER BY date_time",
            COLUMNS,
            client.table()
        ))
        .bind(start)
        .bind(end)
        .fetch_all()
        .await
        .map_err(|e| Error::store(format!("Query error: {}", e)))?;
    Ok(rows)
}

/// Count all rows.
pub async fn count_records(client: &ClickHouseClient) -> Result<u64> {
    let count: u64 = client
        .inner()
        .query(&format!("SELECT count() FROM {} FINAL", client.table()))
        .fetch_one()
        .await
        .map_err(|e| Error::store(format!("Query error: {}", e)))?;
    Ok(count)
}

/// Timestamp of the newest row, if any.
pub async fn latest_timestamp(client: &ClickHouseClient) -> Result<Option<i64>> {
    if count_records(client).await? == 0 {
        return Ok(None);
    }

    let latest: i64 = client
        .inner()
        .query(&format!("SELECT max(date_time) FROM {}", client.table()))
        .fetch_one()
        .await
        .map_err(|e| Error::store(format!("Query error: {}", e)))?;
    Ok(Some(latest))
}

/// Truncate the archive table (test cleanup).
pub async fn truncate_records(client: &ClickHouseClient) -> Result<()> {
    client
        .inner()
        .query(&format!("TRUNCATE TABLE IF EXISTS {}", client.table()))
        .execute()
        .await
        .map_err(|e| Error::store(format!("Truncate error: {}", e)))?;
    Ok(())
}
