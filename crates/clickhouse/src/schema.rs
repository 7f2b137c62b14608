//! ClickHouse table schema.
//!
//! One row per archive period keyed by `date_time`. Every contributed field
//! is nullable because any cycle may lack any subset of sources.
//! ReplacingMergeTree collapses a row written twice by a retried insert.
//! Partitions are UTC days so retention can drop whole days.

/// Partition expression; ids are `YYYYMMDD` in UTC.
pub const PARTITION_KEY: &str = "toYYYYMMDD(toDateTime(date_time, 'UTC'))";

/// SQL for creating the database.
pub fn create_database(database: &str) -> String {
    format!("CREATE DATABASE IF NOT EXISTS {}", database)
}

/// SQL for creating the archive table.
pub fn create_archive_table(table: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {table} (
    date_time Int64,
    us_units UInt8,
    interval UInt32,

    -- Provider fields
    forecast_icon Nullable(Int64),
    forecast_text Nullable(String),
    current_icon Nullable(Int64),
    current_text Nullable(String),

    -- Console fields
    vantage_forecast_icon Nullable(Int64),
    vantage_forecast_rule Nullable(String),
    storm_rain Nullable(Float64),
    storm_start Nullable(Int64),
    max_solar_rad Nullable(Float64)
)
ENGINE = ReplacingMergeTree()
PARTITION BY {PARTITION_KEY}
ORDER BY date_time
SETTINGS index_granularity = 8192
"#
    )
}

/// All DDL statements, in execution order.
pub fn all_statements(database: &str, table: &str) -> Vec<String> {
    vec![create_database(database), create_archive_table(table)]
}
