//! ClickHouse configuration.

use serde::{Deserialize, Serialize};

/// ClickHouse client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickHouseConfig {
    /// ClickHouse HTTP URL
    #[serde(default = "default_url")]
    pub url: String,
    /// Database name
    #[serde(default = "default_database")]
    pub database: String,
    /// Table holding one row per archive period
    #[serde(default = "default_table")]
    pub table: String,
    /// Username (optional)
    pub username: Option<String>,
    /// Password (optional)
    pub password: Option<String>,
}

fn default_url() -> String {
    "http://localhost:8123".to_string()
}

fn default_database() -> String {
    "weewxwd".to_string()
}

fn default_table() -> String {
    "supp_archive".to_string()
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            database: default_database(),
            table: default_table(),
            username: None,
            password: None,
        }
    }
}

impl ClickHouseConfig {
    /// `database.table`, as used in every statement.
    pub fn qualified_table(&self) -> String {
        format!("{}.{}", self.database, self.table)
    }
}
