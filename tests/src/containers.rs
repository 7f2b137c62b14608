//! ClickHouse server for the storage tests.
//!
//! A testcontainer is started unless `SUPP_TEST_CLICKHOUSE_URL` names an
//! existing server. Each test gets its own table so runs against a shared
//! server do not see each other's rows.

use std::time::Duration;

use clickhouse_client::ClickHouseConfig;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

const TEST_DATABASE: &str = "weewxwd_test";
const HTTP_PORT: u16 = 8123;

/// A reachable ClickHouse server, kept alive as long as this value.
pub struct TestContainers {
    _clickhouse: Option<ContainerAsync<GenericImage>>,
    base: ClickHouseConfig,
}

impl TestContainers {
    pub async fn start() -> Self {
        let env = |key: &str| {
            std::env::var(key)
                .ok()
                .filter(|value| !value.trim().is_empty())
        };

        if let Some(url) = env("SUPP_TEST_CLICKHOUSE_URL") {
            return Self {
                _clickhouse: None,
                base: ClickHouseConfig {
                    url,
                    database: env("SUPP_TEST_CLICKHOUSE_DB")
                        .unwrap_or_else(|| TEST_DATABASE.to_string()),
                    table: String::new(),
                    username: env("SUPP_TEST_CLICKHOUSE_USER"),
                    password: env("SUPP_TEST_CLICKHOUSE_PASSWORD"),
                },
            };
        }

        let (container, url) = start_clickhouse().await;
        Self {
            _clickhouse: Some(container),
            base: ClickHouseConfig {
                url,
                database: TEST_DATABASE.to_string(),
                table: String::new(),
                username: Some("default".to_string()),
                password: None,
            },
        }
    }

    /// Connection settings for the table `supp_<test>_<pid>`.
    pub fn config_for(&self, test: &str) -> ClickHouseConfig {
        ClickHouseConfig {
            table: format!("supp_{}_{}", test, std::process::id()),
            ..self.base.clone()
        }
    }
}

async fn start_clickhouse() -> (ContainerAsync<GenericImage>, String) {
    // Empty password for `default` needs access management switched on.
    let container = GenericImage::new("clickhouse/clickhouse-server", "24.3")
        .with_wait_for(WaitFor::seconds(5))
        .with_exposed_port(HTTP_PORT.tcp())
        .with_env_var("CLICKHOUSE_DEFAULT_ACCESS_MANAGEMENT", "1")
        .with_env_var("CLICKHOUSE_USER", "default")
        .with_env_var("CLICKHOUSE_PASSWORD", "")
        .start()
        .await
        .expect("Failed to start ClickHouse");

    let port = container
        .get_host_port_ipv4(HTTP_PORT)
        .await
        .expect("ClickHouse HTTP port not mapped");
    let url = format!("http://127.0.0.1:{}", port);
    wait_for_ping(&url, Duration::from_secs(30)).await;

    (container, url)
}

/// Polls `/ping` until the server answers `Ok.`.
async fn wait_for_ping(url: &str, timeout: Duration) {
    let client = reqwest::Client::new();
    let ping = format!("{}/ping", url);
    let deadline = tokio::time::Instant::now() + timeout;

    while tokio::time::Instant::now() < deadline {
        if let Ok(resp) = client.get(&ping).send().await {
            if resp.status().is_success()
                && resp.text().await.is_ok_and(|body| body.trim() == "Ok.")
            {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    panic!("ClickHouse at {} not ready after {:?}", url, timeout);
}
