//! External data sources polled by background workers.
//!
//! A [`Source`] owns its provider client, its rate limiter and its response
//! parser. Workers drive sources; they never see provider details.

pub mod conditions;
pub mod conditions_api;
pub mod config;
pub mod forecast;
pub mod forecast_api;
pub mod rate_limit;
pub mod source;
pub mod transport;

pub use conditions::ConditionsSource;
pub use config::{ConditionsSourceConfig, ForecastSourceConfig, SourceConfig, SourcesConfig};
pub use forecast::ForecastSource;
pub use rate_limit::{Permit, RateLimiter};
pub use source::{RawResponse, Source};
pub use transport::{HttpTransport, Transport};
