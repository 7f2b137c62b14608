//! Core types, records, and errors for the supplementary archive.

pub mod error;
pub mod events;
pub mod forecast_rule;
pub mod icons;
pub mod record;
pub mod retention;

pub use error::{Error, Result};
pub use events::*;
pub use forecast_rule::forecast_rule_text;
pub use icons::WdIcon;
pub use record::{fields, CompositeRecord, FieldPackage, FieldValue};
pub use retention::*;
