pub mod analysis;
pub mod classify;
pub mod csv;
pub mod error;
pub mod har;
pub mod stats;

pub use analysis::{PageStats, RequestStats, Summary, parse_har};
pub use classify::{ResourceType, classify};
pub use crate::csv::to_csv;
pub use error::{Error, Result};
