use anyhow::Result;
use hara_core::Summary;

pub mod commands;
pub mod config;

pub use config::{Config, Destination};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }

    /// Pretty JSON (two-space indent) or the CSV table, newline-terminated
    pub fn render(&self, summary: &Summary) -> Result<String> {
        match self {
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(summary)?;
                json.push('\n');
                Ok(json)
            }
            OutputFormat::Csv => Ok(hara_core::to_csv(summary)?),
        }
    }
}
