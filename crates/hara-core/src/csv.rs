//! CSV projection of the per-resource-type request statistics.

use crate::analysis::Summary;
use crate::{Error, Result};

pub const HEADINGS: [&str; 5] = [
    "Resource Type",
    "Number of Requests",
    "Time (Median)",
    "Time (95th)",
    "Transfer Size (bytes)",
];

/// Render one header row and one row per request bucket.
///
/// Buckets without requests leave the timing and size cells empty.
pub fn to_csv(summary: &Summary) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADINGS)?;

    for (key, stats) in summary.requests.iter() {
        let (median, ninety_fifth, bytes) = match &stats.details {
            Some(details) => (
                details.median_time.to_string(),
                details.ninety_fifth_time.to_string(),
                details.bytes_transferred.to_string(),
            ),
            None => (String::new(), String::new(), String::new()),
        };

        writer.write_record([
            key.to_string(),
            stats.no_of_requests.to_string(),
            median,
            ninety_fifth,
            bytes,
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
