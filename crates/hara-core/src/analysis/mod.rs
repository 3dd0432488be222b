mod pages;
mod requests;
mod summary;

pub use pages::{PageAnalyzer, aggregate_pages};
pub use requests::{RequestAnalyzer, aggregate_requests};
pub use summary::SummaryAnalyzer;

use crate::classify::ResourceType;
use crate::har::{Har, HarReader};
use serde::Serialize;

/// Performance summary of one HAR document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub pages: PageStats,
    pub requests: RequestBuckets,
}

/// Request statistics for all entries and for each resource type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBuckets {
    pub all: RequestStats,
    pub document: RequestStats,
    pub font: RequestStats,
    pub image: RequestStats,
    pub style: RequestStats,
    pub script: RequestStats,
    pub xhr: RequestStats,
    pub other: RequestStats,
}

impl RequestBuckets {
    /// Statistics for one resource type
    pub fn get(&self, resource_type: ResourceType) -> &RequestStats {
        match resource_type {
            ResourceType::Document => &self.document,
            ResourceType::Font => &self.font,
            ResourceType::Image => &self.image,
            ResourceType::Stylesheet => &self.style,
            ResourceType::Script => &self.script,
            ResourceType::Xhr => &self.xhr,
            ResourceType::Other => &self.other,
        }
    }

    /// Buckets keyed by name, `all` first, then each resource type
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &RequestStats)> {
        std::iter::once(("all", &self.all)).chain(
            ResourceType::ALL
                .into_iter()
                .map(move |resource_type| (resource_type.bucket_key(), self.get(resource_type))),
        )
    }
}

/// Statistics for a list of entries
///
/// An empty list only carries `noOfRequests: 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStats {
    pub no_of_requests: usize,
    #[serde(flatten)]
    pub details: Option<RequestDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetails {
    pub median_time: i64,
    pub ninety_fifth_time: i64,
    pub median_timings: PhaseTimings,
    pub ninety_fifth_timings: PhaseTimings,
    pub bytes_transferred: i64,
    pub top_url: TopUrl,
    pub largest: Largest,
    pub largest_compressed: Option<LargestCompressed>,
    pub longest: Option<Longest>,
}

/// Aggregated request phases, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseTimings {
    pub blocked: i64,
    pub wait: i64,
    pub receive: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUrl {
    pub url: String,
    pub no_of_occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Largest {
    pub url: String,
    pub bytes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LargestCompressed {
    pub url: String,
    pub bytes_transferred: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Longest {
    pub url: String,
    pub time: i64,
    pub timings: EntryTimings,
}

/// Rounded phase timings of a single entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryTimings {
    pub blocked: i64,
    pub wait: i64,
    pub receive: i64,
    pub connect: i64,
}

/// Page load statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStats {
    pub no_of_pages: usize,
    pub median_on_load: i64,
    pub ninety_fifth_on_load: i64,
    pub pages: Vec<PageLoad>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLoad {
    pub url: String,
    pub on_load: i64,
}

pub trait Analyzer {
    type Output;

    fn analyze(&self, har: &Har) -> crate::Result<Self::Output>;
}

/// Parse raw HAR text and summarise it
pub fn parse_har(content: &str) -> crate::Result<Summary> {
    let har = HarReader::from_str(content)?;
    SummaryAnalyzer.analyze(&har)
}
