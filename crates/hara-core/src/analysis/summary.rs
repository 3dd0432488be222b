use super::{Analyzer, PageAnalyzer, RequestAnalyzer, RequestBuckets, Summary};
use crate::Result;
use crate::classify::ResourceType;
use crate::har::Har;

/// Builds the full summary: page statistics plus one request bucket for all
/// entries and one per resource type
pub struct SummaryAnalyzer;

impl Analyzer for SummaryAnalyzer {
    type Output = Summary;

    fn analyze(&self, har: &Har) -> Result<Self::Output> {
        tracing::debug!(
            "Summarising {} pages and {} entries",
            har.log.pages.len(),
            har.log.entries.len()
        );

        let pages = PageAnalyzer.analyze(har)?;
        let bucket = |resource_type| RequestAnalyzer::for_type(resource_type).analyze(har);

        let requests = RequestBuckets {
            all: RequestAnalyzer::all().analyze(har)?,
            document: bucket(ResourceType::Document)?,
            font: bucket(ResourceType::Font)?,
            image: bucket(ResourceType::Image)?,
            style: bucket(ResourceType::Stylesheet)?,
            script: bucket(ResourceType::Script)?,
            xhr: bucket(ResourceType::Xhr)?,
            other: bucket(ResourceType::Other)?,
        };

        tracing::debug!(
            "Summary complete: {} requests, {} pages",
            requests.all.no_of_requests,
            pages.no_of_pages
        );

        Ok(Summary { pages, requests })
    }
}
