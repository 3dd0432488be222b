use super::{Analyzer, PageLoad, PageStats};
use crate::Result;
use crate::har::{Har, Page};
use crate::stats::percentile;

pub struct PageAnalyzer;

impl Analyzer for PageAnalyzer {
    type Output = PageStats;

    fn analyze(&self, har: &Har) -> Result<Self::Output> {
        aggregate_pages(&har.log.pages)
    }
}

/// Compute page load statistics, keeping pages in input order
///
/// Fails with `EmptyDataset` when there are no pages.
pub fn aggregate_pages(pages: &[Page]) -> Result<PageStats> {
    let on_loads: Vec<f64> = pages.iter().map(|p| p.page_timings.on_load).collect();

    Ok(PageStats {
        no_of_pages: pages.len(),
        median_on_load: percentile(&on_loads, 0.5)?,
        ninety_fifth_on_load: percentile(&on_loads, 0.95)?,
        pages: pages
            .iter()
            .map(|page| PageLoad {
                url: page.url().to_string(),
                on_load: page.page_timings.on_load.round() as i64,
            })
            .collect(),
    })
}
