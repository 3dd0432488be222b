use super::{
    Analyzer, EntryTimings, Largest, LargestCompressed, Longest, PhaseTimings, RequestDetails,
    RequestStats, TopUrl,
};
use crate::classify::{ResourceType, classify};
use crate::har::{Entry, Har};
use crate::stats::{mode, percentile, sum};
use crate::{Error, Result};

/// Aggregates entries, either all of them or those of one resource type
pub struct RequestAnalyzer {
    resource_type: Option<ResourceType>,
}

impl RequestAnalyzer {
    pub fn all() -> Self {
        Self {
            resource_type: None,
        }
    }

    pub fn for_type(resource_type: ResourceType) -> Self {
        Self {
            resource_type: Some(resource_type),
        }
    }
}

impl Analyzer for RequestAnalyzer {
    type Output = RequestStats;

    fn analyze(&self, har: &Har) -> Result<Self::Output> {
        let entries: Vec<&Entry> = har
            .log
            .entries
            .iter()
            .filter(|entry| {
                self.resource_type
                    .is_none_or(|resource_type| classify(entry) == resource_type)
            })
            .collect();

        aggregate_requests(&entries)
    }
}

/// Compute request statistics for a list of entries
pub fn aggregate_requests(entries: &[&Entry]) -> Result<RequestStats> {
    if entries.is_empty() {
        return Ok(RequestStats {
            no_of_requests: 0,
            details: None,
        });
    }

    let times: Vec<f64> = entries.iter().map(|e| e.time).collect();
    let transfer_sizes: Vec<i64> = entries
        .iter()
        .map(|e| e.transfer_size().unwrap_or(0))
        .collect();

    let details = RequestDetails {
        median_time: percentile(&times, 0.5)?,
        ninety_fifth_time: percentile(&times, 0.95)?,
        median_timings: phase_percentiles(entries, 0.5)?,
        ninety_fifth_timings: phase_percentiles(entries, 0.95)?,
        bytes_transferred: sum(&transfer_sizes)?,
        top_url: top_url(entries)?,
        largest: largest(entries)?,
        largest_compressed: largest_compressed(entries),
        longest: longest(entries),
    };

    Ok(RequestStats {
        no_of_requests: entries.len(),
        details: Some(details),
    })
}

// Each phase is aggregated on its own.
fn phase_percentiles(entries: &[&Entry], q: f64) -> Result<PhaseTimings> {
    let phase = |select: fn(&Entry) -> f64| -> Result<i64> {
        let values: Vec<f64> = entries.iter().map(|e| select(e)).collect();
        percentile(&values, q)
    };

    Ok(PhaseTimings {
        blocked: phase(|e| e.timings.blocked)?,
        wait: phase(|e| e.timings.wait)?,
        receive: phase(|e| e.timings.receive)?,
    })
}

fn top_url(entries: &[&Entry]) -> Result<TopUrl> {
    let urls: Vec<&str> = entries.iter().map(|e| e.url()).collect();
    let url = *mode(&urls)?;

    Ok(TopUrl {
        url: url.to_string(),
        no_of_occurrences: urls.iter().filter(|u| **u == url).count(),
    })
}

fn largest(entries: &[&Entry]) -> Result<Largest> {
    let entry = max_by_key(entries.iter().copied(), |e| e.response.content.size)
        .ok_or_else(|| Error::EmptyDataset("largest entry".to_string()))?;

    Ok(Largest {
        url: entry.url().to_string(),
        bytes: entry.response.content.size,
    })
}

/// Only entries that report a transfer size are candidates
fn largest_compressed(entries: &[&Entry]) -> Option<LargestCompressed> {
    let candidates = entries
        .iter()
        .filter_map(|e| e.transfer_size().map(|size| (*e, size)));

    max_by_key(candidates, |(_, size)| *size).map(|(entry, size)| LargestCompressed {
        url: entry.url().to_string(),
        bytes_transferred: size,
    })
}

fn longest(entries: &[&Entry]) -> Option<Longest> {
    max_by_key(entries.iter().copied(), |e| e.time).map(|entry| Longest {
        url: entry.url().to_string(),
        time: entry.time.round() as i64,
        timings: EntryTimings {
            blocked: entry.timings.blocked.round() as i64,
            wait: entry.timings.wait.round() as i64,
            receive: entry.timings.receive.round() as i64,
            connect: entry.timings.connect.round() as i64,
        },
    })
}

/// Maximum by key; on ties the earliest item wins.
fn max_by_key<T, K, I, F>(items: I, key: F) -> Option<T>
where
    I: IntoIterator<Item = T>,
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    let mut best: Option<(T, K)> = None;
    for item in items {
        let k = key(&item);
        let replace = match &best {
            Some((_, best_key)) => k > *best_key,
            None => true,
        };
        if replace {
            best = Some((item, k));
        }
    }
    best.map(|(item, _)| item)
}
