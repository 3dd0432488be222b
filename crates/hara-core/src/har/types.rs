use serde::{Deserialize, Deserializer};

/// Top-level HAR object
#[derive(Debug, Clone, Deserialize)]
pub struct Har {
    pub log: Log,
}

/// The parts of the HAR log the summariser reads
#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub pages: Vec<Page>,
    pub entries: Vec<Entry>,
}

/// Page information
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub title: String,
    #[serde(rename = "pageTimings")]
    pub page_timings: PageTimings,
}

impl Page {
    /// Page title with any query string removed
    pub fn url(&self) -> &str {
        normalize_url(&self.title)
    }
}

/// Page timing information
#[derive(Debug, Clone, Deserialize)]
pub struct PageTimings {
    #[serde(rename = "onLoad")]
    pub on_load: f64,
}

/// Individual HTTP transaction entry
///
/// Besides the standard HAR fields this carries the vendor extensions that
/// different capture tools use for transfer size (`_bytesIn`) and resource
/// type (`_resourceType`, `_request_type`).
#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    pub time: f64,
    pub request: Request,
    pub response: Response,
    pub timings: Timings,
    #[serde(rename = "_bytesIn", default, deserialize_with = "optional_bytes")]
    pub bytes_in: Option<i64>,
    #[serde(rename = "_resourceType", default)]
    pub resource_type: Option<String>,
    #[serde(rename = "_request_type", default)]
    pub request_type: Option<String>,
}

impl Entry {
    /// Bytes sent over the wire, from `response._transferSize` or `_bytesIn`
    pub fn transfer_size(&self) -> Option<i64> {
        self.response.transfer_size.or(self.bytes_in)
    }

    /// Request URL with any query string removed
    pub fn url(&self) -> &str {
        normalize_url(&self.request.url)
    }
}

/// HTTP request
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub url: String,
}

/// HTTP response
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    pub content: Content,
    #[serde(rename = "_transferSize", default, deserialize_with = "optional_bytes")]
    pub transfer_size: Option<i64>,
}

/// Response content
#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    #[serde(deserialize_with = "bytes")]
    pub size: i64,
}

/// Timing information
///
/// `blocked` and `connect` are optional in HAR 1.2 and default to -1
/// ("does not apply"), as the format defines.
#[derive(Debug, Clone, Deserialize)]
pub struct Timings {
    #[serde(default = "not_applicable")]
    pub blocked: f64,
    #[serde(default = "not_applicable")]
    pub connect: f64,
    pub wait: f64,
    pub receive: f64,
}

/// Strip the query string from a URL
pub fn normalize_url(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

fn not_applicable() -> f64 {
    -1.0
}

// Some producers write sizes as floats.
fn bytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    to_bytes(f64::deserialize(deserializer)?)
}

fn optional_bytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Option::<f64>::deserialize(deserializer)?
        .map(to_bytes)
        .transpose()
}

/// Round to whole bytes, rejecting values an `i64` cannot hold
fn to_bytes<E: serde::de::Error>(value: f64) -> Result<i64, E> {
    let rounded = value.round();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Ok(rounded as i64)
    } else {
        Err(E::custom(format!("byte size {} is out of range", value)))
    }
}
