use crate::har::Entry;

/// Resource category of a HAR entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Document,
    Font,
    Image,
    Stylesheet,
    Script,
    Xhr,
    Other,
}

impl ResourceType {
    /// Every category, in summary bucket order
    pub const ALL: [ResourceType; 7] = [
        ResourceType::Document,
        ResourceType::Font,
        ResourceType::Image,
        ResourceType::Stylesheet,
        ResourceType::Script,
        ResourceType::Xhr,
        ResourceType::Other,
    ];

    /// Key of this category's bucket in the summary
    pub fn bucket_key(&self) -> &'static str {
        match self {
            ResourceType::Document => "document",
            ResourceType::Font => "font",
            ResourceType::Image => "image",
            ResourceType::Stylesheet => "style",
            ResourceType::Script => "script",
            ResourceType::Xhr => "xhr",
            ResourceType::Other => "other",
        }
    }

    /// Match the lower-case `_resourceType` convention (Chrome DevTools)
    fn from_resource_type(tag: &str) -> Option<Self> {
        match tag {
            "document" => Some(ResourceType::Document),
            "font" => Some(ResourceType::Font),
            "image" => Some(ResourceType::Image),
            "stylesheet" => Some(ResourceType::Stylesheet),
            "script" => Some(ResourceType::Script),
            "xhr" => Some(ResourceType::Xhr),
            _ => None,
        }
    }

    /// Match the capitalised `_request_type` convention (WebPageTest)
    fn from_request_type(tag: &str) -> Option<Self> {
        match tag {
            "Document" => Some(ResourceType::Document),
            "Font" => Some(ResourceType::Font),
            "Image" => Some(ResourceType::Image),
            "Stylesheet" => Some(ResourceType::Stylesheet),
            "Script" => Some(ResourceType::Script),
            "XHR" => Some(ResourceType::Xhr),
            _ => None,
        }
    }
}

/// Classify an entry by `_resourceType`, falling back to `_request_type`.
///
/// Entries with neither tag, or with tags outside the known set, are `Other`.
pub fn classify(entry: &Entry) -> ResourceType {
    entry
        .resource_type
        .as_deref()
        .and_then(ResourceType::from_resource_type)
        .or_else(|| {
            entry
                .request_type
                .as_deref()
                .and_then(ResourceType::from_request_type)
        })
        .unwrap_or(ResourceType::Other)
}
