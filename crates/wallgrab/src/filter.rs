use crate::config::FilterConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Accept,
    Reject,
}

/// Name-only gate applied to every discovered asset, whether it sits next to
/// the packages or came out of one.
#[derive(Debug, Clone)]
pub struct AssetFilter {
    reject_prefix: String,
    reject_keywords: Vec<String>,
}

impl AssetFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            reject_prefix: config.reject_prefix.to_lowercase(),
            reject_keywords: config
                .reject_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    pub fn decide(&self, name: &str) -> FilterDecision {
        let lower = name.to_lowercase();

        if !self.reject_prefix.is_empty() && lower.starts_with(&self.reject_prefix) {
            return FilterDecision::Reject;
        }

        if self
            .reject_keywords
            .iter()
            .any(|keyword| lower.contains(keyword.as_str()))
        {
            return FilterDecision::Reject;
        }

        FilterDecision::Accept
    }

    pub fn accepts(&self, name: &str) -> bool {
        self.decide(name) == FilterDecision::Accept
    }
}

impl Default for AssetFilter {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}
