//! Partition selection
//!
//! Resolution order: explicit value (query parameter), then a fallback taken
//! from the record itself, then the process-wide default. Blank values are
//! skipped. When nothing is left the store applies its own default.

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Pick the first non-blank candidate
pub fn resolve(
    explicit: Option<&str>,
    fallback: Option<&str>,
    configured_default: Option<&str>,
) -> Option<String> {
    non_blank(explicit)
        .or_else(|| non_blank(fallback))
        .or_else(|| non_blank(configured_default))
        .map(str::to_string)
}

/// Resolver bound to the configured default partition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionResolver {
    default: Option<String>,
}

impl PartitionResolver {
    pub fn new(default: Option<String>) -> Self {
        Self { default }
    }

    pub fn default_partition(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn resolve(&self, explicit: Option<&str>, fallback: Option<&str>) -> Option<String> {
        resolve(explicit, fallback, self.default.as_deref())
    }
}
