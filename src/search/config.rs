//! Search configuration

use serde::{Deserialize, Serialize};

/// Hard ceiling for page size, regardless of configuration
pub const PER_PAGE_CEILING: u32 = 100;

/// Search engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Page size used when the request omits or garbles `per_page` (default: 20)
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,

    /// Upper clamp for `per_page`, itself capped at 100 (default: 100)
    #[serde(default = "default_max_per_page")]
    pub max_per_page: u32,

    /// Compute highlight spans for returned todos
    #[serde(default = "default_true")]
    pub enable_highlighting: bool,

    /// Also highlight descriptions, not only titles
    #[serde(default = "default_true")]
    pub highlight_description: bool,

    /// Attach remediation suggestions to empty pages
    #[serde(default = "default_true")]
    pub enable_suggestions: bool,

    /// Return dropped filter values as warnings instead of ignoring them silently
    #[serde(default)]
    pub report_invalid_filters: bool,

    /// Fail searches for owners the store has never seen
    #[serde(default)]
    pub require_known_owner: bool,
}

impl SearchConfig {
    /// Effective page size ceiling
    pub fn per_page_limit(&self) -> u32 {
        self.max_per_page.clamp(1, PER_PAGE_CEILING)
    }

    /// Effective default page size, always within the ceiling
    pub fn per_page_default(&self) -> u32 {
        self.default_per_page.clamp(1, self.per_page_limit())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
            max_per_page: default_max_per_page(),
            enable_highlighting: true,
            highlight_description: true,
            enable_suggestions: true,
            report_invalid_filters: false,
            require_known_owner: false,
        }
    }
}

fn default_per_page() -> u32 {
    20
}

fn default_max_per_page() -> u32 {
    PER_PAGE_CEILING
}

fn default_true() -> bool {
    true
}

/// Builder for SearchConfig
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn default_per_page(mut self, per_page: u32) -> Self {
        self.config.default_per_page = per_page;
        self
    }

    pub fn max_per_page(mut self, max: u32) -> Self {
        self.config.max_per_page = max;
        self
    }

    pub fn enable_highlighting(mut self, enabled: bool) -> Self {
        self.config.enable_highlighting = enabled;
        self
    }

    pub fn highlight_description(mut self, enabled: bool) -> Self {
        self.config.highlight_description = enabled;
        self
    }

    pub fn enable_suggestions(mut self, enabled: bool) -> Self {
        self.config.enable_suggestions = enabled;
        self
    }

    pub fn report_invalid_filters(mut self, enabled: bool) -> Self {
        self.config.report_invalid_filters = enabled;
        self
    }

    pub fn require_known_owner(mut self, enabled: bool) -> Self {
        self.config.require_known_owner = enabled;
        self
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
