//! Paginator configuration
//!
//! A paginator starts from a `PaginatorConfig`, built in code or loaded
//! from a YAML/JSON document:
//!
//! ```yaml
//! page_size: 5
//! sort:
//!   - field: rank
//!     direction: asc
//! filter:
//!   - field: status
//!     operator: "=="
//!     value: active
//! ```

use crate::error::{Error, Result};
use crate::types::{FilterSpec, SortSpec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration a paginator is created with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatorConfig {
    /// Number of visible items per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Initial sort specification
    #[serde(default)]
    pub sort: SortSpec,

    /// Initial filter specification
    #[serde(default)]
    pub filter: FilterSpec,

    /// Start in the stalled state (no queries until `resume`)
    #[serde(default)]
    pub stalled: bool,

    /// Consecutive corrective re-navigations allowed before a page is
    /// settled as fetched
    #[serde(default = "default_max_corrections")]
    pub max_corrections: usize,
}

fn default_page_size() -> usize {
    10
}

fn default_max_corrections() -> usize {
    4
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sort: SortSpec::new(),
            filter: FilterSpec::new(),
            stalled: false,
            max_corrections: default_max_corrections(),
        }
    }
}

impl PaginatorConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set sort specification
    #[must_use]
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// Set filter specification
    #[must_use]
    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filter = filter;
        self
    }

    /// Start stalled
    #[must_use]
    pub fn with_stalled(mut self, stalled: bool) -> Self {
        self.stalled = stalled;
        self
    }

    /// Set the corrective re-navigation limit
    #[must_use]
    pub fn with_max_corrections(mut self, max: usize) -> Self {
        self.max_corrections = max;
        self
    }

    /// Check invariants
    pub fn validate(&self) -> Result<()> {
        validate_page_size(self.page_size)?;
        if self.max_corrections == 0 {
            return Err(Error::invalid_value(
                "max_corrections",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file. `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }
}

/// Largest accepted page size; one more record than this is fetched per page
pub const MAX_PAGE_SIZE: usize = usize::MAX - 1;

/// Reject page sizes outside `1..=MAX_PAGE_SIZE`
pub(crate) fn validate_page_size(page_size: usize) -> Result<()> {
    if page_size == 0 {
        return Err(Error::invalid_value("page_size", "must be at least 1"));
    }
    if page_size > MAX_PAGE_SIZE {
        return Err(Error::invalid_value(
            "page_size",
            format!("must be at most {MAX_PAGE_SIZE}"),
        ));
    }
    Ok(())
}
