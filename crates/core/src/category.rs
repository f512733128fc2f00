//! Recipe category catalog and list filters.
//!
//! The catalog is an ordered, read-only list of labels loaded once at
//! start-up. A [`CategoryFilter`] is either the "all" sentinel or one of
//! those labels.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::recipe::RecipeRecord;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Display label of the "all" sentinel.
pub const ALL_RECIPES_LABEL: &str = "All Recipes";

/// Labels used when no category file is configured.
pub const DEFAULT_CATEGORIES: &[&str] = &["Appetizer", "Main Course", "Dessert"];

/// Bucket label for records whose category is missing or not configured.
pub const UNGROUPED_LABEL: &str = "Ungrouped";

// ---------------------------------------------------------------------------
// CategoryFilter
// ---------------------------------------------------------------------------

/// The category a list query is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Label(String),
}

impl CategoryFilter {
    /// The label to match against a record's `type`, or `None` for "all".
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Label(label) => Some(label),
        }
    }

    /// Whether `record` belongs in a result scoped to this filter.
    pub fn matches(&self, record: &RecipeRecord) -> bool {
        match self {
            Self::All => true,
            Self::Label(label) => record.category.as_deref() == Some(label.as_str()),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_RECIPES_LABEL),
            Self::Label(label) => f.write_str(label),
        }
    }
}

// ---------------------------------------------------------------------------
// CategoryCatalog
// ---------------------------------------------------------------------------

/// One entry of the category file (`[{"name": "Dessert"}, ...]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub name: String,
}

/// The configured, ordered category enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCatalog {
    labels: Vec<String>,
}

impl CategoryCatalog {
    /// Build a catalog from labels, rejecting empty or duplicate names.
    pub fn new<I, S>(labels: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into().trim().to_string();
            if label.is_empty() {
                return Err(CoreError::Validation(
                    "Category names must not be empty".into(),
                ));
            }
            if is_all_sentinel(&label) {
                return Err(CoreError::Validation(format!(
                    "'{label}' is reserved for the all-recipes filter"
                )));
            }
            if out.contains(&label) {
                return Err(CoreError::Validation(format!(
                    "Duplicate category '{label}'"
                )));
            }
            out.push(label);
        }
        if out.is_empty() {
            return Err(CoreError::Validation(
                "At least one category must be configured".into(),
            ));
        }
        Ok(Self { labels: out })
    }

    /// Parse the JSON category file format.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let entries: Vec<CategoryEntry> = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid category file: {e}")))?;
        Self::new(entries.into_iter().map(|e| e.name))
    }

    /// Load the catalog from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Validation(format!(
                "Cannot read category file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&json)
    }

    /// Configured labels in display order (excluding the "all" sentinel).
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// The label a new recipe form starts with.
    pub fn default_label(&self) -> &str {
        &self.labels[0]
    }

    /// Resolve a user-facing label into a filter.
    ///
    /// `"all"` (any case) and [`ALL_RECIPES_LABEL`] select every record.
    pub fn filter(&self, label: &str) -> Result<CategoryFilter, CoreError> {
        let label = label.trim();
        if is_all_sentinel(label) {
            return Ok(CategoryFilter::All);
        }
        if self.contains(label) {
            Ok(CategoryFilter::Label(label.to_string()))
        } else {
            Err(self.unknown(label))
        }
    }

    /// Check that a filter only names configured labels.
    pub fn check_filter(&self, filter: &CategoryFilter) -> Result<(), CoreError> {
        match filter {
            CategoryFilter::All => Ok(()),
            CategoryFilter::Label(label) if self.contains(label) => Ok(()),
            CategoryFilter::Label(label) => Err(self.unknown(label)),
        }
    }

    /// Filter buttons in display order: the sentinel first, then every label.
    pub fn filters(&self) -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(self.labels.iter().cloned().map(CategoryFilter::Label))
            .collect()
    }

    /// Group records by category in catalog order.
    ///
    /// Records with a missing or unconfigured category land in a trailing
    /// [`UNGROUPED_LABEL`] bucket. Empty groups are omitted and record order
    /// within a group is preserved.
    pub fn group<'a>(&self, records: &'a [RecipeRecord]) -> Vec<(String, Vec<&'a RecipeRecord>)> {
        let mut groups: Vec<(String, Vec<&RecipeRecord>)> = self
            .labels
            .iter()
            .map(|label| (label.clone(), Vec::new()))
            .collect();
        let mut ungrouped = Vec::new();

        for record in records {
            let slot = record
                .category
                .as_deref()
                .and_then(|c| self.labels.iter().position(|l| l == c));
            match slot {
                Some(i) => groups[i].1.push(record),
                None => ungrouped.push(record),
            }
        }

        groups.push((UNGROUPED_LABEL.to_string(), ungrouped));
        groups.retain(|(_, items)| !items.is_empty());
        groups
    }

    fn unknown(&self, label: &str) -> CoreError {
        CoreError::Validation(format!(
            "Unknown category '{label}'. Must be one of: {:?}",
            self.labels
        ))
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self {
            labels: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn is_all_sentinel(label: &str) -> bool {
    label.eq_ignore_ascii_case("all") || label == ALL_RECIPES_LABEL
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
