
use crate::models::{Category, ParsedCommit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(Category),
    /// A value outside the category enumeration; matches no commit.
    Unknown(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        let value = value.trim().to_lowercase();
        if value.is_empty() || value == "all" {
            return CategoryFilter::All;
        }
        match value.parse::<Category>() {
            Ok(category) => CategoryFilter::Only(category),
            Err(_) => CategoryFilter::Unknown(value),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.as_str(),
            CategoryFilter::Unknown(value) => value,
        }
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
            CategoryFilter::Unknown(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub category: CategoryFilter,
    /// Drop commits that carry a stats block.
    pub hide_stats: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            category: CategoryFilter::All,
            hide_stats: true,
        }
    }
}

impl FilterCriteria {
    /// Builds criteria from the raw `category` and `hideStats` query values.
    /// `hideStats` is on unless it is exactly `"false"`.
    pub fn from_query(category: Option<&str>, hide_stats: Option<&str>) -> Self {
        Self {
            category: category.map(CategoryFilter::parse).unwrap_or(CategoryFilter::All),
            hide_stats: hide_stats != Some("false"),
        }
    }

    pub fn matches(&self, commit: &ParsedCommit) -> bool {
        self.category.matches(commit.category) && !(self.hide_stats && commit.stats.is_some())
    }
}

/// Keeps the commits matching `criteria`, preserving their order.
pub fn filter_commits(commits: Vec<ParsedCommit>, criteria: &FilterCriteria) -> Vec<ParsedCommit> {
    commits.into_iter().filter(|c| criteria.matches(c)).collect()
}
