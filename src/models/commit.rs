use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One element of the GitHub commit-listing response.
///
/// Nothing upstream is schema-validated, so every field defaults when absent
/// and the top-level `author` may be `null` for unlinked accounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCommit {
    #[serde(default)]
    pub sha: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub commit: RawCommitDetail,
    #[serde(default)]
    pub author: Option<RawAccount>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCommitDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub author: Option<RawSignature>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSignature {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAccount {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Stats,
    Feature,
    Fix,
    Docs,
    Ops,
    Other,
}

impl Category {
    /// Every category, in the order the changelog tabs list them.
    pub const ALL: [Category; 6] = [
        Category::Feature,
        Category::Fix,
        Category::Stats,
        Category::Docs,
        Category::Ops,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Stats => "stats",
            Category::Feature => "feature",
            Category::Fix => "fix",
            Category::Docs => "docs",
            Category::Ops => "ops",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Stats => "Stats",
            Category::Feature => "Features",
            Category::Fix => "Fixes",
            Category::Docs => "Docs",
            Category::Ops => "Ops",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// Token distribution figures pulled out of a commit body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitStats {
    pub distributed: f64,
    pub distributions: u64,
    pub holders: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCommit {
    pub sha: String,
    pub short_sha: String,
    pub title: String,
    pub body: String,
    pub category: Category,
    pub author: String,
    pub author_login: Option<String>,
    pub avatar_url: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub url: String,
    pub stats: Option<CommitStats>,
}
