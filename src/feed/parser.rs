//! Turns upstream commit records into display-ready `ParsedCommit`s.
//!
//! Parsing is pure and never fails: missing fields fall back to empty strings
//! or `None`, and every commit ends up with a category.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::models::{Category, CommitStats, ParsedCommit, RawCommit};

pub const SHORT_SHA_LEN: usize = 7;

/// Keyword table for `classify`, checked top to bottom. A keyword ending in
/// `*` matches any title word starting with the stem, otherwise the whole word
/// must match.
pub const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (
        Category::Stats,
        &[
            "stats", "statistics", "distribut*", "airdrop*", "holder*", "reward*", "payout*",
            "snapshot*",
        ],
    ),
    (
        Category::Fix,
        &["fix*", "bug*", "hotfix*", "patch*", "resolve*", "revert*"],
    ),
    (
        Category::Feature,
        &[
            "feat", "feature*", "add", "adds", "added", "adding", "implement*", "introduc*",
            "new", "support*",
        ],
    ),
    (
        Category::Docs,
        &["doc", "docs", "documentation", "readme", "changelog"],
    ),
    (
        Category::Ops,
        &[
            "ops", "ci", "deploy*", "config*", "chore", "bump*", "build*", "infra*", "workflow*",
            "release*", "update*", "upgrade*", "refactor*", "cleanup",
        ],
    ),
];

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bdistributed\s+\$?(\d[\d,]*(?:\.\d+)?)").expect("valid amount regex")
});

static RECIPIENTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bto\s+(\d[\d,]*)\s+(?:holders?|wallets?|recipients?|addresses)\b")
        .expect("valid recipients regex")
});

static HOLDERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bholders?\s*:\s*(\d[\d,]*)").expect("valid holders regex")
});

static DISTRIBUTIONS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d[\d,]*)\s+distributions?\b|\bdistributions?\s*:\s*(\d[\d,]*)")
        .expect("valid distributions regex")
});

pub fn parse_commit(raw: &RawCommit) -> ParsedCommit {
    let (title, body) = split_message(&raw.commit.message);
    let signature = raw.commit.author.as_ref();
    let account = raw.author.as_ref();

    let author_login = account.and_then(|a| non_blank(a.login.as_deref()));
    let author = signature
        .and_then(|s| non_blank(s.name.as_deref()))
        .or_else(|| author_login.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let timestamp = signature
        .and_then(|s| s.date.as_deref())
        .and_then(parse_timestamp);

    ParsedCommit {
        sha: raw.sha.clone(),
        short_sha: short_sha(&raw.sha),
        category: classify(&title),
        stats: extract_stats(&body),
        title,
        body,
        author,
        author_login,
        avatar_url: account.and_then(|a| non_blank(a.avatar_url.as_deref())),
        timestamp,
        url: raw.html_url.clone(),
    }
}

pub fn short_sha(sha: &str) -> String {
    sha.chars().take(SHORT_SHA_LEN).collect()
}

/// Splits at the first newline: the first line is the title, the rest the body.
pub fn split_message(message: &str) -> (String, String) {
    match message.split_once('\n') {
        Some((title, body)) => (title.trim().to_string(), body.trim().to_string()),
        None => (message.trim().to_string(), String::new()),
    }
}

pub fn classify(title: &str) -> Category {
    let lowered = title.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|kw| words.iter().any(|word| keyword_matches(kw, word)))
        })
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

fn keyword_matches(keyword: &str, word: &str) -> bool {
    match keyword.strip_suffix('*') {
        Some(stem) => word.starts_with(stem),
        None => word == keyword,
    }
}

/// Reads distribution figures out of a commit body.
///
/// Every `distributed <amount>` statement counts as one distribution and the
/// amounts are summed. `to <n> holders` (or wallets/recipients/addresses)
/// after a statement gives the holder count; the largest one wins. Explicit
/// `holders: <n>` and `<n> distributions` lines fill in or override.
/// Only the body is read: a subject line alone never yields stats.
pub fn extract_stats(body: &str) -> Option<CommitStats> {
    let mut distributed = 0.0;
    let mut distributions = 0u64;
    let mut holders: Option<u64> = None;

    for line in body.lines() {
        let matches: Vec<_> = AMOUNT_RE.captures_iter(line).collect();
        for (i, caps) in matches.iter().enumerate() {
            let Some(amount) = caps.get(1).and_then(|m| parse_amount(m.as_str())) else {
                continue;
            };
            distributed += amount;
            distributions += 1;

            let start = caps.get(0).map_or(0, |m| m.end());
            let end = matches
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(line.len(), |m| m.start());
            let recipients = RECIPIENTS_RE
                .captures(&line[start..end])
                .and_then(|c| c.get(1))
                .and_then(|m| parse_count(m.as_str()));
            if let Some(n) = recipients {
                holders = Some(holders.map_or(n, |h| h.max(n)));
            }
        }
    }

    if distributions == 0 {
        return None;
    }

    if holders.is_none() {
        holders = HOLDERS_RE
            .captures(body)
            .and_then(|c| c.get(1))
            .and_then(|m| parse_count(m.as_str()));
    }

    if let Some(explicit) = DISTRIBUTIONS_RE
        .captures(body)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .and_then(|m| parse_count(m.as_str()))
    {
        distributions = explicit;
    }

    Some(CommitStats {
        distributed,
        distributions,
        holders,
    })
}

fn parse_amount(s: &str) -> Option<f64> {
    s.replace(',', "").parse().ok()
}

fn parse_count(s: &str) -> Option<u64> {
    s.replace(',', "").parse().ok()
}

fn parse_timestamp(date: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
