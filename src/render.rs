//! Server-side HTML for the changelog page.
//!
//! Everything taken from commits or query strings goes through `escape`.

use chrono::{DateTime, Utc};

use crate::feed::filter::{CategoryFilter, FilterCriteria};
use crate::models::{Category, CommitStats, FeedEntry, FeedPage};

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn format_relative_time(timestamp: DateTime<Utc>) -> String {
    relative_to(timestamp.timestamp(), Utc::now().timestamp())
}

fn relative_to(timestamp: i64, now: i64) -> String {
    let diff = now - timestamp;

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff < 86400 {
        let hours = diff / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff < 2592000 {
        let days = diff / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else if diff < 31536000 {
        let months = diff / 2592000;
        format!("{} month{} ago", months, if months == 1 { "" } else { "s" })
    } else {
        let years = diff / 31536000;
        format!("{} year{} ago", years, if years == 1 { "" } else { "s" })
    }
}

fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount);
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let fraction = fraction.trim_end_matches('0');
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

fn page_href(category: &str, hide_stats: bool) -> String {
    format!("/changelog?category={}&amp;hideStats={}", escape(category), hide_stats)
}

fn render_tabs(out: &mut String, criteria: &FilterCriteria) {
    out.push_str("<nav class=\"tabs\">");
    let mut tabs = vec![("all", "All", criteria.category == CategoryFilter::All)];
    tabs.extend(
        Category::ALL
            .iter()
            .map(|c| (c.as_str(), c.label(), criteria.category == CategoryFilter::Only(*c))),
    );
    for (value, label, active) in tabs {
        out.push_str(&format!(
            "<a class=\"tab{}\" href=\"{}\">{}</a>",
            if active { " active" } else { "" },
            page_href(value, criteria.hide_stats),
            label
        ));
    }

    let (toggle_label, toggle_value) = if criteria.hide_stats {
        ("Show stats", false)
    } else {
        ("Hide stats", true)
    };
    out.push_str(&format!(
        "<a class=\"toggle\" href=\"{}\">{}</a></nav>",
        page_href(criteria.category.as_str(), toggle_value),
        toggle_label
    ));
}

fn render_stats(out: &mut String, stats: &CommitStats) {
    out.push_str(&format!(
        "<dl class=\"stats\"><dt>Distributed</dt><dd>{}</dd><dt>Distributions</dt><dd>{}</dd>",
        format_amount(stats.distributed),
        stats.distributions
    ));
    if let Some(holders) = stats.holders {
        out.push_str(&format!("<dt>Holders</dt><dd>{}</dd>", holders));
    }
    out.push_str("</dl>");
}

fn render_entry(out: &mut String, entry: &FeedEntry) {
    let commit = &entry.commit;
    out.push_str(&format!(
        "<li class=\"commit\"><div class=\"meta\"><span class=\"badge {cat}\">{cat}</span>\
         <a class=\"sha\" href=\"{url}\">{short}</a>",
        cat = commit.category.as_str(),
        url = escape(&commit.url),
        short = escape(&commit.short_sha),
    ));
    if let Some(avatar) = &commit.avatar_url {
        out.push_str(&format!("<img class=\"avatar\" src=\"{}\" alt=\"\">", escape(avatar)));
    }
    out.push_str(&format!("<span class=\"author\">{}</span>", escape(&commit.author)));
    if let Some(login) = commit.author_login.as_deref().filter(|l| *l != commit.author) {
        out.push_str(&format!("<span class=\"login\">@{}</span>", escape(login)));
    }
    if let Some(timestamp) = commit.timestamp {
        out.push_str(&format!(
            "<time datetime=\"{}\">{}</time>",
            timestamp.to_rfc3339(),
            format_relative_time(timestamp)
        ));
    }
    out.push_str(&format!("</div><h2>{}</h2>", escape(&commit.title)));
    if !commit.body.is_empty() {
        out.push_str(&format!("<pre class=\"body\">{}</pre>", escape(&commit.body)));
    }
    if let Some(stats) = &commit.stats {
        render_stats(out, stats);
    }
    out.push_str(&format!(
        "<a class=\"comments\" href=\"/api/v1/commits/{}/comments\">{} comment{}</a></li>",
        escape(&commit.sha),
        entry.comment_count,
        if entry.comment_count == 1 { "" } else { "s" }
    ));
}

pub fn render_changelog(page: &FeedPage) -> String {
    let mut out = String::from(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>Changelog</title><link rel=\"stylesheet\" href=\"/assets/style.css\">\
         </head><body><main><h1>Changelog</h1>",
    );

    render_tabs(&mut out, &page.criteria);

    if page.entries.is_empty() {
        out.push_str("<p class=\"empty\">No commits to show.</p>");
    } else {
        out.push_str("<ol class=\"commits\">");
        for entry in &page.entries {
            render_entry(&mut out, entry);
        }
        out.push_str("</ol>");
    }

    out.push_str(&format!(
        "<footer>{} of {} recent commits</footer></main></body></html>",
        page.entries.len(),
        page.fetched
    ));
    out
}
