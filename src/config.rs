//! Runtime configuration.
//!
//! Every option can come from the command line or the environment (a `.env`
//! file is loaded first). The values are handed explicitly to the commit
//! source, the cache, the store and the feed service.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::source::GithubConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Repository whose commits make up the changelog, as owner/name
    #[arg(long, env = "COMMIT_FEED_REPO", value_parser = parse_repo)]
    pub repo: RepoSlug,

    /// Branch to list commits from (defaults to the repository's default branch)
    #[arg(long, env = "COMMIT_FEED_BRANCH")]
    pub branch: Option<String>,

    /// API token for the source-control host
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Base URL of the source-control API
    #[arg(long, env = "GITHUB_API_BASE", default_value = "https://api.github.com")]
    pub api_base: String,

    /// Number of recent commits fetched per page load
    #[arg(long, env = "COMMIT_FEED_LIMIT", default_value = "50")]
    pub limit: usize,

    /// Seconds a fetched commit list is reused before revalidating
    #[arg(long, env = "COMMIT_FEED_REVALIDATE_SECS", default_value = "60")]
    pub revalidate_secs: u64,

    /// Upstream request timeout in seconds
    #[arg(long, env = "COMMIT_FEED_TIMEOUT_SECS", default_value = "10")]
    pub timeout_secs: u64,

    /// Directory of the comment store
    #[arg(long, env = "COMMIT_FEED_DATA_DIR", default_value = "./data/comments")]
    pub data_dir: PathBuf,
}

impl Config {
    pub fn github(&self) -> GithubConfig {
        GithubConfig {
            api_base: self.api_base.clone(),
            owner: self.repo.owner.clone(),
            repo: self.repo.name.clone(),
            branch: self.branch.clone(),
            token: self.github_token.clone().filter(|t| !t.is_empty()),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn revalidate(&self) -> Duration {
        Duration::from_secs(self.revalidate_secs)
    }
}

fn parse_repo(value: &str) -> Result<RepoSlug, String> {
    match value.trim().split_once('/') {
        Some((owner, name))
            if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
        {
            Ok(RepoSlug {
                owner: owner.to_string(),
                name: name.to_string(),
            })
        }
        _ => Err(format!("expected owner/name, got {:?}", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: Config,
    }

    #[test]
    fn test_parse_repo() {
        assert_eq!(
            parse_repo("acme/site"),
            Ok(RepoSlug {
                owner: "acme".to_string(),
                name: "site".to_string(),
            })
        );
        assert!(parse_repo("acme").is_err());
        assert!(parse_repo("acme/").is_err());
        assert!(parse_repo("a/b/c").is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::try_parse_from(["test", "--repo", "acme/site"]).unwrap();
        let config = cli.config;
        assert_eq!(config.limit, 50);
        assert_eq!(config.revalidate(), Duration::from_secs(60));

        let github = config.github();
        assert_eq!(github.owner, "acme");
        assert_eq!(github.repo, "site");
        assert_eq!(github.timeout, Duration::from_secs(10));
    }
}
