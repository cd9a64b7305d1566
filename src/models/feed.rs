use crate::feed::filter::FilterCriteria;
use crate::models::ParsedCommit;

#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub commit: ParsedCommit,
    pub comment_count: usize,
}

#[derive(Debug, Clone)]
pub struct FeedPage {
    pub entries: Vec<FeedEntry>,
    pub criteria: FilterCriteria,
    /// Commits fetched upstream before filtering.
    pub fetched: usize,
}
