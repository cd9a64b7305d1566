use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{comment_key, comment_prefix, Comment};
use crate::store::CommentStore;

pub struct SledCommentStore {
    /// Tree storing comments (key: "sha/id", value: JSON)
    comments: sled::Tree,

    db: sled::Db,
}

impl SledCommentStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path.as_ref())?;
        let comments = db.open_tree("comments")?;
        tracing::info!("Opened comment store at {:?}", path.as_ref());

        Ok(Self { comments, db })
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl CommentStore for SledCommentStore {
    fn comments_for(&self, sha: &str) -> Result<Vec<Comment>> {
        self.comments
            .scan_prefix(comment_prefix(sha).as_bytes())
            .values()
            .map(|value| -> Result<Comment> { Ok(serde_json::from_slice(&value?)?) })
            .collect()
    }

    fn count_for(&self, sha: &str) -> Result<usize> {
        let mut count = 0;
        for entry in self.comments.scan_prefix(comment_prefix(sha).as_bytes()).keys() {
            entry?;
            count += 1;
        }
        Ok(count)
    }

    fn insert(&self, comment: &Comment) -> Result<()> {
        let value = serde_json::to_vec(comment)?;
        self.comments.insert(comment.key().as_bytes(), value)?;
        Ok(())
    }

    fn upvote(&self, sha: &str, id: &str, wallet: &str) -> Result<Comment> {
        let key = comment_key(sha, id);
        let mut outcome: Option<Result<Comment>> = None;

        // The closure may run more than once under contention; only the last
        // outcome counts.
        self.comments.update_and_fetch(key.as_bytes(), |old| {
            let Some(bytes) = old else {
                outcome = Some(Err(AppError::CommentNotFound(key.clone())));
                return None;
            };
            let mut comment: Comment = match serde_json::from_slice(bytes) {
                Ok(c) => c,
                Err(e) => {
                    outcome = Some(Err(e.into()));
                    return Some(bytes.to_vec());
                }
            };
            if comment.voters.iter().any(|v| v == wallet) {
                outcome = Some(Err(AppError::AlreadyVoted(wallet.to_string())));
                return Some(bytes.to_vec());
            }
            comment.upvotes += 1;
            comment.voters.push(wallet.to_string());
            match serde_json::to_vec(&comment) {
                Ok(updated) => {
                    outcome = Some(Ok(comment));
                    Some(updated)
                }
                Err(e) => {
                    outcome = Some(Err(e.into()));
                    Some(bytes.to_vec())
                }
            }
        })?;

        outcome.unwrap_or_else(|| Err(AppError::Internal("upvote did not run".to_string())))
    }
}
