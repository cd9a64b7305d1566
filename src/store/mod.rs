//! Comment storage.
//!
//! `CommentStore` is the seam the feed and the comment API talk to;
//! `SledCommentStore` is the on-disk implementation. Comments for one commit
//! live under the `"{sha}/"` key prefix.

pub mod comments;

pub use comments::SledCommentStore;

use std::sync::Arc;

use crate::error::Result;
use crate::models::Comment;

pub trait CommentStore: Send + Sync {
    /// All comments on a commit, in key order.
    fn comments_for(&self, sha: &str) -> Result<Vec<Comment>>;

    /// Number of comments on a commit without decoding them.
    fn count_for(&self, sha: &str) -> Result<usize>;

    fn insert(&self, comment: &Comment) -> Result<()>;

    /// Records an upvote from `wallet` and returns the updated comment.
    fn upvote(&self, sha: &str, id: &str, wallet: &str) -> Result<Comment>;
}

pub type SharedStore = Arc<dyn CommentStore>;
