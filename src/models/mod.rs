//! Data types shared by the feed pipeline, the comment store and the routes.
//!
//! - `commit`: RawCommit (upstream JSON), ParsedCommit, Category, CommitStats
//! - `comment`: Comment and the request bodies of the comment API
//! - `feed`: FeedEntry and FeedPage handed to the renderer

pub mod comment;
pub mod commit;
pub mod feed;

pub use comment::*;
pub use commit::*;
pub use feed::*;
