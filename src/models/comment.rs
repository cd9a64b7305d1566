use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub sha: String,
    pub wallet: String,
    pub body: String,
    pub created_at: i64,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub voters: Vec<String>,
}

impl Comment {
    /// Store key: comments for one commit share the `"{sha}/"` prefix.
    pub fn key(&self) -> String {
        comment_key(&self.sha, &self.id)
    }
}

pub fn comment_key(sha: &str, id: &str) -> String {
    format!("{}/{}", sha, id)
}

pub fn comment_prefix(sha: &str) -> String {
    format!("{}/", sha)
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub wallet: String,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpvoteRequest {
    pub wallet: String,
}
