use crate::error::Result;
use crate::models::{NewPostDraft, Post, PostDetails, PostSummary, Reply};

/// Remote operations the thread model depends on.
///
/// Implementations block the calling thread; the frontend runs them on
/// worker threads and reports back through its message channel.
pub trait ForumService: Send + Sync {
    fn list_posts(&self) -> Result<Vec<PostSummary>>;

    fn create_post(&self, draft: &NewPostDraft) -> Result<Post>;

    /// Post plus its flat reply list, parent references intact.
    fn get_post(&self, post_id: &str) -> Result<PostDetails>;

    fn create_reply(&self, post_id: &str, body: &str, parent_id: Option<&str>) -> Result<Reply>;
}
