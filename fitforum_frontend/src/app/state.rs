use fitforum_client::models::NewPostDraft;
use fitforum_client::thread::ThreadSession;
use fitforum_client::ResponseOrdering;
use serde::{Deserialize, Serialize};

pub enum ViewState {
    Catalog,
    Thread(ThreadView),
}

#[derive(Default)]
pub struct CreatePostState {
    pub draft: NewPostDraft,
    pub submitting: bool,
    pub error: Option<String>,
}

pub struct ThreadView {
    /// Distinguishes this view from earlier views of the same post, so late
    /// results from a closed view are not applied here.
    pub id: u64,
    /// Title from the catalog, shown until the post itself has loaded.
    pub title: String,
    pub session: ThreadSession,
    pub reply_error: Option<String>,
}

impl ThreadView {
    pub fn new(id: u64, post_id: &str, title: &str, ordering: ResponseOrdering) -> Self {
        Self {
            id,
            title: title.to_string(),
            session: ThreadSession::new(post_id, ordering),
            reply_error: None,
        }
    }

    pub fn post_id(&self) -> &str {
        self.session.post_id()
    }
}

/// Survives restarts through eframe's storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrontendSettings {
    pub api_base_url: String,
}
