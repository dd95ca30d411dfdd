use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ForumConfig;
use crate::error::{ForumError, Result};
use crate::models::{
    CreateReplyInput, NewPostDraft, Post, PostDetails, PostEnvelope, PostSummary,
    PostThreadResponse, RawPost, Reply, ReplyEnvelope,
};
use crate::service::ForumService;

const FORUM_PATH: &str = "/api/forum";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP implementation of [`ForumService`] against the fitness backend.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = sanitize_base_url(base_url.into())?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ForumError::Config(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            base_url,
            token: None,
            client,
        })
    }

    pub fn from_config(config: &ForumConfig) -> Result<Self> {
        let mut client = Self::with_timeout(config.api_base_url.clone(), config.request_timeout)?;
        client.token = config.auth_token.clone();
        Ok(client)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<()> {
        self.base_url = sanitize_base_url(base_url.into())?;
        Ok(())
    }

    fn url(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}{}{}", self.base_url, FORUM_PATH, path))
            .map_err(|err| ForumError::Config(format!("invalid request URL: {err}")))
    }

    /// URL for `post_id` (plus an optional trailing segment), with the id
    /// percent-encoded as a single path segment.
    fn post_url(&self, post_id: &str, suffix: Option<&str>) -> Result<Url> {
        let mut url = self.url("")?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ForumError::Config(format!("{} cannot carry a path", self.base_url)))?;
            segments.push(post_id);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = request
            .send()
            .map_err(|err| ForumError::fetch(operation, err))?
            .error_for_status()
            .map_err(|err| ForumError::fetch(operation, err))?;
        response
            .json::<T>()
            .map_err(|err| ForumError::decode(operation, err))
    }
}

impl ForumService for ApiClient {
    fn list_posts(&self) -> Result<Vec<PostSummary>> {
        let url = self.url("")?;
        debug!(%url, "listing forum posts");
        let posts: Vec<RawPost> = self.send_json("list posts", self.client.get(url))?;
        Ok(posts.into_iter().map(PostSummary::from).collect())
    }

    fn create_post(&self, draft: &NewPostDraft) -> Result<Post> {
        let payload = draft.validate()?;
        let url = self.url("/create")?;
        debug!(%url, title = %payload.title, "creating forum post");
        let request = self.authorized(self.client.post(url).json(&payload));
        let created: PostEnvelope = self.send_json("create post", request)?;
        Ok(created.into_inner().into())
    }

    fn get_post(&self, post_id: &str) -> Result<PostDetails> {
        let url = self.post_url(post_id, None)?;
        debug!(%url, "fetching forum post");
        let details: PostThreadResponse = self.send_json("get post", self.client.get(url))?;
        Ok(details.into())
    }

    fn create_reply(&self, post_id: &str, body: &str, parent_id: Option<&str>) -> Result<Reply> {
        let url = self.post_url(post_id, Some("response"))?;
        let payload = CreateReplyInput {
            content: body.to_string(),
            parent_id: parent_id.map(str::to_string),
        };
        debug!(%url, parent = ?payload.parent_id, "submitting reply");
        let request = self.authorized(self.client.post(url).json(&payload));
        let created: ReplyEnvelope = self.send_json("create reply", request)?;
        Ok(created.into_inner().into())
    }
}

fn sanitize_base_url(mut base: String) -> Result<String> {
    base = base.trim().to_string();
    if base.is_empty() {
        return Err(ForumError::Config("API base URL is empty".into()));
    }
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    while base.ends_with('/') {
        base.pop();
    }
    Url::parse(&base).map_err(|err| ForumError::Config(format!("invalid base URL: {err}")))?;
    Ok(base)
}
