use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

/// Shown wherever the server omitted the author.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPost {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub replies: Option<Vec<IgnoredAny>>,
    #[serde(default, rename = "replyCount")]
    pub reply_count: Option<usize>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawReply {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default, rename = "parentId")]
    pub parent_id: Option<String>,
    #[serde(default, rename = "repliedTo")]
    pub replied_to: Option<UserRef>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
}

/// Body of `GET /api/forum/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostThreadResponse {
    pub post: RawPost,
    #[serde(default)]
    pub responses: Vec<RawReply>,
}

/// Some deployments wrap created records, some return them bare.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReplyEnvelope {
    Wrapped { response: RawReply },
    Bare(RawReply),
}

impl ReplyEnvelope {
    pub fn into_inner(self) -> RawReply {
        match self {
            Self::Wrapped { response } => response,
            Self::Bare(reply) => reply,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PostEnvelope {
    Wrapped { post: RawPost },
    Bare(RawPost),
}

impl PostEnvelope {
    pub fn into_inner(self) -> RawPost {
        match self {
            Self::Wrapped { post } => post,
            Self::Bare(post) => post,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CreateReplyInput {
    pub content: String,
    #[serde(
        default,
        rename = "parentId",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<String>,
}

fn author_name(user: Option<UserRef>) -> String {
    user.and_then(|u| u.name)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
}

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub author: String,
    pub reply_count: usize,
    pub created_at: Option<String>,
}

impl From<RawPost> for PostSummary {
    fn from(raw: RawPost) -> Self {
        let reply_count = raw
            .reply_count
            .or_else(|| raw.replies.as_ref().map(Vec::len))
            .unwrap_or(0);
        Self {
            id: raw.id,
            title: raw.title,
            author: author_name(raw.user),
            reply_count,
            created_at: raw.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: String,
    pub created_at: Option<String>,
}

impl From<RawPost> for Post {
    fn from(raw: RawPost) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            body: raw.content,
            author: author_name(raw.user),
            created_at: raw.created_at,
        }
    }
}

/// A reply as the thread model sees it.
///
/// Only children carry a parent reference, so "top-level reply with a
/// parent" cannot be constructed. Whether a child's parent is itself
/// top-level is decided when the thread is reconstructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    TopLevel {
        id: String,
        body: String,
        author: String,
    },
    Child {
        id: String,
        body: String,
        author: String,
        parent_id: String,
        replied_to_name: Option<String>,
    },
}

impl Reply {
    pub fn top_level(id: impl Into<String>, body: impl Into<String>, author: impl Into<String>) -> Self {
        Self::TopLevel {
            id: id.into(),
            body: body.into(),
            author: author.into(),
        }
    }

    pub fn child(
        id: impl Into<String>,
        body: impl Into<String>,
        author: impl Into<String>,
        parent_id: impl Into<String>,
    ) -> Self {
        Self::Child {
            id: id.into(),
            body: body.into(),
            author: author.into(),
            parent_id: parent_id.into(),
            replied_to_name: None,
        }
    }

    pub fn with_replied_to(mut self, name: impl Into<String>) -> Self {
        if let Self::Child {
            replied_to_name, ..
        } = &mut self
        {
            *replied_to_name = Some(name.into());
        }
        self
    }

    pub fn id(&self) -> &str {
        match self {
            Self::TopLevel { id, .. } | Self::Child { id, .. } => id,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Self::TopLevel { body, .. } | Self::Child { body, .. } => body,
        }
    }

    pub fn author(&self) -> &str {
        match self {
            Self::TopLevel { author, .. } | Self::Child { author, .. } => author,
        }
    }

    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Self::TopLevel { .. } => None,
            Self::Child { parent_id, .. } => Some(parent_id),
        }
    }

    pub fn replied_to_name(&self) -> Option<&str> {
        match self {
            Self::TopLevel { .. } => None,
            Self::Child {
                replied_to_name, ..
            } => replied_to_name.as_deref(),
        }
    }

    pub fn is_top_level(&self) -> bool {
        matches!(self, Self::TopLevel { .. })
    }
}

impl From<RawReply> for Reply {
    fn from(raw: RawReply) -> Self {
        let author = author_name(raw.user);
        match raw.parent_id.filter(|p| !p.trim().is_empty()) {
            None => Self::TopLevel {
                id: raw.id,
                body: raw.content,
                author,
            },
            Some(parent_id) => Self::Child {
                id: raw.id,
                body: raw.content,
                author,
                parent_id,
                replied_to_name: raw.replied_to.and_then(|u| u.name),
            },
        }
    }
}

/// A post together with its flat reply list, as last fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetails {
    pub post: Post,
    pub replies: Vec<Reply>,
}

impl From<PostThreadResponse> for PostDetails {
    fn from(raw: PostThreadResponse) -> Self {
        Self {
            post: raw.post.into(),
            replies: raw.responses.into_iter().map(Reply::from).collect(),
        }
    }
}

/// Title and body of a post being composed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPostDraft {
    pub title: String,
    pub body: String,
}

impl NewPostDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Both fields are required; whitespace is trimmed from the payload.
    pub fn validate(&self) -> crate::error::Result<CreatePostInput> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(crate::error::ForumError::validation(
                "post title cannot be empty",
            ));
        }
        let content = self.body.trim();
        if content.is_empty() {
            return Err(crate::error::ForumError::validation(
                "post content cannot be empty",
            ));
        }
        Ok(CreatePostInput {
            title: title.to_string(),
            content: content.to_string(),
        })
    }
}
