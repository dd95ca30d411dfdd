//! In-memory [`ForumService`] used by the thread model tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{ForumError, Result};
use crate::models::{NewPostDraft, Post, PostDetails, PostSummary, Reply};
use crate::service::ForumService;

pub type ReplyCall = (String, String, Option<String>);

#[derive(Default)]
struct State {
    posts: Vec<PostDetails>,
    reply_calls: Vec<ReplyCall>,
    fetch_calls: usize,
    next_id: usize,
    fail_fetches: bool,
    fail_replies: bool,
}

#[derive(Default)]
pub struct FakeForum {
    state: Mutex<State>,
}

impl FakeForum {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut guard = self.state.lock().expect("fake forum lock");
        f(&mut guard)
    }

    pub fn seed_post(&self, post_id: &str, replies: Vec<Reply>) {
        self.with(|s| {
            s.posts.retain(|p| p.post.id != post_id);
            s.posts.push(PostDetails {
                post: Post {
                    id: post_id.to_string(),
                    title: format!("Post {post_id}"),
                    body: "body".into(),
                    author: "Owner".into(),
                    created_at: None,
                },
                replies,
            });
        });
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.with(|s| s.fail_fetches = fail);
    }

    pub fn fail_replies(&self, fail: bool) {
        self.with(|s| s.fail_replies = fail);
    }

    pub fn reply_calls(&self) -> Vec<ReplyCall> {
        self.with(|s| s.reply_calls.clone())
    }

    pub fn fetch_calls(&self) -> usize {
        self.with(|s| s.fetch_calls)
    }
}

impl ForumService for FakeForum {
    fn list_posts(&self) -> Result<Vec<PostSummary>> {
        self.with(|s| {
            Ok(s.posts
                .iter()
                .map(|d| PostSummary {
                    id: d.post.id.clone(),
                    title: d.post.title.clone(),
                    author: d.post.author.clone(),
                    reply_count: d.replies.len(),
                    created_at: None,
                })
                .collect())
        })
    }

    fn create_post(&self, draft: &NewPostDraft) -> Result<Post> {
        let input = draft.validate()?;
        self.with(|s| {
            s.next_id += 1;
            let post = Post {
                id: format!("p{}", s.next_id),
                title: input.title,
                body: input.content,
                author: "Me".into(),
                created_at: None,
            };
            s.posts.push(PostDetails {
                post: post.clone(),
                replies: Vec::new(),
            });
            Ok(post)
        })
    }

    fn get_post(&self, post_id: &str) -> Result<PostDetails> {
        self.with(|s| {
            s.fetch_calls += 1;
            if s.fail_fetches {
                return Err(ForumError::fetch("get post", "connection refused"));
            }
            s.posts
                .iter()
                .find(|d| d.post.id == post_id)
                .cloned()
                .ok_or_else(|| ForumError::fetch("get post", "404 Not Found"))
        })
    }

    fn create_reply(&self, post_id: &str, body: &str, parent_id: Option<&str>) -> Result<Reply> {
        self.with(|s| {
            s.reply_calls.push((
                post_id.to_string(),
                body.to_string(),
                parent_id.map(str::to_string),
            ));
            if s.fail_replies {
                return Err(ForumError::fetch("create reply", "500 Internal Server Error"));
            }
            s.next_id += 1;
            let id = format!("r{}", s.next_id);
            let details = s
                .posts
                .iter_mut()
                .find(|d| d.post.id == post_id)
                .ok_or_else(|| ForumError::fetch("create reply", "404 Not Found"))?;
            let reply = match parent_id {
                None => Reply::top_level(id, body, "Me"),
                Some(parent) => {
                    let replied_to = details
                        .replies
                        .iter()
                        .find(|r| r.id() == parent)
                        .map(|r| r.author().to_string());
                    let reply = Reply::child(id, body, "Me", parent);
                    match replied_to {
                        Some(name) => reply.with_replied_to(name),
                        None => reply,
                    }
                }
            };
            details.replies.push(reply.clone());
            Ok(reply)
        })
    }
}
