use tracing::{debug, warn};

use crate::config::ResponseOrdering;
use crate::error::{ForumError, Result};
use crate::models::{Post, PostDetails, Reply};
use crate::service::ForumService;

use super::reconstruct::{self, Thread};

/// Identifies one fetch issued by a [`ReplyStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    pub post_id: String,
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The response replaced the displayed data.
    Applied,
    /// The fetch failed; the previous data is still displayed.
    Failed,
    /// A newer request was issued after this one and the store only accepts
    /// the latest.
    Stale,
    /// The ticket belongs to a post this store no longer shows.
    WrongPost,
}

/// Authoritative copy of one post and its flat reply list.
///
/// Every refresh replaces the whole list. There is no merging and no
/// conflict resolution.
#[derive(Debug, Clone)]
pub struct ReplyStore {
    post_id: String,
    details: Option<PostDetails>,
    error: Option<ForumError>,
    ordering: ResponseOrdering,
    issued: u64,
    in_flight: usize,
}

impl ReplyStore {
    pub fn new(post_id: impl Into<String>, ordering: ResponseOrdering) -> Self {
        Self {
            post_id: post_id.into(),
            details: None,
            error: None,
            ordering,
            issued: 0,
            in_flight: 0,
        }
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn details(&self) -> Option<&PostDetails> {
        self.details.as_ref()
    }

    pub fn post(&self) -> Option<&Post> {
        self.details.as_ref().map(|d| &d.post)
    }

    pub fn replies(&self) -> &[Reply] {
        self.details
            .as_ref()
            .map(|d| d.replies.as_slice())
            .unwrap_or(&[])
    }

    pub fn reply(&self, reply_id: &str) -> Option<&Reply> {
        self.replies().iter().find(|r| r.id() == reply_id)
    }

    pub fn thread(&self) -> Thread<'_> {
        Thread::build(self.replies())
    }

    pub fn error(&self) -> Option<&ForumError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn has_loaded(&self) -> bool {
        self.details.is_some()
    }

    /// Registers a new fetch. Pair with [`apply`](Self::apply) once the
    /// response arrives.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        self.in_flight += 1;
        RefreshTicket {
            post_id: self.post_id.clone(),
            seq: self.issued,
        }
    }

    pub fn apply(&mut self, ticket: &RefreshTicket, result: Result<PostDetails>) -> ApplyOutcome {
        if ticket.post_id != self.post_id {
            debug!(
                ticket_post = %ticket.post_id,
                current_post = %self.post_id,
                "dropping response for a post that is no longer displayed"
            );
            return ApplyOutcome::WrongPost;
        }
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.ordering == ResponseOrdering::LatestIssuedWins && ticket.seq < self.issued {
            debug!(
                post_id = %self.post_id,
                seq = ticket.seq,
                latest = self.issued,
                "dropping superseded response"
            );
            return ApplyOutcome::Stale;
        }

        match result {
            Ok(details) => {
                let orphans: Vec<&str> = reconstruct::orphans(&details.replies)
                    .into_iter()
                    .map(Reply::id)
                    .collect();
                if !orphans.is_empty() {
                    warn!(
                        post_id = %self.post_id,
                        orphans = ?orphans,
                        "replies reference a missing or nested parent and will not be shown"
                    );
                }
                debug!(
                    post_id = %self.post_id,
                    seq = ticket.seq,
                    replies = details.replies.len(),
                    "post refreshed"
                );
                self.details = Some(details);
                self.error = None;
                ApplyOutcome::Applied
            }
            Err(err) => {
                warn!(post_id = %self.post_id, error = %err, "failed to fetch post");
                self.error = Some(err);
                ApplyOutcome::Failed
            }
        }
    }

    /// Fetches and applies in one call.
    pub fn refresh<S>(&mut self, service: &S) -> ApplyOutcome
    where
        S: ForumService + ?Sized,
    {
        let ticket = self.begin_refresh();
        let result = service.get_post(&ticket.post_id);
        self.apply(&ticket, result)
    }
}
