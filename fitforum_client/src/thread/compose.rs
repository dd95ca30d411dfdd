use tracing::{debug, warn};

use crate::error::{ForumError, Result};
use crate::models::Reply;
use crate::service::ForumService;

/// The reply the composer is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTarget {
    pub reply_id: String,
    pub display_name: String,
}

/// A validated reply waiting to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub post_id: String,
    pub body: String,
    pub parent_id: Option<String>,
}

/// Single compose slot for a thread.
///
/// Only one reply can be targeted at a time. Starting a reply elsewhere
/// throws away the previous draft.
#[derive(Debug, Clone, Default)]
pub struct ReplyComposer {
    target: Option<ReplyTarget>,
    /// Text bound to the compose field.
    pub draft: String,
    sending: bool,
}

impl ReplyComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<&ReplyTarget> {
        self.target.as_ref()
    }

    pub fn is_targeting(&self, reply_id: &str) -> bool {
        self.target
            .as_ref()
            .is_some_and(|t| t.reply_id == reply_id)
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Attaches the composer to `target_id` and seeds the draft with an
    /// `@name ` mention. The seed is written once; later edits are not
    /// reconciled with the target.
    pub fn start_reply(&mut self, target_id: impl Into<String>, display_name: impl Into<String>) {
        let display_name = display_name.into();
        self.draft = if display_name.trim().is_empty() {
            String::new()
        } else {
            format!("@{display_name} ")
        };
        self.target = Some(ReplyTarget {
            reply_id: target_id.into(),
            display_name,
        });
    }

    pub fn cancel_reply(&mut self) {
        self.target = None;
        self.draft.clear();
    }

    /// Validates `body` and builds the request for the active target.
    ///
    /// A blank body fails with [`ForumError::Validation`] and leaves the
    /// composer untouched.
    pub fn prepare_submission(&mut self, post_id: &str, body: &str) -> Result<PendingReply> {
        if body.trim().is_empty() {
            return Err(ForumError::validation("reply cannot be empty"));
        }
        self.sending = true;
        Ok(PendingReply {
            post_id: post_id.to_string(),
            body: body.to_string(),
            parent_id: self.target.as_ref().map(|t| t.reply_id.clone()),
        })
    }

    /// Settles a submission started with [`prepare_submission`].
    ///
    /// Target and draft are cleared on success and on failure alike; the
    /// caller re-fetches the post after a success and surfaces a failure.
    ///
    /// [`prepare_submission`]: Self::prepare_submission
    pub fn finish_submission(&mut self, result: Result<Reply>) -> Result<Reply> {
        self.sending = false;
        self.target = None;
        self.draft.clear();
        match &result {
            Ok(reply) => debug!(reply_id = reply.id(), "reply accepted"),
            Err(err) => warn!(error = %err, "reply submission failed"),
        }
        result
    }

    /// Validates, sends and settles in one call.
    pub fn submit<S>(&mut self, service: &S, post_id: &str, body: &str) -> Result<Reply>
    where
        S: ForumService + ?Sized,
    {
        let pending = self.prepare_submission(post_id, body)?;
        let result = service.create_reply(
            &pending.post_id,
            &pending.body,
            pending.parent_id.as_deref(),
        );
        self.finish_submission(result)
    }
}
