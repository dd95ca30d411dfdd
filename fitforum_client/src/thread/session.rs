use tracing::info;

use crate::config::ResponseOrdering;
use crate::error::{ForumError, Result};
use crate::models::{PostDetails, Reply};
use crate::service::ForumService;

use super::compose::{PendingReply, ReplyComposer};
use super::reconstruct::Thread;
use super::store::{ApplyOutcome, RefreshTicket, ReplyStore};
use super::visibility::VisibilityMap;

/// Everything one open thread owns: the fetched data, the compose slot and
/// the expand/collapse map.
///
/// A refresh of the same post keeps the expand/collapse map; opening a
/// different post starts over.
#[derive(Debug, Clone)]
pub struct ThreadSession {
    store: ReplyStore,
    ordering: ResponseOrdering,
    pub composer: ReplyComposer,
    pub visibility: VisibilityMap,
}

impl ThreadSession {
    pub fn new(post_id: impl Into<String>, ordering: ResponseOrdering) -> Self {
        Self {
            store: ReplyStore::new(post_id, ordering),
            ordering,
            composer: ReplyComposer::new(),
            visibility: VisibilityMap::new(),
        }
    }

    pub fn post_id(&self) -> &str {
        self.store.post_id()
    }

    pub fn store(&self) -> &ReplyStore {
        &self.store
    }

    pub fn thread(&self) -> Thread<'_> {
        self.store.thread()
    }

    /// Switches to `post_id`, discarding all state if it differs from the
    /// current post. Returns whether anything was reset.
    pub fn open(&mut self, post_id: &str) -> bool {
        if self.store.post_id() == post_id {
            return false;
        }
        info!(from = %self.store.post_id(), to = %post_id, "switching thread");
        self.store = ReplyStore::new(post_id, self.ordering);
        self.composer = ReplyComposer::new();
        self.visibility.reset();
        true
    }

    /// Targets `reply_id`, using its author as the mention.
    ///
    /// Only top-level replies in the loaded data can be replied to; anything
    /// else would be stored as an orphan and never shown.
    pub fn start_reply(&mut self, reply_id: &str) -> Result<()> {
        let reply = self.store.reply(reply_id).ok_or_else(|| {
            ForumError::validation(format!("reply {reply_id} is not part of this thread"))
        })?;
        if !reply.is_top_level() {
            return Err(ForumError::validation(format!(
                "reply {reply_id} is itself a reply and cannot be replied to"
            )));
        }
        let name = reply.author().to_string();
        self.composer.start_reply(reply_id, name);
        Ok(())
    }

    pub fn cancel_reply(&mut self) {
        self.composer.cancel_reply();
    }

    pub fn toggle_children(&mut self, parent_id: &str) -> bool {
        self.visibility.toggle(parent_id)
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.store.begin_refresh()
    }

    pub fn apply(&mut self, ticket: &RefreshTicket, result: Result<PostDetails>) -> ApplyOutcome {
        self.store.apply(ticket, result)
    }

    pub fn refresh<S>(&mut self, service: &S) -> ApplyOutcome
    where
        S: ForumService + ?Sized,
    {
        self.store.refresh(service)
    }

    pub fn prepare_reply(&mut self, body: &str) -> Result<PendingReply> {
        let post_id = self.store.post_id().to_string();
        self.composer.prepare_submission(&post_id, body)
    }

    /// Settles a reply sent from [`prepare_reply`](Self::prepare_reply). On
    /// success the post must be fetched again; the returned ticket is for
    /// that fetch.
    pub fn reply_finished(&mut self, result: Result<Reply>) -> Result<RefreshTicket> {
        self.composer.finish_submission(result)?;
        Ok(self.store.begin_refresh())
    }

    /// Sends `body` to the active target and re-fetches the post on success.
    pub fn submit_reply<S>(&mut self, service: &S, body: &str) -> Result<Reply>
    where
        S: ForumService + ?Sized,
    {
        let post_id = self.store.post_id().to_string();
        let reply = self.composer.submit(service, &post_id, body)?;
        self.store.refresh(service);
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thread::fake::FakeForum;
    use pretty_assertions::assert_eq;

    fn seeded() -> FakeForum {
        let forum = FakeForum::new();
        forum.seed_post(
            "p1",
            vec![
                Reply::top_level("1", "Deadlift PR today", "Alice"),
                Reply::child("2", "@Alice congrats", "Bob", "1").with_replied_to("Alice"),
                Reply::top_level("3", "Rest days?", "Cara"),
            ],
        );
        forum.seed_post("p2", vec![Reply::top_level("9", "other", "Dan")]);
        forum
    }

    fn top_ids(session: &ThreadSession) -> Vec<String> {
        session
            .thread()
            .entries
            .iter()
            .map(|e| e.reply.id().to_string())
            .collect()
    }

    fn child_ids(session: &ThreadSession, parent: &str) -> Vec<String> {
        session
            .thread()
            .entry(parent)
            .map(|e| e.children.iter().map(|c| c.id().to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn top_level_submission_appears_after_refresh() {
        let forum = seeded();
        let mut session = ThreadSession::new("p1", ResponseOrdering::default());
        session.refresh(&forum);

        let reply = session.submit_reply(&forum, "Two rest days").expect("submit");
        assert_eq!(forum.fetch_calls(), 2);
        let mut expected = vec!["1".to_string(), "3".to_string()];
        expected.push(reply.id().to_string());
        assert_eq!(top_ids(&session), expected);
    }

    #[test]
    fn nested_submission_attaches_under_parent_after_refresh() {
        let forum = seeded();
        let mut session = ThreadSession::new("p1", ResponseOrdering::default());
        session.refresh(&forum);

        session.start_reply("1").expect("top-level target");
        assert_eq!(session.composer.draft, "@Alice ");
        let body = format!("{}what weight?", session.composer.draft);
        let reply = session.submit_reply(&forum, &body).expect("submit");

        assert_eq!(child_ids(&session, "1"), vec!["2".to_string(), reply.id().to_string()]);
        let stored = session.store().reply(reply.id()).expect("stored");
        assert_eq!(stored.replied_to_name(), Some("Alice"));
        assert_eq!(session.composer.target(), None);
    }

    #[test]
    fn refresh_keeps_expanded_parents() {
        let forum = seeded();
        let mut session = ThreadSession::new("p1", ResponseOrdering::default());
        session.refresh(&forum);
        session.toggle_children("1");

        session.submit_reply(&forum, "another").expect("submit");
        assert!(session.visibility.is_shown("1"));
        assert!(!session.visibility.is_shown("3"));
    }

    #[test]
    fn opening_another_post_resets_view_state() {
        let forum = seeded();
        let mut session = ThreadSession::new("p1", ResponseOrdering::default());
        session.refresh(&forum);
        session.toggle_children("1");
        session.start_reply("3").expect("top-level target");

        assert!(!session.open("p1"));
        assert!(session.visibility.is_shown("1"));

        assert!(session.open("p2"));
        assert!(!session.visibility.is_shown("1"));
        assert_eq!(session.composer.target(), None);
        assert!(!session.store().has_loaded());
        session.refresh(&forum);
        assert_eq!(top_ids(&session), vec!["9".to_string()]);
    }

    #[test]
    fn late_response_for_previous_post_is_dropped() {
        let forum = seeded();
        let mut session = ThreadSession::new("p1", ResponseOrdering::default());
        let ticket = session.begin_refresh();
        session.open("p2");
        let outcome = session.apply(&ticket, forum.get_post("p1"));
        assert_eq!(outcome, ApplyOutcome::WrongPost);
        assert!(!session.store().has_loaded());
    }

    #[test]
    fn split_reply_flow_requests_refresh() {
        let forum = seeded();
        let mut session = ThreadSession::new("p1", ResponseOrdering::default());
        session.refresh(&forum);
        session.start_reply("3").expect("top-level target");

        let pending = session.prepare_reply("@Cara one").expect("valid");
        assert_eq!(pending.parent_id.as_deref(), Some("3"));
        let result = forum.create_reply(&pending.post_id, &pending.body, pending.parent_id.as_deref());
        let ticket = session.reply_finished(result).expect("accepted");
        assert!(session.store().is_loading());

        let outcome = session.apply(&ticket, forum.get_post("p1"));
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(child_ids(&session, "3").len(), 1);
    }

    #[test]
    fn failed_reply_does_not_refresh() {
        let forum = seeded();
        forum.fail_replies(true);
        let mut session = ThreadSession::new("p1", ResponseOrdering::default());
        session.refresh(&forum);
        session.start_reply("1").expect("top-level target");

        assert!(session.submit_reply(&forum, "@Alice hi").is_err());
        assert_eq!(forum.fetch_calls(), 1);
        assert_eq!(session.composer.target(), None);
    }

    #[test]
    fn child_reply_cannot_be_targeted() {
        let forum = seeded();
        let mut session = ThreadSession::new("p1", ResponseOrdering::default());
        session.refresh(&forum);
        session.start_reply("3").expect("top-level target");

        let err = session.start_reply("2").expect_err("child target");
        assert!(err.is_validation());
        assert_eq!(session.composer.target().map(|t| t.reply_id.as_str()), Some("3"));
        assert_eq!(session.composer.draft, "@Cara ");
        assert!(forum.reply_calls().is_empty());
    }

    #[test]
    fn unknown_reply_cannot_be_targeted() {
        let forum = seeded();
        let mut session = ThreadSession::new("p1", ResponseOrdering::default());
        session.refresh(&forum);

        let err = session.start_reply("does-not-exist").expect_err("unknown target");
        assert!(err.is_validation());
        assert_eq!(session.composer.target(), None);

        // Without a target the reply goes to the top level and stays visible.
        let reply = session.submit_reply(&forum, "hi").expect("submit");
        assert!(reply.is_top_level());
        assert!(session.thread().orphans.is_empty());
    }

    #[test]
    fn nothing_can_be_targeted_before_the_post_loads() {
        let mut session = ThreadSession::new("p1", ResponseOrdering::default());
        assert!(session.start_reply("1").is_err());
    }
}
