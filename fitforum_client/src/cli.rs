use std::fmt::Write as _;

use anyhow::{Context, Result};

use crate::models::{NewPostDraft, PostSummary};
use crate::service::ForumService;
use crate::thread::{ApplyOutcome, ThreadSession};
use crate::utils::{format_date, pluralize_replies};

pub fn list_posts<S: ForumService + ?Sized>(service: &S) -> Result<String> {
    let posts = service.list_posts().context("could not load forum posts")?;
    Ok(render_post_list(&posts))
}

pub fn show_post<S: ForumService + ?Sized>(
    service: &S,
    session: &mut ThreadSession,
    expand_all: bool,
) -> Result<String> {
    if session.refresh(service) == ApplyOutcome::Failed {
        if let Some(err) = session.store().error() {
            return Err(err.clone()).context("could not load post");
        }
    }
    if expand_all {
        let parents: Vec<String> = session
            .thread()
            .entries
            .iter()
            .map(|e| e.reply.id().to_string())
            .collect();
        session.visibility.show_all(parents.iter().map(String::as_str));
    }
    Ok(render_thread(session))
}

pub fn create_post<S: ForumService + ?Sized>(service: &S, title: &str, body: &str) -> Result<String> {
    let post = service
        .create_post(&NewPostDraft::new(title, body))
        .context("could not create post")?;
    Ok(format!("Post created: {} ({})", post.title, post.id))
}

pub fn reply<S: ForumService + ?Sized>(
    service: &S,
    session: &mut ThreadSession,
    body: &str,
    parent: Option<&str>,
) -> Result<String> {
    if let Some(parent) = parent {
        // Load first so the mention name is known.
        if session.refresh(service) == ApplyOutcome::Failed {
            if let Some(err) = session.store().error() {
                return Err(err.clone()).context("could not load post");
            }
        }
        session
            .start_reply(parent)
            .with_context(|| format!("cannot reply to {parent}"))?;
    }
    let body = match session.composer.target() {
        Some(_) if !body.starts_with('@') => format!("{}{body}", session.composer.draft),
        _ => body.to_string(),
    };
    let reply = session
        .submit_reply(service, &body)
        .context("could not submit reply")?;
    let mut out = format!("Reply {} added.\n\n", reply.id());
    if let Some(parent) = reply.parent_id() {
        session.visibility.show_all([parent]);
    }
    out.push_str(&render_thread(session));
    Ok(out)
}

pub fn render_post_list(posts: &[PostSummary]) -> String {
    if posts.is_empty() {
        return "No posts yet.\n".to_string();
    }
    let mut out = String::new();
    for post in posts {
        let date = post.created_at.as_deref().map(format_date).unwrap_or_default();
        let _ = writeln!(
            out,
            "{}  {}  by {}  [{}]  {}",
            post.id,
            post.title,
            post.author,
            pluralize_replies(post.reply_count),
            date
        );
    }
    out
}

/// Text rendering of the thread as the user would see it: hidden children
/// are summarized, orphans are not shown.
pub fn render_thread(session: &ThreadSession) -> String {
    let mut out = String::new();
    if let Some(post) = session.store().post() {
        let _ = writeln!(out, "{}", post.title);
        let _ = writeln!(out, "{}", post.body);
        let _ = writeln!(out, "Posted by: {}", post.author);
        let _ = writeln!(out);
    }

    let thread = session.thread();
    if thread.is_empty() {
        out.push_str("No replies yet.\n");
        return out;
    }
    for entry in &thread.entries {
        let _ = writeln!(out, "[{}] {} - {}", entry.reply.id(), entry.reply.body(), entry.reply.author());
        if entry.children.is_empty() {
            continue;
        }
        if session.visibility.is_shown(entry.reply.id()) {
            for child in &entry.children {
                let _ = write!(out, "    [{}] {} - {}", child.id(), child.body(), child.author());
                if let Some(name) = child.replied_to_name() {
                    let _ = write!(out, " (replied to {name})");
                }
                out.push('\n');
            }
        } else {
            let _ = writeln!(out, "    ({} hidden)", pluralize_replies(entry.children.len()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResponseOrdering;
    use crate::models::Reply;
    use crate::thread::fake::FakeForum;
    use pretty_assertions::assert_eq;

    fn forum() -> FakeForum {
        let forum = FakeForum::new();
        forum.seed_post(
            "p1",
            vec![
                Reply::top_level("1", "Five sets", "Alice"),
                Reply::child("2", "@Alice why?", "Bob", "1").with_replied_to("Alice"),
                Reply::top_level("3", "Three", "Cara"),
                Reply::child("4", "lost", "Dan", "99"),
            ],
        );
        forum
    }

    #[test]
    fn collapsed_thread_hides_children_and_orphans() {
        let forum = forum();
        let mut session = ThreadSession::new("p1", ResponseOrdering::default());
        let text = show_post(&forum, &mut session, false).expect("show");
        assert_eq!(
            text,
            "Post p1\nbody\nPosted by: Owner\n\n\
             [1] Five sets - Alice\n    (1 reply hidden)\n\
             [3] Three - Cara\n"
        );
    }

    #[test]
    fn expanded_thread_lists_children() {
        let forum = forum();
        let mut session = ThreadSession::new("p1", ResponseOrdering::default());
        let text = show_post(&forum, &mut session, true).expect("show");
        assert!(text.contains("    [2] @Alice why? - Bob (replied to Alice)\n"));
        assert!(!text.contains("lost"));
    }

    #[test]
    fn reply_with_parent_prefixes_mention() {
        let forum = forum();
        let mut session = ThreadSession::new("p1", ResponseOrdering::default());
        reply(&forum, &mut session, "more volume", Some("3")).expect("reply");
        let calls = forum.reply_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "@Cara more volume");
        assert_eq!(calls[0].2.as_deref(), Some("3"));
    }

    #[test]
    fn empty_list_message() {
        assert_eq!(render_post_list(&[]), "No posts yet.\n");
    }

    #[test]
    fn reply_to_a_child_is_refused_before_sending() {
        let forum = forum();
        let mut session = ThreadSession::new("p1", ResponseOrdering::default());
        let err = reply(&forum, &mut session, "hi", Some("2")).expect_err("child parent");
        assert!(err.to_string().contains("cannot reply to 2"));
        assert!(forum.reply_calls().is_empty());
    }

    #[test]
    fn reply_to_an_unknown_parent_is_refused() {
        let forum = forum();
        let mut session = ThreadSession::new("p1", ResponseOrdering::default());
        assert!(reply(&forum, &mut session, "hi", Some("nope")).is_err());
        assert!(forum.reply_calls().is_empty());
    }

    #[test]
    fn reply_is_not_sent_when_the_post_cannot_load() {
        let forum = forum();
        forum.fail_fetches(true);
        let mut session = ThreadSession::new("p1", ResponseOrdering::default());
        let err = reply(&forum, &mut session, "hi", Some("3")).expect_err("fetch failed");
        assert!(err.to_string().contains("could not load post"));
        assert!(forum.reply_calls().is_empty());
    }
}
