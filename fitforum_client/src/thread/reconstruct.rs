//! Rebuilds the two-level reply tree from the flat list the server returns.
//!
//! Replies are only ever one level deep: a top-level reply and its direct
//! children. A child whose parent is missing, or whose parent is itself a
//! child, is an orphan and does not appear under any parent.

use std::collections::HashSet;

use crate::models::Reply;

/// Top-level replies in input order.
pub fn top_level(replies: &[Reply]) -> Vec<&Reply> {
    replies.iter().filter(|r| r.is_top_level()).collect()
}

/// Direct children of `parent_id` in input order.
///
/// Empty unless `parent_id` names a top-level reply present in `replies`.
pub fn children_of<'a>(replies: &'a [Reply], parent_id: &str) -> Vec<&'a Reply> {
    let parent_is_top_level = replies
        .iter()
        .any(|r| r.is_top_level() && r.id() == parent_id);
    if !parent_is_top_level {
        return Vec::new();
    }
    replies
        .iter()
        .filter(|r| r.parent_id() == Some(parent_id))
        .collect()
}

/// Children that no top-level reply claims.
pub fn orphans(replies: &[Reply]) -> Vec<&Reply> {
    let roots = top_level_ids(replies);
    replies
        .iter()
        .filter(|r| matches!(r.parent_id(), Some(parent) if !roots.contains(parent)))
        .collect()
}

fn top_level_ids(replies: &[Reply]) -> HashSet<&str> {
    replies
        .iter()
        .filter(|r| r.is_top_level())
        .map(Reply::id)
        .collect()
}

/// A top-level reply with its visible children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadEntry<'a> {
    pub reply: &'a Reply,
    pub children: Vec<&'a Reply>,
}

/// Materialized two-level view of a reply list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Thread<'a> {
    pub entries: Vec<ThreadEntry<'a>>,
    pub orphans: Vec<&'a Reply>,
}

impl<'a> Thread<'a> {
    /// Single pass over `replies`; equivalent to calling [`top_level`] and
    /// [`children_of`] for every root.
    pub fn build(replies: &'a [Reply]) -> Self {
        let roots = top_level_ids(replies);
        let mut entries: Vec<ThreadEntry<'a>> = replies
            .iter()
            .filter(|r| r.is_top_level())
            .map(|reply| ThreadEntry {
                reply,
                children: Vec::new(),
            })
            .collect();
        let mut orphans = Vec::new();

        for reply in replies {
            let Some(parent) = reply.parent_id() else {
                continue;
            };
            if !roots.contains(parent) {
                orphans.push(reply);
                continue;
            }
            // Duplicate ids are tolerated; every root with the id gets the child.
            for entry in entries.iter_mut().filter(|e| e.reply.id() == parent) {
                entry.children.push(reply);
            }
        }

        Self { entries, orphans }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, parent_id: &str) -> Option<&ThreadEntry<'a>> {
        self.entries.iter().find(|e| e.reply.id() == parent_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(replies: &[&Reply]) -> Vec<String> {
        replies.iter().map(|r| r.id().to_string()).collect()
    }

    fn sample() -> Vec<Reply> {
        vec![
            Reply::top_level("1", "first", "Alice"),
            Reply::child("2", "@Alice agreed", "Bob", "1").with_replied_to("Alice"),
            Reply::top_level("3", "second", "Cara"),
            Reply::child("4", "lost", "Dan", "99"),
        ]
    }

    #[test]
    fn partitions_the_reference_scenario() {
        let replies = sample();
        assert_eq!(ids(&top_level(&replies)), vec!["1", "3"]);
        assert_eq!(ids(&children_of(&replies, "1")), vec!["2"]);
        assert!(children_of(&replies, "3").is_empty());
        assert_eq!(ids(&orphans(&replies)), vec!["4"]);

        let thread = Thread::build(&replies);
        let surfaced: Vec<&str> = thread
            .entries
            .iter()
            .flat_map(|e| std::iter::once(e.reply).chain(e.children.iter().copied()))
            .map(Reply::id)
            .collect();
        assert!(!surfaced.contains(&"4"));
    }

    #[test]
    fn preserves_input_order() {
        let replies = vec![
            Reply::child("c2", "", "x", "b"),
            Reply::top_level("b", "", "x"),
            Reply::top_level("a", "", "x"),
            Reply::child("c1", "", "x", "b"),
            Reply::child("c3", "", "x", "a"),
            Reply::child("c0", "", "x", "b"),
        ];
        assert_eq!(ids(&top_level(&replies)), vec!["b", "a"]);
        assert_eq!(ids(&children_of(&replies, "b")), vec!["c2", "c1", "c0"]);
        assert_eq!(ids(&children_of(&replies, "a")), vec!["c3"]);
    }

    #[test]
    fn grandchildren_never_surface() {
        let replies = vec![
            Reply::top_level("1", "", "x"),
            Reply::child("2", "", "x", "1"),
            Reply::child("3", "", "x", "2"),
        ];
        assert_eq!(ids(&children_of(&replies, "1")), vec!["2"]);
        assert!(children_of(&replies, "2").is_empty());
        assert_eq!(ids(&orphans(&replies)), vec!["3"]);

        let thread = Thread::build(&replies);
        assert_eq!(thread.entries.len(), 1);
        assert_eq!(ids(&thread.entries[0].children), vec!["2"]);
        assert_eq!(ids(&thread.orphans), vec!["3"]);
    }

    #[test]
    fn unknown_parent_has_no_children() {
        let replies = sample();
        assert!(children_of(&replies, "99").is_empty());
        assert!(children_of(&[], "1").is_empty());
    }

    #[test]
    fn build_agrees_with_free_functions() {
        let replies = vec![
            Reply::top_level("a", "", "x"),
            Reply::child("a1", "", "x", "a"),
            Reply::top_level("b", "", "x"),
            Reply::child("b1", "", "x", "b"),
            Reply::child("a2", "", "x", "a"),
            Reply::child("z1", "", "x", "z"),
            Reply::child("a1x", "", "x", "a1"),
        ];
        let thread = Thread::build(&replies);
        assert_eq!(
            thread.entries.iter().map(|e| e.reply).collect::<Vec<_>>(),
            top_level(&replies)
        );
        for entry in &thread.entries {
            assert_eq!(entry.children, children_of(&replies, entry.reply.id()));
        }
        assert_eq!(thread.orphans, orphans(&replies));
        assert_eq!(ids(&thread.entry("a").expect("entry").children), vec!["a1", "a2"]);
    }

    #[test]
    fn every_reply_is_placed_exactly_once() {
        let replies = vec![
            Reply::top_level("1", "", "x"),
            Reply::child("2", "", "x", "1"),
            Reply::child("3", "", "x", "2"),
            Reply::top_level("4", "", "x"),
            Reply::child("5", "", "x", "missing"),
            Reply::child("6", "", "x", "4"),
        ];
        let thread = Thread::build(&replies);
        let mut placed: Vec<&str> = thread
            .entries
            .iter()
            .flat_map(|e| std::iter::once(e.reply).chain(e.children.iter().copied()))
            .chain(thread.orphans.iter().copied())
            .map(Reply::id)
            .collect();
        placed.sort_unstable();
        assert_eq!(placed, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn input_is_untouched() {
        let replies = sample();
        let before = replies.clone();
        let _ = Thread::build(&replies);
        let _ = top_level(&replies);
        let _ = children_of(&replies, "1");
        assert_eq!(replies, before);
    }
}
