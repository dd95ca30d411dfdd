//! Client-side model of a forum thread: the fetched post and replies, their
//! two-level reconstruction, and the view state that goes with them.

pub mod compose;
pub mod reconstruct;
pub mod session;
pub mod store;
pub mod visibility;

#[cfg(test)]
pub(crate) mod fake;

pub use compose::{PendingReply, ReplyComposer, ReplyTarget};
pub use reconstruct::{children_of, orphans, top_level, Thread, ThreadEntry};
pub use session::ThreadSession;
pub use store::{ApplyOutcome, RefreshTicket, ReplyStore};
pub use visibility::VisibilityMap;
