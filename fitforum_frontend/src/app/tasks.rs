use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use fitforum_client::models::NewPostDraft;
use fitforum_client::thread::{PendingReply, RefreshTicket};
use fitforum_client::ForumService;
use log::error;

use super::messages::AppMessage;

pub type SharedService = Arc<dyn ForumService>;

pub fn load_posts(service: SharedService, tx: Sender<AppMessage>) {
    thread::spawn(move || {
        let result = service.list_posts();
        if tx.send(AppMessage::PostsLoaded(result)).is_err() {
            error!("failed to send PostsLoaded message");
        }
    });
}

pub fn load_post(
    service: SharedService,
    tx: Sender<AppMessage>,
    view_id: u64,
    ticket: RefreshTicket,
) {
    thread::spawn(move || {
        let result = service.get_post(&ticket.post_id);
        let message = AppMessage::PostLoaded {
            view_id,
            ticket,
            result,
        };
        if tx.send(message).is_err() {
            error!("failed to send PostLoaded message");
        }
    });
}

pub fn create_post(service: SharedService, tx: Sender<AppMessage>, draft: NewPostDraft) {
    thread::spawn(move || {
        let result = service.create_post(&draft);
        if tx.send(AppMessage::PostCreated(result)).is_err() {
            error!("failed to send PostCreated message");
        }
    });
}

pub fn submit_reply(
    service: SharedService,
    tx: Sender<AppMessage>,
    view_id: u64,
    pending: PendingReply,
) {
    thread::spawn(move || {
        let result = service.create_reply(
            &pending.post_id,
            &pending.body,
            pending.parent_id.as_deref(),
        );
        let message = AppMessage::ReplySubmitted {
            view_id,
            result,
        };
        if tx.send(message).is_err() {
            error!("failed to send ReplySubmitted message");
        }
    });
}
