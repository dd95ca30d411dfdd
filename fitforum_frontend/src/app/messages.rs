use fitforum_client::models::{Post, PostDetails, PostSummary, Reply};
use fitforum_client::thread::{ApplyOutcome, RefreshTicket};
use fitforum_client::ForumError;
use log::{debug, error, info};

use super::state::{CreatePostState, ViewState};
use super::tasks;
use super::FitForumApp;

pub enum AppMessage {
    PostsLoaded(Result<Vec<PostSummary>, ForumError>),
    PostLoaded {
        view_id: u64,
        ticket: RefreshTicket,
        result: Result<PostDetails, ForumError>,
    },
    PostCreated(Result<Post, ForumError>),
    ReplySubmitted {
        view_id: u64,
        result: Result<Reply, ForumError>,
    },
}

impl FitForumApp {
    pub(super) fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::PostsLoaded(result) => self.handle_posts_loaded(result),
            AppMessage::PostLoaded {
                view_id,
                ticket,
                result,
            } => self.handle_post_loaded(view_id, ticket, result),
            AppMessage::PostCreated(result) => self.handle_post_created(result),
            AppMessage::ReplySubmitted { view_id, result } => {
                self.handle_reply_submitted(view_id, result)
            }
        }
    }

    fn handle_posts_loaded(&mut self, result: Result<Vec<PostSummary>, ForumError>) {
        self.posts_loading = false;
        match result {
            Ok(posts) => {
                self.posts = posts;
                self.posts_error = None;
            }
            Err(err) => {
                error!("failed to load posts: {err}");
                self.posts_error = Some(err.to_string());
            }
        }
    }

    fn handle_post_loaded(
        &mut self,
        view_id: u64,
        ticket: RefreshTicket,
        result: Result<PostDetails, ForumError>,
    ) {
        let view = match &mut self.view {
            ViewState::Thread(view) if view.id == view_id => view,
            _ => {
                debug!("post {} arrived after its view closed", ticket.post_id);
                return;
            }
        };
        match view.session.apply(&ticket, result) {
            ApplyOutcome::Applied => {
                if let Some(post) = view.session.store().post() {
                    view.title = post.title.clone();
                }
            }
            ApplyOutcome::Failed => {
                if let Some(err) = view.session.store().error() {
                    error!("failed to load post {}: {err}", ticket.post_id);
                }
            }
            ApplyOutcome::Stale | ApplyOutcome::WrongPost => {}
        }
    }

    fn handle_post_created(&mut self, result: Result<Post, ForumError>) {
        match result {
            Ok(post) => {
                info!("created post {}", post.id);
                self.create_post = CreatePostState::default();
                self.info_banner = Some("Post created!".into());
                self.spawn_load_posts();
                self.open_post(&post.id, &post.title);
            }
            Err(err) => {
                self.create_post.submitting = false;
                self.create_post.error = Some(err.to_string());
            }
        }
    }

    fn handle_reply_submitted(&mut self, view_id: u64, result: Result<Reply, ForumError>) {
        let view = match &mut self.view {
            ViewState::Thread(view) if view.id == view_id => view,
            _ => {
                match &result {
                    Ok(reply) => debug!("reply {} settled after its view closed", reply.id()),
                    Err(err) => error!("reply from a closed view failed: {err}"),
                }
                return;
            }
        };
        match view.session.reply_finished(result) {
            Ok(ticket) => {
                view.reply_error = None;
                tasks::load_post(self.service.clone(), self.tx.clone(), view.id, ticket);
                self.info_banner = Some("Reply posted".into());
                self.spawn_load_posts();
            }
            Err(err) => view.reply_error = Some(err.to_string()),
        }
    }
}
