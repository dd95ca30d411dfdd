use eframe::egui::{self, Color32, RichText};
use fitforum_client::models::Reply;
use fitforum_client::thread::{Thread, ThreadEntry};
use fitforum_client::utils::format_date;

use super::super::state::ThreadView;
use super::super::FitForumApp;

pub enum ThreadAction {
    None,
    GoBack,
    Retry,
    SubmitReply,
}

/// View-state changes collected while the reply list is borrowed.
enum ReplyEvent {
    Start(String),
    Cancel,
    Toggle(String),
}

impl FitForumApp {
    pub(crate) fn render_thread(ui: &mut egui::Ui, view: &mut ThreadView) -> ThreadAction {
        let mut action = ThreadAction::None;

        ui.horizontal(|ui| {
            if ui.button("← Back to forum").clicked() {
                action = ThreadAction::GoBack;
            }
            ui.separator();
            ui.label(RichText::new(&view.title).heading());
        });
        ui.separator();

        let store = view.session.store();
        if store.is_loading() && !store.has_loaded() {
            ui.add(egui::Spinner::new());
            return action;
        }
        if let Some(err) = store.error() {
            ui.colored_label(Color32::LIGHT_RED, format!("Error: {err}"));
            if ui.button("Retry").clicked() {
                action = ThreadAction::Retry;
            }
            if !store.has_loaded() {
                return action;
            }
        }

        if let Some(post) = store.post() {
            ui.label(&post.body);
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("Posted by: {}", post.author)).weak());
                if let Some(created) = &post.created_at {
                    ui.label(RichText::new(format_date(created)).weak());
                }
            });
        }
        ui.separator();

        // Cloned so the session stays mutable for the compose field.
        let replies: Vec<Reply> = store.replies().to_vec();
        let thread = Thread::build(&replies);
        let mut events = Vec::new();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Responses");
                if thread.is_empty() {
                    ui.label("No responses yet.");
                }
                for entry in &thread.entries {
                    render_entry(ui, view, entry, &mut events, &mut action);
                }

                if view.session.composer.target().is_none() {
                    ui.add_space(12.0);
                    ui.label(RichText::new("Add a response").strong());
                    render_composer(ui, view, &mut action);
                }
            });

        for event in events {
            match event {
                ReplyEvent::Start(reply_id) => {
                    view.reply_error = view
                        .session
                        .start_reply(&reply_id)
                        .err()
                        .map(|err| err.to_string());
                }
                ReplyEvent::Cancel => {
                    view.reply_error = None;
                    view.session.cancel_reply();
                }
                ReplyEvent::Toggle(parent_id) => {
                    view.session.toggle_children(&parent_id);
                }
            }
        }

        action
    }
}

fn render_entry(
    ui: &mut egui::Ui,
    view: &mut ThreadView,
    entry: &ThreadEntry<'_>,
    events: &mut Vec<ReplyEvent>,
    action: &mut ThreadAction,
) {
    let reply = entry.reply;
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .inner_margin(egui::vec2(12.0, 8.0))
        .show(ui, |ui| {
            ui.label(reply.body());
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("- {}", reply.author())).weak());
                if ui.small_button("Reply").clicked() {
                    events.push(ReplyEvent::Start(reply.id().to_string()));
                }
                if !entry.children.is_empty() {
                    let label = if view.session.visibility.is_shown(reply.id()) {
                        "Hide Replies".to_string()
                    } else {
                        format!("View Replies ({})", entry.children.len())
                    };
                    if ui.small_button(label).clicked() {
                        events.push(ReplyEvent::Toggle(reply.id().to_string()));
                    }
                }
            });

            if view.session.composer.is_targeting(reply.id()) {
                let name = view
                    .session
                    .composer
                    .target()
                    .map(|t| t.display_name.clone())
                    .unwrap_or_default();
                ui.horizontal(|ui| {
                    ui.label(RichText::new(format!("Replying to @{name}")).italics());
                    if ui.small_button("✖").clicked() {
                        events.push(ReplyEvent::Cancel);
                    }
                });
                render_composer(ui, view, action);
            }

            if view.session.visibility.is_shown(reply.id()) {
                ui.indent(("children", reply.id()), |ui| {
                    for child in &entry.children {
                        render_child(ui, child);
                    }
                });
            }
        });
    ui.add_space(6.0);
}

fn render_child(ui: &mut egui::Ui, child: &Reply) {
    egui::Frame::none()
        .inner_margin(egui::vec2(8.0, 4.0))
        .show(ui, |ui| {
            ui.label(child.body());
            let mut byline = format!("- {}", child.author());
            if let Some(name) = child.replied_to_name() {
                byline.push_str(&format!(" (replied to {name})"));
            }
            ui.label(RichText::new(byline).weak());
        });
}

fn render_composer(ui: &mut egui::Ui, view: &mut ThreadView, action: &mut ThreadAction) {
    let sending = view.session.composer.is_sending();
    ui.add(
        egui::TextEdit::multiline(&mut view.session.composer.draft)
            .hint_text("Write your reply...")
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );
    if let Some(err) = &view.reply_error {
        ui.colored_label(Color32::LIGHT_RED, err);
    }
    ui.horizontal(|ui| {
        let label = if sending { "Posting..." } else { "Submit" };
        if ui.add_enabled(!sending, egui::Button::new(label)).clicked() {
            *action = ThreadAction::SubmitReply;
        }
        if sending {
            ui.add(egui::Spinner::new());
        }
    });
}
