use eframe::egui::{self, Color32, RichText};
use fitforum_client::utils::{format_date, pluralize_replies};

use super::super::FitForumApp;

impl FitForumApp {
    pub(crate) fn render_catalog(&mut self, ui: &mut egui::Ui) {
        self.render_create_post(ui);
        ui.separator();

        if self.posts_loading && self.posts.is_empty() {
            ui.add(egui::Spinner::new());
        }
        if let Some(err) = &self.posts_error {
            ui.colored_label(Color32::LIGHT_RED, format!("Error loading posts: {err}"));
            if ui.button("Retry").clicked() {
                self.spawn_load_posts();
            }
            ui.separator();
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            if self.posts.is_empty() && !self.posts_loading {
                ui.label("No posts yet. Be the first to start a discussion!");
            }

            let mut post_to_open: Option<(String, String)> = None;

            for post in &self.posts {
                egui::Frame::group(ui.style())
                    .fill(ui.visuals().extreme_bg_color)
                    .inner_margin(egui::vec2(12.0, 8.0))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            let title = if post.title.is_empty() {
                                "(untitled post)"
                            } else {
                                &post.title
                            };
                            if ui.button(RichText::new(title).strong()).clicked() {
                                post_to_open = Some((post.id.clone(), post.title.clone()));
                            }
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if let Some(created) = &post.created_at {
                                        ui.label(format_date(created));
                                    }
                                },
                            );
                        });
                        ui.horizontal(|ui| {
                            ui.label(format!("By {}", post.author));
                            ui.separator();
                            ui.label(pluralize_replies(post.reply_count));
                        });
                    });
            }

            if let Some((id, title)) = post_to_open {
                self.open_post(&id, &title);
            }
        });
    }

    fn render_create_post(&mut self, ui: &mut egui::Ui) {
        ui.heading("Create New Post");
        ui.add(
            egui::TextEdit::singleline(&mut self.create_post.draft.title)
                .hint_text("Title")
                .desired_width(f32::INFINITY),
        );
        ui.add(
            egui::TextEdit::multiline(&mut self.create_post.draft.body)
                .hint_text("What's on your mind?")
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        );
        if let Some(err) = &self.create_post.error {
            ui.colored_label(Color32::LIGHT_RED, err);
        }
        ui.horizontal(|ui| {
            let submitting = self.create_post.submitting;
            let label = if submitting { "Posting..." } else { "Create Post" };
            if ui
                .add_enabled(!submitting, egui::Button::new(label))
                .clicked()
            {
                self.spawn_create_post();
            }
            if submitting {
                ui.add(egui::Spinner::new());
            }
        });
    }
}
