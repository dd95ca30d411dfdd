use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{self, Context};
use fitforum_client::config::ForumConfig;
use fitforum_client::models::{NewPostDraft, Post, PostDetails, PostSummary, Reply};
use fitforum_client::{ApiClient, ForumError, ForumService};
use log::{error, info};

mod messages;
mod state;
mod tasks;
mod ui;

use messages::AppMessage;
use state::{CreatePostState, FrontendSettings, ThreadView, ViewState};
use tasks::SharedService;
use ui::thread::ThreadAction;

const SETTINGS_KEY: &str = "fitforum_settings";

pub struct FitForumApp {
    service: SharedService,
    config: ForumConfig,
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
    posts: Vec<PostSummary>,
    posts_loading: bool,
    posts_error: Option<String>,
    view: ViewState,
    create_post: CreatePostState,
    base_url_input: String,
    info_banner: Option<String>,
    next_view_id: u64,
}

impl FitForumApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut config = ForumConfig::from_env().unwrap_or_else(|err| {
            error!("invalid forum configuration, using defaults: {err:#}");
            ForumConfig::default()
        });
        if let Some(settings) = cc
            .storage
            .and_then(|storage| eframe::get_value::<FrontendSettings>(storage, SETTINGS_KEY))
        {
            config.api_base_url = settings.api_base_url;
        }

        let service: SharedService = match ApiClient::from_config(&config) {
            Ok(client) => Arc::new(client),
            Err(err) => {
                error!("failed to initialise API client for {}: {err}", config.api_base_url);
                config.api_base_url = ForumConfig::default().api_base_url;
                match ApiClient::from_config(&config) {
                    Ok(client) => Arc::new(client),
                    Err(err) => {
                        error!("default API client unavailable: {err}");
                        Arc::new(Offline)
                    }
                }
            }
        };
        Self::with_service(service, config)
    }

    /// Builds the app around an arbitrary service and starts loading the
    /// post list.
    pub fn with_service(service: Arc<dyn ForumService>, config: ForumConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut app = Self {
            service,
            base_url_input: config.api_base_url.clone(),
            config,
            tx,
            rx,
            posts: Vec::new(),
            posts_loading: false,
            posts_error: None,
            view: ViewState::Catalog,
            create_post: CreatePostState::default(),
            info_banner: None,
            next_view_id: 0,
        };
        app.spawn_load_posts();
        app
    }

    fn spawn_load_posts(&mut self) {
        if self.posts_loading {
            return;
        }
        self.posts_loading = true;
        self.posts_error = None;
        tasks::load_posts(self.service.clone(), self.tx.clone());
    }

    fn spawn_refresh(service: &SharedService, tx: &Sender<AppMessage>, view: &mut ThreadView) {
        let ticket = view.session.begin_refresh();
        tasks::load_post(service.clone(), tx.clone(), view.id, ticket);
    }

    fn allocate_view_id(&mut self) -> u64 {
        self.next_view_id += 1;
        self.next_view_id
    }

    pub(crate) fn open_post(&mut self, post_id: &str, title: &str) {
        let view_id = self.allocate_view_id();
        match &mut self.view {
            ViewState::Thread(view) => {
                if view.session.open(post_id) {
                    view.id = view_id;
                    view.title = title.to_string();
                    view.reply_error = None;
                }
            }
            ViewState::Catalog => {
                self.view = ViewState::Thread(ThreadView::new(
                    view_id,
                    post_id,
                    title,
                    self.config.response_ordering,
                ));
            }
        }
        if let ViewState::Thread(view) = &mut self.view {
            Self::spawn_refresh(&self.service, &self.tx, view);
        }
    }

    fn spawn_create_post(&mut self) {
        let draft = self.create_post.draft.clone();
        if let Err(err) = draft.validate() {
            self.create_post.error = Some(err.to_string());
            return;
        }
        self.create_post.submitting = true;
        self.create_post.error = None;
        tasks::create_post(self.service.clone(), self.tx.clone(), draft);
    }

    fn spawn_submit_reply(service: &SharedService, tx: &Sender<AppMessage>, view: &mut ThreadView) {
        let body = view.session.composer.draft.clone();
        match view.session.prepare_reply(&body) {
            Ok(pending) => {
                view.reply_error = None;
                tasks::submit_reply(service.clone(), tx.clone(), view.id, pending);
            }
            Err(err) => view.reply_error = Some(err.to_string()),
        }
    }

    fn apply_base_url(&mut self) {
        let mut config = self.config.clone();
        config.api_base_url = self.base_url_input.trim().to_string();
        match ApiClient::from_config(&config) {
            Ok(client) => {
                info!("forum API set to {}", client.base_url());
                config.api_base_url = client.base_url().to_string();
                self.base_url_input = config.api_base_url.clone();
                self.service = Arc::new(client);
                self.config = config;
                self.info_banner = Some("API URL updated".into());
                self.view = ViewState::Catalog;
                self.posts_loading = false;
                self.spawn_load_posts();
            }
            Err(err) => {
                self.info_banner = Some(format!("Failed to update URL: {err}"));
            }
        }
    }

    fn is_busy(&self) -> bool {
        let thread_busy = match &self.view {
            ViewState::Thread(view) => {
                view.session.store().is_loading() || view.session.composer.is_sending()
            }
            ViewState::Catalog => false,
        };
        self.posts_loading || self.create_post.submitting || thread_busy
    }

    fn process_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.handle_message(message);
        }
    }

    fn render_top_bar(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Community Forum");
                ui.separator();
                ui.label("API Base URL");
                ui.text_edit_singleline(&mut self.base_url_input);
                if ui.button("Apply").clicked() {
                    self.apply_base_url();
                }
                if ui.button("Refresh").clicked() {
                    match &mut self.view {
                        ViewState::Catalog => self.spawn_load_posts(),
                        ViewState::Thread(view) => Self::spawn_refresh(&self.service, &self.tx, view),
                    }
                }
            });

            if let Some(message) = self.info_banner.clone() {
                let mut dismiss = false;
                egui::Frame::group(ui.style())
                    .fill(ui.visuals().extreme_bg_color)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(message.as_str());
                            if ui.button("Dismiss").clicked() {
                                dismiss = true;
                            }
                        });
                    });
                if dismiss {
                    self.info_banner = None;
                }
            }
        });
    }
}

impl eframe::App for FitForumApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.process_messages();
        self.render_top_bar(ctx);

        let view = std::mem::replace(&mut self.view, ViewState::Catalog);
        match view {
            ViewState::Catalog => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    self.render_catalog(ui);
                });
            }
            ViewState::Thread(mut thread_view) => {
                let mut action = ThreadAction::None;
                egui::CentralPanel::default().show(ctx, |ui| {
                    action = Self::render_thread(ui, &mut thread_view);
                });

                match action {
                    ThreadAction::GoBack => self.spawn_load_posts(),
                    ThreadAction::Retry => {
                        Self::spawn_refresh(&self.service, &self.tx, &mut thread_view);
                        self.view = ViewState::Thread(thread_view);
                    }
                    ThreadAction::SubmitReply => {
                        Self::spawn_submit_reply(&self.service, &self.tx, &mut thread_view);
                        self.view = ViewState::Thread(thread_view);
                    }
                    ThreadAction::None => self.view = ViewState::Thread(thread_view),
                }
            }
        }

        if self.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = FrontendSettings {
            api_base_url: self.config.api_base_url.clone(),
        };
        eframe::set_value(storage, SETTINGS_KEY, &settings);
    }
}

/// Stand-in used only when no HTTP client could be built at all.
struct Offline;

impl ForumService for Offline {
    fn list_posts(&self) -> fitforum_client::Result<Vec<PostSummary>> {
        Err(offline("list posts"))
    }

    fn create_post(&self, _draft: &NewPostDraft) -> fitforum_client::Result<Post> {
        Err(offline("create post"))
    }

    fn get_post(&self, _post_id: &str) -> fitforum_client::Result<PostDetails> {
        Err(offline("get post"))
    }

    fn create_reply(
        &self,
        _post_id: &str,
        _body: &str,
        _parent_id: Option<&str>,
    ) -> fitforum_client::Result<Reply> {
        Err(offline("create reply"))
    }
}

fn offline(operation: &'static str) -> ForumError {
    ForumError::fetch(operation, "no HTTP client available")
}
