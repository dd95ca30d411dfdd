pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod telemetry;
pub mod thread;
pub mod utils;

pub use api::ApiClient;
pub use config::{ForumConfig, ResponseOrdering};
pub use error::{ForumError, Result};
pub use service::ForumService;
