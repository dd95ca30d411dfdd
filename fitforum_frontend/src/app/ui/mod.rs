pub mod catalog;
pub mod thread;
