// Library surface for the binary and headless/integration tests.
pub mod app_dirs;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod feedback_art;
pub mod logging;
pub mod runtime;
pub mod scheduler;
pub mod seen_cache;
pub mod session;
pub mod storage;
pub mod util;
pub mod word;
pub mod word_store;

pub use controller::SessionController;
pub use error::DrillError;
