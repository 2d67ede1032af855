pub mod app;
pub mod booking;
pub mod calendar;
pub mod config;
pub mod csv;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod player;
pub mod prefs;
pub mod remote;
pub mod shows;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::SiteConfig;
pub use state::{AppState, Site};
pub use storage::load_prefs;
