mod app;
mod config;
mod console;
mod logging;

pub use app::run_app;
