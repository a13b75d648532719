//! Tweetwatch Server
//!
//! Web front-end for the disaster tweet classifier: an input form at `/` and
//! a prediction page at `/predict`, backed by artifacts loaded once at startup.

pub mod app;
pub mod cli;
pub mod config;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod templates;

pub use app::{run_server, shutdown_signal};
pub use cli::Cli;
pub use config::ServerConfig;
pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
