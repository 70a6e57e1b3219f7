pub mod auth;
pub mod cli;
pub mod config;
pub mod content;
pub mod database;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod media;
pub mod middleware;
pub mod reconcile;
pub mod routes;
pub mod state;

pub use routes::app;
pub use state::AppState;

#[cfg(test)]
pub mod testing;
