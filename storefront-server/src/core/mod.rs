//! Core: configuration, shared state, startup errors and the HTTP server
//!
//! - [`Config`] - environment configuration
//! - [`ServerState`] - state handed to every handler
//! - [`Server`] - bind, serve, shut down
//! - [`ServerError`] - startup failures

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
