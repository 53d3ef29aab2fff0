//! HTTP boundary exposed to UI layers (browser extension, desktop shell,
//! settings forms).

pub mod error;
pub mod handlers;
pub mod server;
pub mod types;

pub use server::{router, serve, AppState};
