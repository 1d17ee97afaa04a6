//! HTTP presentation layer: the chat UI and its JSON API.
//!
//! The server owns the conversation history and temp-file lifecycle around
//! audio uploads; classification itself goes through the engine facade.

mod routes;
mod ui;

pub use routes::{build_router, serve, AppState};
