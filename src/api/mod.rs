//! REST API module for Parley.
//!
//! Exposes the chat engine over HTTP for web frontends.

mod handlers;
mod rest;

pub use handlers::*;
pub use rest::*;
