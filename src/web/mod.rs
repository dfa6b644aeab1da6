//! HTTP server and embedded client page.

pub mod server;
pub mod templates;

pub use server::{build_router, serve, AppServer};
