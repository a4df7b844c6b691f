//! Server module for building the saved query HTTP server
//!
//! This module provides a `ServerBuilder` that registers:
//! - List, create and delete routes for saved queries
//! - Health check routes

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
