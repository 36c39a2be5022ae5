//! Forum Service Library
//!
//! "Clash of Fiction" is a small forum where authenticated users create
//! posts, comment, and like/dislike, and administrators manage accounts. All
//! persistent state lives in the hosted document store; credentials live with
//! the hosted identity provider.
//!
//! # Modules
//!
//! - `handlers`: HTTP request handlers
//! - `models`: Typed records for users, posts, comments
//! - `services`: Business logic layer (validation, authorization)
//! - `db`: Data-access layer over the remote store
//! - `middleware`: Session resolution for authenticated routes
//! - `error`: Error types and handling
//! - `config`: Configuration management
//! - `app_state`: Shared handles for handlers

pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use app_state::AppState;
pub use config::Config;
pub use error::{AppError, Result};
