//! Elidune Desk
//!
//! A lending desk for small libraries: members, items and loans kept in flat
//! JSON files, driven from a text menu.

pub mod config;
pub mod console;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
