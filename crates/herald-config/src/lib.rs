//! # Herald Config
//!
//! Layered configuration loading for the Herald admin API client.

pub mod app_config;
pub mod loader;

pub use app_config::*;
pub use loader::*;
