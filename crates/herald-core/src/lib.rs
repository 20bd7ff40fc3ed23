//! # Herald Core
//!
//! Core types, typed IDs, and error definitions for the Herald admin API
//! client. This crate provides the foundational abstractions shared by the
//! configuration and client layers.

pub mod error;
pub mod id;
pub mod result;

pub use error::*;
pub use id::*;
pub use result::*;
