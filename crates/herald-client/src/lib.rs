//! # Herald Client
//!
//! The API-client layer of the Herald admin front-end. Entity-oriented
//! clients proxy every read and mutation through the remote notification
//! API, with a Redis read-through cache in front of reads and
//! write-through invalidation behind mutations.

pub mod cache;
pub mod clients;
pub mod dto;
pub mod transport;

pub use cache::*;
pub use clients::*;
pub use dto::*;
pub use transport::*;
