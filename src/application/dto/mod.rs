//! Data Transfer Objects - For API boundaries
//!
//! DTOs live in the application layer so infrastructure (HTTP/WebSocket) can
//! serialize responses without exposing the internal run bookkeeping.

pub mod pipeline;
pub mod rules;

pub use pipeline::*;
pub use rules::*;
