//! Application layer - Use cases and orchestration
//!
//! This layer contains:
//! - Ports: the sheet use case and the interfaces to storage and the LLM
//! - Services: the sheet pipeline and the features generator
//! - DTOs: response shapes for the HTTP and WebSocket surfaces

pub mod dto;
pub mod ports;
pub mod services;
