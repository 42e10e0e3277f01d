//! Request and Response models for the store API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{validate_key, PutRequest, MAX_KEY_LENGTH};
pub use responses::{
    ErrorResponse, GetResponse, HealthResponse, MessageResponse, PutResponse, StatsResponse,
    VersionCountResponse, VersionResponse,
};
