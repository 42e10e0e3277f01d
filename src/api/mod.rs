//! API Module
//!
//! HTTP handlers and routing exposing the store operations.
//!
//! # Endpoints
//! - `PUT /kv/:key` - Store a new version of a key
//! - `GET /kv/:key` - Retrieve the current value
//! - `GET /kv/:key/versions` - Count versions of a key
//! - `GET /kv/:key/versions/:index` - Retrieve a historical version
//! - `DELETE /kv` - Clear the store
//! - `POST /snapshot` - Flush pending snapshots
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
