//! HTTP adapter: hosts matches in memory and exposes the engine's query and
//! mutation surface as JSON endpoints.

pub mod errors;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
