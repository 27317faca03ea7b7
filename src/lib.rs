//! Chess rules engine: board model, per-piece move generation, legality
//! filtering, and check / checkmate / stalemate detection, plus a thin HTTP
//! adapter for hosting matches.

pub mod api;
pub mod config;
pub mod engine;
