//! fitlog: a personal fitness log.
//!
//! Daily entries (running, workout results, weight and notes) are stored in
//! SQLite and served over a REST API and an MCP stdio server.

// The OpenAPI document is one large `json!` literal
#![recursion_limit = "256"]

pub mod api;
pub mod config;
pub mod db;
pub mod entries;
pub mod food;
pub mod mcp;
pub mod models;
pub mod stats;
pub mod workouts;
