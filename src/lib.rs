// Platform-facing HTTP API
pub mod api;

// Bearer token extraction
pub mod auth;

// TOML and environment configuration
pub mod config;
