//! # QRBoxer API Server Library
//!
//! REST API for tracking moves, the boxes packed for them and the items in
//! each box.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Request extractors with validation
//! - `middleware`: Token authentication and route guards
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
