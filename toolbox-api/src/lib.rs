//! # AI Toolbox API Server Library
//!
//! HTTP layer for the AI Toolbox: accounts, the tool catalog, simulated
//! tool runs, favorites and per-user statistics.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Rate limiting and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
