//! docli library
//!
//! Exposes the API client, response cache and command handlers for use by the
//! binary and integration tests.

pub mod api;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
