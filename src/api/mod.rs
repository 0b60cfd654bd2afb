//! DigitalOcean API access
//!
//! A thin REST client plus the resource types the commands print.

pub mod client;
pub mod types;

pub use client::{ApiError, DigitalOceanClient, DIGITALOCEAN_API_BASE};
pub use types::*;
