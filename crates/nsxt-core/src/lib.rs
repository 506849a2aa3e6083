//! # nsxt-core
//!
//! Core types and utilities for working with VMware NSX-T.
//!
//! This crate provides the shared error type, HTTP service client, provider
//! configuration and object model used by the NSX-T API client crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status code mapping
//! - [`ids`] - Strongly-typed identifiers for NSX-T objects
//! - [`types`] - API flavours (Manager, Policy, Global Manager)
//! - [`models`] - Object model shared by every NSX-T resource
//! - [`config`] - Provider configuration and environment loading
//! - [`client`] - HTTP service client and connection settings
//! - [`query`] - Query parameter builder

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod ids;
pub mod models;
pub mod query;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
