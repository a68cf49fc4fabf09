//! Caju Core - Shared types library.
//!
//! This crate provides common types used across all Caju Commerce components:
//! - `client` - Storefront client core (state containers, checkout, API clients)
//! - `integration-tests` - Cross-container scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, roles,
//!   and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
