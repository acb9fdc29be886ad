//! Valoisa Core - Shared types library.
//!
//! This crate provides common types used across all Valoisa components:
//! - `storefront` - Cart state, persistence and rendering collaborators
//! - `cli` - Command-line storefront shell
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! timers. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, quantities and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
