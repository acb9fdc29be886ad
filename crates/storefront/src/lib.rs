//! Valoisa Storefront - cart state for the landing page.
//!
//! # Architecture
//!
//! A single [`CartManager`](cart::CartManager) owns the shopper's cart. Each
//! mutation is applied in memory, mirrored to a [`KeyValueStore`](storage::KeyValueStore)
//! and handed to a [`CartRenderer`](view::CartRenderer) as a fresh
//! [`CartView`](view::CartView). Totals are recomputed on every read.
//!
//! Collaborators are passed in as `Arc<dyn Trait>` handles:
//! - [`storage`] - durable mirror (`MemoryStore`, `FileStore`)
//! - [`view`] - rendering
//! - [`notify`] - transient notifications
//!
//! Storage faults never fail a cart operation. They are logged and surfaced
//! as [`MutationOutcome::StorageFailed`](cart::MutationOutcome) or
//! [`RestoreOutcome`](cart::RestoreOutcome) values instead.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod view;

pub use cart::{CartManager, CheckoutOutcome, DerivedTotals, LineItem, MutationOutcome, RestoreOutcome};
pub use config::{CartSettings, StorefrontConfig};
pub use error::StorageError;
