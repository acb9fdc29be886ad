//! Integration tests for the Valoisa storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p valoisa-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - reload round-trips through the file and memory stores
//! - `cart_checkout` - checkout scheduling and cancellation
//!
//! This library holds the shared fixtures: collaborators that record what
//! the cart manager sent them, and throwaway data directories.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use valoisa_storefront::notify::{Notification, Notifier};
use valoisa_storefront::storage::KeyValueStore;
use valoisa_storefront::view::{CartRenderer, CartView};
use valoisa_storefront::{CartManager, CartSettings};

/// Renderer that keeps every view and counts view resets.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    views: Mutex<Vec<CartView>>,
    resets: AtomicUsize,
}

impl RecordingRenderer {
    /// The most recently rendered view.
    #[must_use]
    pub fn last(&self) -> Option<CartView> {
        self.views.lock().ok().and_then(|views| views.last().cloned())
    }

    /// How many times the renderer was asked to draw.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.views.lock().map(|views| views.len()).unwrap_or_default()
    }

    /// How many times the view was reset after checkout.
    #[must_use]
    pub fn reset_count(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

impl CartRenderer for RecordingRenderer {
    fn render(&self, view: &CartView) {
        if let Ok(mut views) = self.views.lock() {
            views.push(view.clone());
        }
    }

    fn reset_view(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

/// Notifier that keeps every notification.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// All notifications so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification);
        }
    }
}

/// A cart manager plus handles to its recording collaborators.
pub struct Fixture {
    pub manager: CartManager,
    pub renderer: Arc<RecordingRenderer>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Fixture {
    /// Build a manager over `store` without restoring.
    #[must_use]
    pub fn new(settings: CartSettings, store: Arc<dyn KeyValueStore>) -> Self {
        let renderer = Arc::new(RecordingRenderer::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let manager = CartManager::new(settings, store, renderer.clone(), notifier.clone());
        Self {
            manager,
            renderer,
            notifier,
        }
    }
}

/// A fresh, unique directory under the system temp dir.
#[must_use]
pub fn temp_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("valoisa-it-{}", uuid::Uuid::new_v4()))
}
