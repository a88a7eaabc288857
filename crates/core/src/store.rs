//! Persistent store
//!
//! Holds the two records the donation pages share: the cart and the last order. Reads fail
//! open (an unreadable cart is empty, an unreadable order is absent) and cart writes that fail
//! are dropped after logging; this is best-effort client state with no durability promise.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    items::CartItem,
    orders::Order,
    settings::{CartKey, LAST_ORDER_KEY},
    storage::{KeyValueStorage, StorageError},
};

/// Errors from writing a record.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected the operation.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The record could not be encoded.
    #[error("failed to encode record")]
    Encode(#[from] serde_json::Error),
}

/// Typed access to the cart and last-order records.
#[derive(Debug, Clone)]
pub struct Store {
    storage: Arc<dyn KeyValueStorage>,
    cart_key: CartKey,
}

impl Store {
    /// Wrap a storage backend, keeping the cart under `cart_key`.
    pub fn new(storage: Arc<dyn KeyValueStorage>, cart_key: CartKey) -> Self {
        Self { storage, cart_key }
    }

    /// The cart key in use.
    pub fn cart_key(&self) -> CartKey {
        self.cart_key
    }

    /// Load the cart. Missing or unreadable data yields an empty cart.
    pub fn load_cart(&self) -> Vec<CartItem> {
        self.read(self.cart_key.as_str()).unwrap_or_default()
    }

    /// Persist the cart, logging and dropping any failure.
    pub fn save_cart(&self, items: &[CartItem]) {
        if let Err(error) = self.write(self.cart_key.as_str(), items) {
            warn!(key = self.cart_key.as_str(), %error, "failed to save cart");
        }
    }

    /// Load the last order, if one is on record and readable.
    pub fn load_last_order(&self) -> Option<Order> {
        self.read(LAST_ORDER_KEY)
    }

    /// Persist the last order, logging and dropping any failure.
    pub fn save_last_order(&self, order: &Order) {
        if let Err(error) = self.try_save_last_order(order) {
            warn!(order_id = %order.id(), %error, "failed to save order");
        }
    }

    /// Persist the last order, reporting failure to the caller.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the order cannot be encoded or written.
    pub fn try_save_last_order(&self, order: &Order) -> Result<(), StoreError> {
        self.write(LAST_ORDER_KEY, order)
    }

    fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                debug!(key, %error, "storage read failed; treating record as absent");

                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(error) => {
                debug!(key, %error, "stored record is corrupt; treating record as absent");

                None
            }
        }
    }

    fn write<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(value)?;

        self.storage.set(key, &encoded)?;

        Ok(())
    }
}
