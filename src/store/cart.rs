use log::debug;
use std::sync::{Mutex, PoisonError};

use crate::models::CartItem;

/// In-memory shopping cart. Cleared only after a successful move into a
/// group, never before, so a failed group selection keeps the cart intact.
#[derive(Debug, Default)]
pub struct CartStore {
    items: Mutex<Vec<CartItem>>,
}

impl CartStore {
    pub fn new() -> Self {
        CartStore::default()
    }

    /// Adds an item; an existing line with the same id has its quantity
    /// incremented instead of being duplicated.
    pub fn add_item(&self, item: CartItem) {
        let mut items = self.lock();
        if let Some(existing) = items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity += item.quantity;
            debug!(
                "Cart item {} quantity now {}",
                existing.id, existing.quantity
            );
        } else {
            items.push(item);
        }
    }

    pub fn items(&self) -> Vec<CartItem> {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
        debug!("Cart cleared");
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CartItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
