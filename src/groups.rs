//! Group purchases: moving cart line items into a persistent group's product
//! ledger with per-item quantity and price aggregation.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::WalletError;
use crate::models::{Group, GroupProduct, GroupStatus};
use crate::store::CartStore;

#[async_trait]
pub trait GroupStorage: Send + Sync {
    async fn save_group(&self, group: Group) -> Result<(), WalletError>;
    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, WalletError>;
    async fn list_groups(&self) -> Result<Vec<Group>, WalletError>;
}

pub struct InMemoryGroupStorage {
    groups: tokio::sync::Mutex<HashMap<String, Group>>,
}

impl InMemoryGroupStorage {
    pub fn new() -> Self {
        InMemoryGroupStorage {
            groups: tokio::sync::Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryGroupStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GroupStorage for InMemoryGroupStorage {
    async fn save_group(&self, group: Group) -> Result<(), WalletError> {
        self.groups.lock().await.insert(group.id.clone(), group);
        Ok(())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, WalletError> {
        Ok(self.groups.lock().await.get(group_id).cloned())
    }

    async fn list_groups(&self) -> Result<Vec<Group>, WalletError> {
        Ok(self.groups.lock().await.values().cloned().collect())
    }
}

pub struct GroupService<S: GroupStorage> {
    storage: S,
    cart: Arc<CartStore>,
}

impl<S: GroupStorage> GroupService<S> {
    pub fn new(storage: S, cart: Arc<CartStore>) -> Self {
        GroupService { storage, cart }
    }

    pub async fn create_group(&self, name: impl Into<String>) -> Result<Group, WalletError> {
        let now = Utc::now();
        let group = Group {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            status: GroupStatus::Open,
            products: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        info!("Creating group '{}' ({})", group.name, group.id);
        self.storage.save_group(group.clone()).await?;
        Ok(group)
    }

    /// Adds a product to the group ledger. A product whose name matches an
    /// existing entry increments that entry's quantity and recomputes its
    /// total instead of duplicating the line.
    pub async fn add_product_to_group(
        &self,
        group_id: &str,
        product: GroupProduct,
    ) -> Result<Group, WalletError> {
        let mut group = self
            .storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| WalletError::GroupNotFound(group_id.to_string()))?;

        match group.products.iter_mut().find(|p| p.name == product.name) {
            Some(existing) => {
                existing.quantity += product.quantity;
                existing.total_price = existing.quantity as f64 * existing.base_price;
                debug!(
                    "Incremented '{}' in group {} to quantity {}",
                    existing.name, group_id, existing.quantity
                );
            }
            None => {
                let mut product = product;
                product.total_price = product.quantity as f64 * product.base_price;
                debug!("Added '{}' to group {}", product.name, group_id);
                group.products.push(product);
            }
        }
        group.updated_at = Utc::now();
        self.storage.save_group(group.clone()).await?;
        Ok(group)
    }

    /// Moves every cart line item into the group's ledger. The cart is
    /// cleared only after the whole move succeeds; any failure leaves it
    /// intact so a failed group selection loses nothing.
    pub async fn move_cart_to_group(&self, group_id: &str) -> Result<Group, WalletError> {
        let items = self.cart.items();
        if items.is_empty() {
            warn!("Cart is empty, nothing to move into group {}", group_id);
            return self
                .storage
                .get_group(group_id)
                .await?
                .ok_or_else(|| WalletError::GroupNotFound(group_id.to_string()));
        }

        let mut group = self
            .storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| WalletError::GroupNotFound(group_id.to_string()))?;

        for item in items {
            let product = GroupProduct::from(item);
            match group.products.iter_mut().find(|p| p.name == product.name) {
                Some(existing) => {
                    existing.quantity += product.quantity;
                    existing.total_price = existing.quantity as f64 * existing.base_price;
                }
                None => group.products.push(product),
            }
        }
        group.updated_at = Utc::now();
        self.storage.save_group(group.clone()).await?;

        self.cart.clear();
        info!(
            "Moved cart into group {} ({} ledger entries)",
            group_id,
            group.products.len()
        );
        Ok(group)
    }
}
