use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::cart::CartItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupStatus {
    Open,
    Ordered,
    Closed,
}

/// A product line in a group's ledger. `total_price` is always
/// `quantity * base_price`, recomputed on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupProduct {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub base_price: f64,
    pub total_price: f64,
    pub category: Option<String>,
    pub image: Option<String>,
}

impl From<CartItem> for GroupProduct {
    fn from(item: CartItem) -> Self {
        let total_price = item.quantity as f64 * item.price;
        GroupProduct {
            id: item.id,
            name: item.name,
            quantity: item.quantity,
            base_price: item.price,
            total_price,
            category: item.category,
            image: item.image,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub status: GroupStatus,
    pub products: Vec<GroupProduct>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
