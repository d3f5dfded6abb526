use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    pub category: Option<String>,
    pub image: Option<String>,
}
