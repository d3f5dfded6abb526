use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend category/status labels arrive either as a bare string or as a
/// nested `{ "name": ... }` object depending on the endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LabelRef {
    Named { name: String },
    Plain(String),
}

impl LabelRef {
    pub fn label(&self) -> &str {
        match self {
            LabelRef::Named { name } => name,
            LabelRef::Plain(s) => s,
        }
    }
}

/// Transaction record as the backend serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendTransaction {
    pub id: String,
    #[serde(default, rename = "type", alias = "category")]
    pub kind: Option<LabelRef>,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<LabelRef>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Transfer,
    Receive,
    Recharge,
    Exchange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
}

/// Frontend-normalized transaction. Amount is always a non-negative
/// magnitude; direction is carried by `tx_type`.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub id: String,
    pub tx_type: TransactionType,
    pub amount: f64,
    pub description: String,
    pub date: String,
    pub status: TransactionStatus,
    pub from: Option<String>,
    pub to: Option<String>,
}
