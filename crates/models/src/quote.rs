use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::service_order::{Device, OrderItem};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuoteStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub customer_id: String,
    #[serde(default)]
    pub device: Device,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub labor_cost: f64,
    #[serde(default)]
    pub valid_days: Option<u32>,
    #[serde(default)]
    pub status: QuoteStatus,
    /// Set once the quote has been turned into a service order.
    #[serde(default)]
    pub service_order_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
