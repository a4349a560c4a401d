use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    #[default]
    Received,
    Diagnosing,
    AwaitingApproval,
    InRepair,
    Ready,
    Delivered,
    Cancelled,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Device {
    pub kind: String,
    pub brand: String,
    pub model: String,
    pub serial_number: Option<String>,
    pub accessories: Vec<String>,
}

/// A part or service line charged on an order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub stock_item_id: Option<String>,
    pub description: String,
    #[serde(default = "one")]
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: f64,
}

fn one() -> u32 { 1 }

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: String,
    pub customer_id: String,
    #[serde(default)]
    pub device: Device,
    #[serde(default)]
    pub reported_issue: String,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub labor_cost: f64,
    #[serde(default)]
    pub warranty_days: Option<u32>,
    #[serde(default)]
    pub technician_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
}

impl ServiceOrder {
    pub fn total(&self) -> f64 {
        self.labor_cost
            + self
                .items
                .iter()
                .map(|i| i.unit_price * f64::from(i.quantity))
                .sum::<f64>()
    }
}
