use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Pix,
    CreditCard,
    DebitCard,
    BankTransfer,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub stock_item_id: String,
    #[serde(default)]
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub items: Vec<SaleItem>,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Sale {
    pub fn total(&self) -> f64 {
        let gross: f64 = self.items.iter().map(|i| i.unit_price * f64::from(i.quantity)).sum();
        (gross - self.discount).max(0.0)
    }
}
