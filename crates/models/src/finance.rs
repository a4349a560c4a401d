use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sale::PaymentMethod;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialTransaction {
    pub id: String,
    pub kind: TransactionKind,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Set when the transaction was generated from a sale or a service order.
    #[serde(default)]
    pub reference_id: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl FinancialTransaction {
    /// Income positive, expense negative.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

pub fn balance(transactions: &[FinancialTransaction]) -> f64 {
    transactions.iter().map(FinancialTransaction::signed_amount).sum()
}
