use serde::{Deserialize, Serialize};

use crate::customer::Address;

/// Singleton: header data printed on orders and receipts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInfo {
    pub name: String,
    pub document: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
    pub pix_key: Option<String>,
    pub logo_url: Option<String>,
}
