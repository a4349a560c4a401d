use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitComponent {
    pub stock_item_id: String,
    pub quantity: u32,
}

/// A named bundle of stock items sold or consumed together.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub components: Vec<KitComponent>,
    #[serde(default)]
    pub price: f64,
}
