use serde::{Deserialize, Serialize};

use crate::domain::Product;

/// Body returned by both the listing and the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPage {
    pub products: Vec<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}
