use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_PRODUCTS: u64 = 10_000;
pub const DEFAULT_CREATION_FEE: u64 = 500;

/// Initial registry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Capacity ceiling on the number of products ever created.
    pub max_products: u64,
    /// Fee charged per creation, paid to the bound authority.
    pub creation_fee: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_products: DEFAULT_MAX_PRODUCTS,
            creation_fee: DEFAULT_CREATION_FEE,
        }
    }
}

impl RegistryConfig {
    pub fn with_max_products(mut self, max_products: u64) -> Self {
        self.max_products = max_products;
        self
    }

    pub fn with_creation_fee(mut self, creation_fee: u64) -> Self {
        self.creation_fee = creation_fee;
        self
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
