//! Product records, their attribute types and the most-recent-update audit record.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use provreg_core::{Entity, InvalidField, Principal, ProductId, RegistryError, Timestamp, ValueObject};

/// Length of a product content fingerprint, in bytes.
pub const HASH_LEN: usize = 32;

/// Content fingerprint of a product (exactly 32 raw bytes).
///
/// The hash index is keyed by these bytes directly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash([u8; HASH_LEN]);

impl ContentHash {
    pub const fn new(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }
}

impl ValueObject for ContentHash {}

impl TryFrom<&[u8]> for ContentHash {
    type Error = RegistryError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        <[u8; HASH_LEN]>::try_from(value)
            .map(Self)
            .map_err(|_| RegistryError::invalid(InvalidField::Hash))
    }
}

impl core::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Product classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Electronics,
    Food,
    Clothing,
    Machinery,
}

impl ProductType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductType::Electronics => "electronics",
            ProductType::Food => "food",
            ProductType::Clothing => "clothing",
            ProductType::Machinery => "machinery",
        }
    }
}

impl FromStr for ProductType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "electronics" => Ok(ProductType::Electronics),
            "food" => Ok(ProductType::Food),
            "clothing" => Ok(ProductType::Clothing),
            "machinery" => Ok(ProductType::Machinery),
            _ => Err(RegistryError::invalid(InvalidField::ProductType)),
        }
    }
}

impl core::fmt::Display for ProductType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Currency a product is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Stx,
    Usd,
    Btc,
}

impl Currency {
    pub fn as_str(self) -> &'static str {
        match self {
            Currency::Stx => "STX",
            Currency::Usd => "USD",
            Currency::Btc => "BTC",
        }
    }
}

impl FromStr for Currency {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STX" => Ok(Currency::Stx),
            "USD" => Ok(Currency::Usd),
            "BTC" => Ok(Currency::Btc),
            _ => Err(RegistryError::invalid(InvalidField::Currency)),
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied attributes of a product to create.
///
/// `product_type`, `currency` and `hash` arrive unparsed; validation turns them
/// into their typed forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub hash: Vec<u8>,
    pub max_quantity: u64,
    pub origin: String,
    pub batch_id: String,
    pub description: String,
    pub product_type: String,
    pub category: String,
    pub location: String,
    pub currency: String,
    pub min_quantity: u64,
    pub expiry: Timestamp,
    pub weight: u64,
    pub dimensions: String,
    pub material: String,
    pub certification: String,
}

/// A registered product.
///
/// `creator` is fixed at creation. Only `name`, `max_quantity`, `description`
/// and `timestamp` change afterwards, through an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    hash: ContentHash,
    max_quantity: u64,
    origin: String,
    batch_id: String,
    description: String,
    product_type: ProductType,
    category: String,
    location: String,
    currency: Currency,
    min_quantity: u64,
    expiry: Timestamp,
    weight: u64,
    dimensions: String,
    material: String,
    certification: String,
    timestamp: Timestamp,
    creator: Principal,
    status: bool,
}

impl Product {
    pub(crate) fn from_validated(
        id: ProductId,
        input: ValidatedProduct,
        creator: Principal,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            name: input.name,
            hash: input.hash,
            max_quantity: input.max_quantity,
            origin: input.origin,
            batch_id: input.batch_id,
            description: input.description,
            product_type: input.product_type,
            category: input.category,
            location: input.location,
            currency: input.currency,
            min_quantity: input.min_quantity,
            expiry: input.expiry,
            weight: input.weight,
            dimensions: input.dimensions,
            material: input.material,
            certification: input.certification,
            timestamp,
            creator,
            status: true,
        }
    }

    pub(crate) fn apply_update(&mut self, update: &ProductUpdate) {
        self.name = update.update_name.clone();
        self.max_quantity = update.update_max_quantity;
        self.description = update.update_description.clone();
        self.timestamp = update.update_timestamp;
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }

    pub fn max_quantity(&self) -> u64 {
        self.max_quantity
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn product_type(&self) -> ProductType {
        self.product_type
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn min_quantity(&self) -> u64 {
        self.min_quantity
    }

    pub fn expiry(&self) -> Timestamp {
        self.expiry
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    pub fn dimensions(&self) -> &str {
        &self.dimensions
    }

    pub fn material(&self) -> &str {
        &self.material
    }

    pub fn certification(&self) -> &str {
        &self.certification
    }

    /// Creation time, or the time of the most recent update.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn creator(&self) -> &Principal {
        &self.creator
    }

    /// Active flag. Always `true` today; no operation deactivates a product yet.
    pub fn status(&self) -> bool {
        self.status
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Most recent edit applied to a product. Replaced wholesale by every update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub update_name: String,
    pub update_max_quantity: u64,
    pub update_description: String,
    pub update_timestamp: Timestamp,
    pub updater: Principal,
}

/// Create input after the field checks have passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidatedProduct {
    pub name: String,
    pub hash: ContentHash,
    pub max_quantity: u64,
    pub origin: String,
    pub batch_id: String,
    pub description: String,
    pub product_type: ProductType,
    pub category: String,
    pub location: String,
    pub currency: Currency,
    pub min_quantity: u64,
    pub expiry: Timestamp,
    pub weight: u64,
    pub dimensions: String,
    pub material: String,
    pub certification: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_hash_requires_exactly_32_bytes() {
        assert!(ContentHash::try_from([1u8; 32].as_slice()).is_ok());
        assert_eq!(
            ContentHash::try_from([1u8; 31].as_slice()),
            Err(RegistryError::invalid(InvalidField::Hash))
        );
        assert_eq!(
            ContentHash::try_from([1u8; 33].as_slice()),
            Err(RegistryError::invalid(InvalidField::Hash))
        );
    }

    #[test]
    fn content_hash_displays_as_hex() {
        let hash = ContentHash::new([0xab; 32]);
        assert_eq!(hash.to_string(), "ab".repeat(32));
    }

    #[test]
    fn product_type_parses_only_known_lowercase_names() {
        assert_eq!("food".parse::<ProductType>(), Ok(ProductType::Food));
        assert_eq!("machinery".parse::<ProductType>(), Ok(ProductType::Machinery));
        assert!("Food".parse::<ProductType>().is_err());
        assert!("invalid".parse::<ProductType>().is_err());
    }

    #[test]
    fn currency_parses_only_known_codes() {
        assert_eq!("STX".parse::<Currency>(), Ok(Currency::Stx));
        assert_eq!("BTC".parse::<Currency>(), Ok(Currency::Btc));
        assert_eq!(
            "EUR".parse::<Currency>(),
            Err(RegistryError::invalid(InvalidField::Currency))
        );
    }

    #[test]
    fn enums_serialize_with_wire_names() {
        assert_eq!(serde_json::to_string(&ProductType::Clothing).unwrap(), "\"clothing\"");
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), "\"USD\"");
    }
}
