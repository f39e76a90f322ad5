//! Field checks for create and update, in their fixed order.
//!
//! The first failing check determines the reported error, so the order of the
//! statements below is part of the registry's contract.

use provreg_core::{InvalidField, RegistryError, RegistryResult, Timestamp};

use crate::product::{ContentHash, Currency, NewProduct, ProductType, ValidatedProduct};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_ORIGIN_LEN: usize = 100;
pub const MAX_BATCH_ID_LEN: usize = 50;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_CATEGORY_LEN: usize = 50;
pub const MAX_LOCATION_LEN: usize = 100;
pub const MAX_DIMENSIONS_LEN: usize = 50;
pub const MAX_MATERIAL_LEN: usize = 100;
pub const MAX_CERTIFICATION_LEN: usize = 100;

fn within(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

fn required(value: &str, max: usize) -> bool {
    !value.is_empty() && within(value, max)
}

fn check(ok: bool, field: InvalidField) -> RegistryResult<()> {
    if ok {
        Ok(())
    } else {
        Err(RegistryError::invalid(field))
    }
}

/// Run the per-field create checks (name through certification).
///
/// Capacity, authorization and uniqueness need registry state and are checked by
/// the registry around this call.
pub(crate) fn validate_new_product(
    input: &NewProduct,
    now: Timestamp,
) -> RegistryResult<ValidatedProduct> {
    check(required(&input.name, MAX_NAME_LEN), InvalidField::ProductName)?;
    let hash = ContentHash::try_from(input.hash.as_slice())?;
    check(input.max_quantity > 0, InvalidField::MaxQuantity)?;
    check(required(&input.origin, MAX_ORIGIN_LEN), InvalidField::Origin)?;
    check(required(&input.batch_id, MAX_BATCH_ID_LEN), InvalidField::BatchId)?;
    check(within(&input.description, MAX_DESCRIPTION_LEN), InvalidField::Description)?;
    let product_type = input.product_type.parse::<ProductType>()?;
    check(required(&input.category, MAX_CATEGORY_LEN), InvalidField::Category)?;
    check(required(&input.location, MAX_LOCATION_LEN), InvalidField::Location)?;
    let currency = input.currency.parse::<Currency>()?;
    check(input.min_quantity > 0, InvalidField::MinQuantity)?;
    check(input.expiry > now, InvalidField::Expiry)?;
    check(input.weight > 0, InvalidField::Weight)?;
    check(within(&input.dimensions, MAX_DIMENSIONS_LEN), InvalidField::Dimensions)?;
    check(within(&input.material, MAX_MATERIAL_LEN), InvalidField::Material)?;
    check(
        within(&input.certification, MAX_CERTIFICATION_LEN),
        InvalidField::Certification,
    )?;

    Ok(ValidatedProduct {
        name: input.name.clone(),
        hash,
        max_quantity: input.max_quantity,
        origin: input.origin.clone(),
        batch_id: input.batch_id.clone(),
        description: input.description.clone(),
        product_type,
        category: input.category.clone(),
        location: input.location.clone(),
        currency,
        min_quantity: input.min_quantity,
        expiry: input.expiry,
        weight: input.weight,
        dimensions: input.dimensions.clone(),
        material: input.material.clone(),
        certification: input.certification.clone(),
    })
}

/// Check the three mutable fields of an update. Every failure is `InvalidUpdateParam`.
pub(crate) fn validate_update(name: &str, max_quantity: u64, description: &str) -> RegistryResult<()> {
    if !required(name, MAX_NAME_LEN)
        || max_quantity == 0
        || !within(description, MAX_DESCRIPTION_LEN)
    {
        return Err(RegistryError::InvalidUpdateParam);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> NewProduct {
        NewProduct {
            name: "WidgetA".to_string(),
            hash: vec![1; 32],
            max_quantity: 1000,
            origin: "FactoryX".to_string(),
            batch_id: "Batch001".to_string(),
            description: "High quality widget".to_string(),
            product_type: "electronics".to_string(),
            category: "gadgets".to_string(),
            location: "CityZ".to_string(),
            currency: "STX".to_string(),
            min_quantity: 100,
            expiry: 100_000,
            weight: 500,
            dimensions: "10x10x10".to_string(),
            material: "Plastic".to_string(),
            certification: "ISO9001".to_string(),
        }
    }

    fn field_error(input: &NewProduct) -> InvalidField {
        match validate_new_product(input, 0) {
            Err(RegistryError::InvalidField(field)) => field,
            other => panic!("expected field error, got {other:?}"),
        }
    }

    #[test]
    fn valid_input_is_parsed() {
        let validated = validate_new_product(&valid(), 0).unwrap();
        assert_eq!(validated.product_type, ProductType::Electronics);
        assert_eq!(validated.currency, Currency::Stx);
        assert_eq!(validated.hash, ContentHash::new([1; 32]));
    }

    #[test]
    fn required_strings_reject_empty_and_overlong() {
        let mut input = valid();
        input.origin = String::new();
        assert_eq!(field_error(&input), InvalidField::Origin);

        let mut input = valid();
        input.batch_id = "b".repeat(MAX_BATCH_ID_LEN + 1);
        assert_eq!(field_error(&input), InvalidField::BatchId);

        let mut input = valid();
        input.category = String::new();
        assert_eq!(field_error(&input), InvalidField::Category);

        let mut input = valid();
        input.location = "l".repeat(MAX_LOCATION_LEN + 1);
        assert_eq!(field_error(&input), InvalidField::Location);
    }

    #[test]
    fn length_limits_are_inclusive() {
        let mut input = valid();
        input.name = "n".repeat(MAX_NAME_LEN);
        input.description = "d".repeat(MAX_DESCRIPTION_LEN);
        input.dimensions = "x".repeat(MAX_DIMENSIONS_LEN);
        input.material = "m".repeat(MAX_MATERIAL_LEN);
        input.certification = "c".repeat(MAX_CERTIFICATION_LEN);
        assert!(validate_new_product(&input, 0).is_ok());

        input.name.push('n');
        assert_eq!(field_error(&input), InvalidField::ProductName);
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let mut input = valid();
        input.name = "é".repeat(MAX_NAME_LEN);
        assert!(validate_new_product(&input, 0).is_ok());
    }

    #[test]
    fn optional_strings_may_be_empty() {
        let mut input = valid();
        input.description = String::new();
        input.dimensions = String::new();
        input.material = String::new();
        input.certification = String::new();
        assert!(validate_new_product(&input, 0).is_ok());
    }

    #[test]
    fn optional_strings_are_still_bounded() {
        let mut input = valid();
        input.description = "d".repeat(MAX_DESCRIPTION_LEN + 1);
        assert_eq!(field_error(&input), InvalidField::Description);

        let mut input = valid();
        input.dimensions = "x".repeat(MAX_DIMENSIONS_LEN + 1);
        assert_eq!(field_error(&input), InvalidField::Dimensions);

        let mut input = valid();
        input.material = "m".repeat(MAX_MATERIAL_LEN + 1);
        assert_eq!(field_error(&input), InvalidField::Material);

        let mut input = valid();
        input.certification = "c".repeat(MAX_CERTIFICATION_LEN + 1);
        assert_eq!(field_error(&input), InvalidField::Certification);
    }

    #[test]
    fn zero_quantities_and_weight_are_rejected() {
        let mut input = valid();
        input.max_quantity = 0;
        assert_eq!(field_error(&input), InvalidField::MaxQuantity);

        let mut input = valid();
        input.min_quantity = 0;
        assert_eq!(field_error(&input), InvalidField::MinQuantity);

        let mut input = valid();
        input.weight = 0;
        assert_eq!(field_error(&input), InvalidField::Weight);
    }

    #[test]
    fn min_quantity_may_exceed_max_quantity() {
        let mut input = valid();
        input.min_quantity = 5_000;
        input.max_quantity = 1;
        assert!(validate_new_product(&input, 0).is_ok());
    }

    #[test]
    fn expiry_must_be_strictly_in_the_future() {
        let input = valid();
        assert_eq!(
            validate_new_product(&input, input.expiry),
            Err(RegistryError::invalid(InvalidField::Expiry))
        );
        assert!(validate_new_product(&input, input.expiry - 1).is_ok());
    }

    #[test]
    fn enum_fields_reject_unknown_values() {
        let mut input = valid();
        input.product_type = "invalid".to_string();
        assert_eq!(field_error(&input), InvalidField::ProductType);

        let mut input = valid();
        input.currency = "EUR".to_string();
        assert_eq!(field_error(&input), InvalidField::Currency);
    }

    #[test]
    fn earliest_failing_check_wins() {
        let mut input = valid();
        input.certification = "c".repeat(MAX_CERTIFICATION_LEN + 1);
        input.currency = "EUR".to_string();
        input.hash = vec![0; 5];
        assert_eq!(field_error(&input), InvalidField::Hash);

        input.name = String::new();
        assert_eq!(field_error(&input), InvalidField::ProductName);
    }

    #[test]
    fn update_params_are_checked() {
        assert!(validate_update("NewWidget", 1, "").is_ok());
        assert_eq!(validate_update("", 1, ""), Err(RegistryError::InvalidUpdateParam));
        assert_eq!(
            validate_update(&"n".repeat(MAX_NAME_LEN + 1), 1, ""),
            Err(RegistryError::InvalidUpdateParam)
        );
        assert_eq!(validate_update("ok", 0, ""), Err(RegistryError::InvalidUpdateParam));
        assert_eq!(
            validate_update("ok", 1, &"d".repeat(MAX_DESCRIPTION_LEN + 1)),
            Err(RegistryError::InvalidUpdateParam)
        );
    }
}
