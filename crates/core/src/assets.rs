//! Asset field validation.
//!
//! Checks applied by the handler layer before an asset reaches the store.
//! The identifier is never validated here: callers cannot supply one.

use crate::error::CoreError;
use crate::status::validate_status;

/// Reject a blank asset name.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Asset name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Reject a negative or non-finite purchase price.
pub fn validate_purchase_price(price: f64) -> Result<(), CoreError> {
    if !price.is_finite() || price < 0.0 {
        return Err(CoreError::Validation(format!(
            "Purchase price must be a non-negative number, got {price}"
        )));
    }
    Ok(())
}

/// Validate the optional fields shared by the create and update payloads.
pub fn validate_asset_fields(
    name: Option<&str>,
    status: Option<&str>,
    purchase_price: Option<f64>,
) -> Result<(), CoreError> {
    if let Some(name) = name {
        validate_name(name)?;
    }
    if let Some(status) = status {
        validate_status(status)?;
    }
    if let Some(price) = purchase_price {
        validate_purchase_price(price)?;
    }
    Ok(())
}
