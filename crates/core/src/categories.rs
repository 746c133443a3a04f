//! Asset category validation.
//!
//! Pure functions applied to category input before it reaches the repository
//! layer. The category prefix is the namespace of every asset identifier the
//! allocator hands out, so it is normalized once here and never changed.

use crate::error::CoreError;

/// Required length of a category prefix.
pub const PREFIX_LEN: usize = 2;

/// Watermark assigned to a new category when none is given.
pub const DEFAULT_NEXT_SEQUENCE: i32 = 1;

/// Trim and uppercase a prefix, then check it is exactly two `[A-Z0-9]`
/// characters.
///
/// # Examples
///
/// ```
/// use assetdesk_core::categories::normalize_prefix;
///
/// assert_eq!(normalize_prefix(" nb ").unwrap(), "NB");
/// assert!(normalize_prefix("N").is_err());
/// ```
pub fn normalize_prefix(raw: &str) -> Result<String, CoreError> {
    let prefix = raw.trim().to_uppercase();
    if !is_valid_prefix(&prefix) {
        return Err(CoreError::Validation(format!(
            "Category prefix must be exactly {PREFIX_LEN} characters of A-Z or 0-9, got '{}'",
            raw.trim()
        )));
    }
    Ok(prefix)
}

/// Whether `prefix` is already in normalized form.
pub fn is_valid_prefix(prefix: &str) -> bool {
    prefix.len() == PREFIX_LEN
        && prefix
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Trim a category name and reject it when empty.
pub fn normalize_name(raw: &str) -> Result<String, CoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Category name must not be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}

/// Resolve the starting watermark for a new category.
pub fn validate_next_sequence(next_sequence: Option<i32>) -> Result<i32, CoreError> {
    let value = next_sequence.unwrap_or(DEFAULT_NEXT_SEQUENCE);
    if value < 1 {
        return Err(CoreError::Validation(format!(
            "next_sequence must be >= 1, got {value}"
        )));
    }
    Ok(value)
}

/// Trim an optional description, mapping blank input to `None`.
pub fn normalize_description(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
