//! Asset lifecycle status values.
//!
//! These must match the `ck_assets_status` check constraint in
//! `20260301000002_create_assets_table.sql`.

use crate::error::CoreError;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_INACTIVE: &str = "inactive";
pub const STATUS_MAINTENANCE: &str = "maintenance";
pub const STATUS_RETIRED: &str = "retired";
pub const STATUS_LOST: &str = "lost";
pub const STATUS_STOLEN: &str = "stolen";
pub const STATUS_BORROWED: &str = "borrowed";

/// Every status an asset may carry.
pub const ASSET_STATUSES: [&str; 7] = [
    STATUS_ACTIVE,
    STATUS_INACTIVE,
    STATUS_MAINTENANCE,
    STATUS_RETIRED,
    STATUS_LOST,
    STATUS_STOLEN,
    STATUS_BORROWED,
];

/// Validate an asset status string against [`ASSET_STATUSES`].
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if ASSET_STATUSES.contains(&status) {
        return Ok(());
    }
    Err(CoreError::Validation(format!(
        "Invalid asset status '{status}'. Must be one of: {}",
        ASSET_STATUSES.join(", ")
    )))
}

/// Statuses owned by the borrow and maintenance workflows.
pub const WORKFLOW_STATUSES: [&str; 2] = [STATUS_BORROWED, STATUS_MAINTENANCE];

/// Check a status set directly on an asset (create or edit) rather than
/// through a borrow or maintenance record.
///
/// `current` is `None` for a new asset. Keeping the current status is
/// always allowed.
pub fn ensure_direct_status_change(current: Option<&str>, new: &str) -> Result<(), CoreError> {
    if current == Some(new) {
        return Ok(());
    }
    if WORKFLOW_STATUSES.contains(&new) {
        return Err(CoreError::Validation(format!(
            "Status '{new}' is set by the borrow and maintenance workflows"
        )));
    }
    if let Some(current) = current.filter(|c| WORKFLOW_STATUSES.contains(c)) {
        return Err(CoreError::Conflict(format!(
            "Asset is {current}; close its open record before changing status"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn all_known_statuses_accepted() {
        for status in ASSET_STATUSES {
            assert!(validate_status(status).is_ok(), "{status} should be valid");
        }
    }

    #[test]
    fn unknown_status_rejected() {
        let err = validate_status("scrapped").unwrap_err();
        assert!(err.to_string().contains("scrapped"));
    }

    #[test]
    fn status_is_case_sensitive() {
        assert!(validate_status("Active").is_err());
    }

    #[test]
    fn workflow_statuses_cannot_be_set_directly() {
        assert_matches!(
            ensure_direct_status_change(None, STATUS_BORROWED),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            ensure_direct_status_change(Some(STATUS_ACTIVE), STATUS_MAINTENANCE),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn workflow_statuses_cannot_be_left_directly() {
        assert_matches!(
            ensure_direct_status_change(Some(STATUS_BORROWED), STATUS_ACTIVE),
            Err(CoreError::Conflict(msg)) if msg.contains("borrowed")
        );
    }

    #[test]
    fn ordinary_changes_allowed() {
        assert!(ensure_direct_status_change(None, STATUS_ACTIVE).is_ok());
        assert!(ensure_direct_status_change(Some(STATUS_ACTIVE), STATUS_RETIRED).is_ok());
        assert!(ensure_direct_status_change(Some(STATUS_MAINTENANCE), STATUS_MAINTENANCE).is_ok());
    }
}
