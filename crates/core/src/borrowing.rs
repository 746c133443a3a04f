//! Borrow/return lifecycle rules.
//!
//! A borrow record moves through:
//!
//! ```text
//! pending --approve--> borrowed --return--> returned
//!    |                    |                    ^
//!    +--reject--> rejected +--overdue--> overdue -+
//! ```
//!
//! The asset follows along: it must be `active` to be borrowed, becomes
//! `borrowed` once a record reaches `borrowed`, and goes back to `active`
//! on return. Statuses must match `ck_borrow_records_status` in
//! `20260301000003_create_borrow_records_table.sql`.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::status::STATUS_ACTIVE;

pub const BORROW_PENDING: &str = "pending";
pub const BORROW_BORROWED: &str = "borrowed";
pub const BORROW_RETURNED: &str = "returned";
pub const BORROW_OVERDUE: &str = "overdue";
pub const BORROW_REJECTED: &str = "rejected";

/// Every status a borrow record may carry.
pub const BORROW_STATUSES: [&str; 5] = [
    BORROW_PENDING,
    BORROW_BORROWED,
    BORROW_RETURNED,
    BORROW_OVERDUE,
    BORROW_REJECTED,
];

/// Validate a borrow status string against [`BORROW_STATUSES`].
pub fn validate_borrow_status(status: &str) -> Result<(), CoreError> {
    if BORROW_STATUSES.contains(&status) {
        return Ok(());
    }
    Err(CoreError::Validation(format!(
        "Invalid borrow status '{status}'. Must be one of: {}",
        BORROW_STATUSES.join(", ")
    )))
}

/// Only an `active` asset can be lent out.
pub fn ensure_borrowable(asset_status: &str) -> Result<(), CoreError> {
    if asset_status == STATUS_ACTIVE {
        return Ok(());
    }
    Err(CoreError::Conflict(format!(
        "Asset is {asset_status} and cannot be borrowed"
    )))
}

/// Status a new borrow record starts in.
///
/// Assets flagged `requires_approval` wait in `pending` for an approver;
/// everything else is handed out immediately.
pub fn initial_borrow_status(requires_approval: bool) -> &'static str {
    if requires_approval {
        BORROW_PENDING
    } else {
        BORROW_BORROWED
    }
}

/// The expected return date may not precede the borrow date.
pub fn validate_return_window(
    borrow_date: NaiveDate,
    expected_return_date: NaiveDate,
) -> Result<(), CoreError> {
    if expected_return_date < borrow_date {
        return Err(CoreError::Validation(format!(
            "expected_return_date {expected_return_date} is before borrow date {borrow_date}"
        )));
    }
    Ok(())
}

/// Check that a record may move from `from` to `to`.
pub fn ensure_borrow_transition(from: &str, to: &str) -> Result<(), CoreError> {
    let allowed = matches!(
        (from, to),
        (BORROW_PENDING, BORROW_BORROWED)
            | (BORROW_PENDING, BORROW_REJECTED)
            | (BORROW_BORROWED, BORROW_RETURNED)
            | (BORROW_BORROWED, BORROW_OVERDUE)
            | (BORROW_OVERDUE, BORROW_RETURNED)
    );
    if allowed {
        return Ok(());
    }
    Err(CoreError::Conflict(format!(
        "Borrow record cannot move from {from} to {to}"
    )))
}

/// A lent-out record is overdue once `today` is past its expected return.
pub fn is_overdue(status: &str, expected_return_date: NaiveDate, today: NaiveDate) -> bool {
    status == BORROW_BORROWED && expected_return_date < today
}
