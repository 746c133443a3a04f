//! Maintenance work order rules.
//!
//! Opening a work order puts the asset into `maintenance`. Completing the
//! last open order for an asset returns it to `active`; while any other
//! order is still open the asset stays in maintenance.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;
use crate::status::{STATUS_ACTIVE, STATUS_INACTIVE, STATUS_MAINTENANCE};

pub const MAINTENANCE_PREVENTIVE: &str = "preventive";
pub const MAINTENANCE_CORRECTIVE: &str = "corrective";
pub const MAINTENANCE_INSPECTION: &str = "inspection";

/// Every maintenance type. Must match `ck_maintenance_records_type`.
pub const MAINTENANCE_TYPES: [&str; 3] = [
    MAINTENANCE_PREVENTIVE,
    MAINTENANCE_CORRECTIVE,
    MAINTENANCE_INSPECTION,
];

/// Asset statuses from which a work order may be opened.
pub const MAINTAINABLE_STATUSES: [&str; 3] = [STATUS_ACTIVE, STATUS_INACTIVE, STATUS_MAINTENANCE];

pub fn validate_maintenance_type(kind: &str) -> Result<(), CoreError> {
    if MAINTENANCE_TYPES.contains(&kind) {
        return Ok(());
    }
    Err(CoreError::Validation(format!(
        "Invalid maintenance type '{kind}'. Must be one of: {}",
        MAINTENANCE_TYPES.join(", ")
    )))
}

pub fn validate_cost(cost: f64) -> Result<(), CoreError> {
    if !cost.is_finite() || cost < 0.0 {
        return Err(CoreError::Validation(format!(
            "Maintenance cost must be a non-negative number, got {cost}"
        )));
    }
    Ok(())
}

/// Borrowed assets must come back first; retired, lost and stolen assets
/// are out of service.
pub fn ensure_maintainable(asset_status: &str) -> Result<(), CoreError> {
    if MAINTAINABLE_STATUSES.contains(&asset_status) {
        return Ok(());
    }
    Err(CoreError::Conflict(format!(
        "Asset is {asset_status} and cannot enter maintenance"
    )))
}

/// Check a completion request against the order's current state.
pub fn validate_completion(
    maintenance_date: NaiveDate,
    already_completed: Option<NaiveDate>,
    complete_date: NaiveDate,
) -> Result<(), CoreError> {
    if let Some(done) = already_completed {
        return Err(CoreError::Conflict(format!(
            "Maintenance record was already completed on {done}"
        )));
    }
    if complete_date < maintenance_date {
        return Err(CoreError::Validation(format!(
            "complete_date {complete_date} is before maintenance date {maintenance_date}"
        )));
    }
    Ok(())
}

/// Asset status once a work order closes, given how many others remain open.
pub fn status_after_completion(remaining_open: i64) -> &'static str {
    if remaining_open == 0 {
        STATUS_ACTIVE
    } else {
        STATUS_MAINTENANCE
    }
}

/// Count and cost for one maintenance type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeTotals {
    pub count: i64,
    pub cost: f64,
}

/// Cost summary across maintenance records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenanceStats {
    pub total_cost: f64,
    pub count: i64,
    pub by_type: BTreeMap<String, TypeTotals>,
}

impl MaintenanceStats {
    /// Fold per-type rows into a summary. Every known type is present in
    /// `by_type`, zeroed when it has no records.
    pub fn from_type_totals<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, TypeTotals)>,
    {
        let mut by_type: BTreeMap<String, TypeTotals> = MAINTENANCE_TYPES
            .iter()
            .map(|kind| (kind.to_string(), TypeTotals::default()))
            .collect();
        let mut total_cost = 0.0;
        let mut count = 0;

        for (kind, totals) in rows {
            total_cost += totals.cost;
            count += totals.count;
            let entry = by_type.entry(kind).or_default();
            entry.count += totals.count;
            entry.cost += totals.cost;
        }

        Self {
            total_cost,
            count,
            by_type,
        }
    }
}
