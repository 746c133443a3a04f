//! First-fit sequence computation.
//!
//! Pure functions: given a category and the identifiers already used in it,
//! work out the next identifier and the watermark to persist.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::AllocationError;
use crate::categories::is_valid_prefix;
use crate::types::DbId;

/// Largest suffix that still fits the three-digit identifier format.
pub const MAX_SUFFIX: i32 = 999;

/// Identifiers that take part in gap filling. Anything else is ignored.
static ASSET_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9]{2}-([0-9]{3})$").expect("asset id pattern is valid")
});

/// The view of a category the allocator needs.
///
/// Implemented by the database model so callers can hand their category list
/// straight to the allocator.
pub trait SequencedCategory {
    fn id(&self) -> DbId;
    fn prefix(&self) -> &str;
    fn next_sequence(&self) -> i32;
}

/// Outcome of one allocation computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allocation {
    /// Formatted identifier, e.g. `NB-003`.
    pub asset_id: String,
    /// Numeric suffix of `asset_id`.
    pub number: i32,
    /// Watermark to persist: `max(next_sequence, number + 1)`.
    pub next_sequence: i32,
}

/// Extract the numeric suffix of a well-formed asset identifier.
///
/// ```
/// use assetdesk_core::allocation::sequence::parse_suffix;
///
/// assert_eq!(parse_suffix("AB-004"), Some(4));
/// assert_eq!(parse_suffix("AB-4"), None);
/// ```
pub fn parse_suffix(asset_id: &str) -> Option<i32> {
    ASSET_ID_PATTERN
        .captures(asset_id)
        .and_then(|caps| caps[1].parse().ok())
}

/// Format an identifier from a prefix and number, zero padded to 3 digits.
pub fn format_asset_id(prefix: &str, number: i32) -> String {
    format!("{prefix}-{number:03}")
}

/// Smallest positive integer not present in `used`.
///
/// Scans the sorted, deduplicated numbers from 1 and stops at the first gap.
pub fn first_free_number(mut used: Vec<i32>) -> i32 {
    used.sort_unstable();
    used.dedup();

    let mut candidate = 1;
    for number in used {
        if number == candidate {
            candidate += 1;
        } else if number > candidate {
            break;
        }
    }
    candidate
}

/// Compute the next identifier for `category` given every identifier
/// currently assigned in it.
pub fn plan_allocation<C, S>(category: &C, existing: &[S]) -> Result<Allocation, AllocationError>
where
    C: SequencedCategory + ?Sized,
    S: AsRef<str>,
{
    validate_category(category)?;

    let used: Vec<i32> = existing
        .iter()
        .filter_map(|id| parse_suffix(id.as_ref()))
        .collect();
    let number = first_free_number(used);

    if number > MAX_SUFFIX {
        return Err(AllocationError::CategoryFull {
            prefix: category.prefix().to_string(),
        });
    }

    Ok(Allocation {
        asset_id: format_asset_id(category.prefix(), number),
        number,
        next_sequence: category.next_sequence().max(number + 1),
    })
}

/// Find a category by id in the caller-supplied list.
pub fn find_category<C: SequencedCategory>(
    categories: &[C],
    category_id: DbId,
) -> Result<&C, AllocationError> {
    categories
        .iter()
        .find(|c| c.id() == category_id)
        .ok_or(AllocationError::CategoryNotFound(category_id))
}

fn validate_category<C: SequencedCategory + ?Sized>(category: &C) -> Result<(), AllocationError> {
    if !is_valid_prefix(category.prefix()) {
        return Err(AllocationError::InvalidCategory(format!(
            "category {} has malformed prefix '{}'",
            category.id(),
            category.prefix()
        )));
    }
    if category.next_sequence() < 1 {
        return Err(AllocationError::InvalidCategory(format!(
            "category {} has next_sequence {} (must be >= 1)",
            category.id(),
            category.next_sequence()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[derive(Debug)]
    struct Cat {
        prefix: &'static str,
        next_sequence: i32,
    }

    impl SequencedCategory for Cat {
        fn id(&self) -> DbId {
            1
        }
        fn prefix(&self) -> &str {
            self.prefix
        }
        fn next_sequence(&self) -> i32 {
            self.next_sequence
        }
    }

    fn nb(next_sequence: i32) -> Cat {
        Cat {
            prefix: "NB",
            next_sequence,
        }
    }

    fn ids(numbers: &[i32]) -> Vec<String> {
        numbers.iter().map(|n| format_asset_id("NB", *n)).collect()
    }

    #[test]
    fn first_gap_is_filled() {
        let plan = plan_allocation(&nb(5), &ids(&[1, 2, 4])).unwrap();
        assert_eq!(plan.number, 3);
        assert_eq!(plan.asset_id, "NB-003");
    }

    #[test]
    fn contiguous_run_allocates_next() {
        let plan = plan_allocation(&nb(2), &ids(&[1, 2, 3])).unwrap();
        assert_eq!(plan.number, 4);
        assert_eq!(plan.next_sequence, 5);
    }

    #[test]
    fn watermark_advances_one_past_candidate() {
        let plan = plan_allocation(&nb(4), &ids(&[1, 2, 3])).unwrap();
        assert_eq!(plan.number, 4);
        assert_eq!(plan.next_sequence, 5);
    }

    #[test]
    fn empty_category_starts_at_one() {
        let plan = plan_allocation(&nb(1), &Vec::<String>::new()).unwrap();
        assert_eq!(plan.asset_id, "NB-001");
        assert_eq!(plan.next_sequence, 2);
    }

    #[test]
    fn gap_fill_keeps_higher_watermark() {
        let plan = plan_allocation(&nb(10), &ids(&[1, 2, 4, 5, 6, 7, 8, 9])).unwrap();
        assert_eq!(plan.number, 3);
        assert_eq!(plan.next_sequence, 10);
    }

    #[test]
    fn computation_is_repeatable() {
        let existing = ids(&[1, 3]);
        let first = plan_allocation(&nb(4), &existing).unwrap();
        let second = plan_allocation(&nb(4), &existing).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_ids_are_ignored() {
        let existing = vec!["NB-1", "nb-001", "NB-0001", "LEGACY", "NB-002"];
        let plan = plan_allocation(&nb(1), &existing).unwrap();
        assert_eq!(plan.asset_id, "NB-001");
    }

    #[test]
    fn foreign_prefix_still_counts() {
        // Only the suffix matters once an id is in the category.
        let plan = plan_allocation(&nb(1), &["PC-001"]).unwrap();
        assert_eq!(plan.asset_id, "NB-002");
    }

    #[test]
    fn unicode_digits_do_not_match() {
        assert_eq!(parse_suffix("NB-١٢٣"), None);
    }

    #[test]
    fn suffix_round_trips() {
        assert_eq!(parse_suffix(&format_asset_id("AB", 4)), Some(4));
        assert_eq!(format_asset_id("AB", 4), "AB-004");
        assert_eq!(parse_suffix("Z9-999"), Some(999));
    }

    #[test]
    fn duplicates_do_not_skip_slots() {
        assert_eq!(first_free_number(vec![2, 1, 1, 2]), 3);
        assert_eq!(first_free_number(vec![2, 3]), 1);
        assert_eq!(first_free_number(vec![]), 1);
    }

    #[test]
    fn full_category_rejected() {
        let existing: Vec<String> = (1..=MAX_SUFFIX).map(|n| format_asset_id("NB", n)).collect();
        assert_matches!(
            plan_allocation(&nb(1000), &existing),
            Err(AllocationError::CategoryFull { prefix }) if prefix == "NB"
        );
    }

    #[test]
    fn malformed_prefix_rejected() {
        let cat = Cat {
            prefix: "nb",
            next_sequence: 1,
        };
        assert_matches!(
            plan_allocation(&cat, &Vec::<String>::new()),
            Err(AllocationError::InvalidCategory(_))
        );
    }

    #[test]
    fn zero_watermark_rejected() {
        assert_matches!(
            plan_allocation(&nb(0), &Vec::<String>::new()),
            Err(AllocationError::InvalidCategory(_))
        );
    }

    #[test]
    fn missing_category_reported() {
        let cats = vec![nb(1)];
        assert!(find_category(&cats, 1).is_ok());
        assert_matches!(
            find_category(&cats, 7),
            Err(AllocationError::CategoryNotFound(7))
        );
    }
}
