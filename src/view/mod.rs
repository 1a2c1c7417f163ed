//! Derived view builder.
//!
//! Computes the filtered, ordered projection of the canonical employee list.
//! Everything here is a pure function of its inputs.

mod birthday;

pub use birthday::*;

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{Employee, EmployeeFilters, SortCriteria, SortDirection, SortState};

/// Build the projection the client renders.
pub fn build_view(list: &[Employee], filters: &EmployeeFilters, sort: &SortState) -> Vec<Employee> {
    let mut view: Vec<Employee> = list
        .iter()
        .filter(|employee| matches_filters(employee, filters))
        .cloned()
        .collect();

    if let Some(criteria) = sort.sort_criteria {
        view.sort_by(|a, b| compare(a, b, criteria, sort.sort_direction));
    }

    view
}

/// Whether a record passes every active filter.
pub fn matches_filters(employee: &Employee, filters: &EmployeeFilters) -> bool {
    let role_match = filters.role.map_or(true, |role| employee.role == role);
    let status_match = employee.is_archive == filters.is_archive;
    let birthday_match = match filters.birthday_month {
        Some(month) => parse_birthday(&employee.birthday).is_some_and(|date| date.month() == month),
        None => true,
    };

    role_match && status_match && birthday_match
}

/// Compare two records by the given criteria and direction.
pub fn compare(
    a: &Employee,
    b: &Employee,
    criteria: SortCriteria,
    direction: SortDirection,
) -> Ordering {
    let ordering = match criteria {
        SortCriteria::Name => collate(&a.name, &b.name),
        SortCriteria::Birthday => {
            compare_birthdays(parse_birthday(&a.birthday), parse_birthday(&b.birthday))
        }
    };

    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Unparsable dates sort first and tie with each other.
fn compare_birthdays(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(&b),
    }
}

/// Name collation for Latin and Cyrillic names.
///
/// Letters compare case-insensitively with `ё` sorting alongside `е`. Ties
/// are broken by accent (`е` before `ё`), then by case (lowercase first), then
/// by the raw strings so the order stays total.
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| lowercase(a).cmp(&lowercase(b)))
        .then_with(|| swapped_case(a).cmp(&swapped_case(b)))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ё' { 'е' } else { c })
        .collect()
}

fn lowercase(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Uppercase code points sort below lowercase ones, so swapping case puts
/// lowercase first.
fn swapped_case(s: &str) -> String {
    s.chars()
        .flat_map(|c| -> Box<dyn Iterator<Item = char>> {
            if c.is_lowercase() {
                Box::new(c.to_uppercase())
            } else {
                Box::new(c.to_lowercase())
            }
        })
        .collect()
}

/// A view entry with the display fields the list page shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRow {
    #[serde(flatten)]
    pub employee: Employee,
    pub birthday_display: String,
    pub age: u32,
}

impl EmployeeRow {
    pub fn new(employee: Employee, today: NaiveDate) -> Self {
        let birthday_display = format_birthday(&employee.birthday);
        let age = age_on(&employee.birthday, today);
        Self {
            employee,
            birthday_display,
            age,
        }
    }
}
