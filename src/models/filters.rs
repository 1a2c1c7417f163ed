//! Filter and sort state matching the frontend store shape.

use serde::{Deserialize, Deserializer, Serialize};

use super::Role;

/// Active filter predicates for the employee list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFilters {
    /// `None` (serialized as an empty string) matches every role
    #[serde(
        default,
        serialize_with = "serialize_role_filter",
        deserialize_with = "deserialize_role_filter"
    )]
    pub role: Option<Role>,
    /// There is no "any" state: records must match this flag exactly.
    #[serde(default)]
    pub is_archive: bool,
    /// Calendar month, 1-12
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday_month: Option<u32>,
}

impl EmployeeFilters {
    pub fn new(role: Option<Role>, is_archive: bool, birthday_month: Option<u32>) -> Self {
        Self {
            role,
            is_archive,
            birthday_month,
        }
    }
}

fn serialize_role_filter<S>(role: &Option<Role>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(role.map(|r| r.as_str()).unwrap_or(""))
}

fn deserialize_role_filter<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(label) => Role::from_label(label)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown role: {}", label))),
    }
}

/// Field the list can be ordered by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortCriteria {
    Name,
    Birthday,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Current ordering applied to the derived view.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub sort_criteria: Option<SortCriteria>,
    pub sort_direction: SortDirection,
}

/// Request body for `POST /api/sort`.
#[derive(Debug, Clone, Deserialize)]
pub struct SortRequest {
    pub criteria: SortCriteria,
}
