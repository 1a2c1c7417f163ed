//! Employee model matching the frontend Employee interface.

use serde::{Deserialize, Serialize};

/// Position an employee holds. Serialized with the labels the frontend displays.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "Повар")]
    Cook,
    #[serde(rename = "Официант")]
    Waiter,
    #[serde(rename = "Водитель")]
    Driver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Cook => "Повар",
            Role::Waiter => "Официант",
            Role::Driver => "Водитель",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Повар" => Some(Role::Cook),
            "Официант" => Some(Role::Waiter),
            "Водитель" => Some(Role::Driver),
            _ => None,
        }
    }
}

/// A directory entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub phone: String,
    /// `YYYY-MM-DD` or `DD.MM.YYYY`
    pub birthday: String,
    pub role: Role,
    pub is_archive: bool,
}

/// Request body for creating a new employee. The id is assigned by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub birthday: String,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default)]
    pub is_archive: bool,
}

/// Request body for replacing an existing employee.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    pub name: String,
    pub phone: String,
    pub birthday: String,
    pub role: Role,
    pub is_archive: bool,
}

fn default_role() -> Role {
    Role::Waiter
}

impl CreateEmployeeRequest {
    pub fn into_employee(self, id: i64) -> Employee {
        Employee {
            id,
            name: self.name,
            phone: format_phone(&self.phone),
            birthday: self.birthday,
            role: self.role,
            is_archive: self.is_archive,
        }
    }
}

impl UpdateEmployeeRequest {
    pub fn into_employee(self, id: i64) -> Employee {
        Employee {
            id,
            name: self.name,
            phone: format_phone(&self.phone),
            birthday: self.birthday,
            role: self.role,
            is_archive: self.is_archive,
        }
    }
}

/// Render a phone number as `+7 (XXX) XXX-XX-XX`.
///
/// Only digits are taken from the input and the leading country digit is
/// replaced by `+7`. Partial input produces a partial mask.
pub fn format_phone(raw: &str) -> String {
    let digits: Vec<char> = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let slice = |from: usize, to: usize| -> String {
        digits[from.min(digits.len())..to.min(digits.len())]
            .iter()
            .collect()
    };

    let mut formatted = String::from("+7");
    if digits.len() > 1 {
        formatted.push_str(&format!(" ({})", slice(1, 4)));
    }
    if digits.len() > 4 {
        formatted.push_str(&format!(" {}", slice(4, 7)));
    }
    if digits.len() > 7 {
        formatted.push_str(&format!("-{}", slice(7, 9)));
    }
    if digits.len() > 9 {
        formatted.push_str(&format!("-{}", slice(9, 11)));
    }
    formatted
}
