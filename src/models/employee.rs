use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Manager,
    Operator,
    Helper,
    Mixture,
    Driver,
    /// Any role name the dashboard has no page for. Empty when the server sent none.
    #[default]
    Unassigned,
    Other(String),
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "manager" => Role::Manager,
            "operator" => Role::Operator,
            "helper" => Role::Helper,
            "mixture" => Role::Mixture,
            "driver" => Role::Driver,
            "" => Role::Unassigned,
            _ => Role::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Manager => "Manager",
            Role::Operator => "Operator",
            Role::Helper => "Helper",
            Role::Mixture => "Mixture",
            Role::Driver => "Driver",
            Role::Unassigned => "",
            Role::Other(name) => name,
        }
    }

    /// Page a session with this role lands on after login.
    pub fn landing_route(&self) -> &'static str {
        match self {
            Role::Manager => "/manager",
            Role::Operator => "/operator",
            Role::Helper => "/helper",
            Role::Mixture => "/mixture",
            _ => "/",
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Role::parse(&raw)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The logged-in staff member as returned by `/staff/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "_id", default, deserialize_with = "super::null_default")]
    pub id: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub role: Role,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub eid: Option<String>,
    #[serde(rename = "adharImageUrl", default)]
    pub photo_url: Option<String>,
}

/// Entry of the staff listings (`/api/get-staffs/{role}`, `/staff/get-employees`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "fullName", default, deserialize_with = "super::null_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub mobile: String,
    pub password: String,
}

// Template-friendly header for the landing pages
#[derive(Debug)]
pub struct EmployeeDisplay {
    pub name: String,
    pub role: String,
    pub eid: String,
    pub photo_url: String,
}

const PLACEHOLDER_PHOTO: &str = "https://via.placeholder.com/150";

impl From<&Employee> for EmployeeDisplay {
    fn from(employee: &Employee) -> Self {
        Self {
            name: employee.name.clone(),
            role: employee.role.to_string(),
            eid: employee.eid.clone().unwrap_or_default(),
            photo_url: employee
                .photo_url
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_PHOTO.to_string()),
        }
    }
}
