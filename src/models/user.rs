use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// MSME size band derived from turnover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SizeCategory {
    #[default]
    #[serde(alias = "micro")]
    Micro,
    #[serde(alias = "small")]
    Small,
    #[serde(alias = "medium")]
    Medium,
}

impl SizeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            SizeCategory::Micro => "Micro",
            SizeCategory::Small => "Small",
            SizeCategory::Medium => "Medium",
        }
    }
}

impl FromStr for SizeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "micro" => Ok(SizeCategory::Micro),
            "small" => Ok(SizeCategory::Small),
            "medium" => Ok(SizeCategory::Medium),
            _ => Err(format!("unknown size category '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    // Stored and compared as given.
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub business_name: String,
    /// Free-form label such as "Pharmacy" or "retail".
    #[serde(rename = "type", default)]
    pub business_type: String,
    #[serde(default = "default_sector")]
    pub sector: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(rename = "size", default)]
    pub size_category: SizeCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

pub fn default_sector() -> String {
    "General".to_string()
}

pub fn default_location() -> String {
    "India".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub business_name: String,
    #[serde(rename = "type")]
    pub business_type: String,
    pub sector: String,
    pub location: String,
    #[serde(rename = "size")]
    pub size_category: SizeCategory,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            business_name: user.business_name,
            business_type: user.business_type,
            sector: user.sector,
            location: user.location,
            size_category: user.size_category,
        }
    }
}
