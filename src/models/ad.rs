use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Community marketing post. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "userId", default)]
    pub owner_id: String,
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub offer: String,
    #[serde(default)]
    pub poster_theme: String,
    #[serde(default = "general")]
    pub offer_basis: String,
    #[serde(default = "general")]
    pub business_type: String,
    pub timestamp: DateTime<Utc>,
}

fn general() -> String {
    "General".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishAd {
    pub user_id: Option<String>,
    pub business_name: Option<String>,
    pub offer: Option<String>,
    pub poster_theme: Option<String>,
    pub offer_basis: Option<String>,
    pub business_type: Option<String>,
}

impl PublishAd {
    /// Fills defaults for the optional labels. `offer` must already be validated.
    pub fn into_ad(self, offer: String, timestamp: DateTime<Utc>) -> Ad {
        Ad {
            id: String::new(),
            owner_id: self.user_id.unwrap_or_default(),
            business_name: non_empty(self.business_name)
                .unwrap_or_else(|| "Unknown Business".to_string()),
            offer,
            poster_theme: self.poster_theme.unwrap_or_default(),
            offer_basis: non_empty(self.offer_basis).unwrap_or_else(general),
            business_type: non_empty(self.business_type).unwrap_or_else(general),
            timestamp,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
