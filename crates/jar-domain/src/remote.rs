//! Payloads exchanged with the profile/balance backend.
//!
//! Field names follow the backend's camelCase JSON. Each payload maps onto
//! [`CategoryValues`] through a single name-based conversion, so the order in
//! which the backend lists its fields never matters.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::category::{CategoryValues, JarCategory};

/// Response code the backend uses for success.
pub const API_SUCCESS_CODE: i32 = 1000;

/// Standard response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(result: T) -> Self {
        Self {
            code: API_SUCCESS_CODE,
            message: None,
            result: Some(result),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == API_SUCCESS_CODE
    }
}

/// Persisted jar allocation (`GET /profile/jar-division/my`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JarInfo {
    #[serde(default)]
    pub user_id: String,
    pub necessities_percentage: f64,
    pub education_percentage: f64,
    pub entertainment_percentage: f64,
    pub savings_percentage: f64,
    pub investment_percentage: f64,
    pub giving_percentage: f64,
}

impl JarInfo {
    pub fn percentages(&self) -> CategoryValues<f64> {
        CategoryValues::from_fn(|category| match category {
            JarCategory::Necessities => self.necessities_percentage,
            JarCategory::Education => self.education_percentage,
            JarCategory::Savings => self.savings_percentage,
            JarCategory::Entertainment => self.entertainment_percentage,
            JarCategory::Giving => self.giving_percentage,
            JarCategory::Investment => self.investment_percentage,
        })
    }
}

/// Per-jar account balances (`GET /profile/balance/my`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub necessities_balance: f64,
    pub education_balance: f64,
    pub entertainment_balance: f64,
    pub savings_balance: f64,
    pub investment_balance: f64,
    pub giving_balance: f64,
    pub total_balance: f64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Balance {
    /// Balances scaled to the currency's smallest unit (`minor_units` decimal
    /// places) and rounded; non-finite values read as zero.
    pub fn balances(&self, minor_units: u8) -> CategoryValues<i64> {
        CategoryValues::from_fn(|category| {
            to_minor_units(
                match category {
                    JarCategory::Necessities => self.necessities_balance,
                    JarCategory::Education => self.education_balance,
                    JarCategory::Savings => self.savings_balance,
                    JarCategory::Entertainment => self.entertainment_balance,
                    JarCategory::Giving => self.giving_balance,
                    JarCategory::Investment => self.investment_balance,
                },
                minor_units,
            )
        })
    }

    pub fn total(&self, minor_units: u8) -> i64 {
        to_minor_units(self.total_balance, minor_units)
    }
}

/// Body of `POST /profile/jar-division`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJarPercentagesRequest {
    pub necessities_percentage: u8,
    pub education_percentage: u8,
    pub entertainment_percentage: u8,
    pub savings_percentage: u8,
    pub investment_percentage: u8,
    pub giving_percentage: u8,
}

impl From<CategoryValues<u8>> for UpdateJarPercentagesRequest {
    fn from(values: CategoryValues<u8>) -> Self {
        Self {
            necessities_percentage: values.get(JarCategory::Necessities),
            education_percentage: values.get(JarCategory::Education),
            entertainment_percentage: values.get(JarCategory::Entertainment),
            savings_percentage: values.get(JarCategory::Savings),
            investment_percentage: values.get(JarCategory::Investment),
            giving_percentage: values.get(JarCategory::Giving),
        }
    }
}

impl From<UpdateJarPercentagesRequest> for JarInfo {
    fn from(request: UpdateJarPercentagesRequest) -> Self {
        Self {
            user_id: String::new(),
            necessities_percentage: f64::from(request.necessities_percentage),
            education_percentage: f64::from(request.education_percentage),
            entertainment_percentage: f64::from(request.entertainment_percentage),
            savings_percentage: f64::from(request.savings_percentage),
            investment_percentage: f64::from(request.investment_percentage),
            giving_percentage: f64::from(request.giving_percentage),
        }
    }
}

fn to_minor_units(value: f64, minor_units: u8) -> i64 {
    let scaled = value * 10f64.powi(i32::from(minor_units));
    if scaled.is_finite() {
        scaled.round() as i64
    } else {
        0
    }
}

/// Accepts RFC 3339 or a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC);
/// anything else becomes `None` instead of failing the whole payload.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let trimmed = value.trim();
        DateTime::parse_from_rfc3339(trimmed)
            .map(|parsed| parsed.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
            })
    }))
}
