//! Persisted customer shape
//!
//! Field names are camelCase on the wire. Absent optional fields are left
//! out of the JSON entirely and unknown fields from the store are ignored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::Entity;

/// Stored profile picture reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilePic {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,
}

/// Customer record as persisted and returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    /// Assigned on create, never changes
    pub customer_id: String,

    pub first_name: String,

    pub last_name: String,

    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,

    /// RFC 3339 timestamp, written once on create
    pub date_created: String,

    pub is_active: bool,

    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<ProfilePic>,

    pub country_code: String,
}

impl Entity for Customer {
    const TABLE: &'static str = "Customer";

    fn id(&self) -> &str {
        &self.customer_id
    }

    /// Customers are partitioned by country code
    fn partition(&self) -> Option<&str> {
        Some(self.country_code.as_str()).filter(|code| !code.trim().is_empty())
    }
}
