//! Wire DTOs for the backend data service.
//!
//! DESIGN
//! ======
//! Fields the backend may omit are `Option` or `#[serde(default)]` so a sparse
//! record still renders instead of failing the whole page.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// A card with aggregate approval counts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub annual_fee: Option<f64>,
    #[serde(default)]
    pub approved: u32,
    #[serde(default)]
    pub denied: u32,
}

impl Card {
    /// Share of reported applications that were approved, in `0.0..=1.0`.
    #[must_use]
    pub fn approval_rate(&self) -> Option<f64> {
        let total = self.approved + self.denied;
        (total > 0).then(|| f64::from(self.approved) / f64::from(total))
    }
}

/// Per-application data points used to plot approval odds for one card.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub name: String,
    #[serde(default)]
    pub points: Vec<GraphPoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphPoint {
    pub credit_score: u32,
    #[serde(default)]
    pub income: Option<f64>,
    pub approved: bool,
}

/// One application outcome reported by the signed-in user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub card_name: String,
    #[serde(default)]
    pub credit_score: Option<u32>,
    #[serde(default)]
    pub income: Option<f64>,
    pub approved: bool,
    #[serde(default)]
    pub applied_on: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewRecord {
    pub card_name: String,
    pub credit_score: Option<u32>,
    pub income: Option<f64>,
    pub approved: bool,
    pub applied_on: Option<String>,
}

/// A referral link the signed-in user shares for a card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Referral {
    #[serde(default)]
    pub id: Option<String>,
    pub card_name: String,
    pub link: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewReferral {
    pub card_name: String,
    pub link: String,
}

/// Profile summary for the signed-in user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub member_since: Option<String>,
}
