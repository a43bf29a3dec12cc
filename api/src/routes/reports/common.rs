use serde::Deserialize;
use serde_json::json;

use db::models::report::{Category, Status};
use db::models::report_vote::VoteType;
use db::moderation::{FieldViolation, ModerationError};

/// Request body for `POST /api/reports`.
#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub severity: i32,
    /// GeoJSON-style `[longitude, latitude]`.
    pub location: [f64; 2],
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default)]
    pub is_anonymous: bool,
}

/// Request body for `PUT /api/reports/{id}`. Every field is optional; absent
/// fields keep their current value.
#[derive(Debug, Deserialize, Default)]
pub struct EditReportRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub severity: Option<i32>,
    pub media_urls: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// `confirm` or `dispute`.
    pub vote: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

/// Enum values arrive as strings so a bad value surfaces as a field-level
/// validation error instead of a body-deserialization failure.
pub fn parse_category(raw: &str) -> Result<Category, ModerationError> {
    raw.parse().map_err(|_| {
        ModerationError::Validation(vec![FieldViolation::new(
            "category",
            format!("'{raw}' is not a valid category"),
        )])
    })
}

pub fn parse_status(raw: &str) -> Result<Status, ModerationError> {
    raw.parse().map_err(|_| {
        ModerationError::Validation(vec![FieldViolation::new(
            "status",
            format!("'{raw}' is not a valid status"),
        )])
    })
}

pub fn parse_vote(raw: &str) -> Result<VoteType, ModerationError> {
    raw.parse().map_err(|_| {
        ModerationError::Validation(vec![FieldViolation::new(
            "vote",
            format!("'{raw}' is not a valid vote (expected 'confirm' or 'dispute')"),
        )])
    })
}

/// Standard pagination envelope around a list payload.
pub fn paginated(items: serde_json::Value, page: u64, per_page: u64, total: u64) -> serde_json::Value {
    json!({
        "reports": items,
        "page": page,
        "per_page": per_page,
        "total": total,
    })
}
