use db::moderation::FieldViolation;
use serde::Serialize;

/// Standardized API response wrapper for all outgoing JSON responses.
///
/// Every endpoint returns this structure:
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "Some message"
/// }
/// ```
///
/// Validation failures additionally carry an `errors` array with one entry
/// per offending field:
/// ```json
/// {
///   "success": false,
///   "data": {},
///   "message": "Validation failed",
///   "errors": [ { "field": "severity", "message": "severity must be between 1 and 5" } ]
/// }
/// ```
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Constructs a success response with the given data and message.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            errors: None,
        }
    }

    /// Constructs an error response with a message and default `data`.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
            errors: None,
        }
    }

    /// Constructs a validation-error response carrying per-field details.
    pub fn validation_error(violations: Vec<FieldViolation>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: "Validation failed".into(),
            errors: Some(violations),
        }
    }
}
