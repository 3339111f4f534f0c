/// Failures of calls to the travel record service.
///
/// Errors are `Clone` so they can be carried inside UI messages; transport
/// errors are flattened to their display text for that reason.
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The request was never sent or no response arrived
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// 404 from the service
    #[error("not found: {}", .detail.as_deref().unwrap_or("resource not found"))]
    NotFound { detail: Option<String> },

    /// 4xx carrying a detail message
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Any other non-2xx response
    #[error("service error ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    ServiceError { status: u16, detail: Option<String> },

    /// A 2xx response whose body could not be decoded
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Classify a non-2xx response from its status and raw body
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = extract_detail(body);
        match status {
            404 => Self::NotFound { detail },
            400..=499 => match detail {
                Some(detail) => Self::ValidationError(detail),
                None => Self::ServiceError { status, detail: None },
            },
            _ => Self::ServiceError { status, detail },
        }
    }

    /// The message the service attached to the failure, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::NotFound { detail } | Self::ServiceError { detail, .. } => detail.as_deref(),
            Self::ValidationError(detail) => Some(detail),
            Self::NetworkFailure(_) | Self::InvalidResponse(_) => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::InvalidResponse(error.to_string())
        } else {
            Self::NetworkFailure(error.to_string())
        }
    }
}

/// Pull `detail` out of an error body.
///
/// The service sends either `{"detail": "text"}` or, for request validation,
/// `{"detail": [{"loc": [...], "msg": "..."}, ...]}`.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items.iter().filter_map(describe_violation).collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

fn describe_violation(item: &Value) -> Option<String> {
    let msg = item.get("msg")?.as_str()?;
    let field = item
        .get("loc")
        .and_then(Value::as_array)
        .and_then(|loc| loc.last())
        .and_then(|last| match last {
            Value::String(name) => Some(name.clone()),
            Value::Number(index) => Some(index.to_string()),
            _ => None,
        });

    Some(match field {
        Some(field) => format!("{field}: {msg}"),
        None => msg.to_string(),
    })
}
