/// Response wrapper shared by every endpoint
///
/// Existing clients depend on this exact shape: a data payload, a success
/// flag, a message, and an optional error list.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse<T> {
    pub data: Option<T>,
    pub succeeded: bool,
    pub message: String,
    pub errors: Option<Vec<String>>,
}

impl<T> ServiceResponse<T> {
    /// Successful response carrying a payload
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            succeeded: true,
            message: message.into(),
            errors: None,
        }
    }

    /// Successful response with a message only
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            data: None,
            succeeded: true,
            message: message.into(),
            errors: None,
        }
    }

    /// Failed response with a message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            succeeded: false,
            message: message.into(),
            errors: None,
        }
    }

    /// Failed response with a message and an error list
    pub fn failure_with_errors(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            data: None,
            succeeded: false,
            message: message.into(),
            errors: Some(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_serializes_with_camel_case_fields() {
        let response = ServiceResponse::success("abc", "done");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["data"], "abc");
        assert_eq!(json["succeeded"], true);
        assert_eq!(json["message"], "done");
        assert!(json["errors"].is_null());
    }

    #[test]
    fn failure_carries_error_list() {
        let response = ServiceResponse::<()>::failure_with_errors(
            "One or more validation errors occurred.",
            vec!["Passwords do not match.".to_string()],
        );

        assert!(!response.succeeded);
        assert_eq!(response.errors.as_ref().unwrap().len(), 1);
    }
}
