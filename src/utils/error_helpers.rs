//! Helper functions for standardizing error conversions across the codebase.

use crate::error::ApiError;

/// Convert reqwest send errors to ApiError with endpoint context
pub fn convert_request_error(error: reqwest::Error, endpoint: &str, timeout_secs: u64) -> ApiError {
    if error.is_timeout() {
        return convert_timeout_error(endpoint, timeout_secs);
    }

    match error.status() {
        Some(status) => ApiError::Http {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
            message: error.to_string(),
        },
        None => ApiError::Unreachable {
            endpoint: endpoint.to_string(),
            message: error.to_string(),
        },
    }
}

/// Convert timeout errors to ApiError with endpoint context
pub fn convert_timeout_error(endpoint: &str, timeout_secs: u64) -> ApiError {
    ApiError::Timeout {
        timeout_secs,
        endpoint: endpoint.to_string(),
    }
}

/// Convert body decoding errors to ApiError with endpoint context
pub fn convert_json_error(error: impl std::fmt::Display, endpoint: &str) -> ApiError {
    ApiError::MalformedPayload {
        endpoint: endpoint.to_string(),
        message: format!("JSON parse error: {}", error),
    }
}

/// Helper macro for standardizing map_err patterns
#[macro_export]
macro_rules! map_api_error {
    ($result:expr, $endpoint:expr, $timeout_secs:expr) => {
        $result.map_err(|e| {
            $crate::utils::error_helpers::convert_request_error(e, $endpoint, $timeout_secs)
        })
    };
}

/// Helper macro for JSON parsing errors
#[macro_export]
macro_rules! map_json_error {
    ($result:expr, $endpoint:expr) => {
        $result.map_err(|e| $crate::utils::error_helpers::convert_json_error(e, $endpoint))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_timeout_error() {
        let err = convert_timeout_error("/plantilla/getTodas", 30);
        assert!(matches!(
            err,
            ApiError::Timeout {
                timeout_secs: 30,
                ..
            }
        ));
        assert_eq!(err.endpoint(), "/plantilla/getTodas");
    }

    #[test]
    fn test_convert_json_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = convert_json_error(parse_err, "/plantilla/");
        match err {
            ApiError::MalformedPayload { endpoint, message } => {
                assert_eq!(endpoint, "/plantilla/");
                assert!(message.starts_with("JSON parse error"));
            }
            other => panic!("Expected MalformedPayload, got {:?}", other),
        }
    }

    #[test]
    fn test_map_json_error_macro() {
        let result: Result<serde_json::Value, ApiError> =
            map_json_error!(serde_json::from_str::<serde_json::Value>("["), "/x");
        assert!(matches!(result, Err(ApiError::MalformedPayload { .. })));
    }
}
