//! Input validation for configuration values and CLI arguments.

use crate::error::CliError;

/// Validate that a gateway URL is properly formatted
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(CliError::InvalidArguments("URL cannot be empty".to_string()).into());
    }

    // Basic URL validation - must start with http:// or https://
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CliError::InvalidArguments(format!(
            "Invalid URL '{}': URL must start with http:// or https://",
            url
        ))
        .into());
    }

    Ok(())
}

/// Validate a resource path appended to the gateway root
pub fn validate_resource_path(path: &str) -> crate::Result<()> {
    if !path.starts_with('/') {
        return Err(CliError::InvalidArguments(format!(
            "Invalid path '{}': resource paths must start with '/'",
            path
        ))
        .into());
    }

    Ok(())
}

/// Validate a record identifier before it is spliced into a URL
pub fn validate_record_id(id: &str) -> crate::Result<()> {
    if id.is_empty() {
        return Err(CliError::InvalidArguments("Record ID cannot be empty".to_string()).into());
    }

    if id.contains(['/', '?', '#']) || id.chars().any(char::is_whitespace) {
        return Err(CliError::InvalidArguments(format!(
            "Invalid record ID '{}': must not contain '/', '?', '#' or whitespace",
            id
        ))
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_accepts_valid_urls() {
        assert!(validate_url("http://localhost:8001").is_ok());
        assert!(validate_url("https://gateway.example.com").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_invalid_urls() {
        assert!(validate_url("").is_err());
        assert!(validate_url("localhost:8001").is_err());
        assert!(validate_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_resource_path() {
        assert!(validate_resource_path("/plantilla/getTodas").is_ok());
        assert!(validate_resource_path("plantilla").is_err());
    }

    #[test]
    fn test_validate_record_id() {
        assert!(validate_record_id("359622117735465164").is_ok());
        assert!(validate_record_id("").is_err());
        assert!(validate_record_id("1/2").is_err());
        assert!(validate_record_id("a b").is_err());
        assert!(validate_record_id("x?y=1").is_err());
    }
}
