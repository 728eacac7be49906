use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// The API reports unknown ids of an aliased resource type this way,
    /// e.g. "No dashboards match that id"
    static ref NO_MATCH_PATTERN: Regex =
        Regex::new(r"No \S+ match(es)? that").expect("Invalid no-match pattern regex");
}

/// Error types for resource import operations
#[derive(Debug)]
pub enum ImportError {
    /// No model is registered for the requested resource type
    UnsupportedResource(String),

    /// A fetched record has no `id`
    MissingIdentifier { resource: String },

    /// A fetched record has none of the title fields a kennel id is derived from
    TitleMissing { resource: String, id: String },

    /// The API answered with a non-success status
    Api {
        status: u16,
        path: String,
        message: String,
    },

    /// The request never produced an API answer
    Http(reqwest::Error),

    /// Client configuration is unusable (bad subdomain, missing keys)
    Configuration(String),

    /// Response body was not the JSON shape we expected
    Serialization(String),
}

impl ImportError {
    /// Whether the API said no resource of this type matches the requested id.
    ///
    /// Only API answers qualify; transport errors never trigger an alias retry.
    pub fn is_no_match(&self) -> bool {
        match self {
            ImportError::Api { message, .. } => NO_MATCH_PATTERN.is_match(message),
            _ => false,
        }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::UnsupportedResource(resource) => {
                write!(f, "{} is not supported", resource)
            }
            ImportError::MissingIdentifier { resource } => {
                write!(f, "Fetched {} record has no id", resource)
            }
            ImportError::TitleMissing { resource, id } => {
                write!(
                    f,
                    "Fetched {} record {} has none of the title fields (name, title, board_title)",
                    resource, id
                )
            }
            ImportError::Api {
                status,
                path,
                message,
            } => {
                write!(f, "Error {} during GET {}: {}", status, path, message)
            }
            ImportError::Http(err) => {
                write!(f, "HTTP request failed: {}", err)
            }
            ImportError::Configuration(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
            ImportError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ImportError {
    fn from(err: reqwest::Error) -> Self {
        ImportError::Http(err)
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for ImportError {
    fn from(err: url::ParseError) -> Self {
        ImportError::Configuration(err.to_string())
    }
}

/// Result type for import operations
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(message: &str) -> ImportError {
        ImportError::Api {
            status: 404,
            path: "/api/v1/dash/42".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_no_match_detection() {
        assert!(api_error("No dashboards match that id").is_no_match());
        assert!(api_error("No dashboard matches that dash_id").is_no_match());
        assert!(!api_error("Forbidden").is_no_match());
    }

    #[test]
    fn test_no_match_requires_api_error() {
        let error = ImportError::Configuration("No dashboards match that id".to_string());
        assert!(!error.is_no_match());
    }

    #[test]
    fn test_display_unsupported_resource() {
        let error = ImportError::UnsupportedResource("widget".to_string());
        assert_eq!(error.to_string(), "widget is not supported");
    }

    #[test]
    fn test_display_api_error() {
        assert_eq!(
            api_error("No dashboards match that id").to_string(),
            "Error 404 during GET /api/v1/dash/42: No dashboards match that id"
        );
    }
}
