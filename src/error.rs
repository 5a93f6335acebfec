use std::{fmt::Display, path::PathBuf};

use tracing::{debug, error};

/// Struct to represent when the library encounters an error,
///
#[derive(Debug)]
pub struct Error {
    category: ErrorCategory,
}

impl Error {
    /// Registry url uses a scheme other than http or https,
    ///
    pub fn invalid_scheme(url: impl Into<String>) -> Self {
        Self::invalid_registry(ErrorCategory::InvalidScheme(url.into()))
    }

    /// Registry url has a path,
    ///
    pub fn invalid_path(url: impl Into<String>) -> Self {
        Self::invalid_registry(ErrorCategory::InvalidPath(url.into()))
    }

    /// Registry url has a query string,
    ///
    pub fn invalid_query(url: impl Into<String>) -> Self {
        Self::invalid_registry(ErrorCategory::InvalidQuery(url.into()))
    }

    /// Registry url carries user info,
    ///
    pub fn invalid_user_info(url: impl Into<String>) -> Self {
        Self::invalid_registry(ErrorCategory::InvalidUserInfo(url.into()))
    }

    /// Registry url carries a fragment,
    ///
    pub fn invalid_fragment(url: impl Into<String>) -> Self {
        Self::invalid_registry(ErrorCategory::InvalidFragment(url.into()))
    }

    /// Registry host cannot be used as a single directory name,
    ///
    pub fn invalid_host(url: impl Into<String>) -> Self {
        Self::invalid_registry(ErrorCategory::InvalidHost(url.into()))
    }

    /// Returns an error that indicates the input could not be parsed as a uri,
    ///
    pub fn invalid_uri(input: impl Into<String>, reason: impl Display) -> Self {
        let input = input.into();
        error!("Error parsing uri {input}, {reason}");
        Error {
            category: ErrorCategory::InvalidUri {
                input,
                reason: reason.to_string(),
            },
        }
    }

    /// Returns an error that indicates an unknown host capability was requested,
    ///
    pub fn invalid_capability(token: impl Into<String>) -> Self {
        let token = token.into();
        error!("Unknown host capability, {token}");
        Error {
            category: ErrorCategory::InvalidCapability(token),
        }
    }

    /// Returns an error that indicates the container runtime is not configured to read the mirror configuration,
    ///
    pub fn invalid_runtime_config(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        error!("Invalid runtime configuration, {reason}");
        Error {
            category: ErrorCategory::InvalidRuntimeConfig(reason),
        }
    }

    /// Returns an error that indicates a data-format issue,
    ///
    pub fn data_format(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        error!("Error parsing content, {reason}");
        Error {
            category: ErrorCategory::DataFormat(reason),
        }
    }

    /// Returns an error that indicates a filesystem operation failed,
    ///
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        error!("Error w/ filesystem at {:?}, {source}", path);
        Error {
            category: ErrorCategory::Filesystem { path, source },
        }
    }

    /// Returns the category of this error,
    ///
    pub fn category(&self) -> &ErrorCategory {
        &self.category
    }

    /// Returns true if this error was caused by an invalid registry url,
    ///
    pub fn is_invalid_registry(&self) -> bool {
        matches!(
            self.category,
            ErrorCategory::InvalidScheme(_)
                | ErrorCategory::InvalidPath(_)
                | ErrorCategory::InvalidQuery(_)
                | ErrorCategory::InvalidUserInfo(_)
                | ErrorCategory::InvalidFragment(_)
                | ErrorCategory::InvalidHost(_)
        )
    }

    fn invalid_registry(category: ErrorCategory) -> Self {
        let error = Error { category };
        debug!("Rejected registry url, {error}");
        error
    }
}

/// Enumeration of error categories,
///
#[derive(Debug)]
pub enum ErrorCategory {
    InvalidScheme(String),
    InvalidPath(String),
    InvalidQuery(String),
    InvalidUserInfo(String),
    InvalidFragment(String),
    InvalidHost(String),
    InvalidUri { input: String, reason: String },
    InvalidCapability(String),
    InvalidRuntimeConfig(String),
    DataFormat(String),
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.category {
            ErrorCategory::Filesystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.category {
            ErrorCategory::InvalidScheme(url) => {
                write!(f, "invalid registry url scheme must be http or https: {url}")
            }
            ErrorCategory::InvalidPath(url) => {
                write!(f, "invalid registry url path has to be empty: {url}")
            }
            ErrorCategory::InvalidQuery(url) => {
                write!(f, "invalid registry url query has to be empty: {url}")
            }
            ErrorCategory::InvalidUserInfo(url) => {
                write!(f, "invalid registry url user has to be empty: {url}")
            }
            ErrorCategory::InvalidFragment(url) => {
                write!(f, "invalid registry url fragment has to be empty: {url}")
            }
            ErrorCategory::InvalidHost(url) => {
                write!(f, "invalid registry url host has to be a single directory name: {url}")
            }
            ErrorCategory::InvalidUri { input, reason } => {
                write!(f, "could not parse url {input}: {reason}")
            }
            ErrorCategory::InvalidCapability(token) => {
                write!(f, "unknown host capability: {token}")
            }
            ErrorCategory::InvalidRuntimeConfig(reason) => write!(f, "{reason}"),
            ErrorCategory::DataFormat(reason) => write!(f, "invalid content: {reason}"),
            ErrorCategory::Filesystem { path, source } => {
                write!(f, "filesystem error at {}: {source}", path.display())
            }
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Self::data_format(value.to_string())
    }
}

impl From<toml_edit::TomlError> for Error {
    fn from(value: toml_edit::TomlError) -> Self {
        Self::data_format(value.to_string())
    }
}
