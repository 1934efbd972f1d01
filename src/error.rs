use std::fmt;

/// Errors raised while building distributions from configuration.
///
/// Sampling never fails; everything that can go wrong is caught here, at
/// construction time.
#[derive(Debug)]
pub enum ConfigError {
    /// `reference_uvw` was given with the wrong number of components.
    ReferenceDirection { found: usize },
    /// A required child node or attribute is absent.
    MissingNode(String),
    /// A node exists but does not hold the expected kind of value.
    InvalidValue { name: String, reason: String },
    /// `type` attribute names something this crate cannot build.
    UnknownType { kind: &'static str, name: String },
    /// Parameters are present but describe an invalid distribution.
    InvalidParameters { distribution: &'static str, reason: String },
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReferenceDirection { found } => write!(
                f,
                "Angular distribution reference direction must have three parameters specified (found {})",
                found
            ),
            ConfigError::MissingNode(name) => write!(f, "Missing required node '{}'", name),
            ConfigError::InvalidValue { name, reason } => {
                write!(f, "Invalid value for '{}': {}", name, reason)
            }
            ConfigError::UnknownType { kind, name } => {
                write!(f, "Unknown {} type: '{}'", kind, name)
            }
            ConfigError::InvalidParameters {
                distribution,
                reason,
            } => write!(f, "Invalid parameters for {} distribution: {}", distribution, reason),
            ConfigError::Io(e) => write!(f, "Failed to read configuration: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}
