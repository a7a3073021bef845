//! Error types for Confetti.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for Confetti operations.
#[derive(Debug, Error)]
pub enum ConfettiError {
    /// Particle configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An effect was requested that was never preloaded
    #[error("Effect '{0}' not found, preload it first")]
    EffectNotFound(String),
}

/// Errors raised while loading, validating or saving a particle configuration.
///
/// These only surface at load time; the per-tick simulation never produces them.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field failed validation
    #[error("Invalid config '{name}': {field} {message}")]
    Validation {
        /// Config name (or path) being validated
        name: String,
        /// Dotted path of the offending field
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// TOML could not be parsed
    #[error("Failed to parse config '{name}': {source}")]
    Parse {
        /// Config name (or path)
        name: String,
        /// Underlying parser error
        #[source]
        source: toml::de::Error,
    },

    /// Config could not be serialized
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Reading or writing a config file failed
    #[error("Config file {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

impl ConfigError {
    /// Shorthand for a validation failure.
    #[must_use]
    pub fn validation(
        name: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            name: name.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for Confetti operations.
pub type ConfettiResult<T> = Result<T, ConfettiError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = ConfigError::validation("smoke", "spawn.max_particles", "must be greater than 0");
        let text = err.to_string();
        assert!(text.contains("smoke"));
        assert!(text.contains("spawn.max_particles must be greater than 0"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: ConfettiError = ConfigError::NotFound(PathBuf::from("a.toml")).into();
        assert!(matches!(err, ConfettiError::Config(_)));
    }
}
