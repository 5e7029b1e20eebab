use thiserror::Error;

/// Library errors using thiserror for structured error handling.
///
/// These errors represent domain-specific failures that can occur while
/// driving playback, reading profiles or loading configuration. They can be
/// chained with anyhow at the application level.

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to load audio file: {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to decode audio format")]
    DecodeFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to initialize audio output stream")]
    StreamInitFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors raised by the profile store.
///
/// `MissingBundle`, `MissingKey` and `TypeMismatch` together form the
/// missing-configuration class: the profile does not carry what the reader
/// expects and no default is substituted.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Profile has no bundle named '{0}'")]
    MissingBundle(String),

    #[error("Bundle '{bundle}' has no value for key '{key}'")]
    MissingKey { bundle: String, key: String },

    #[error("Bundle '{bundle}' value for key '{key}' has an unexpected type")]
    TypeMismatch {
        bundle: String,
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to access profile file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed profile file {path}")]
    Format {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ProfileError {
    /// Whether this error means the expected data is simply absent or unusable
    pub fn is_missing_configuration(&self) -> bool {
        matches!(
            self,
            ProfileError::MissingBundle(_)
                | ProfileError::MissingKey { .. }
                | ProfileError::TypeMismatch { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to create config directory: {path}")]
    DirectoryCreationFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = ProfileError::MissingBundle("audio".to_string());
        assert_eq!(err.to_string(), "Profile has no bundle named 'audio'");

        let err = ProfileError::MissingKey {
            bundle: "audio".to_string(),
            key: "musicVolume".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Bundle 'audio' has no value for key 'musicVolume'"
        );

        let err = ConfigError::Invalid("volume".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: volume");
    }

    #[test]
    fn test_missing_configuration_class() {
        assert!(ProfileError::MissingBundle("audio".into()).is_missing_configuration());

        let io = ProfileError::Io {
            path: "/tmp/profile.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(!io.is_missing_configuration());
    }

    #[test]
    fn test_error_source_chain() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let config_err = ConfigError::LoadFailed {
            path: "/test/config.json".to_string(),
            source: Box::new(io_err),
        };

        assert!(config_err.source().is_some());
        assert_eq!(
            config_err.to_string(),
            "Failed to load configuration from /test/config.json"
        );
    }
}
