use thiserror::Error;

/// Engine-level errors using thiserror for structured error handling.
///
/// Every variant is recoverable: name-keyed operations report them to the
/// caller and otherwise behave as no-ops. They never stop the tick loop.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Sound not found in catalog: {0}")]
    NotFound(String),

    #[error("Sound is not loaded: {0}")]
    NotLoaded(String),

    #[error("Sound already declared: {0}")]
    DuplicateName(String),

    #[error("Layer {layer} out of range for {name} ({count} layers)")]
    LayerOutOfRange {
        name: String,
        layer: usize,
        count: usize,
    },

    #[error("Sound declared without layers: {0}")]
    EmptyAsset(String),

    #[error("Failed to load audio layer: {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl AudioError {
    /// Errors that only mean "this name is not available right now"
    pub fn is_missing(&self) -> bool {
        matches!(self, AudioError::NotFound(_) | AudioError::NotLoaded(_))
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
