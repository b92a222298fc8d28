use thiserror::Error;

/// Errors that can occur while analyzing a meal photo
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// The submission did not include an image
    #[error("No image was selected.")]
    MissingImage,

    /// The uploaded file is not a PNG or JPEG image
    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    /// The remote model failed to produce a reply
    #[error("Error obtaining response: {0}")]
    ModelInvocation(String),

    /// Required configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failed to read the uploaded image
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to set up the HTTP client
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to load configuration sources
    #[error("Configuration error: {0}")]
    ConfigSource(#[from] config::ConfigError),
}
