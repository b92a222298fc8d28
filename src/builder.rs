use std::path::PathBuf;
use std::time::Duration;

use crate::analyzer::analyze;
use crate::config::AppConfig;
use crate::model::Extraction;
use crate::providers::GoogleProvider;
use crate::request::{FileUpload, ImageUpload, MemoryUpload};
use crate::AnalyzerError;

/// Represents the image attached to a submission
#[derive(Debug, Clone)]
enum ImageSource {
    /// PNG or JPEG file on disk
    Path(PathBuf),
    /// Raw bytes with their media type
    Bytes(MemoryUpload),
}

/// Builder for configuring and running one meal analysis
#[derive(Debug, Default)]
pub struct MealScanBuilder {
    image: Option<ImageSource>,
    description: String,
    config: Option<AppConfig>,
    api_key: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl MealScanBuilder {
    /// Attach an image file
    ///
    /// # Example
    /// ```
    /// use calorie_counter::MealScan;
    ///
    /// let builder = MealScan::builder().image("/path/to/lunch.jpg");
    /// ```
    pub fn image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image = Some(ImageSource::Path(path.into()));
        self
    }

    /// Attach an image already loaded in memory
    pub fn image_bytes(mut self, data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        self.image = Some(ImageSource::Bytes(MemoryUpload::new(data, mime_type)));
        self
    }

    /// Set the free-text description sent with the image
    ///
    /// # Example
    /// ```
    /// use calorie_counter::MealScan;
    ///
    /// let builder = MealScan::builder()
    ///     .image("/path/to/salad.png")
    ///     .description("Tell me the calories in this salad");
    /// ```
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    /// Use a loaded configuration instead of reading it from the environment
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the Google API key directly
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the Gemini model name
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set a timeout for the model request
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Run the analysis
    ///
    /// # Errors
    /// Returns `AnalyzerError` if:
    /// - No image was attached, or the file is not PNG/JPEG
    /// - No API key is configured
    /// - The model request fails
    ///
    /// # Example
    /// ```no_run
    /// # use calorie_counter::MealScan;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let result = MealScan::builder()
    ///     .image("/path/to/lunch.jpg")
    ///     .description("How many calories?")
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<Extraction, AnalyzerError> {
        // Fail on a missing image before touching configuration
        let image = self.image.ok_or(AnalyzerError::MissingImage)?;

        let config = resolve_config(self.config, self.api_key, self.model, self.timeout)?;
        let provider = GoogleProvider::new(&config)?;

        match image {
            ImageSource::Path(path) => {
                let upload = FileUpload::new(path)?;
                analyze(&provider, Some(&upload as &dyn ImageUpload), &self.description).await
            }
            ImageSource::Bytes(upload) => {
                analyze(&provider, Some(&upload as &dyn ImageUpload), &self.description).await
            }
        }
    }
}

/// Start from the given or loaded configuration and apply builder overrides
fn resolve_config(
    config: Option<AppConfig>,
    api_key: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
) -> Result<AppConfig, AnalyzerError> {
    let mut config = match (config, api_key.as_deref()) {
        (Some(config), _) => config,
        (None, Some(key)) => AppConfig::with_api_key(key),
        (None, None) => AppConfig::load()?,
    };
    if let Some(key) = api_key {
        config.api_key = key;
    }
    if let Some(model) = model {
        config.model = model;
    }
    if let Some(timeout) = timeout {
        config.set_timeout(timeout);
    }
    Ok(config)
}

/// Main entry point for the builder API
pub struct MealScan;

impl MealScan {
    /// Creates a new builder for analyzing a meal photo
    ///
    /// # Example
    /// ```
    /// use calorie_counter::MealScan;
    ///
    /// let builder = MealScan::builder();
    /// ```
    pub fn builder() -> MealScanBuilder {
        MealScanBuilder::default()
    }
}
