pub mod analyzer;
pub mod builder;
pub mod config;
pub mod error;
pub mod extractor;
pub mod model;
pub mod prompt;
pub mod providers;
pub mod render;
pub mod request;

pub use analyzer::analyze;
pub use builder::{MealScan, MealScanBuilder};
pub use crate::config::{load_config, AppConfig};
pub use error::AnalyzerError;
pub use extractor::{extract, HEADER_MARKER};
pub use model::{Extraction, ImagePayload, ModelReply, ParsedTable, PromptRequest, TextBearing};
pub use providers::{GoogleProvider, VisionModel};
pub use request::{build_image_payload, FileUpload, ImageUpload, MemoryUpload};

/// Analyze a meal photo on disk with configuration from the environment.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let result = calorie_counter::scan_meal("lunch.jpg", "How many calories?").await?;
/// # Ok(())
/// # }
/// ```
pub async fn scan_meal(image_path: &str, description: &str) -> Result<Extraction, AnalyzerError> {
    MealScan::builder()
        .image(image_path)
        .description(description)
        .build()
        .await
}
