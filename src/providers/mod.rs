mod google;

pub use google::GoogleProvider;

use async_trait::async_trait;
use std::error::Error;

use crate::model::{ModelReply, PromptRequest};

/// A multimodal model that answers a prompt about an image
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Get the provider name (e.g., "google")
    fn provider_name(&self) -> &str;

    /// Send the instruction, image and user text and return the reply
    async fn generate(
        &self,
        request: &PromptRequest,
    ) -> Result<ModelReply, Box<dyn Error + Send + Sync>>;
}
