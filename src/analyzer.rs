use log::{info, warn};

use crate::extractor::extract_reply;
use crate::model::Extraction;
use crate::providers::VisionModel;
use crate::request::{build_request, ImageUpload};
use crate::AnalyzerError;

/// Run one submission: read the image, ask the model, extract the table.
///
/// The image is read before the model is contacted, so a missing upload
/// never reaches the provider. A provider failure is reported as
/// `AnalyzerError::ModelInvocation`.
pub async fn analyze(
    provider: &dyn VisionModel,
    upload: Option<&dyn ImageUpload>,
    user_text: &str,
) -> Result<Extraction, AnalyzerError> {
    let request = build_request(upload, user_text)?;

    info!("Scanning meal with {}", provider.provider_name());
    let reply = provider.generate(&request).await.map_err(|e| {
        warn!("{} failed: {}", provider.provider_name(), e);
        AnalyzerError::ModelInvocation(e.to_string())
    })?;

    Ok(extract_reply(&reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelReply, PromptRequest};
    use crate::request::MemoryUpload;
    use async_trait::async_trait;
    use std::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedModel {
        reply: Result<String, String>,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn new(reply: Result<&str, &str>) -> Self {
            ScriptedModel {
                reply: reply.map(str::to_string).map_err(str::to_string),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VisionModel for ScriptedModel {
        fn provider_name(&self) -> &str {
            "scripted"
        }

        async fn generate(
            &self,
            _request: &PromptRequest,
        ) -> Result<ModelReply, Box<dyn Error + Send + Sync>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(ModelReply {
                    text: text.clone(),
                    model_version: None,
                }),
                Err(message) => Err(message.clone().into()),
            }
        }
    }

    #[tokio::test]
    async fn test_missing_image_skips_model() {
        let model = ScriptedModel::new(Ok("unused"));
        let result = analyze(&model, None, "lunch").await;

        assert!(matches!(result, Err(AnalyzerError::MissingImage)));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_table_reply() {
        let model = ScriptedModel::new(Ok(
            "Aquí está:\n| Food Item | Calories |\n|---|---|\n| Apple | 95 |\n| Total | 95 |",
        ));
        let upload = MemoryUpload::new(vec![1, 2, 3], "image/png");

        let result = analyze(&model, Some(&upload), "lunch").await.unwrap();
        let table = result.as_table().unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(1, "Food Item"), Some("Total"));
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_prose_reply_falls_back_to_text() {
        let model = ScriptedModel::new(Ok("No veo comida en la imagen."));
        let upload = MemoryUpload::new(vec![1], "image/jpeg");

        let result = analyze(&model, Some(&upload), "").await.unwrap();
        assert_eq!(
            result,
            Extraction::Text("No veo comida en la imagen.".to_string())
        );
    }

    #[tokio::test]
    async fn test_model_failure_becomes_display_error() {
        let model = ScriptedModel::new(Err("quota exceeded"));
        let upload = MemoryUpload::new(vec![1], "image/jpeg");

        let err = analyze(&model, Some(&upload), "dinner").await.unwrap_err();
        assert!(matches!(err, AnalyzerError::ModelInvocation(_)));
        assert_eq!(err.to_string(), "Error obtaining response: quota exceeded");
    }
}
