use crate::config::AppConfig;
use crate::model::{ModelReply, PromptRequest};
use crate::providers::VisionModel;
use crate::AnalyzerError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::error::Error;

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &AppConfig) -> Result<Self, AnalyzerError> {
        if config.api_key.trim().is_empty() {
            return Err(AnalyzerError::Configuration(
                "GOOGLE_API_KEY not found in config or environment".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(GoogleProvider {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        let config = AppConfig {
            base_url,
            model,
            ..AppConfig::with_api_key(api_key)
        };

        GoogleProvider {
            client: Client::new(),
            api_key: config.api_key,
            base_url: config.base_url,
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    fn request_body(&self, request: &PromptRequest) -> Value {
        let image = request.image();
        json!({
            "contents": [{
                "parts": [
                    { "text": request.instruction() },
                    {
                        "inline_data": {
                            "mime_type": image.mime_type,
                            "data": STANDARD.encode(&image.bytes)
                        }
                    },
                    { "text": request.user_text() }
                ]
            }],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_tokens
            }
        })
    }
}

#[async_trait]
impl VisionModel for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn generate(
        &self,
        request: &PromptRequest,
    ) -> Result<ModelReply, Box<dyn Error + Send + Sync>> {
        // Google Gemini API endpoint
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        debug!(
            "Sending {} byte image to Gemini model {}",
            request.image().bytes.len(),
            self.model
        );

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Google Gemini response ({}): {}", status, body);

        // Error bodies are not always JSON (proxy pages, empty 5xx)
        let parsed: Option<Value> = serde_json::from_str(&body).ok();
        if let Some(error) = parsed.as_ref().and_then(|value| value.get("error")) {
            let error_code = error["code"].as_i64().unwrap_or(i64::from(status.as_u16()));
            let error_message = error["message"].as_str().unwrap_or("Unknown error");
            return Err(format!(
                "Google Gemini API error ({}): {}",
                error_code, error_message
            )
            .into());
        }

        if !status.is_success() {
            return Err(format!("Google Gemini HTTP {}: {}", status, body.trim()).into());
        }

        let response_body: Value = match parsed {
            Some(value) => value,
            None => serde_json::from_str(&body)?,
        };

        let text = candidate_text(&response_body).ok_or_else(|| {
            format!(
                "Failed to extract content from Google Gemini response. Response: {}",
                serde_json::to_string_pretty(&response_body)
                    .unwrap_or_else(|_| response_body.to_string())
            )
        })?;

        let model_version = response_body["modelVersion"]
            .as_str()
            .map(|s| s.to_string())
            .or_else(|| Some(self.model.clone()));

        Ok(ModelReply {
            text,
            model_version,
        })
    }
}

/// Concatenate the text parts of the first candidate
fn candidate_text(response_body: &Value) -> Option<String> {
    let parts = response_body["candidates"][0]["content"]["parts"].as_array()?;
    let texts: Vec<&str> = parts.iter().filter_map(|part| part["text"].as_str()).collect();

    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImagePayload;

    fn sample_request() -> PromptRequest {
        PromptRequest::new(
            ImagePayload {
                mime_type: "image/png".to_string(),
                bytes: b"test data".to_vec(),
            },
            "Calorías de esta ensalada",
        )
    }

    #[test]
    fn test_provider_name() {
        let provider = GoogleProvider::new(&AppConfig::with_api_key("test-key")).unwrap();
        assert_eq!(provider.provider_name(), "google");
    }

    #[test]
    fn test_new_requires_api_key() {
        let result = GoogleProvider::new(&AppConfig::default());
        assert!(matches!(result, Err(AnalyzerError::Configuration(_))));
    }

    #[test]
    fn test_request_body_part_order() {
        let provider = GoogleProvider::with_base_url(
            "key".to_string(),
            "http://localhost".to_string(),
            "gemini-1.5-flash".to_string(),
        );
        let body = provider.request_body(&sample_request());
        let parts = &body["contents"][0]["parts"];

        assert_eq!(parts[0]["text"], crate::prompt::INSTRUCTION_PROMPT);
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[1]["inline_data"]["data"], STANDARD.encode(b"test data"));
        assert_eq!(parts[2]["text"], "Calorías de esta ensalada");
    }

    #[test]
    fn test_with_base_url_uses_config_defaults() {
        let provider = GoogleProvider::with_base_url(
            "key".to_string(),
            "http://localhost".to_string(),
            "gemini-1.5-pro".to_string(),
        );
        let defaults = AppConfig::default();

        assert_eq!(provider.temperature, defaults.temperature);
        assert_eq!(provider.max_tokens, defaults.max_tokens);
        assert_eq!(provider.model, "gemini-1.5-pro");
        assert_eq!(provider.base_url, "http://localhost");

        let body = provider.request_body(&sample_request());
        assert_eq!(body["generationConfig"]["maxOutputTokens"], defaults.max_tokens);
    }

    #[test]
    fn test_candidate_text_joins_parts() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "| Food Item |" }, { "text": " Kcal |" }] }
            }]
        });
        assert_eq!(
            candidate_text(&body).as_deref(),
            Some("| Food Item | Kcal |")
        );
    }

    #[test]
    fn test_candidate_text_missing() {
        assert_eq!(candidate_text(&json!({ "candidates": [] })), None);
        let body = json!({ "candidates": [{ "content": { "parts": [{ "inline_data": {} }] } }] });
        assert_eq!(candidate_text(&body), None);
    }
}
