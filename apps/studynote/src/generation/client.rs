//! Text-generation backends.

use crate::config::GeminiConfig;
use crate::generation::error::GenerationError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

type Result<T> = std::result::Result<T, GenerationError>;

/// Turns a prompt into free text. One attempt per call, no retries.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.is_empty())
    }
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &GeminiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn endpoint(&self, api_key: &str) -> Result<Url> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        Url::parse_with_params(&url, &[("key", api_key)])
            .map_err(|e| GenerationError::Network(e.to_string()))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;
        let url = self.endpoint(api_key)?;

        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "sending generation request");
        let resp = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Backend { status, message });
        }

        let body: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        body.into_text().ok_or(GenerationError::MissingText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "hi" }],
            }],
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"contents":[{"parts":[{"text":"hi"}]}]}"#
        );
    }

    #[test]
    fn reply_text_is_first_part_of_first_candidate() {
        let raw = concat!(
            r#"{"candidates":[{"content":{"parts":[{"text":"one"},{"text":"two"}]}},"#,
            r#"{"content":{"parts":[{"text":"three"}]}}]}"#,
        );
        let body: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(body.into_text().as_deref(), Some("one"));
    }

    #[test]
    fn missing_or_empty_text_is_none() {
        for raw in [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#,
        ] {
            let body: GenerateResponse = serde_json::from_str(raw).unwrap();
            assert_eq!(body.into_text(), None, "{raw}");
        }
    }

    #[test]
    fn endpoint_carries_model_and_key() {
        let client = GeminiClient::new(&GeminiConfig {
            api_key: Some("secret".to_string()),
            model: "gemini-1.5-flash".to_string(),
            base_url: "http://localhost:1234/v1beta/".to_string(),
        });
        let url = client.endpoint("secret").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:1234/v1beta/models/gemini-1.5-flash:generateContent?key=secret"
        );
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let client = GeminiClient::new(&GeminiConfig {
            api_key: None,
            model: "m".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
        });
        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::MissingApiKey));
    }
}
