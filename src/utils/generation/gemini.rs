use super::{ContentPart, Error, GenerationRequest, ImageGenerator};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Calls the Gemini `generateContent` endpoint with an API key.
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    api_endpoint: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, api_endpoint: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
            model,
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_endpoint, self.model)
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate_content(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<ContentPart>, Error> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            tracing::error!("Cannot generate an image without GOOGLE_API_KEY");
            Error::MissingApiKey
        })?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    ContentPart::text(request.prompt.clone()),
                    ContentPart::inline_data(
                        request.image_mime_type.clone(),
                        BASE64_STANDARD.encode(&request.image_bytes),
                    ),
                ],
            }],
        };

        tracing::info!("Generating image with {}", self.model);

        let res = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                tracing::error!("Failed to send generation request: {:?}", err.without_url());
                Error::RequestNotSent
            })?;

        let status = res.status();
        if !status.is_success() {
            let data = res.text().await.unwrap_or_default();
            tracing::error!("Generation request failed with {}: {}", status, data);
            return Err(Error::InvalidHttpResponseStatusCode(status.as_u16()));
        }

        let data = res
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| {
                tracing::error!("Failed to decode generation response: {:?}", err);
                Error::FailedToDecodeResponse
            })?;

        if let Some(reason) = data.prompt_feedback.and_then(|feedback| feedback.block_reason) {
            tracing::warn!("Prompt blocked by the model: {}", reason);
            return Err(Error::PromptBlocked(reason));
        }

        Ok(data
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .unwrap_or_default())
    }
}
