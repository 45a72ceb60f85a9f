mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq)]
pub enum Error {
    MissingApiKey,
    RequestNotSent,
    InvalidHttpResponseStatusCode(u16),
    FailedToDecodeResponse,
    PromptBlocked(String),
    NoImageProduced,
}

impl Error {
    /// Message safe to hand back to a client: no credentials, no paths.
    pub fn detail(&self) -> String {
        match self {
            Self::MissingApiKey => String::from("The generation service is not configured"),
            Self::RequestNotSent => String::from("Could not reach the generation service"),
            Self::InvalidHttpResponseStatusCode(status) => {
                format!("The generation service responded with status {}", status)
            }
            Self::FailedToDecodeResponse => {
                String::from("The generation service returned an unreadable response")
            }
            Self::PromptBlocked(reason) => format!("The prompt was blocked: {}", reason),
            Self::NoImageProduced => String::from("The generation service did not return an image"),
        }
    }
}

pub struct GenerationRequest {
    pub prompt: String,
    pub image_bytes: Vec<u8>,
    pub image_mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// One fragment of a model response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Sends one prompt and one image to the model and returns the parts of
    /// its answer in order.
    async fn generate_content(&self, request: &GenerationRequest)
        -> Result<Vec<ContentPart>, Error>;
}

/// Runs a single generation and keeps the first inline image of the answer.
pub async fn generate(
    generator: &dyn ImageGenerator,
    request: &GenerationRequest,
) -> Result<InlineData, Error> {
    let parts = generator.generate_content(request).await?;

    first_inline_image(parts).ok_or_else(|| {
        tracing::warn!("Generation finished without an inline image");
        Error::NoImageProduced
    })
}

pub fn first_inline_image(parts: Vec<ContentPart>) -> Option<InlineData> {
    parts.into_iter().find_map(|part| part.inline_data)
}

pub fn to_data_url(image: &InlineData) -> String {
    format!("data:image/png;base64,{}", image.data)
}
