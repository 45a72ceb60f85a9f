pub mod request {
    use crate::utils::validation::validate_image_type;
    use axum_typed_multipart::{FieldData, TryFromMultipart};
    use tempfile::NamedTempFile;
    use validator::Validate;

    // Field limits mirror MAX_PROMPT_SIZE_BYTES and MAX_IMAGE_SIZE_BYTES.
    #[derive(TryFromMultipart)]
    pub struct Body {
        #[form_data(limit = "1MiB")]
        pub prompt: Option<String>,
        #[form_data(limit = "5MiB")]
        pub image: Option<FieldData<NamedTempFile>>,
    }

    #[derive(Validate)]
    pub struct Image {
        #[validate(custom(code = "UNSUPPORTED_IMAGE_TYPE", function = "validate_image_type"))]
        pub content_type: String,
    }
}

pub mod response {
    use crate::utils::validation;
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use axum_typed_multipart::TypedMultipartError;
    use serde_json::json;
    use validator::ValidationErrors;

    pub enum Success {
        ImageGenerated(String),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::ImageGenerated(image) => (
                    StatusCode::OK,
                    Json(json!({
                        "success": true,
                        "image": image,
                        "message": "Image generated successfully"
                    })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        PromptRequired,
        ImageRequired,
        ImageTooLarge,
        PromptTooLarge,
        RequestTooLarge,
        InvalidRequestBody,
        FailedToValidate(ValidationErrors),
        FailedToProcessImage,
        NoImageProduced,
        FailedToGenerateImage(String),
    }

    impl From<TypedMultipartError> for Error {
        fn from(err: TypedMultipartError) -> Self {
            tracing::warn!("Failed to parse multipart body: {}", err);

            match err {
                TypedMultipartError::FieldTooLarge { field_name, .. } => match field_name.as_str() {
                    "image" => Self::ImageTooLarge,
                    "prompt" => Self::PromptTooLarge,
                    _ => Self::RequestTooLarge,
                },
                err => match err.get_status() {
                    StatusCode::PAYLOAD_TOO_LARGE => Self::RequestTooLarge,
                    _ => Self::InvalidRequestBody,
                },
            }
        }
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::PromptRequired => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "A prompt is required" })),
                )
                    .into_response(),
                Self::ImageRequired => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "An image is required" })),
                )
                    .into_response(),
                Self::ImageTooLarge => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "The image is too large",
                        "details": format!(
                            "Images may be at most {} bytes",
                            validation::MAX_IMAGE_SIZE_BYTES
                        )
                    })),
                )
                    .into_response(),
                Self::PromptTooLarge => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "The prompt is too long",
                        "details": format!(
                            "Prompts may be at most {} bytes",
                            validation::MAX_PROMPT_SIZE_BYTES
                        )
                    })),
                )
                    .into_response(),
                Self::RequestTooLarge => (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    Json(json!({ "error": "The request body is too large" })),
                )
                    .into_response(),
                Self::InvalidRequestBody => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid request body" })),
                )
                    .into_response(),
                Self::FailedToValidate(errors) => validation::into_response(errors).into_response(),
                Self::FailedToProcessImage => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to process the image" })),
                )
                    .into_response(),
                Self::NoImageProduced => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Failed to generate the image",
                        "details": "No image produced: the generation service did not return an image"
                    })),
                )
                    .into_response(),
                Self::FailedToGenerateImage(details) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Failed to generate the image",
                        "details": details
                    })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
