use axum::{http::StatusCode, Json};
use serde_json::json;
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

/// Largest image accepted from a client, shared by the server, the Rust
/// client and the browser (through `/api/generate/limits`).
pub const MAX_IMAGE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

pub const MAX_PROMPT_SIZE_BYTES: u64 = 1024 * 1024;

/// Room left in the request body for multipart framing.
pub const FORM_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Largest request body the router accepts: both fields at their caps.
pub const MAX_BODY_SIZE_BYTES: u64 =
    MAX_IMAGE_SIZE_BYTES + MAX_PROMPT_SIZE_BYTES + FORM_OVERHEAD_BYTES;

pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

pub fn is_allowed_image_type(mime_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&mime_type.trim().to_lowercase().as_str())
}

pub fn is_allowed_image_size(size_bytes: u64) -> bool {
    size_bytes <= MAX_IMAGE_SIZE_BYTES
}

pub fn validate_image_type(mime_type: &str) -> Result<(), ValidationError> {
    match is_allowed_image_type(mime_type) {
        true => Ok(()),
        false => Err(ValidationError::new("UNSUPPORTED_IMAGE_TYPE")
            .with_message(Cow::from("Unsupported file type. Only JPG, PNG and WEBP are allowed"))),
    }
}

/// Flattens the messages of every failed rule into one line.
pub fn describe(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("Invalid {}", field),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn into_response(errors: ValidationErrors) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": describe(&errors) })),
    )
}
