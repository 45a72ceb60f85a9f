use super::types::response;
use crate::utils::validation::{ALLOWED_IMAGE_TYPES, MAX_IMAGE_SIZE_BYTES};
use axum::response::IntoResponse;

pub async fn handler() -> impl IntoResponse {
    response::Success::Limits {
        max_image_size_bytes: MAX_IMAGE_SIZE_BYTES,
        allowed_image_types: ALLOWED_IMAGE_TYPES.to_vec(),
    }
}
