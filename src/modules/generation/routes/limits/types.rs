pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        Limits {
            max_image_size_bytes: u64,
            allowed_image_types: Vec<&'static str>,
        },
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Limits {
                    max_image_size_bytes,
                    allowed_image_types,
                } => (
                    StatusCode::OK,
                    Json(json!({
                        "maxImageSizeBytes": max_image_size_bytes,
                        "allowedImageTypes": allowed_image_types
                    })),
                )
                    .into_response(),
            }
        }
    }
}
