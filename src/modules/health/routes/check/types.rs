pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        Healthy { has_api_key: bool },
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Healthy { has_api_key } => (
                    StatusCode::OK,
                    Json(json!({
                        "status": "OK",
                        "message": "Nano Banana API is running",
                        "hasApiKey": has_api_key
                    })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {}

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            unreachable!()
        }
    }

    pub type Response = Result<Success, Error>;
}
