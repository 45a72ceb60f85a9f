use super::{
    service::service,
    types::{request, response},
};
use crate::types::Context;
use axum::{extract::State, response::IntoResponse};
use axum_typed_multipart::{TypedMultipart, TypedMultipartError};
use std::sync::Arc;

pub async fn handler(
    State(ctx): State<Arc<Context>>,
    body: Result<TypedMultipart<request::Body>, TypedMultipartError>,
) -> impl IntoResponse {
    match body {
        Ok(TypedMultipart(body)) => service(ctx, body).await,
        Err(err) => Err(response::Error::from(err)),
    }
}
