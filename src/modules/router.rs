use super::{generation, health};
use crate::types::Context;
use axum::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .nest("/health", health::get_router())
        .nest("/generate", generation::get_router())
}
