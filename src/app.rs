use crate::{
    modules,
    types::{Config, Context, ToContext},
    utils::validation::MAX_BODY_SIZE_BYTES,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors, services::ServeDir, trace};

pub struct App {
    ctx: Arc<Context>,
    router: Router,
}

impl App {
    pub async fn new() -> Self {
        let ctx: Arc<Context> = Arc::new(Config::default().to_context().await);

        Self::from_context(ctx)
    }

    pub fn from_context(ctx: Arc<Context>) -> Self {
        let router = router(ctx.clone());

        Self { ctx, router }
    }

    pub async fn serve(self) -> std::io::Result<()> {
        let address = format!("{}:{}", self.ctx.app.host, self.ctx.app.port);
        let listener = TcpListener::bind(&address).await?;

        tracing::info!("Server running on http://{}", address);
        if !self.ctx.generation.has_api_key {
            tracing::warn!("GOOGLE_API_KEY is not set, image generation requests will fail");
        }

        axum::serve(listener, self.router).await
    }
}

pub fn router(ctx: Arc<Context>) -> Router {
    Router::new()
        .nest("/api", modules::get_router())
        .fallback_service(ServeDir::new(ctx.app.public_dir.clone()))
        .with_state(ctx)
        .layer(
            ServiceBuilder::new()
                .layer(trace::TraceLayer::new_for_http())
                .layer(
                    cors::CorsLayer::new()
                        .allow_methods([Method::OPTIONS, Method::GET, Method::POST])
                        .allow_headers([header::CONTENT_TYPE])
                        .allow_origin(cors::Any),
                )
                .layer(DefaultBodyLimit::max(MAX_BODY_SIZE_BYTES as usize)),
        )
}
