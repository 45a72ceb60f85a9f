use crate::utils::generation::{GeminiClient, ImageGenerator};
use async_trait::async_trait;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub host: String,
    pub port: u32,
    pub public_dir: PathBuf,
}

#[derive(Clone)]
pub struct UploadContext {
    pub dir: PathBuf,
}

#[derive(Clone)]
pub struct GenerationContext {
    pub has_api_key: bool,
    pub generator: Arc<dyn ImageGenerator>,
}

#[derive(Clone)]
pub struct Context {
    pub app: AppContext,
    pub upload: UploadContext,
    pub generation: GenerationContext,
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u32,
    pub public_dir: PathBuf,
}

#[derive(Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
}

#[derive(Clone)]
pub struct GenerationConfig {
    pub api_key: Option<String>,
    pub api_endpoint: String,
    pub model: String,
}

#[derive(Clone)]
pub struct Config {
    pub app: AppConfig,
    pub upload: UploadConfig,
    pub generation: GenerationConfig,
}

impl Default for Config {
    fn default() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u32>()
            .expect("Invalid PORT number");
        let public_dir = env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".to_string());
        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir().join("nano-banana-uploads"));
        let api_key = env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let api_endpoint = env::var("GEMINI_API_ENDPOINT")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string());
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash-image".to_string());

        Self {
            app: AppConfig {
                host,
                port,
                public_dir: PathBuf::from(public_dir),
            },
            upload: UploadConfig { dir: upload_dir },
            generation: GenerationConfig {
                api_key,
                api_endpoint,
                model,
            },
        }
    }
}

#[async_trait]
pub trait ToContext {
    async fn to_context(self) -> Context;
}

#[async_trait]
impl ToContext for Config {
    async fn to_context(self) -> Context {
        if let Err(err) = tokio::fs::create_dir_all(&self.upload.dir).await {
            tracing::warn!(
                "Failed to create upload directory {}: {:?}",
                self.upload.dir.display(),
                err
            );
        }

        let has_api_key = self.generation.api_key.is_some();
        let generator = GeminiClient::new(
            self.generation.api_key,
            self.generation.api_endpoint,
            self.generation.model,
        );

        Context {
            app: AppContext {
                host: self.app.host,
                port: self.app.port,
                public_dir: self.app.public_dir,
            },
            upload: UploadContext {
                dir: self.upload.dir,
            },
            generation: GenerationContext {
                has_api_key,
                generator: Arc::new(generator),
            },
        }
    }
}
