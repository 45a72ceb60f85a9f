use crate::{
    app,
    types::{AppContext, Context, GenerationContext, UploadContext},
    utils::generation::{ContentPart, Error, GenerationRequest, ImageGenerator},
};
use async_trait::async_trait;
use axum_test::TestServer;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Generator double returning a canned answer and recording what it saw.
pub struct StubGenerator {
    answer: Mutex<Option<Result<Vec<ContentPart>, Error>>>,
    calls: AtomicUsize,
    pub seen: Mutex<Vec<(String, Vec<u8>, String)>>,
}

impl StubGenerator {
    pub fn returning(parts: Vec<ContentPart>) -> Arc<Self> {
        Self::answering(Ok(parts))
    }

    pub fn failing(error: Error) -> Arc<Self> {
        Self::answering(Err(error))
    }

    fn answering(answer: Result<Vec<ContentPart>, Error>) -> Arc<Self> {
        Arc::new(Self {
            answer: Mutex::new(Some(answer)),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(vec![]),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for StubGenerator {
    async fn generate_content(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<ContentPart>, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((
            request.prompt.clone(),
            request.image_bytes.clone(),
            request.image_mime_type.clone(),
        ));

        self.answer
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(Error::RequestNotSent))
    }
}

pub fn create_test_context(
    generator: Arc<dyn ImageGenerator>,
    upload_dir: &Path,
    has_api_key: bool,
) -> Arc<Context> {
    Arc::new(Context {
        app: AppContext {
            host: String::from("127.0.0.1"),
            port: 0,
            public_dir: upload_dir.join("public"),
        },
        upload: UploadContext {
            dir: upload_dir.to_path_buf(),
        },
        generation: GenerationContext {
            has_api_key,
            generator,
        },
    })
}

pub fn create_test_server(ctx: Arc<Context>) -> TestServer {
    TestServer::new(app::router(ctx)).unwrap()
}

/// Files left behind in a directory, ignoring subdirectories.
pub fn leftover_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_file())
                .map(|entry| entry.file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default()
}
