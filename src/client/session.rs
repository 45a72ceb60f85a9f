use super::{decode_data_url, Camera, Error, ImageSelection, MediaStream};
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum State {
    Idle,
    ImageSelected,
    Ready,
    Submitting,
    Result,
    Error(String),
}

enum Phase {
    Editing,
    Submitting,
    Finished,
    Failed(String),
}

#[derive(Deserialize)]
struct GenerateResponse {
    image: Option<String>,
    error: Option<String>,
    details: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    has_api_key: bool,
}

/// Client-side state for one user: the pending image, the prompt, the open
/// camera stream and the last generated image.
pub struct Session {
    client: Client,
    server_url: String,
    selection: Option<ImageSelection>,
    prompt: String,
    stream: Option<Box<dyn MediaStream>>,
    result: Option<String>,
    phase: Phase,
}

impl Session {
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url: String = server_url.into();

        Self {
            client: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
            selection: None,
            prompt: String::new(),
            stream: None,
            result: None,
            phase: Phase::Editing,
        }
    }

    pub fn state(&self) -> State {
        match &self.phase {
            Phase::Submitting => State::Submitting,
            Phase::Finished => State::Result,
            Phase::Failed(message) => State::Error(message.clone()),
            Phase::Editing => match (&self.selection, self.has_prompt()) {
                (None, _) => State::Idle,
                (Some(_), false) => State::ImageSelected,
                (Some(_), true) => State::Ready,
            },
        }
    }

    pub fn can_submit(&self) -> bool {
        self.selection.is_some() && self.has_prompt()
    }

    pub fn selection(&self) -> Option<&ImageSelection> {
        self.selection.as_ref()
    }

    /// Data URL of the last generated image.
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn is_camera_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Replaces the pending image. Any previous result is discarded.
    pub fn select_image(&mut self, selection: ImageSelection) {
        self.selection = Some(selection);
        self.result = None;
        self.phase = Phase::Editing;
    }

    pub fn clear_image(&mut self) {
        self.selection = None;
        self.phase = Phase::Editing;
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
        if let Phase::Failed(_) = self.phase {
            self.phase = Phase::Editing;
        }
    }

    /// Acquires a stream from `camera`. Opening twice keeps the first stream.
    pub fn open_camera(&mut self, camera: &mut dyn Camera) -> Result<(), Error> {
        if self.stream.is_some() {
            return Ok(());
        }

        self.stream = Some(camera.open().map_err(|err| {
            tracing::warn!("Failed to open camera: {}", err);
            err
        })?);

        Ok(())
    }

    pub fn close_camera(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
    }

    /// Takes a frame from the open camera, releases the camera and selects
    /// the frame as the pending image.
    pub fn capture_photo(&mut self) -> Result<(), Error> {
        let mut stream = self.stream.take().ok_or(Error::CameraClosed)?;
        let frame = stream.capture_frame();
        stream.stop();

        let selection = ImageSelection::new(frame?, "image/png", "captured.png")?;
        self.select_image(selection);

        Ok(())
    }

    pub async fn check_health(&self) -> Result<bool, Error> {
        let health = self
            .client
            .get(format!("{}/api/health", self.server_url))
            .send()
            .await?
            .error_for_status()?
            .json::<HealthResponse>()
            .await?;

        Ok(health.has_api_key)
    }

    /// Sends the pending image and prompt and waits for the generated image.
    pub async fn submit_generation(&mut self) -> Result<String, Error> {
        let selection = match self.selection.clone() {
            Some(selection) => selection,
            None => return Err(self.fail(Error::ImageRequired)),
        };

        if !self.has_prompt() {
            return Err(self.fail(Error::PromptRequired));
        }

        self.phase = Phase::Submitting;

        match self.send(selection).await {
            Ok(image) => {
                tracing::info!("Image generated");
                self.result = Some(image.clone());
                self.phase = Phase::Finished;
                Ok(image)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Writes the generated image to `dir` as `nano-banana-<millis>.png`.
    pub async fn download(&self, dir: &Path) -> Result<PathBuf, Error> {
        let data_url = self.result.as_deref().ok_or(Error::NothingToDownload)?;
        let (_, bytes) = decode_data_url(data_url)?;

        let path = dir.join(format!(
            "nano-banana-{}.png",
            chrono::Utc::now().timestamp_millis()
        ));
        tokio::fs::write(&path, bytes).await?;

        Ok(path)
    }

    /// Back to an empty form with the camera released.
    pub fn reset(&mut self) {
        self.close_camera();
        self.selection = None;
        self.prompt.clear();
        self.result = None;
        self.phase = Phase::Editing;
    }

    fn has_prompt(&self) -> bool {
        !self.prompt.trim().is_empty()
    }

    fn fail(&mut self, err: Error) -> Error {
        tracing::warn!("Generation failed: {}", err);
        self.phase = Phase::Failed(err.to_string());
        err
    }

    async fn send(&self, selection: ImageSelection) -> Result<String, Error> {
        let part = Part::bytes(selection.bytes)
            .file_name(selection.file_name)
            .mime_str(&selection.mime_type)?;

        let form = Form::new()
            .text("prompt", self.prompt.trim().to_string())
            .part("image", part);

        let res = self
            .client
            .post(format!("{}/api/generate", self.server_url))
            .multipart(form)
            .send()
            .await?;

        let status = res.status();
        let body = res.json::<GenerateResponse>().await.map_err(|err| {
            tracing::error!("Failed to decode server response ({}): {:?}", status, err);
            Error::Server(format!("Unexpected response from server ({})", status))
        })?;

        match (status.is_success(), body.image) {
            (true, Some(image)) => Ok(image),
            _ => Err(Error::Server(
                match (body.error, body.details) {
                    (Some(error), Some(details)) => format!("{}: {}", error, details),
                    (Some(error), None) => error,
                    _ => String::from("Failed to generate the image"),
                },
            )),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close_camera();
    }
}
