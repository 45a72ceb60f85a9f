//! Form controller for talking to a Nano Banana server.
//!
//! A [`Session`] owns at most one pending image selection and at most one open
//! camera stream, and exposes the actions a front-end binds to: selecting an
//! image, capturing a photo, submitting a generation and resetting the form.

mod camera;
mod image;
mod session;

pub use camera::{Camera, MediaStream};
pub use image::{decode_data_url, ImageSelection};
pub use session::{Session, State};

use crate::utils::validation::MAX_IMAGE_SIZE_BYTES;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("An image is required")]
    ImageRequired,
    #[error("Please describe what you want to see")]
    PromptRequired,
    #[error("Unsupported file type. Only JPG, PNG and WEBP are allowed")]
    UnsupportedImageType,
    #[error("The image is larger than {} bytes", MAX_IMAGE_SIZE_BYTES)]
    ImageTooLarge,
    #[error("Not a base64 data URL")]
    InvalidDataUrl,
    #[error("Could not access the camera: {0}")]
    Camera(String),
    #[error("The camera is not open")]
    CameraClosed,
    #[error("There is no generated image yet")]
    NothingToDownload,
    #[error("{0}")]
    Server(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
