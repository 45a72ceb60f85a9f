use super::Error;
use crate::utils::validation::{is_allowed_image_size, is_allowed_image_type};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use std::path::Path;

/// An image picked by the user, checked against the same limits the server
/// enforces.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSelection {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
}

impl ImageSelection {
    pub fn new(
        bytes: Vec<u8>,
        mime_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Result<Self, Error> {
        let mime_type: String = mime_type.into();
        let mime_type = mime_type.trim().to_lowercase();

        if !is_allowed_image_type(&mime_type) {
            return Err(Error::UnsupportedImageType);
        }

        if !is_allowed_image_size(bytes.len() as u64) {
            return Err(Error::ImageTooLarge);
        }

        Ok(Self {
            bytes,
            mime_type,
            file_name: file_name.into(),
        })
    }

    pub async fn from_path(path: &Path) -> Result<Self, Error> {
        let mime_type = path
            .extension()
            .and_then(|extension| extension.to_str())
            .and_then(mime_type_for_extension)
            .ok_or(Error::UnsupportedImageType)?;

        // checked before reading so an oversized file is never loaded
        let size_bytes = tokio::fs::metadata(path).await?.len();
        if !is_allowed_image_size(size_bytes) {
            return Err(Error::ImageTooLarge);
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| String::from("image"));

        Self::new(tokio::fs::read(path).await?, mime_type, file_name)
    }

    pub fn from_data_url(data_url: &str, file_name: impl Into<String>) -> Result<Self, Error> {
        let (mime_type, bytes) = decode_data_url(data_url)?;

        Self::new(bytes, mime_type, file_name)
    }
}

/// Splits `data:<mime>;base64,<payload>` into its MIME type and bytes.
pub fn decode_data_url(data_url: &str) -> Result<(String, Vec<u8>), Error> {
    let (header, payload) = data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or(Error::InvalidDataUrl)?;

    let mime_type = header
        .strip_suffix(";base64")
        .ok_or(Error::InvalidDataUrl)?;

    let bytes = BASE64_STANDARD
        .decode(payload.trim())
        .map_err(|_| Error::InvalidDataUrl)?;

    Ok((mime_type.to_string(), bytes))
}

fn mime_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
