use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use ulid::Ulid;

#[derive(Debug)]
pub enum Error {
    FailedToCreateDirectory,
    FailedToPersist,
    FailedToRead,
}

/// An image received from a client, stored under the upload directory.
///
/// The file is removed when the value is dropped, so every exit path of the
/// request that owns it leaves the directory as it found it.
#[derive(Debug)]
pub struct Upload {
    pub path: PathBuf,
    pub mime_type: String,
    pub size_bytes: u64,
    pub original_name: String,
}

impl Upload {
    pub async fn receive(
        dir: &Path,
        contents: NamedTempFile,
        original_name: Option<String>,
        mime_type: String,
    ) -> Result<Self, Error> {
        tokio::fs::create_dir_all(dir).await.map_err(|err| {
            tracing::error!("Failed to create upload directory: {:?}", err);
            Error::FailedToCreateDirectory
        })?;

        let original_name = original_name.unwrap_or_else(|| String::from("image"));
        let path = dir.join(file_name_for(&original_name));

        // persist() is a rename, which fails across file systems
        if let Err(err) = contents.persist(&path) {
            tracing::debug!("Falling back to copying the upload: {:?}", err.error);
            copy_or_discard(err.file.path(), &path).await?;
        }

        let mut upload = Upload {
            path,
            mime_type,
            size_bytes: 0,
            original_name,
        };

        upload.size_bytes = tokio::fs::metadata(&upload.path)
            .await
            .map_err(|err| {
                tracing::error!("Failed to inspect uploaded file: {:?}", err);
                Error::FailedToRead
            })?
            .len();

        Ok(upload)
    }

    pub async fn read(&self) -> Result<Vec<u8>, Error> {
        tokio::fs::read(&self.path).await.map_err(|err| {
            tracing::error!("Failed to read the uploaded file {:?}", err);
            Error::FailedToRead
        })
    }
}

impl Drop for Upload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(_) => tracing::debug!("Removed temporary upload {}", self.path.display()),
            Err(err) => tracing::warn!(
                "Failed to remove temporary upload {}: {:?}",
                self.path.display(),
                err
            ),
        }
    }
}

/// Copies `from` to `to`, removing whatever part of `to` was written when the
/// copy fails.
async fn copy_or_discard(from: &Path, to: &Path) -> Result<(), Error> {
    if let Err(err) = tokio::fs::copy(from, to).await {
        tracing::error!("Failed to save uploaded file: {:?}", err);

        match tokio::fs::remove_file(to).await {
            Ok(_) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => tracing::warn!(
                "Failed to remove partial upload {}: {:?}",
                to.display(),
                err
            ),
        }

        return Err(Error::FailedToPersist);
    }

    Ok(())
}

fn file_name_for(original_name: &str) -> String {
    format!(
        "{}-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        Ulid::new(),
        sanitize(original_name)
    )
}

/// Keeps the last path component and replaces anything outside `[A-Za-z0-9._-]`.
fn sanitize(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim_start_matches('.');

    let cleaned = base
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect::<String>();

    match cleaned.is_empty() {
        true => String::from("image"),
        false => cleaned,
    }
}
