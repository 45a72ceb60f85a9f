use super::types::{request, response};
use crate::{
    types::Context,
    utils::{
        generation::{self, GenerationRequest},
        upload::Upload,
    },
};
use std::sync::Arc;
use validator::Validate;

pub async fn service(ctx: Arc<Context>, body: request::Body) -> response::Response {
    let prompt = body
        .prompt
        .map(|prompt| prompt.trim().to_string())
        .filter(|prompt| !prompt.is_empty())
        .ok_or(response::Error::PromptRequired)?;

    let image = body.image.ok_or(response::Error::ImageRequired)?;

    let content_type = image.metadata.content_type.clone().unwrap_or_default();
    request::Image { content_type }.validate().map_err(|errors| {
        tracing::warn!("Failed to validate image: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    let upload = Upload::receive(
        &ctx.upload.dir,
        image.contents,
        image.metadata.file_name,
        image
            .metadata
            .content_type
            .unwrap_or_default()
            .trim()
            .to_lowercase(),
    )
    .await
    .map_err(|err| {
        tracing::error!("Failed to store upload: {:?}", err);
        response::Error::FailedToProcessImage
    })?;

    let image_bytes = upload.read().await.map_err(|err| {
        tracing::error!("Failed to load upload: {:?}", err);
        response::Error::FailedToProcessImage
    })?;

    let request = GenerationRequest {
        prompt,
        image_bytes,
        image_mime_type: upload.mime_type.clone(),
    };

    let result = generation::generate(ctx.generation.generator.as_ref(), &request).await;

    // the temporary file goes away before the response is built
    drop(upload);

    result
        .map(|image| response::Success::ImageGenerated(generation::to_data_url(&image)))
        .map_err(|err| match err {
            generation::Error::NoImageProduced => response::Error::NoImageProduced,
            err => {
                tracing::error!("Failed to generate image: {:?}", err);
                response::Error::FailedToGenerateImage(err.detail())
            }
        })
}
