use crate::{
    test_utils::{create_test_context, create_test_server, leftover_files, StubGenerator},
    utils::{
        generation::{ContentPart, Error},
        validation::{MAX_IMAGE_SIZE_BYTES, MAX_PROMPT_SIZE_BYTES},
    },
};
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::Value;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nnot really a png";

fn image(bytes: &[u8], mime_type: &str) -> Part {
    Part::bytes(bytes.to_vec())
        .file_name("selfie.png")
        .mime_type(mime_type)
}

#[tokio::test]
async fn returns_generated_image_as_png_data_url() {
    let dir = tempfile::tempdir().unwrap();
    let generator = StubGenerator::returning(vec![
        ContentPart::text("Here is your banana"),
        ContentPart::inline_data("image/png", "QUJD"),
    ]);
    let server = create_test_server(create_test_context(generator.clone(), dir.path(), true));

    let response = server
        .post("/api/generate")
        .multipart(
            MultipartForm::new()
                .add_text("prompt", "  put me on a beach  ")
                .add_part("image", image(PNG, "image/png")),
        )
        .await;

    response.assert_status(StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["image"], "data:image/png;base64,QUJD");
    assert!(body["message"].is_string());

    let seen = generator.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "put me on a beach");
    assert_eq!(seen[0].1, PNG);
    assert_eq!(seen[0].2, "image/png");
    assert!(leftover_files(dir.path()).is_empty());
}

#[tokio::test]
async fn answer_without_inline_image_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let generator = StubGenerator::returning(vec![ContentPart::text("Sorry")]);
    let server = create_test_server(create_test_context(generator.clone(), dir.path(), true));

    let response = server
        .post("/api/generate")
        .multipart(
            MultipartForm::new()
                .add_text("prompt", "make it pop")
                .add_part("image", image(PNG, "image/jpeg")),
        )
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert!(body["error"].is_string());
    assert!(body["details"]
        .as_str()
        .unwrap()
        .to_lowercase()
        .contains("no image produced"));
    assert_eq!(generator.calls(), 1);
    assert!(leftover_files(dir.path()).is_empty());
}

#[tokio::test]
async fn upstream_failure_is_server_error_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let generator = StubGenerator::failing(Error::InvalidHttpResponseStatusCode(503));
    let server = create_test_server(create_test_context(generator.clone(), dir.path(), true));

    let response = server
        .post("/api/generate")
        .multipart(
            MultipartForm::new()
                .add_text("prompt", "make it pop")
                .add_part("image", image(PNG, "image/webp")),
        )
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("503"));
    assert!(!details.contains(&dir.path().to_string_lossy().to_string()));
    assert!(leftover_files(dir.path()).is_empty());
}

#[tokio::test]
async fn empty_prompt_is_rejected_before_generation() {
    let dir = tempfile::tempdir().unwrap();
    let generator = StubGenerator::returning(vec![]);
    let server = create_test_server(create_test_context(generator.clone(), dir.path(), true));

    let response = server
        .post("/api/generate")
        .multipart(
            MultipartForm::new()
                .add_text("prompt", "   ")
                .add_part("image", image(PNG, "image/png")),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "A prompt is required");
    assert_eq!(generator.calls(), 0);
    assert!(leftover_files(dir.path()).is_empty());
}

#[tokio::test]
async fn missing_image_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let generator = StubGenerator::returning(vec![]);
    let server = create_test_server(create_test_context(generator.clone(), dir.path(), true));

    let response = server
        .post("/api/generate")
        .multipart(MultipartForm::new().add_text("prompt", "a banana"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "An image is required");
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn disallowed_image_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let generator = StubGenerator::returning(vec![]);
    let server = create_test_server(create_test_context(generator.clone(), dir.path(), true));

    let response = server
        .post("/api/generate")
        .multipart(
            MultipartForm::new()
                .add_text("prompt", "a banana")
                .add_part("image", image(b"GIF89a", "image/gif")),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"]
        .as_str()
        .unwrap()
        .contains("Unsupported file type"));
    assert_eq!(generator.calls(), 0);
    assert!(leftover_files(dir.path()).is_empty());
}

#[tokio::test]
async fn image_just_over_the_cap_is_rejected_and_removed() {
    let dir = tempfile::tempdir().unwrap();
    let generator = StubGenerator::returning(vec![]);
    let server = create_test_server(create_test_context(generator.clone(), dir.path(), true));
    let bytes = vec![0u8; MAX_IMAGE_SIZE_BYTES as usize + 1];

    let response = server
        .post("/api/generate")
        .multipart(
            MultipartForm::new()
                .add_text("prompt", "a banana")
                .add_part("image", image(&bytes, "image/png")),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "The image is too large");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains(&MAX_IMAGE_SIZE_BYTES.to_string()));
    assert_eq!(generator.calls(), 0);
    assert!(leftover_files(dir.path()).is_empty());
}

#[tokio::test]
async fn image_at_the_cap_is_accepted_with_a_long_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let generator = StubGenerator::returning(vec![ContentPart::inline_data("image/png", "QUJD")]);
    let server = create_test_server(create_test_context(generator.clone(), dir.path(), true));
    let bytes = vec![0u8; MAX_IMAGE_SIZE_BYTES as usize];
    let prompt = "a banana wearing sunglasses ".repeat(70 * 1024 / 27);

    let response = server
        .post("/api/generate")
        .multipart(
            MultipartForm::new()
                .add_text("prompt", prompt.clone())
                .add_part("image", image(&bytes, "image/png")),
        )
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>()["image"], "data:image/png;base64,QUJD");

    let seen = generator.seen.lock().unwrap();
    assert_eq!(seen[0].0, prompt.trim());
    assert_eq!(seen[0].1.len(), MAX_IMAGE_SIZE_BYTES as usize);
    assert!(leftover_files(dir.path()).is_empty());
}

#[tokio::test]
async fn prompt_over_its_cap_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let generator = StubGenerator::returning(vec![]);
    let server = create_test_server(create_test_context(generator.clone(), dir.path(), true));
    let prompt = "a".repeat(MAX_PROMPT_SIZE_BYTES as usize + 1);

    let response = server
        .post("/api/generate")
        .multipart(
            MultipartForm::new()
                .add_text("prompt", prompt)
                .add_part("image", image(PNG, "image/png")),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "The prompt is too long");
    assert_eq!(generator.calls(), 0);
    assert!(leftover_files(dir.path()).is_empty());
}

#[tokio::test]
async fn image_far_over_the_cap_is_rejected_while_streaming() {
    let dir = tempfile::tempdir().unwrap();
    let generator = StubGenerator::returning(vec![]);
    let server = create_test_server(create_test_context(generator.clone(), dir.path(), true));
    let bytes = vec![0u8; 2 * MAX_IMAGE_SIZE_BYTES as usize];

    let response = server
        .post("/api/generate")
        .multipart(
            MultipartForm::new()
                .add_text("prompt", "a banana")
                .add_part("image", image(&bytes, "image/png")),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "The image is too large");
    assert_eq!(generator.calls(), 0);
    assert!(leftover_files(dir.path()).is_empty());
}
