//! Admin image upload and retrieval.
//!
//! Uploads arrive as multipart form data carrying an `image` file part and
//! a `key` value. Accepted files are stored as `{key}.jpeg`; JPEG is the
//! only format allowed.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{Result, StagedoorError};
use crate::images::{is_jpeg, MAX_IMAGE_BYTES};

use super::AppState;

fn stored_name(key: &str) -> String {
    format!("{key}.jpeg")
}

pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>)> {
    let mut key: Option<String> = None;
    let mut image: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StagedoorError::ImageFile)?
    {
        match field.name() {
            Some("key") => {
                key = Some(field.text().await.map_err(|_| StagedoorError::ImageFile)?);
            }
            Some("image") => {
                image = Some(field.bytes().await.map_err(|_| StagedoorError::ImageFile)?);
            }
            _ => {}
        }
    }

    let data = image.ok_or(StagedoorError::ImageFile)?;
    let key = key
        .filter(|k| !k.is_empty())
        .ok_or(StagedoorError::InvalidFormValue)?;
    if data.len() > MAX_IMAGE_BYTES {
        return Err(StagedoorError::ImageTooLarge);
    }
    if !is_jpeg(&data) {
        return Err(StagedoorError::FileTypeNotAllowed);
    }

    let name = stored_name(&key);
    state.images.put(&name, data.to_vec()).await?;
    info!(name = %name, bytes = data.len(), "image stored");
    Ok((StatusCode::CREATED, Json(json!({ "name": name }))))
}

pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Response> {
    let data = state
        .images
        .get(&stored_name(&key))
        .await?
        .ok_or(StagedoorError::ImageNotFound)?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], data).into_response())
}

pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<StatusCode> {
    let name = stored_name(&key);
    state
        .images
        .get(&name)
        .await?
        .ok_or(StagedoorError::ImageNotFound)?;
    state.images.delete(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::body::Body;
    use axum::extract::ConnectInfo;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::handlers::testutil::{admin_request, test_router, test_state};

    const BOUNDARY: &str = "st4ged00r-test-boundary";
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

    fn form_body(key: Option<&str>, image: Option<&[u8]>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(key) = key {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"key\"\r\n\r\n{key}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(image) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; \
                     filename=\"upload.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(image);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(body: Vec<u8>) -> Request<Body> {
        let addr: SocketAddr = "10.0.0.1:40000".parse().unwrap();
        Request::builder()
            .method("POST")
            .uri("/image")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("authorization", "Bearer test-bearer")
            .extension(ConnectInfo(addr))
            .body(Body::from(body))
            .unwrap()
    }

    async fn error_code(res: axum::response::Response) -> String {
        let body = res.into_body().collect().await.unwrap().to_bytes();
        let value: Value = serde_json::from_slice(&body).unwrap();
        value["error"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_upload_then_fetch() {
        let app = test_router(test_state());

        let res = app
            .clone()
            .oneshot(upload_request(form_body(Some("poster"), Some(JPEG_MAGIC))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = res.into_body().collect().await.unwrap().to_bytes();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["name"], "poster.jpeg");

        let res = app
            .oneshot(admin_request("GET", "/image/poster", Body::empty()))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()["content-type"].to_str().unwrap(),
            "image/jpeg"
        );
        let body = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], JPEG_MAGIC);
    }

    #[tokio::test]
    async fn test_missing_file_part() {
        let app = test_router(test_state());
        let res = app
            .oneshot(upload_request(form_body(Some("poster"), None)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(res).await, "IMAGE_FILE_ERROR");
    }

    #[tokio::test]
    async fn test_missing_key_value() {
        let app = test_router(test_state());
        let res = app
            .clone()
            .oneshot(upload_request(form_body(None, Some(JPEG_MAGIC))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(res).await, "INVALID_FORM_VALUE");

        let res = app
            .oneshot(upload_request(form_body(Some(""), Some(JPEG_MAGIC))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(res).await, "INVALID_FORM_VALUE");
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected() {
        let app = test_router(test_state());
        let mut data = vec![0u8; 3_000_001];
        data[..4].copy_from_slice(JPEG_MAGIC);

        let res = app
            .oneshot(upload_request(form_body(Some("poster"), Some(&data))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_code(res).await,
            "IMAGE_MUST_BE_LESS_THAN_3_MEGABYTES"
        );
    }

    #[tokio::test]
    async fn test_non_jpeg_rejected() {
        let app = test_router(test_state());
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

        let res = app
            .oneshot(upload_request(form_body(Some("poster"), Some(&png))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(res).await, "FILE_TYPE_NOT_ALLOWED");
    }

    #[tokio::test]
    async fn test_delete_then_fetch_is_404() {
        let app = test_router(test_state());

        app.clone()
            .oneshot(upload_request(form_body(Some("poster"), Some(JPEG_MAGIC))))
            .await
            .unwrap();
        let res = app
            .clone()
            .oneshot(admin_request("DELETE", "/image/poster", Body::empty()))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = app
            .oneshot(admin_request("GET", "/image/poster", Body::empty()))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_code(res).await, "IMAGE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete_missing_image_is_404() {
        let app = test_router(test_state());
        let res = app
            .oneshot(admin_request("DELETE", "/image/nope", Body::empty()))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
