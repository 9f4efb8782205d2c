//! Booking contact form.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::{Result, StagedoorError};
use crate::mail::BookingInquiry;

use super::AppState;

/// Forward a booking inquiry to the merchant's inbox.
pub async fn send_booking_inquiry(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>> {
    let inquiry: BookingInquiry =
        serde_json::from_slice(&body).map_err(|_| StagedoorError::InvalidJson)?;
    state.mailer.send(inquiry).await?;
    Ok(Json(json!({ "status": "sent" })))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::handlers::testutil::{request, test_router, test_state};

    #[tokio::test]
    async fn test_inquiry_is_accepted() {
        let app = test_router(test_state());

        let body = Body::from(
            r#"{"name": "Promoter", "email": "promoter@example.com", "message": "Booking?"}"#,
        );
        let res = app.oneshot(request("POST", "/email", body)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_inquiry_rejected() {
        let app = test_router(test_state());
        let res = app
            .oneshot(request("POST", "/email", Body::from("{}")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
