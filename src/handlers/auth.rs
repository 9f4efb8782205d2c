//! Admin sign-in.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{Result, StagedoorError};

use super::AppState;

#[derive(Debug, Deserialize)]
struct SignInRequest {
    username: String,
    password: String,
}

/// Exchange admin credentials for a session token.
pub async fn sign_in(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<Value>> {
    let credentials: SignInRequest =
        serde_json::from_slice(&body).map_err(|_| StagedoorError::InvalidJson)?;

    if !state
        .auth
        .credentials_match(&credentials.username, &credentials.password)
    {
        return Err(StagedoorError::InvalidCredentials);
    }

    let token = state.sessions.issue(&credentials.username);
    info!(username = %credentials.username, "admin signed in");
    Ok(Json(json!({ "token": token })))
}
