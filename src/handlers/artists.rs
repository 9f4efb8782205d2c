//! Roster artist CRUD.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{Result, StagedoorError};
use crate::store::{Artist, ArtistPatch};

use super::AppState;

fn parse_id(raw: &str) -> Result<i32> {
    raw.parse().map_err(|_| StagedoorError::InvalidId)
}

pub async fn list_artists(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Artist>>> {
    let artists = state.store.artists().await?;
    Ok(Json(artists))
}

pub async fn get_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Artist>> {
    let id = parse_id(&id)?;
    let artist = state
        .store
        .artist(id)
        .await?
        .ok_or(StagedoorError::NotFound)?;
    Ok(Json(artist))
}

pub async fn create_artist(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Artist>)> {
    let artist: Artist = serde_json::from_slice(&body).map_err(|_| StagedoorError::InvalidJson)?;
    let created = state.store.create_artist(artist).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Artist>> {
    let id = parse_id(&id)?;
    let patch: ArtistPatch =
        serde_json::from_slice(&body).map_err(|_| StagedoorError::InvalidJson)?;

    let mut artist = state
        .store
        .artist(id)
        .await?
        .ok_or(StagedoorError::NotFound)?;
    artist.apply(patch);

    let updated = state.store.update_artist(artist).await?;
    Ok(Json(updated))
}

pub async fn delete_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id)?;
    state.store.delete_artist(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
