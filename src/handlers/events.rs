//! Event listings, featured-artist metadata, and their admin CRUD.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{Result, StagedoorError};
use crate::store::{Event, EventPatch, FeaturedArtist, FeaturedArtistPatch};

use super::AppState;

fn parse_id(raw: &str) -> Result<i32> {
    raw.parse().map_err(|_| StagedoorError::InvalidId)
}

pub async fn list_events(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Event>>> {
    let events = state.store.events().await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Event>> {
    let id = parse_id(&id)?;
    let event = state
        .store
        .event(id)
        .await?
        .ok_or(StagedoorError::NotFound)?;
    Ok(Json(event))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Event>)> {
    let event: Event = serde_json::from_slice(&body).map_err(|_| StagedoorError::InvalidJson)?;
    let created = state.store.create_event(event).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Event>> {
    let id = parse_id(&id)?;
    let patch: EventPatch =
        serde_json::from_slice(&body).map_err(|_| StagedoorError::InvalidJson)?;

    let mut event = state
        .store
        .event(id)
        .await?
        .ok_or(StagedoorError::NotFound)?;
    event.apply(patch);

    let updated = state.store.update_event(event).await?;
    Ok(Json(updated))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id)?;
    state.store.delete_event(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_featured_artists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FeaturedArtist>>> {
    let featured = state.store.featured_artists().await?;
    Ok(Json(featured))
}

pub async fn create_featured_artist(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<FeaturedArtist>)> {
    let featured: FeaturedArtist =
        serde_json::from_slice(&body).map_err(|_| StagedoorError::InvalidJson)?;
    let created = state.store.create_featured_artist(featured).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_featured_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<FeaturedArtist>> {
    let id = parse_id(&id)?;
    let patch: FeaturedArtistPatch =
        serde_json::from_slice(&body).map_err(|_| StagedoorError::InvalidJson)?;

    let mut featured = state
        .store
        .featured_artist(id)
        .await?
        .ok_or(StagedoorError::NotFound)?;
    featured.apply(patch);

    let updated = state.store.update_featured_artist(featured).await?;
    Ok(Json(updated))
}

pub async fn delete_featured_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id)?;
    state.store.delete_featured_artist(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
