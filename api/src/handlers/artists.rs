//! Artist handlers
//!
//! The artist catalogue is open: none of these routes need a login.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::articles::PageQuery;
use crate::domain::entities::{Artist, ArtistChanges, ArtistId, NewArtist};
use crate::error::AppError;
use crate::AppState;

/// One row of the artist list
#[derive(Debug, Serialize)]
pub struct ArtistListItem {
    pub id: i64,
    pub name: String,
    pub debut_date: NaiveDate,
}

impl From<Artist> for ArtistListItem {
    fn from(artist: Artist) -> Self {
        Self {
            id: artist.id.0,
            name: artist.name,
            debut_date: artist.debut_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArtistResponse {
    pub id: i64,
    pub name: String,
    pub agency: String,
    pub debut_date: NaiveDate,
    pub is_group: bool,
}

impl From<Artist> for ArtistResponse {
    fn from(artist: Artist) -> Self {
        Self {
            id: artist.id.0,
            name: artist.name,
            agency: artist.agency,
            debut_date: artist.debut_date,
            is_group: artist.is_group,
        }
    }
}

/// Request to create an artist; `debut_date` is `YYYY-MM-DD`
#[derive(Debug, Deserialize)]
pub struct CreateArtistRequest {
    pub name: Option<String>,
    pub agency: Option<String>,
    pub debut_date: Option<String>,
    pub is_group: Option<bool>,
}

/// Only agency and is_group can change after creation
#[derive(Debug, Deserialize)]
pub struct UpdateArtistRequest {
    pub agency: Option<String>,
    pub is_group: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
}

/// POST /artists
pub async fn create_artist(
    State(state): State<AppState>,
    Json(request): Json<CreateArtistRequest>,
) -> Result<(StatusCode, Json<ArtistResponse>), AppError> {
    let new_artist = NewArtist::parse(
        request.name.as_deref(),
        request.agency.as_deref(),
        request.debut_date.as_deref(),
        request.is_group,
    )?;

    let artist = state.artist_service.create(new_artist).await?;

    Ok((StatusCode::CREATED, Json(artist.into())))
}

/// GET /artists
pub async fn list_artists(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<ArtistListItem>>, AppError> {
    let (limit, offset) = query.bounds()?;
    let artists = state.artist_service.list(limit, offset).await?;
    Ok(Json(artists.into_iter().map(ArtistListItem::from).collect()))
}

/// GET /artists/search?name=
///
/// Case-insensitive substring search on artist name.
pub async fn search_artists(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ArtistListItem>>, AppError> {
    let artists = state.artist_service.search(query.name.as_deref()).await?;
    Ok(Json(artists.into_iter().map(ArtistListItem::from).collect()))
}

/// GET /artists/:id
pub async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ArtistResponse>, AppError> {
    let artist = state.artist_service.get(&ArtistId(id)).await?;
    Ok(Json(artist.into()))
}

/// PUT /artists/:id
///
/// Replace agency and is_group. Answers 202 Accepted.
pub async fn update_artist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateArtistRequest>,
) -> Result<(StatusCode, Json<ArtistResponse>), AppError> {
    let changes = ArtistChanges::parse(request.agency.as_deref(), request.is_group)?;

    let artist = state
        .artist_service
        .update(&ArtistId(id), changes)
        .await?;

    Ok((StatusCode::ACCEPTED, Json(artist.into())))
}

/// DELETE /artists/:id
pub async fn delete_artist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.artist_service.delete(&ArtistId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
