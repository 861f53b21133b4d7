//! Artist service

use std::sync::Arc;

use crate::domain::entities::{Artist, ArtistChanges, ArtistId, NewArtist};
use crate::domain::ports::ArtistRepository;
use crate::error::{AppError, DomainError};

/// Service for the artist catalogue
pub struct ArtistService<R>
where
    R: ArtistRepository + ?Sized,
{
    artists: Arc<R>,
}

impl<R> ArtistService<R>
where
    R: ArtistRepository + ?Sized,
{
    pub fn new(artists: Arc<R>) -> Self {
        Self { artists }
    }

    pub async fn list(&self, limit: Option<u64>, offset: u64) -> Result<Vec<Artist>, AppError> {
        Ok(self.artists.list(limit, offset).await?)
    }

    /// Case-insensitive substring search on name
    pub async fn search(&self, name: Option<&str>) -> Result<Vec<Artist>, AppError> {
        let query = name.map(str::trim).unwrap_or_default();
        if query.is_empty() {
            return Err(AppError::BadRequest(
                "The name query parameter is required".to_string(),
            ));
        }
        Ok(self.artists.search_by_name(query).await?)
    }

    pub async fn get(&self, id: &ArtistId) -> Result<Artist, AppError> {
        self.artists
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    pub async fn create(&self, new_artist: NewArtist) -> Result<Artist, AppError> {
        let artist = self.artists.create(&new_artist).await?;
        tracing::info!(artist_id = %artist.id, name = %artist.name, "Artist created");
        Ok(artist)
    }

    /// Replace the editable fields (agency and is_group)
    pub async fn update(&self, id: &ArtistId, changes: ArtistChanges) -> Result<Artist, AppError> {
        let artist = self.artists.update(id, &changes).await?;
        tracing::info!(artist_id = %id, "Artist updated");
        Ok(artist)
    }

    pub async fn delete(&self, id: &ArtistId) -> Result<(), AppError> {
        let artist = self.get(id).await?;
        if !self.artists.delete(id).await? {
            return Err(not_found(id).into());
        }
        tracing::info!(artist_id = %artist.id, name = %artist.name, "Artist deleted");
        Ok(())
    }
}

fn not_found(id: &ArtistId) -> DomainError {
    DomainError::NotFound(format!("Artist {} not found", id))
}
