use crate::api::config::ApiConfig;
use crate::api::error::{ApiError, Result};
use crate::api::models::*;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Thin client over the media server's REST endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaClient {
    pub config: ApiConfig,
}

impl MediaClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    /// URL handed straight to the audio element; the server answers range requests.
    pub fn stream_url(&self, track_id: TrackId) -> String {
        self.config.endpoint(&format!("stream/{track_id}"))
    }

    pub async fn get_albums(&self) -> Result<Vec<AlbumSummary>> {
        let albums: Vec<AlbumSummary> = self.get_json("albums", "Album list").await?;
        debug!(albums = albums.len(), "Fetched album list");
        Ok(albums)
    }

    pub async fn get_album(&self, album_id: AlbumId) -> Result<AlbumDetail> {
        let mut album: AlbumDetail = self
            .get_json(&format!("album/{album_id}"), &format!("Album {album_id}"))
            .await?;
        album.album_id.get_or_insert(album_id);
        debug!(album_id = %album_id, tracks = album.tracks.len(), "Fetched album");
        Ok(album)
    }

    pub async fn get_random_album_id(&self) -> Result<AlbumId> {
        let random: RandomAlbum = self.get_json("random_album", "Random album").await?;
        Ok(random.album_id)
    }

    pub async fn get_comparison_pair(&self) -> Result<ComparisonPair> {
        let response: ComparisonResponse =
            self.get_json("compare_albums", "Comparison pair").await?;
        response
            .into_pair()
            .ok_or_else(|| ApiError::Decode("comparison needs two albums".into()))
    }

    pub async fn update_rating(&self, update: RatingUpdate) -> Result<RatingUpdateResponse> {
        let url = self.config.endpoint("update_rating");
        debug!(url = %url, winner = %update.winner_id, loser = %update.loser_id, "Posting vote");

        let response = HTTP_CLIENT.post(&url).json(&update).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %body, "Rating update rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        // Only the status matters; the body is informational.
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, resource: &str) -> Result<T> {
        let url = self.config.endpoint(path);
        debug!(url = %url, "GET");

        let response = HTTP_CLIENT.get(&url).send().await?;
        let status = response.status();

        if status.as_u16() == 404 {
            return Err(ApiError::NotFound {
                resource: resource.to_string(),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(format!("{resource}: {e}")))
    }
}
