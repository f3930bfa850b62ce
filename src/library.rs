//! Session-scoped library state shared between views.

use crate::api::{AlbumDetail, AlbumId, AlbumSummary, ApiError, Track, TrackId};
use crate::request::{RequestTracker, Ticket};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AlbumPage {
    #[default]
    Loading,
    Loaded(AlbumDetail),
    NotFound,
    Failed(String),
}

/// Album detail loading with stale-response suppression and a session
/// record of ids the server does not know.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlbumDetailState {
    requests: RequestTracker<AlbumId>,
    shown: Option<AlbumId>,
    page: AlbumPage,
    missing: HashSet<AlbumId>,
}

impl AlbumDetailState {
    pub fn page_for(&self, album_id: AlbumId) -> AlbumPage {
        if self.missing.contains(&album_id) {
            return AlbumPage::NotFound;
        }
        if self.shown == Some(album_id) {
            self.page.clone()
        } else {
            AlbumPage::Loading
        }
    }

    /// Switch to `album_id`. Returns a ticket when a request must be issued.
    pub fn open(&mut self, album_id: AlbumId) -> Option<Ticket<AlbumId>> {
        self.shown = Some(album_id);
        if self.missing.contains(&album_id) {
            self.requests.invalidate();
            self.page = AlbumPage::NotFound;
            return None;
        }
        self.page = AlbumPage::Loading;
        Some(self.requests.begin(album_id))
    }

    /// Forget pages and known-missing ids. Outstanding requests become stale.
    pub fn reset(&mut self) {
        self.requests.invalidate();
        self.shown = None;
        self.page = AlbumPage::Loading;
        self.missing.clear();
    }

    /// Like `finish`, and a current album is also added to `catalog`.
    pub fn finish_into(
        &mut self,
        ticket: Ticket<AlbumId>,
        result: Result<AlbumDetail, ApiError>,
        catalog: &mut TrackCatalog,
    ) -> bool {
        if !self.requests.is_current(&ticket) {
            return false;
        }
        if let Ok(album) = &result {
            catalog.remember_album(album);
        }
        self.finish(ticket, result)
    }

    /// Apply a response. Returns false when it was for a superseded request.
    pub fn finish(
        &mut self,
        ticket: Ticket<AlbumId>,
        result: Result<AlbumDetail, ApiError>,
    ) -> bool {
        if !self.requests.complete(&ticket) {
            return false;
        }
        self.page = match result {
            Ok(album) => AlbumPage::Loaded(album),
            Err(err) if err.is_not_found() => {
                self.missing.insert(*ticket.key());
                AlbumPage::NotFound
            }
            Err(err) => AlbumPage::Failed(err.to_string()),
        };
        true
    }
}

/// Display metadata for tracks that have entered the queue.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackInfo {
    pub title: String,
    pub artist: Option<String>,
    pub album_id: Option<AlbumId>,
    pub album_name: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackCatalog {
    tracks: HashMap<TrackId, TrackInfo>,
}

impl TrackCatalog {
    pub fn remember_album(&mut self, album: &AlbumDetail) {
        for track in &album.tracks {
            self.tracks.insert(track.id, Self::info_for(album, track));
        }
    }

    pub fn get(&self, id: TrackId) -> Option<&TrackInfo> {
        self.tracks.get(&id)
    }

    pub fn title_of(&self, id: TrackId) -> String {
        self.get(id)
            .map(|info| info.title.clone())
            .unwrap_or_else(|| format!("Track {id}"))
    }

    fn info_for(album: &AlbumDetail, track: &Track) -> TrackInfo {
        TrackInfo {
            title: track.display_title().to_string(),
            artist: track
                .artist
                .clone()
                .or_else(|| album.album_artists.clone()),
            album_id: album.album_id,
            album_name: album.display_name().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlbumSort {
    #[default]
    Rating,
    Name,
}

impl AlbumSort {
    pub fn label(self) -> &'static str {
        match self {
            Self::Rating => "Top Rated",
            Self::Name => "A-Z",
        }
    }
}

/// Search by album or artist name, then order the grid.
pub fn filter_albums(albums: &[AlbumSummary], query: &str, sort: AlbumSort) -> Vec<AlbumSummary> {
    let query = query.trim().to_lowercase();
    let mut filtered: Vec<AlbumSummary> = albums
        .iter()
        .filter(|album| {
            query.is_empty()
                || album.display_name().to_lowercase().contains(&query)
                || album.artist_line().to_lowercase().contains(&query)
        })
        .cloned()
        .collect();

    match sort {
        AlbumSort::Rating => filtered.sort_by(|a, b| {
            let a = a.album_rating.unwrap_or(f64::MIN);
            let b = b.album_rating.unwrap_or(f64::MIN);
            b.total_cmp(&a)
        }),
        AlbumSort::Name => filtered.sort_by_key(|a| a.display_name().to_lowercase()),
    }
    filtered
}
