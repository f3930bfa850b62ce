use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a playable track as issued by the media server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u32);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an album as issued by the media server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlbumId(pub u32);

impl fmt::Display for AlbumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AlbumId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(AlbumId)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ArtistName {
    #[serde(default)]
    pub artist_name: String,
}

/// Entry of the `/albums` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub album_id: AlbumId,
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default)]
    pub album_art: Option<String>,
    #[serde(default)]
    pub album_rating: Option<f64>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub artist: Vec<ArtistName>,
}

impl AlbumSummary {
    pub fn display_name(&self) -> &str {
        display_or(&self.album_name, "Unknown Album")
    }

    pub fn artist_line(&self) -> String {
        self.artist
            .iter()
            .map(|a| a.artist_name.trim())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Track row of an album detail response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(alias = "music_id")]
    pub id: TrackId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "artists", deserialize_with = "artist_names")]
    pub artist: Option<String>,
    #[serde(default, alias = "tracknumber")]
    pub track_number: Option<u32>,
}

impl Track {
    pub fn display_title(&self) -> &str {
        display_or(&self.title, "Untitled")
    }
}

/// Response of `/album/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumDetail {
    #[serde(default)]
    pub album_id: Option<AlbumId>,
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default, deserialize_with = "artist_names")]
    pub album_artists: Option<String>,
    #[serde(default)]
    pub album_art: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub tracks: Vec<Track>,
}

impl AlbumDetail {
    pub fn display_name(&self) -> &str {
        display_or(&self.album_name, "Unknown Album")
    }

    /// Tracks in play order: by track number, unnumbered tracks last, ties by id.
    pub fn ordered_tracks(&self) -> Vec<Track> {
        let mut tracks = self.tracks.clone();
        tracks.sort_by_key(|t| (t.track_number.is_none(), t.track_number, t.id));
        tracks
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomAlbum {
    pub album_id: AlbumId,
}

/// One candidate of a comparison round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonAlbum {
    #[serde(alias = "id")]
    pub album_id: AlbumId,
    #[serde(default, alias = "name")]
    pub album_name: Option<String>,
    #[serde(default, alias = "art")]
    pub album_art: Option<String>,
    #[serde(default, deserialize_with = "artist_names")]
    pub album_artists: Option<String>,
    #[serde(default, alias = "rating")]
    pub album_rating: Option<f64>,
}

impl ComparisonAlbum {
    pub fn display_name(&self) -> &str {
        display_or(&self.album_name, "Unknown Album")
    }
}

/// The two albums offered in one voting round.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonPair {
    pub left: ComparisonAlbum,
    pub right: ComparisonAlbum,
}

impl ComparisonPair {
    pub fn contains(&self, id: AlbumId) -> bool {
        self.left.album_id == id || self.right.album_id == id
    }

    pub fn albums(&self) -> [&ComparisonAlbum; 2] {
        [&self.left, &self.right]
    }

    /// The album that was not picked when `winner` is picked.
    pub fn opponent_of(&self, winner: AlbumId) -> Option<AlbumId> {
        if self.left.album_id == winner {
            Some(self.right.album_id)
        } else if self.right.album_id == winner {
            Some(self.left.album_id)
        } else {
            None
        }
    }
}

/// `/compare_albums` has shipped both a wrapped and a bare list shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ComparisonResponse {
    Wrapped { albums: Vec<ComparisonAlbum> },
    Bare(Vec<ComparisonAlbum>),
}

impl ComparisonResponse {
    pub(crate) fn into_pair(self) -> Option<ComparisonPair> {
        let albums = match self {
            Self::Wrapped { albums } => albums,
            Self::Bare(albums) => albums,
        };
        let mut albums = albums.into_iter();
        let left = albums.next()?;
        let right = albums.next()?;
        Some(ComparisonPair { left, right })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub winner_id: AlbumId,
    pub loser_id: AlbumId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RatingUpdateResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub winner_new_elo: Option<f64>,
    #[serde(default)]
    pub loser_new_elo: Option<f64>,
}

pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(value) if value.is_finite() => format!("{}", value.round() as i64),
        _ => "unrated".to_string(),
    }
}

fn display_or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ArtistField {
    Joined(String),
    Names(Vec<String>),
    Records(Vec<ArtistName>),
}

/// Artist fields arrive as a joined string, a list of names, or a list of
/// `{artist_name}` records depending on the endpoint.
fn artist_names<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let joined = match Option::<ArtistField>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(ArtistField::Joined(text)) => text.trim().to_string(),
        Some(ArtistField::Names(names)) => join_names(names.iter().map(String::as_str)),
        Some(ArtistField::Records(records)) => {
            join_names(records.iter().map(|r| r.artist_name.as_str()))
        }
    };
    Ok(if joined.is_empty() { None } else { Some(joined) })
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn album_listing_accepts_null_artists() {
        let json = r#"[
            {"album_id": 3, "album_name": "Blue", "album_art": null, "album_rating": 1016, "artist": [{"artist_name": "Joni Mitchell"}]},
            {"album_id": 4, "album_name": null, "album_art": null, "album_rating": 1000, "artist": null}
        ]"#;
        let albums: Vec<AlbumSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(albums[0].artist_line(), "Joni Mitchell");
        assert!(albums[1].artist.is_empty());
        assert_eq!(albums[1].display_name(), "Unknown Album");
    }

    #[test]
    fn album_detail_reads_server_key_names() {
        let json = r#"{
            "album_id": 7,
            "album_name": "Kind of Blue",
            "album_art": "/art/7.jpg",
            "album_artists": [],
            "tracks": [
                {"music_id": 12, "tracknumber": 2, "title": "Freddie Freeloader", "artists": [{"artist_name": "Miles Davis"}]},
                {"music_id": 11, "tracknumber": 1, "title": "So What", "artists": [{"artist_name": "Miles Davis"}, {"artist_name": "John Coltrane"}]},
                {"music_id": 19, "title": "Bonus"}
            ]
        }"#;
        let album: AlbumDetail = serde_json::from_str(json).unwrap();
        assert_eq!(album.album_artists, None);
        let ordered: Vec<TrackId> = album.ordered_tracks().iter().map(|t| t.id).collect();
        assert_eq!(ordered, vec![TrackId(11), TrackId(12), TrackId(19)]);
        assert_eq!(
            album.tracks[1].artist.as_deref(),
            Some("Miles Davis, John Coltrane")
        );
    }

    #[test]
    fn album_detail_accepts_documented_shape() {
        let json = r#"{
            "album_name": "Blue",
            "album_artists": "Joni Mitchell",
            "album_art": null,
            "tracks": [{"id": 1, "title": "All I Want", "artist": "Joni Mitchell", "track_number": 1}]
        }"#;
        let album: AlbumDetail = serde_json::from_str(json).unwrap();
        assert_eq!(album.album_artists.as_deref(), Some("Joni Mitchell"));
        assert_eq!(album.tracks[0].id, TrackId(1));
        assert_eq!(album.tracks[0].track_number, Some(1));
    }

    #[test]
    fn comparison_response_accepts_both_shapes() {
        let wrapped = r#"{"albums": [
            {"album_id": 5, "album_name": "A", "album_rating": 1000, "album_artists": ["X"]},
            {"album_id": 9, "album_name": "B", "album_rating": 1032, "album_artists": []}
        ]}"#;
        let bare = r#"[
            {"id": 5, "name": "A", "art": null, "rating": 1000},
            {"id": 9, "name": "B", "art": null, "rating": 1032}
        ]"#;
        for json in [wrapped, bare] {
            let response: ComparisonResponse = serde_json::from_str(json).unwrap();
            let pair = response.into_pair().unwrap();
            assert_eq!(pair.left.album_id, AlbumId(5));
            assert_eq!(pair.right.album_id, AlbumId(9));
            assert_eq!(pair.opponent_of(AlbumId(9)), Some(AlbumId(5)));
            assert_eq!(pair.opponent_of(AlbumId(1)), None);
        }
    }

    #[test]
    fn comparison_response_needs_two_albums() {
        let response: ComparisonResponse =
            serde_json::from_str(r#"{"albums": [{"album_id": 5}]}"#).unwrap();
        assert!(response.into_pair().is_none());
    }

    #[test]
    fn rating_update_serializes_plain_numbers() {
        let body = serde_json::to_value(RatingUpdate {
            winner_id: AlbumId(5),
            loser_id: AlbumId(9),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"winner_id": 5, "loser_id": 9}));
    }

    #[test]
    fn durations_format_as_minutes_and_seconds() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(61.9), "1:01");
        assert_eq!(format_duration(f64::NAN), "0:00");
        assert_eq!(format_rating(Some(1015.6)), "1016");
        assert_eq!(format_rating(None), "unrated");
    }
}
