use crate::api::*;
use crate::components::views::NotFoundPanel;
use crate::components::{AppView, Icon, PlayerController};
use crate::db::AppSettings;
use crate::library::{AlbumDetailState, AlbumPage, TrackCatalog};
use dioxus::prelude::*;
use tracing::warn;

#[component]
pub fn AlbumDetailView(album_id: AlbumId) -> Element {
    let settings = use_context::<Signal<AppSettings>>();
    let mut details = use_context::<Signal<AlbumDetailState>>();
    let mut catalog = use_context::<Signal<TrackCatalog>>();
    let player = use_context::<PlayerController>();

    // Re-run whenever the route points at another album.
    use_effect(use_reactive((&album_id,), move |(album_id,)| {
        let Some(ticket) = details.with_mut(|d| d.open(album_id)) else {
            return;
        };
        let client = MediaClient::new(settings.peek().api_config());
        spawn(async move {
            let result = client.get_album(album_id).await;
            if let Err(err) = &result {
                if !err.is_not_found() {
                    warn!(album_id = %album_id, error = %err, "Failed to load album");
                }
            }
            details.with_mut(|d| catalog.with_mut(|c| d.finish_into(ticket, result, c)));
        });
    }));

    let page = details.read().page_for(album_id);

    rsx! {
        div { class: "space-y-8",
            Link {
                class: "flex items-center gap-2 text-zinc-400 hover:text-white transition-colors mb-4",
                to: AppView::AlbumsView {},
                Icon { name: "prev".to_string(), class: "w-4 h-4".to_string() }
                "Back to Albums"
            }

            {match page {
                AlbumPage::Loaded(album) => rsx! {
                    AlbumTracks { album, player }
                },
                AlbumPage::NotFound => rsx! {
                    NotFoundPanel { message: format!("Album {album_id} does not exist.") }
                },
                AlbumPage::Failed(message) => rsx! {
                    div { class: "flex flex-col items-center justify-center py-20",
                        Icon { name: "x".to_string(), class: "w-12 h-12 text-rose-400 mb-4".to_string() }
                        p { class: "text-zinc-300", "Could not load this album" }
                        p { class: "text-zinc-500 text-sm mt-2", "{message}" }
                    }
                },
                AlbumPage::Loading => rsx! {
                    div { class: "flex items-center justify-center py-20",
                        Icon { name: "loader".to_string(), class: "w-8 h-8 text-zinc-500".to_string() }
                    }
                },
            }}
        }
    }
}

#[component]
fn AlbumTracks(album: AlbumDetail, player: PlayerController) -> Element {
    let tracks = album.ordered_tracks();
    let track_ids: Vec<TrackId> = tracks.iter().map(|t| t.id).collect();
    let now_playing = player.queue.read().current();

    let play_from = move |start: usize| {
        let mut player = player;
        let track_ids = track_ids.clone();
        move |_: MouseEvent| {
            if let Err(err) = player.play_album(&track_ids, start) {
                warn!(error = %err, "Cannot start album playback");
            }
        }
    };

    rsx! {
        div { class: "flex flex-col md:flex-row gap-8 mb-8",
            div { class: "w-64 h-64 rounded-2xl bg-zinc-800 overflow-hidden shadow-2xl flex-shrink-0",
                {match &album.album_art {
                    Some(url) => rsx! {
                        img { class: "w-full h-full object-cover", src: "{url}" }
                    },
                    None => rsx! {
                        div { class: "w-full h-full flex items-center justify-center bg-gradient-to-br from-zinc-700 to-zinc-800",
                            Icon { name: "album".to_string(), class: "w-20 h-20 text-zinc-500".to_string() }
                        }
                    },
                }}
            }
            div { class: "flex flex-col justify-end",
                p { class: "text-sm text-zinc-400 uppercase tracking-wide mb-2", "Album" }
                h1 { class: "text-4xl font-bold text-white mb-4", "{album.display_name()}" }
                if let Some(artists) = &album.album_artists {
                    p { class: "text-lg text-zinc-300 mb-2", "{artists}" }
                }
                div { class: "flex items-center gap-4 text-sm text-zinc-400",
                    span { "{tracks.len()} tracks" }
                }
                if !tracks.is_empty() {
                    div { class: "flex gap-3 mt-6",
                        button {
                            class: "px-8 py-3 rounded-full bg-emerald-500 hover:bg-emerald-400 text-white font-medium transition-colors flex items-center gap-2",
                            onclick: play_from(0),
                            Icon { name: "play".to_string(), class: "w-5 h-5".to_string() }
                            "Play"
                        }
                    }
                }
            }
        }

        if tracks.is_empty() {
            p { class: "text-zinc-500", "This album has no tracks." }
        }

        div { class: "space-y-1",
            for (index, track) in tracks.iter().enumerate() {
                {
                    let is_current = now_playing == Some(track.id);
                    rsx! {
                        button {
                            key: "{row_key(index, track)}",
                            class: if is_current { "w-full flex items-center gap-4 p-3 rounded-xl bg-emerald-500/10 text-left" } else { "w-full flex items-center gap-4 p-3 rounded-xl hover:bg-zinc-800/50 transition-colors text-left group" },
                            onclick: play_from(index),
                            span { class: "w-8 text-center text-sm text-zinc-500",
                                {track.track_number.map(|n| n.to_string()).unwrap_or_else(|| (index + 1).to_string())}
                            }
                            div { class: "min-w-0 flex-1",
                                p { class: if is_current { "text-emerald-400 font-medium truncate" } else { "text-white truncate group-hover:text-emerald-400" },
                                    "{track.display_title()}"
                                }
                                if let Some(artist) = &track.artist {
                                    p { class: "text-xs text-zinc-400 truncate", "{artist}" }
                                }
                            }
                            if is_current {
                                Icon { name: "music".to_string(), class: "w-4 h-4 text-emerald-400".to_string() }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Albums may list the same track twice, so the position is part of the key.
fn row_key(index: usize, track: &Track) -> String {
    format!("{}-{index}", track.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn repeated_tracks_get_distinct_row_keys() {
        let track = Track {
            id: TrackId(12),
            title: Some("Reprise".into()),
            artist: None,
            track_number: None,
        };
        let rows = [track.clone(), track.clone(), track];

        let keys: HashSet<String> = rows
            .iter()
            .enumerate()
            .map(|(index, track)| row_key(index, track))
            .collect();
        assert_eq!(keys.len(), 3);
    }
}
