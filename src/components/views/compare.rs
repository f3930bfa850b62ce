use crate::api::*;
use crate::compare::VotePhase;
use crate::components::{AppView, ComparisonController, Icon};
use dioxus::prelude::*;

#[component]
pub fn CompareView() -> Element {
    let controller = use_context::<ComparisonController>();

    // Fetch once on first visit; a held pair survives navigation.
    use_hook(move || controller.ensure_pair());

    let on_pick = move |winner: AlbumId| controller.pick(winner);

    let state = controller.state.read();
    let phase = state.phase();
    let pair = state.pair().cloned();
    let error = state.error().map(str::to_string);
    let votes_cast = state.votes_cast();
    let can_vote = state.can_vote();
    drop(state);

    rsx! {
        div { class: "space-y-8",
            header { class: "page-header page-header--split",
                div {
                    h1 { class: "page-title", "Which album is better?" }
                    p { class: "page-subtitle", "Pick one. Ratings update after every vote." }
                }
                if votes_cast > 0 {
                    span { class: "text-sm text-zinc-400", "{votes_cast} votes this session" }
                }
            }

            if let Some(message) = error {
                div { class: "rounded-lg border border-rose-500/35 bg-rose-500/10 px-3 py-2 text-sm text-rose-200",
                    "{message}"
                }
            }

            {match (phase, pair) {
                (VotePhase::Loading, None) => rsx! {
                    div { class: "flex items-center justify-center py-20",
                        Icon { name: "loader".to_string(), class: "w-8 h-8 text-zinc-500".to_string() }
                    }
                },
                (_, Some(pair)) => rsx! {
                    div { class: "grid grid-cols-1 md:grid-cols-2 gap-6",
                        for album in pair.albums() {
                            CandidateCard {
                                key: "{album.album_id}",
                                album: album.clone(),
                                enabled: can_vote,
                                onpick: on_pick,
                            }
                        }
                    }
                    if phase != VotePhase::Ready {
                        div { class: "flex items-center justify-center gap-2 text-sm text-zinc-400",
                            Icon { name: "loader".to_string(), class: "w-4 h-4".to_string() }
                            if phase == VotePhase::Submitting { "Saving vote" } else { "Loading next pair" }
                        }
                    }
                },
                (_, None) => rsx! {
                    div { class: "flex flex-col items-center justify-center py-20",
                        Icon { name: "compare".to_string(), class: "w-16 h-16 text-zinc-600 mb-4".to_string() }
                        p { class: "text-zinc-400", "No albums to compare right now" }
                        button {
                            class: "mt-4 px-4 py-2 rounded-xl bg-zinc-800 hover:bg-zinc-700 text-zinc-300 hover:text-white transition-colors",
                            onclick: move |_| controller.load_pair(),
                            "Try again"
                        }
                    }
                },
            }}
        }
    }
}

#[component]
fn CandidateCard(album: ComparisonAlbum, enabled: bool, onpick: EventHandler<AlbumId>) -> Element {
    let album_id = album.album_id;

    rsx! {
        div { class: "bg-zinc-800/30 rounded-2xl border border-zinc-700/30 overflow-hidden flex flex-col",
            button {
                class: "group text-left disabled:cursor-not-allowed disabled:opacity-60",
                disabled: !enabled,
                onclick: move |_| onpick.call(album_id),
                div { class: "aspect-square bg-zinc-800 overflow-hidden",
                    {match &album.album_art {
                        Some(url) => rsx! {
                            img {
                                class: "w-full h-full object-cover group-hover:scale-105 transition-transform",
                                src: "{url}",
                                alt: "{album.display_name()}",
                            }
                        },
                        None => rsx! {
                            div { class: "w-full h-full flex items-center justify-center bg-gradient-to-br from-zinc-700 to-zinc-800",
                                Icon { name: "album".to_string(), class: "w-20 h-20 text-zinc-500".to_string() }
                            }
                        },
                    }}
                }
                div { class: "p-4 space-y-1",
                    p { class: "text-lg font-semibold text-white truncate group-hover:text-emerald-400 transition-colors",
                        "{album.display_name()}"
                    }
                    if let Some(artists) = &album.album_artists {
                        p { class: "text-sm text-zinc-400 truncate", "{artists}" }
                    }
                    p { class: "text-xs text-zinc-500", "Rating {format_rating(album.album_rating)}" }
                }
            }
            Link {
                class: "px-4 pb-4 text-xs text-zinc-500 hover:text-white transition-colors",
                to: AppView::AlbumDetailView { album_id },
                "View album"
            }
        }
    }
}
