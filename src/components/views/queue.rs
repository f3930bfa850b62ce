use crate::api::TrackId;
use crate::components::{Icon, PlayerController};
use crate::library::TrackCatalog;
use dioxus::prelude::*;

#[component]
pub fn QueueView() -> Element {
    let player = use_context::<PlayerController>();
    let catalog = use_context::<Signal<TrackCatalog>>();

    let queue = player.queue.read();
    let current = queue.current();
    // History is stored most recent first; show it in play order.
    let history: Vec<TrackId> = queue.backward().iter().rev().copied().collect();
    let up_next: Vec<TrackId> = queue.forward().iter().copied().collect();
    let has_next = queue.has_next();
    drop(queue);

    let total = history.len() + up_next.len() + usize::from(current.is_some());

    let on_clear = {
        let mut player = player;
        move |_| player.clear()
    };

    rsx! {
        div { class: "space-y-8",
            header { class: "page-header page-header--split",
                div {
                    h1 { class: "page-title", "Play Queue" }
                    p { class: "page-subtitle", "{total} tracks" }
                }

                if total > 0 {
                    div { class: "flex items-center gap-2",
                        button {
                            class: "p-2 rounded-xl bg-zinc-800 hover:bg-zinc-700 text-zinc-300 hover:text-white transition-colors disabled:opacity-40",
                            aria_label: "Previous",
                            disabled: current.is_none(),
                            onclick: {
                                let mut player = player;
                                move |_| player.previous()
                            },
                            Icon { name: "prev".to_string(), class: "w-4 h-4".to_string() }
                        }
                        button {
                            class: "p-2 rounded-xl bg-zinc-800 hover:bg-zinc-700 text-zinc-300 hover:text-white transition-colors disabled:opacity-40",
                            aria_label: "Next",
                            disabled: !has_next,
                            onclick: {
                                let mut player = player;
                                move |_| player.next()
                            },
                            Icon { name: "next".to_string(), class: "w-4 h-4".to_string() }
                        }
                        button {
                            class: "px-4 py-2 rounded-xl bg-zinc-800 hover:bg-zinc-700 text-zinc-300 hover:text-white transition-colors flex items-center gap-2",
                            onclick: on_clear,
                            Icon { name: "trash".to_string(), class: "w-4 h-4".to_string() }
                            "Clear Queue"
                        }
                    }
                }
            }

            if total == 0 {
                div { class: "flex flex-col items-center justify-center py-20",
                    Icon { name: "queue".to_string(), class: "w-16 h-16 text-zinc-600 mb-4".to_string() }
                    p { class: "text-zinc-400", "Your queue is empty" }
                    p { class: "text-zinc-500 text-sm mt-2", "Play an album to start listening" }
                }
            } else {
                div { class: "bg-zinc-800/30 rounded-2xl border border-zinc-700/30 overflow-hidden",
                    if !history.is_empty() {
                        QueueSection { title: "History", tracks: history, catalog, dimmed: true }
                    }

                    if let Some(current) = current {
                        div { class: "p-4 bg-emerald-500/10 border-y border-zinc-700/50",
                            p { class: "text-xs font-semibold text-emerald-400 uppercase tracking-wider mb-2",
                                "Now Playing"
                            }
                            TrackLine { track_id: current, catalog, highlight: true }
                        }
                    }

                    if !up_next.is_empty() {
                        QueueSection { title: "Up Next", tracks: up_next, catalog, dimmed: false }
                    }
                }
            }
        }
    }
}

#[component]
fn QueueSection(
    title: String,
    tracks: Vec<TrackId>,
    catalog: Signal<TrackCatalog>,
    dimmed: bool,
) -> Element {
    rsx! {
        div { class: "p-4",
            p { class: "text-xs font-semibold text-zinc-500 uppercase tracking-wider mb-2", "{title}" }
            div { class: if dimmed { "divide-y divide-zinc-800/50 opacity-70" } else { "divide-y divide-zinc-800/50" },
                for (idx, track_id) in tracks.into_iter().enumerate() {
                    div { key: "{track_id}-{idx}", class: "py-2",
                        TrackLine { track_id, catalog, highlight: false }
                    }
                }
            }
        }
    }
}

#[component]
fn TrackLine(track_id: TrackId, catalog: Signal<TrackCatalog>, highlight: bool) -> Element {
    let catalog = catalog.read();
    let info = catalog.get(track_id);
    let title = catalog.title_of(track_id);
    let subtitle = info
        .map(|i| match &i.artist {
            Some(artist) => format!("{artist} • {}", i.album_name),
            None => i.album_name.clone(),
        })
        .unwrap_or_default();

    rsx! {
        div { class: "flex items-center gap-4 min-w-0",
            div { class: "w-10 h-10 rounded-lg bg-zinc-700 flex-shrink-0 flex items-center justify-center",
                Icon { name: "music".to_string(), class: "w-4 h-4 text-zinc-500".to_string() }
            }
            div { class: "min-w-0",
                p { class: if highlight { "font-medium text-white truncate" } else { "text-zinc-300 truncate" },
                    "{title}"
                }
                p { class: "text-xs text-zinc-500 truncate", "{subtitle}" }
            }
        }
    }
}
