use crate::api::format_duration;
use crate::components::{AppView, Icon, PlayerController};
use crate::library::TrackCatalog;
use dioxus::prelude::*;

#[component]
pub fn Player() -> Element {
    let player = use_context::<PlayerController>();
    let catalog = use_context::<Signal<TrackCatalog>>();

    let queue = player.queue.read();
    let current = queue.current();
    let info = current.and_then(|id| catalog.read().get(id).cloned());
    let position = queue.position();
    let duration = queue.duration();
    let progress = queue.progress();
    let volume = queue.volume();
    let playing = queue.is_playing();
    let has_next = queue.has_next();
    let can_go_back = current.is_some();
    drop(queue);

    let on_seek = {
        let mut player = player;
        move |e: Event<FormData>| {
            if let Ok(percent) = e.value().parse::<f64>() {
                player.seek(percent.clamp(0.0, 100.0) / 100.0);
            }
        }
    };

    let on_volume_change = {
        let mut player = player;
        move |e: Event<FormData>| {
            if let Ok(val) = e.value().parse::<f64>() {
                player.set_volume(val / 100.0);
            }
        }
    };

    rsx! {
        div { class: "player-shell fixed bottom-0 left-0 right-0 bg-zinc-950/90 backdrop-blur-xl border-t border-zinc-800/60 z-50 md:h-24",
            div { class: "h-full flex flex-col md:flex-row md:items-center md:justify-between px-4 md:px-6 gap-3 md:gap-8 py-2 md:py-0",
                // Now playing info
                div { class: "flex items-center gap-3 md:gap-4 min-w-0 w-full md:w-1/4",
                    div { class: "w-12 h-12 md:w-14 md:h-14 rounded-lg bg-zinc-800 flex-shrink-0 flex items-center justify-center",
                        Icon { name: "music".to_string(), class: "w-6 h-6 text-zinc-500".to_string() }
                    }
                    {match (current, info) {
                        (Some(_), Some(info)) => rsx! {
                            div { class: "min-w-0 flex-1",
                                if let Some(album_id) = info.album_id {
                                    Link {
                                        class: "text-sm font-medium text-white truncate hover:text-emerald-400 transition-colors block",
                                        to: AppView::AlbumDetailView { album_id },
                                        "{info.title}"
                                    }
                                } else {
                                    p { class: "text-sm font-medium text-white truncate", "{info.title}" }
                                }
                                p { class: "text-xs text-zinc-400 truncate",
                                    "{info.artist.clone().unwrap_or_default()}"
                                }
                            }
                        },
                        (Some(id), None) => rsx! {
                            div { class: "min-w-0 flex-1",
                                p { class: "text-sm font-medium text-white truncate", "Track {id}" }
                            }
                        },
                        (None, _) => rsx! {
                            div { class: "min-w-0 flex-1",
                                p { class: "text-sm text-zinc-500", "No track playing" }
                                p { class: "text-xs text-zinc-600", "Pick an album to start" }
                            }
                        },
                    }}
                }

                // Player controls
                div { class: "flex flex-col items-center gap-3 w-full md:flex-1 md:max-w-2xl",
                    div { class: "flex items-center gap-6 md:gap-4 justify-center",
                        button {
                            class: "p-2 text-zinc-400 hover:text-white transition-colors disabled:opacity-40",
                            aria_label: "Previous",
                            disabled: !can_go_back,
                            onclick: {
                                let mut player = player;
                                move |_| player.previous()
                            },
                            Icon { name: "prev".to_string(), class: "w-5 h-5".to_string() }
                        }
                        button {
                            class: "w-10 h-10 rounded-full bg-white text-zinc-900 hover:scale-105 transition-transform flex items-center justify-center disabled:opacity-40",
                            aria_label: if playing { "Pause" } else { "Play" },
                            disabled: current.is_none(),
                            onclick: {
                                let mut player = player;
                                move |_| player.toggle()
                            },
                            Icon {
                                name: if playing { "pause".to_string() } else { "play".to_string() },
                                class: "w-5 h-5".to_string(),
                            }
                        }
                        button {
                            class: "p-2 text-zinc-400 hover:text-white transition-colors disabled:opacity-40",
                            aria_label: "Next",
                            disabled: !has_next,
                            onclick: {
                                let mut player = player;
                                move |_| player.next()
                            },
                            Icon { name: "next".to_string(), class: "w-5 h-5".to_string() }
                        }
                    }
                    // Progress bar
                    div { class: "flex items-center gap-2 md:gap-3 w-full",
                        span { class: "text-xs text-zinc-500 w-10 text-right", "{format_duration(position)}" }
                        input {
                            r#type: "range",
                            min: "0",
                            max: "100",
                            step: "0.1",
                            value: progress * 100.0,
                            disabled: duration <= 0.0,
                            class: "flex-1 h-1 bg-zinc-800 rounded-full cursor-pointer accent-emerald-400",
                            oninput: on_seek,
                        }
                        span { class: "text-xs text-zinc-500 w-10", "{format_duration(duration)}" }
                    }
                }

                // Volume
                div { class: "hidden md:flex items-center gap-3 w-1/4 justify-end",
                    Link {
                        class: "p-2 text-zinc-400 hover:text-white transition-colors",
                        to: AppView::QueueView {},
                        Icon { name: "queue".to_string(), class: "w-5 h-5".to_string() }
                    }
                    Icon { name: "volume".to_string(), class: "w-5 h-5 text-zinc-400".to_string() }
                    input {
                        r#type: "range",
                        min: "0",
                        max: "100",
                        value: (volume * 100.0).round() as i32,
                        class: "w-24 h-1 bg-zinc-800 rounded-full cursor-pointer accent-emerald-400",
                        oninput: on_volume_change,
                    }
                }
            }
        }
    }
}
