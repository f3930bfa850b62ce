use crate::api::*;
use crate::components::{ComparisonController, Icon, PlayerController};
use crate::db::AppSettings;
use crate::library::AlbumDetailState;
use dioxus::prelude::*;
use tracing::info;

#[component]
pub fn SettingsView() -> Element {
    let mut app_settings = use_context::<Signal<AppSettings>>();
    let mut album_details = use_context::<Signal<AlbumDetailState>>();
    let mut comparison = use_context::<ComparisonController>();
    let player = use_context::<PlayerController>();

    let mut server_url = use_signal(|| app_settings.peek().api_url.clone());
    let mut url_error = use_signal(|| None::<String>);
    let mut saved = use_signal(|| false);

    let current_volume = player.queue.read().volume();
    let active_url = app_settings.read().api_url.clone();

    let on_save_url = move |evt: FormEvent| {
        evt.prevent_default();
        saved.set(false);
        match ApiConfig::new(&server_url()) {
            Ok(config) => {
                url_error.set(None);
                let url = config.base_url().to_string();
                if url != app_settings.peek().api_url {
                    info!(api_url = %url, "API server changed");
                    app_settings.with_mut(|s| s.api_url = url.clone());
                    // Known-missing ids and held pairs belong to the old server.
                    album_details.with_mut(AlbumDetailState::reset);
                    comparison.reset();
                }
                server_url.set(url);
                saved.set(true);
            }
            Err(err) => url_error.set(Some(err.to_string())),
        }
    };

    let on_reset_url = move |_| {
        server_url.set(default_api_url().to_string());
        url_error.set(None);
        saved.set(false);
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
        div { class: "space-y-8",
            header { class: "page-header",
                h1 { class: "page-title", "Settings" }
                p { class: "page-subtitle", "Server connection and playback preferences" }
            }

            section { class: "bg-zinc-800/30 rounded-2xl border border-zinc-700/30 p-6",
                h2 { class: "text-lg font-semibold text-white mb-6", "Media Server" }

                form { class: "space-y-4", onsubmit: on_save_url,
                    div {
                        label { class: "block text-sm font-medium text-zinc-400 mb-2", "API URL" }
                        input {
                            class: "w-full px-4 py-2.5 bg-zinc-900/50 border border-zinc-700/50 rounded-xl text-sm text-white placeholder:text-zinc-500 focus:outline-none focus:border-emerald-500/50",
                            placeholder: default_api_url(),
                            value: server_url,
                            oninput: move |e| {
                                saved.set(false);
                                server_url.set(e.value());
                            },
                        }
                        p { class: "text-xs text-zinc-500 mt-2", "Currently using {active_url}" }
                    }

                    if let Some(message) = url_error() {
                        p { class: "text-sm text-rose-300", "{message}" }
                    }

                    div { class: "flex items-center gap-3",
                        button {
                            r#type: "submit",
                            class: "px-4 py-2 rounded-xl bg-emerald-500 hover:bg-emerald-400 text-white text-sm font-medium transition-colors",
                            "Save"
                        }
                        button {
                            r#type: "button",
                            class: "px-4 py-2 rounded-xl bg-zinc-800 hover:bg-zinc-700 text-zinc-300 hover:text-white text-sm transition-colors",
                            onclick: on_reset_url,
                            "Use default"
                        }
                        if saved() {
                            span { class: "flex items-center gap-1 text-sm text-emerald-400",
                                Icon { name: "check".to_string(), class: "w-4 h-4".to_string() }
                                "Saved"
                            }
                        }
                    }
                }
            }

            section { class: "bg-zinc-800/30 rounded-2xl border border-zinc-700/30 p-6",
                h2 { class: "text-lg font-semibold text-white mb-6", "Playback Settings" }

                div {
                    label { class: "block text-sm font-medium text-zinc-400 mb-3", "Volume" }
                    div { class: "flex items-center gap-4",
                        Icon { name: "volume".to_string(), class: "w-5 h-5 text-zinc-400".to_string() }
                        input {
                            r#type: "range",
                            min: "0",
                            max: "100",
                            value: (current_volume * 100.0).round() as i32,
                            class: "flex-1 h-2 bg-zinc-700 rounded-lg appearance-none cursor-pointer accent-emerald-500",
                            oninput: on_volume_change,
                        }
                        span { class: "text-sm text-zinc-400 w-12 text-right",
                            "{(current_volume * 100.0).round() as i32}%"
                        }
                    }
                }
            }
        }
    }
}
