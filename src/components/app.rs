use crate::compare::ComparisonState;
use crate::components::{
    view_label, AppView, AudioController, ComparisonController, Icon, Player, PlayerController,
    Sidebar,
};
use crate::db::{load_settings, save_settings, AppSettings};
use crate::library::{AlbumDetailState, TrackCatalog};
use crate::queue::PlaybackQueue;
use dioxus::prelude::*;
use tracing::{info, warn};

#[component]
pub fn AppShell() -> Element {
    let mut app_settings = use_signal(AppSettings::default);
    let mut settings_loaded = use_signal(|| false);
    let queue = use_signal(PlaybackQueue::new);
    let album_details = use_signal(AlbumDetailState::default);
    let catalog = use_signal(TrackCatalog::default);
    let comparison = use_signal(ComparisonState::default);
    let mut sidebar_open = use_signal(|| false);
    let player = PlayerController::new(queue, app_settings);
    let comparison = ComparisonController::new(comparison, app_settings);

    // Provide state via context
    use_context_provider(|| app_settings);
    use_context_provider(|| player);
    use_context_provider(|| album_details);
    use_context_provider(|| catalog);
    use_context_provider(|| comparison);

    // Load saved settings on mount
    use_effect(move || {
        spawn(async move {
            match load_settings().await {
                Ok(settings) => {
                    info!(api_url = %settings.api_url, "Loaded settings");
                    let mut player = player;
                    app_settings.set(settings.clone());
                    player.set_volume(settings.volume);
                }
                Err(err) => warn!(error = %err, "Failed to load settings, using defaults"),
            }
            settings_loaded.set(true);
        });
    });

    // Auto-save settings when they change
    use_effect(move || {
        let settings = app_settings();
        if !settings_loaded() {
            return;
        }
        spawn(async move {
            if let Err(err) = save_settings(settings).await {
                warn!(error = %err, "Failed to save settings");
            }
        });
    });

    let view = use_route::<AppView>();

    rsx! {
        div { class: "app-container flex min-h-screen text-white overflow-hidden",
            if sidebar_open() {
                div {
                    class: "fixed inset-0 bg-black/60 backdrop-blur-sm z-30 2xl:hidden",
                    onclick: move |_| sidebar_open.set(false),
                }
            }

            Sidebar { sidebar_open }

            // Main content area
            div { class: "flex-1 flex flex-col overflow-hidden",
                header { class: "2xl:hidden border-b border-zinc-800/60 bg-zinc-950/80 backdrop-blur-xl",
                    div { class: "flex items-center justify-between px-4 py-3",
                        button {
                            class: "p-2 rounded-lg text-zinc-300 hover:text-white hover:bg-zinc-800/60 transition-colors",
                            aria_label: "Open menu",
                            onclick: move |_| sidebar_open.set(true),
                            Icon { name: "menu".to_string(), class: "w-5 h-5".to_string() }
                        }
                        div { class: "flex flex-col items-center text-center",
                            span { class: "text-xs uppercase tracking-widest text-zinc-500",
                                "Media Streamer"
                            }
                            span { class: "text-sm font-semibold text-white", "{view_label(&view)}" }
                        }
                        Link {
                            class: "p-2 rounded-lg text-zinc-300 hover:text-white hover:bg-zinc-800/60 transition-colors",
                            to: AppView::QueueView {},
                            Icon { name: "queue".to_string(), class: "w-5 h-5".to_string() }
                        }
                    }
                }

                // Main scrollable content
                main { class: "flex-1 overflow-y-auto main-scroll pb-32",
                    div { class: "page-shell", Outlet::<AppView> {} }
                }
            }

            // Fixed bottom player
            Player {}
        }

        // Audio controller - manages playback separately from UI
        AudioController {}
    }
}
