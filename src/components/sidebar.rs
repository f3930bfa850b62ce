use crate::api::MediaClient;
use crate::components::{AppView, Icon};
use crate::db::AppSettings;
use crate::request::RequestTracker;
use dioxus::prelude::*;
use tracing::warn;

#[component]
pub fn Sidebar(sidebar_open: Signal<bool>) -> Element {
    let settings = use_context::<Signal<AppSettings>>();
    let view = use_route::<AppView>();
    let mut random_requests = use_signal(RequestTracker::<()>::new);

    let mut go = move |target: AppView| {
        sidebar_open.set(false);
        navigator().push(target);
    };

    let on_random = move |_| {
        sidebar_open.set(false);
        let ticket = random_requests.with_mut(|r| r.begin(()));
        let client = MediaClient::new(settings.peek().api_config());
        spawn(async move {
            let result = client.get_random_album_id().await;
            if !random_requests.with_mut(|r| r.complete(&ticket)) {
                return;
            }
            match result {
                Ok(album_id) => {
                    navigator().push(AppView::AlbumDetailView { album_id });
                }
                Err(err) => warn!(error = %err, "Failed to pick a random album"),
            }
        });
    };

    let picking = random_requests.read().is_pending();

    rsx! {
        aside {
            class: if sidebar_open() { "sidebar fixed 2xl:static inset-y-0 left-0 z-40 translate-x-0" } else { "sidebar fixed 2xl:static inset-y-0 left-0 z-40 -translate-x-full 2xl:translate-x-0" },
            // Logo
            div { class: "p-6 border-b border-zinc-800/50",
                div { class: "flex items-center gap-3",
                    div { class: "w-10 h-10 rounded-xl bg-gradient-to-br from-emerald-500 to-teal-600 flex items-center justify-center text-white font-bold text-lg shadow-lg shadow-emerald-500/20",
                        "M"
                    }
                    div {
                        h1 { class: "text-lg font-bold text-white", "Media Streamer" }
                        p { class: "text-xs text-zinc-500 truncate", "{settings.read().api_url}" }
                    }
                }
            }

            nav { class: "flex-1 overflow-y-auto p-4 space-y-1",
                div { class: "mb-6",
                    p { class: "text-xs font-semibold text-zinc-500 uppercase tracking-wider mb-3 px-3",
                        "Library"
                    }
                    NavItem {
                        icon: "album",
                        label: "Albums",
                        active: matches!(view, AppView::AlbumsView {} | AppView::AlbumDetailView { .. }),
                        onclick: move |_| go(AppView::AlbumsView {}),
                    }
                    NavItem {
                        icon: if picking { "loader" } else { "shuffle" },
                        label: "Random Album",
                        active: false,
                        onclick: on_random,
                    }
                    NavItem {
                        icon: "compare",
                        label: "Compare",
                        active: matches!(view, AppView::CompareView {}),
                        onclick: move |_| go(AppView::CompareView {}),
                    }
                    NavItem {
                        icon: "queue",
                        label: "Queue",
                        active: matches!(view, AppView::QueueView {}),
                        onclick: move |_| go(AppView::QueueView {}),
                    }
                }
            }

            div { class: "p-4 border-t border-zinc-800/50",
                NavItem {
                    icon: "settings",
                    label: "Settings",
                    active: matches!(view, AppView::SettingsView {}),
                    onclick: move |_| go(AppView::SettingsView {}),
                }
            }
        }
    }
}

#[component]
fn NavItem(icon: String, label: String, active: bool, onclick: EventHandler<MouseEvent>) -> Element {
    let base_class = "flex items-center gap-3 px-3 py-2.5 rounded-xl text-sm font-medium transition-all duration-200 cursor-pointer";
    let active_class = if active {
        "bg-gradient-to-r from-emerald-500/20 to-teal-500/10 text-emerald-400 shadow-sm"
    } else {
        "text-zinc-400 hover:text-white hover:bg-zinc-800/50"
    };

    rsx! {
        button {
            class: "{base_class} {active_class} w-full",
            onclick: move |e| onclick.call(e),
            Icon { name: icon.clone(), class: "w-5 h-5".to_string() }
            span { "{label}" }
        }
    }
}
