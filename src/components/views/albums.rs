use crate::api::*;
use crate::components::{AppView, Icon};
use crate::db::AppSettings;
use crate::library::{filter_albums, AlbumSort};
use dioxus::prelude::*;
use tracing::warn;

#[component]
pub fn AlbumsView() -> Element {
    let settings = use_context::<Signal<AppSettings>>();

    let mut sort = use_signal(AlbumSort::default);
    let mut search_query = use_signal(String::new);

    let albums = use_resource(move || {
        let client = MediaClient::new(settings.read().api_config());
        async move {
            client.get_albums().await.map_err(|err| {
                warn!(error = %err, "Failed to load albums");
                err.to_string()
            })
        }
    });

    rsx! {
        div { class: "space-y-8",
            header { class: "page-header gap-4",
                h1 { class: "page-title", "Albums" }

                div { class: "flex flex-col gap-3 md:flex-row md:items-center md:justify-between",
                    // Sort tabs
                    div { class: "flex gap-2 flex-wrap",
                        for option in [AlbumSort::Rating, AlbumSort::Name] {
                            button {
                                class: if sort() == option {
                                    "px-4 py-2 rounded-full bg-emerald-500/20 text-emerald-400 text-sm font-medium"
                                } else {
                                    "px-4 py-2 rounded-full bg-zinc-800/50 text-zinc-400 hover:text-white text-sm font-medium transition-colors"
                                },
                                onclick: move |_| sort.set(option),
                                "{option.label()}"
                            }
                        }
                    }
                    // Search
                    div { class: "relative w-full md:max-w-xs",
                        Icon {
                            name: "search".to_string(),
                            class: "absolute left-3 top-1/2 -translate-y-1/2 w-4 h-4 text-zinc-500".to_string(),
                        }
                        input {
                            class: "w-full pl-10 pr-4 py-2.5 bg-zinc-800/50 border border-zinc-700/50 rounded-xl text-sm text-white placeholder:text-zinc-500 focus:outline-none focus:border-emerald-500/50 focus:ring-2 focus:ring-emerald-500/20",
                            placeholder: "Search albums or artists",
                            value: search_query,
                            oninput: move |e| search_query.set(e.value()),
                        }
                    }
                }
            }

            {match albums() {
                Some(Ok(albums)) => {
                    let raw_query = search_query().trim().to_string();
                    let filtered = filter_albums(&albums, &raw_query, sort());
                    let has_query = !raw_query.is_empty();

                    rsx! {
                        if filtered.is_empty() {
                            div { class: "flex flex-col items-center justify-center py-20",
                                Icon { name: "album".to_string(), class: "w-16 h-16 text-zinc-600 mb-4".to_string() }
                                if has_query {
                                    p { class: "text-zinc-300", "No albums match \"{raw_query}\"" }
                                } else {
                                    p { class: "text-zinc-400", "No albums found" }
                                }
                            }
                        } else {
                            div { class: "grid grid-cols-2 sm:grid-cols-3 md:grid-cols-4 lg:grid-cols-5 xl:grid-cols-6 gap-4",
                                for album in filtered {
                                    AlbumCard { key: "{album.album_id}", album }
                                }
                            }
                        }
                    }
                }
                Some(Err(message)) => rsx! {
                    div { class: "flex flex-col items-center justify-center py-20",
                        Icon { name: "x".to_string(), class: "w-12 h-12 text-rose-400 mb-4".to_string() }
                        p { class: "text-zinc-300", "Could not load albums" }
                        p { class: "text-zinc-500 text-sm mt-2", "{message}" }
                    }
                },
                None => rsx! {
                    div { class: "flex items-center justify-center py-20",
                        Icon { name: "loader".to_string(), class: "w-8 h-8 text-zinc-500".to_string() }
                    }
                },
            }}
        }
    }
}

#[component]
fn AlbumCard(album: AlbumSummary) -> Element {
    let album_id = album.album_id;
    let artist_line = album.artist_line();

    rsx! {
        Link {
            class: "group text-left block",
            to: AppView::AlbumDetailView { album_id },
            div { class: "aspect-square rounded-xl bg-zinc-800 overflow-hidden mb-3 shadow-lg group-hover:shadow-xl transition-shadow",
                {match &album.album_art {
                    Some(url) => rsx! {
                        img {
                            class: "w-full h-full object-cover group-hover:scale-105 transition-transform",
                            src: "{url}",
                            alt: "{album.display_name()}",
                            loading: "lazy",
                        }
                    },
                    None => rsx! {
                        div { class: "w-full h-full flex items-center justify-center bg-gradient-to-br from-zinc-700 to-zinc-800",
                            Icon { name: "album".to_string(), class: "w-12 h-12 text-zinc-500".to_string() }
                        }
                    },
                }}
            }
            p { class: "font-medium text-white text-sm truncate group-hover:text-emerald-400 transition-colors",
                "{album.display_name()}"
            }
            p { class: "text-xs text-zinc-400 truncate", "{artist_line}" }
            p { class: "text-xs text-zinc-500", "Rating {format_rating(album.album_rating)}" }
        }
    }
}
