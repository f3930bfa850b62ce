use crate::components::{AppView, Icon};
use dioxus::prelude::*;

/// Catch-all route for paths that match nothing.
#[component]
pub fn NotFoundView(segments: Vec<String>) -> Element {
    let path = format!("/{}", segments.join("/"));

    rsx! {
        NotFoundPanel { message: format!("Nothing lives at {path}.") }
    }
}

#[component]
pub fn NotFoundPanel(message: String) -> Element {
    rsx! {
        div { class: "flex flex-col items-center justify-center py-20 text-center",
            Icon { name: "album".to_string(), class: "w-16 h-16 text-zinc-600 mb-4".to_string() }
            h1 { class: "text-2xl font-bold text-white mb-2", "Page not found" }
            p { class: "text-zinc-400", "{message}" }
            Link {
                class: "mt-6 px-6 py-2.5 rounded-full bg-emerald-500 hover:bg-emerald-400 text-white font-medium transition-colors flex items-center gap-2",
                to: AppView::AlbumsView {},
                Icon { name: "home".to_string(), class: "w-4 h-4".to_string() }
                "Go back to Home"
            }
        }
    }
}
