use dioxus::prelude::*;

mod api;
mod compare;
mod components;
mod db;
mod library;
mod queue;
mod request;

use components::AppView;

const FAVICON: Asset = asset!("/assets/favicon.svg");
const APP_CSS: Asset = asset!("/assets/styling/app.css");

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }

        // Theme color for mobile browsers
        document::Meta { name: "theme-color", content: "#10b981" }
        document::Title { "Media Streamer" }

        document::Stylesheet { href: APP_CSS }

        Router::<AppView> {}
    }
}
