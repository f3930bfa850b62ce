//! Routes of the application.

use crate::api::AlbumId;
use crate::components::views::{
    AlbumDetailView, AlbumsView, CompareView, NotFoundView, QueueView, SettingsView,
};
use crate::components::AppShell;
use dioxus::prelude::*;

#[derive(Routable, Clone, PartialEq, Debug)]
#[rustfmt::skip]
pub enum AppView {
    #[layout(AppShell)]
        #[route("/")]
        AlbumsView {},
        #[route("/album/:album_id")]
        AlbumDetailView { album_id: AlbumId },
        #[route("/compare")]
        CompareView {},
        #[route("/queue")]
        QueueView {},
        #[route("/settings")]
        SettingsView {},
        #[route("/:..segments")]
        NotFoundView { segments: Vec<String> },
}

pub fn view_label(view: &AppView) -> &'static str {
    match view {
        AppView::AlbumsView {} => "Albums",
        AppView::AlbumDetailView { .. } => "Album",
        AppView::CompareView {} => "Compare",
        AppView::QueueView {} => "Queue",
        AppView::SettingsView {} => "Settings",
        AppView::NotFoundView { .. } => "Not Found",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn album_route_parses_numeric_id() {
        let route = AppView::from_str("/album/42").unwrap();
        assert_eq!(
            route,
            AppView::AlbumDetailView {
                album_id: AlbumId(42)
            }
        );
        assert_eq!(route.to_string(), "/album/42");
    }

    #[test]
    fn unknown_paths_reach_not_found() {
        let route = AppView::from_str("/nowhere/at/all").unwrap();
        assert!(matches!(route, AppView::NotFoundView { .. }));
        assert_eq!(view_label(&route), "Not Found");
    }

    #[test]
    fn non_numeric_album_id_is_not_found() {
        let route = AppView::from_str("/album/abc").unwrap();
        assert!(matches!(route, AppView::NotFoundView { .. }));
    }
}
