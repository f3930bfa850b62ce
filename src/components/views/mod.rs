mod album_detail;
mod albums;
mod compare;
mod not_found;
mod queue;
mod settings;

pub use album_detail::AlbumDetailView;
pub use albums::AlbumsView;
pub use compare::CompareView;
pub use not_found::{NotFoundPanel, NotFoundView};
pub use queue::QueueView;
pub use settings::SettingsView;
