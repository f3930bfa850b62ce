//! The components module contains all shared components for our app.

mod app;
mod app_view;
mod audio_manager;
mod comparison;
mod icons;
mod player;
mod sidebar;
pub mod views;

pub use app::*;
pub use app_view::*;
pub use audio_manager::*;
pub use comparison::*;
pub use icons::*;
pub use player::*;
pub use sidebar::*;
