pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::MediaClient;
pub use config::{default_api_url, ApiConfig};
pub use error::ApiError;
pub use models::*;
