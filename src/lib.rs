//! `GeoAssist` - answer circles and location context for geography guessing games
//!
//! This library reads the location shown by the game's embedded map widget,
//! samples an answer circle around it, and looks up continent, country and
//! region information through public geocoding services.

pub mod assistant;
pub mod circle_map;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod geocoding;
pub mod geodesy;
pub mod logging;
pub mod models;
pub mod notification;

// Re-export core types for public API
pub use assistant::{AnswerCircle, Assistant};
pub use circle_map::CircleMap;
pub use config::AssistantConfig;
pub use error::AssistantError;
pub use geocoding::{CountryDirectory, NominatimClient, RestCountriesClient, ReverseGeocoder};
pub use geodesy::{frame, sample, sample_with};
pub use models::{BoundingBox, GeoPoint, Radius};
pub use notification::NotificationManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AssistantError>;
