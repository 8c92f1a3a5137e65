pub mod exercise;
pub mod file_metadata;
pub mod health;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod shorturl;

pub use exercise::{ExerciseHandlers, exercise_routes};
pub use file_metadata::{FileMetadataService, file_metadata_routes};
pub use health::{AppStartTime, HealthService, health_routes, hello};
pub use shorturl::{ShortUrlService, shorturl_routes};
