//! Service layer for business logic
//!
//! Shared by the HTTP handlers; nothing in here knows about actix routing.

pub mod exercise;
pub mod file_metadata;
pub mod registry;
pub mod resolver;

pub use exercise::{ExerciseService, LogQuery};
pub use file_metadata::{FileMetadata, inspect_upload};
pub use registry::{ShortLink, ShortLinkRegistry};
pub use resolver::{DnsResolver, HostResolver, StaticResolver};
