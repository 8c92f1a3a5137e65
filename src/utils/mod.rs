pub mod location;
pub mod url_validator;

pub use location::encode_location;
pub use url_validator::{UrlValidationError, validate_url};
