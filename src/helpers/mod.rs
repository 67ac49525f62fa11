pub mod dump;
pub mod format;
pub mod validate;

pub use format::{format_bytes, format_percent, format_signed_bytes, percent_of};
pub use validate::{
    REDACTED_PASSWORD, build_uri, extract_host_from_uri, is_local_host, redact_uri_password,
    validate_mongodb_uri,
};
