//! Error type shared by the library modules.
//!
//! Nothing in here is fatal to the stored collection: callers degrade to a
//! fallback value (resolver, icon fetch) or abort a single operation while
//! keeping prior state (import).

/// Failures surfaced by store, codec, resolver and icon helpers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Rejected import file; the collection is left untouched.
    #[error("import rejected: {0}")]
    Import(String),
}

pub type Result<T> = std::result::Result<T, Error>;
