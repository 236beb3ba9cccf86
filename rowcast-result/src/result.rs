use crate::error::Error;

/// Result type alias used throughout rowcast.
pub type Result<T> = std::result::Result<T, Error>;
