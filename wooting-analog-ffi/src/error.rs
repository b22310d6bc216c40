//! Library loading error types

use thiserror::Error;

/// Errors that can occur while locating or loading the native wrapper library
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Unsupported platform: {0} (expected windows, linux or macos)")]
    UnsupportedPlatform(String),

    #[error("Failed to load {path}: {message}")]
    Library { path: String, message: String },

    #[error("Missing symbol {symbol}: {message}")]
    MissingSymbol {
        symbol: &'static str,
        message: String,
    },
}
