use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidConfig { field: String, message: String },

    #[error("{set} landmark set has {actual} points, expected {expected}")]
    TooFewLandmarks {
        set: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid frame width: {0}")]
    InvalidFrameWidth(f32),

    #[error("Invalid frame height: {0}")]
    InvalidFrameHeight(f32),

    #[error("Default overlay for 'normal' not found in {0}")]
    MissingDefaultOverlay(String),
}

pub type Result<T> = std::result::Result<T, Error>;
