use thiserror::Error;

use hand_gesture::{ConfigError, RecordingError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("window error: {0}")]
    Window(String),

    #[error("invalid gesture config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Recording(#[from] RecordingError),
}

impl From<minifb::Error> for AppError {
    fn from(e: minifb::Error) -> Self {
        AppError::Window(e.to_string())
    }
}
