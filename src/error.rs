use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentinelError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("invalid colour {0:?}, expected #rrggbb")]
    InvalidColor(String),

    #[error("replay line {line}: {source}")]
    ReplayParse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("replay read failed: {0}")]
    ReplayIo(#[source] std::io::Error),

    #[error("failed to save frame {path}: {source}")]
    FrameSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, SentinelError>;
