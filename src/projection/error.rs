//! Errors raised while building or applying a coordinate transformation

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("malformed projection token `{0}`")]
    MalformedToken(String),
    #[error("definition has no +proj parameter")]
    MissingProjection,
    #[error("unknown projection `{0}`")]
    UnknownProjection(String),
    #[error("invalid value `{value}` for +{key}")]
    InvalidParameter { key: String, value: String },
    #[error("invalid ellipsoid: {0}")]
    InvalidEllipsoid(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("init entry <{code}> not found in `{file}`")]
    InitNotFound { file: String, code: String },
    #[error("failed to read init file {}", path.display())]
    InitRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("point {index} ({x}, {y}) is outside the domain of the transformation")]
    PointOutOfRange { index: usize, x: f64, y: f64 },
}
