use std::{error::Error, fmt, io};

/// The model zoo's result type.
pub type Result<T> = std::result::Result<T, ZooErr>;

/// All errors that can occur while building, checking or storing a model config.
#[derive(Debug)]
pub enum ZooErr {
    Io(io::Error),
    Json(serde_json::Error),
    /// No model is registered under the given name.
    UnknownModel(String),
    /// A shape lacks a dimension the model needs, or it is unknown or zero.
    MissingDimension {
        shape: &'static str,
        axis: usize,
    },
    /// The config is structurally invalid, caught before anything consumes it.
    InvalidConfig(String),
    /// A layer cannot accept the output of the previous one.
    ShapeMismatch {
        layer: usize,
        msg: String,
    },
}

impl fmt::Display for ZooErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZooErr::Io(e) => write!(f, "io error: {e}"),
            ZooErr::Json(e) => write!(f, "json error: {e}"),
            ZooErr::UnknownModel(name) => write!(f, "unknown model: {name}"),
            ZooErr::MissingDimension { shape, axis } => {
                write!(f, "{shape} has no usable dimension at axis {axis}")
            }
            ZooErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            ZooErr::ShapeMismatch { layer, msg } => write!(f, "layer {layer}: {msg}"),
        }
    }
}

impl Error for ZooErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ZooErr::Io(e) => Some(e),
            ZooErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ZooErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ZooErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
