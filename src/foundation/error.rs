use std::path::PathBuf;

use crate::config::Violation;

/// Convenience result type used across bootpack.
pub type PackResult<T> = Result<T, PackError>;

/// Top-level error taxonomy for a packaging run.
#[derive(thiserror::Error, Debug)]
pub enum PackError {
    /// One or more configuration constraints were violated.
    #[error("validation error: {}", join_violations(.0))]
    Validation(Vec<Violation>),

    /// The source is neither a directory nor a decodable container.
    #[error("invalid source: '{}'", .0.display())]
    InvalidSource(PathBuf),

    /// The source resolved to zero frames.
    #[error("no frames found in '{}'", .0.display())]
    NoFramesFound(PathBuf),

    /// Malformed or truncated container data.
    #[error("decode error: {0}")]
    Decode(String),

    /// A single frame failed to crop, resize, quantize or write.
    #[error("frame {index} ('{}') failed: {source}", .path.display())]
    FrameProcessing {
        /// Zero-based sequence index of the failing frame.
        index: u64,
        /// Source the frame came from.
        path: PathBuf,
        /// Underlying failure.
        source: Box<PackError>,
    },

    /// Filesystem write or read failure outside of a frame.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PackError {
    /// Build a [`PackError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Tag `source` with the frame it happened on.
    pub fn frame(index: u64, path: impl Into<PathBuf>, source: PackError) -> Self {
        Self::FrameProcessing {
            index,
            path: path.into(),
            source: Box::new(source),
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
