use std::path::PathBuf;

use crate::foundation::{
    core::Canvas,
    error::{PackError, PackResult},
};

/// Largest palette an indexed PNG can carry.
pub const MAX_PALETTE: u32 = 256;

/// A single violated configuration constraint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Offending setting.
    pub field: &'static str,
    /// Human readable description.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered parallel normalization settings.
#[derive(Clone, Debug)]
pub struct Threading {
    /// Normalize frames on a worker pool; output order is unchanged.
    pub parallel: bool,
    /// Frames normalized per batch before they are written.
    pub chunk_size: usize,
    /// Worker count; `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for Threading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 16,
            threads: None,
        }
    }
}

/// Everything a packaging run needs.
///
/// Numbers are signed so that out-of-range input survives parsing and shows up
/// in [`PackConfig::violations`] next to every other problem.
#[derive(Clone, Debug)]
pub struct PackConfig {
    /// GIF file or directory of still images.
    pub source: PathBuf,
    /// Target canvas width.
    pub width: i64,
    /// Target canvas height.
    pub height: i64,
    /// Playback rate written to the descriptor.
    pub fps: i64,
    /// Output directory.
    pub save_to: PathBuf,
    /// Also write `bootanimation.zip`.
    pub zip: bool,
    /// Per-channel background distance.
    pub tolerance: i64,
    /// Palette size bound.
    pub colors: i64,
    /// Grid subdivisions per axis for crop sampling.
    pub steps: i64,
    /// Optional parallel normalization.
    pub threading: Threading,
}

impl PackConfig {
    /// Settings with the CLI defaults for everything but the positionals.
    pub fn new(
        source: impl Into<PathBuf>,
        width: i64,
        height: i64,
        fps: i64,
        save_to: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source: source.into(),
            width,
            height,
            fps,
            save_to: save_to.into(),
            zip: false,
            tolerance: 10,
            colors: 256,
            steps: 100,
            threading: Threading::default(),
        }
    }

    /// Every violated constraint, in a stable order. Empty means valid.
    pub fn violations(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        let mut push = |field: &'static str, message: String| {
            out.push(Violation { field, message });
        };

        if self.source.as_os_str().is_empty() {
            push("source", "source path is empty".to_string());
        } else if !self.source.exists() {
            push(
                "source",
                format!("path '{}' does not exist", self.source.display()),
            );
        }

        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("fps", self.fps),
        ] {
            if value <= 0 {
                push(field, format!("{field} is too small: {value}"));
            }
        }

        if self.save_to.as_os_str().is_empty() {
            push("save_to", "save_to path is empty".to_string());
        }

        if self.tolerance <= 0 {
            push(
                "tolerance",
                format!("background color tolerance is too small: {}", self.tolerance),
            );
        }
        if self.colors <= 0 {
            push("colors", format!("colors count is too small: {}", self.colors));
        }
        if self.steps <= 0 {
            push("steps", format!("steps count is too small: {}", self.steps));
        }
        if self.threading.threads == Some(0) {
            push("threads", "threads must be >= 1 when set".to_string());
        }

        // Values past u32 cannot describe a canvas or a pixel distance.
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("fps", self.fps),
            ("tolerance", self.tolerance),
            ("steps", self.steps),
        ] {
            if value > i64::from(u32::MAX) {
                push(field, format!("{field} is too large: {value}"));
            }
        }

        out
    }

    /// Check the configuration and freeze it into runtime settings.
    pub fn validate(&self) -> PackResult<RunSettings> {
        let violations = self.violations();
        if !violations.is_empty() {
            return Err(PackError::Validation(violations));
        }

        let colors = if self.colors > i64::from(MAX_PALETTE) {
            tracing::warn!(
                requested = self.colors,
                "colors count clamped to {MAX_PALETTE} (indexed png limit)"
            );
            MAX_PALETTE
        } else {
            self.colors as u32
        };

        Ok(RunSettings {
            canvas: Canvas {
                width: self.width as u32,
                height: self.height as u32,
            },
            fps: self.fps as u32,
            tolerance: self.tolerance as u32,
            colors,
            steps: self.steps as u32,
        })
    }
}

/// Validated, typed per-frame parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSettings {
    /// Target canvas.
    pub canvas: Canvas,
    /// Playback rate.
    pub fps: u32,
    /// Per-channel background distance.
    pub tolerance: u32,
    /// Palette size bound (1..=256).
    pub colors: u32,
    /// Crop sampling subdivisions.
    pub steps: u32,
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
