use std::{
    fs::{File, OpenOptions},
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::{core::Canvas, error::PackResult};

/// Name of the single part every run produces.
pub const PART_NAME: &str = "part0";

/// One `p <loop> <pause> <name>` line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartDirective {
    /// Times the part plays; 0 loops until boot completes.
    pub loop_count: u32,
    /// Frames to hold the last image after the part ends.
    pub pause_frames: u32,
    /// Folder holding the part's frames.
    pub name: String,
}

impl std::fmt::Display for PartDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "p {} {} {}",
            self.loop_count, self.pause_frames, self.name
        )
    }
}

/// Contents of `desc.txt`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceDescriptor {
    /// Canvas the frames are laid out on.
    pub canvas: Canvas,
    /// Playback rate.
    pub fps: u32,
    /// Part directives in play order.
    pub parts: Vec<PartDirective>,
}

impl SequenceDescriptor {
    /// Descriptor with one `part0` played once without pause.
    pub fn single_part(canvas: Canvas, fps: u32) -> Self {
        Self {
            canvas,
            fps,
            parts: vec![PartDirective {
                loop_count: 1,
                pause_frames: 0,
                name: PART_NAME.to_string(),
            }],
        }
    }

    /// `<width> <height> <fps>`
    pub fn header_line(&self) -> String {
        format!("{} {} {}", self.canvas.width, self.canvas.height, self.fps)
    }
}

/// Writes the header up front and the part lines only on [`finish`](Self::finish).
///
/// Dropping the writer without finishing leaves a header-only file, which
/// marks the run as incomplete.
#[derive(Debug)]
pub struct DescriptorWriter {
    path: PathBuf,
    descriptor: SequenceDescriptor,
}

impl DescriptorWriter {
    /// Create or truncate `path` and write the header line.
    pub fn begin(path: &Path, descriptor: SequenceDescriptor) -> PackResult<Self> {
        let mut f = File::create(path)
            .with_context(|| format!("create descriptor '{}'", path.display()))?;
        writeln!(f, "{}", descriptor.header_line())
            .with_context(|| format!("write descriptor '{}'", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            descriptor,
        })
    }

    /// Append the part directives.
    pub fn finish(self) -> PackResult<PathBuf> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open descriptor '{}'", self.path.display()))?;
        for part in &self.descriptor.parts {
            writeln!(f, "{part}")
                .with_context(|| format!("write descriptor '{}'", self.path.display()))?;
        }
        Ok(self.path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/descriptor.rs"]
mod tests;
