use std::{
    fs::File,
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    foundation::{core::FrameIndex, error::PackResult},
    output::descriptor::PART_NAME,
};

/// Paths of everything a run writes under `save_to`.
#[derive(Clone, Debug)]
pub struct OutputLayout {
    root: PathBuf,
    part_dir: PathBuf,
}

impl OutputLayout {
    /// Layout rooted at `save_to`; nothing is touched on disk.
    pub fn new(save_to: impl Into<PathBuf>) -> Self {
        let root = save_to.into();
        let part_dir = root.join(PART_NAME);
        Self { root, part_dir }
    }

    /// Create `save_to` and `save_to/part0`.
    pub fn create_dirs(&self) -> PackResult<()> {
        std::fs::create_dir_all(&self.part_dir).with_context(|| {
            format!("failed to create output directory '{}'", self.part_dir.display())
        })?;
        Ok(())
    }

    /// Output root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `save_to/part0`.
    pub fn part_dir(&self) -> &Path {
        &self.part_dir
    }

    /// `save_to/desc.txt`.
    pub fn descriptor_path(&self) -> PathBuf {
        self.root.join("desc.txt")
    }

    /// `save_to/part0/trim.txt`.
    pub fn trim_path(&self) -> PathBuf {
        self.part_dir.join("trim.txt")
    }

    /// `save_to/part0/<index>.png`.
    pub fn frame_path(&self, index: FrameIndex) -> PathBuf {
        self.part_dir.join(index.file_name())
    }

    /// `save_to/bootanimation.zip`.
    pub fn archive_path(&self) -> PathBuf {
        self.root.join("bootanimation.zip")
    }
}

/// Crop-geometry log, one `<w>x<h>+<x>+<y>` line per frame.
#[derive(Debug)]
pub struct TrimLog {
    path: PathBuf,
    file: File,
}

impl TrimLog {
    /// Create or truncate the log.
    pub fn create(path: impl Into<PathBuf>) -> PackResult<Self> {
        let path = path.into();
        let file =
            File::create(&path).with_context(|| format!("create trim log '{}'", path.display()))?;
        Ok(Self { path, file })
    }

    /// Append one line.
    pub fn append(&mut self, line: &str) -> PackResult<()> {
        writeln!(self.file, "{line}")
            .with_context(|| format!("write trim log '{}'", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/layout.rs"]
mod tests;
