use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::{core::RawFrame, error::PackResult};

/// Still-image formats accepted as frame sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StillFormat {
    /// `.jpg` / `.jpeg`
    Jpeg,
    /// `.bmp`
    Bmp,
    /// `.png`
    Png,
    /// `.tiff`
    Tiff,
}

/// Outcome of classifying a path by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classified {
    /// A recognized still format.
    Still(StillFormat),
    /// Anything else, including paths without an extension.
    Unsupported,
}

impl StillFormat {
    /// Classify `path` by its extension, ignoring case.
    pub fn classify(path: &Path) -> Classified {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Classified::Unsupported;
        };
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Classified::Still(Self::Jpeg),
            "bmp" => Classified::Still(Self::Bmp),
            "png" => Classified::Still(Self::Png),
            "tiff" => Classified::Still(Self::Tiff),
            _ => Classified::Unsupported,
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Bmp => image::ImageFormat::Bmp,
            Self::Png => image::ImageFormat::Png,
            Self::Tiff => image::ImageFormat::Tiff,
        }
    }
}

/// A still image found in a source directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StillEntry {
    /// Full path to the file.
    pub path: PathBuf,
    /// Format derived from the extension.
    pub format: StillFormat,
}

/// Regular files in `dir` with a recognized extension, sorted by path.
pub fn list_still_images(dir: &Path) -> PackResult<Vec<StillEntry>> {
    let mut out = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read directory '{}'", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match StillFormat::classify(&path) {
            Classified::Still(format) => out.push(StillEntry { path, format }),
            Classified::Unsupported => {
                tracing::debug!(path = %path.display(), "skipping unsupported file");
            }
        }
    }
    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}

/// Decode a still image into a straight-alpha RGBA frame.
pub fn load_still(entry: &StillEntry) -> PackResult<RawFrame> {
    let mut reader = image::ImageReader::open(&entry.path)
        .and_then(|r| r.with_guessed_format())
        .with_context(|| format!("open image '{}'", entry.path.display()))?;
    // Content sniffing wins; the extension only decides when the header is unknown.
    if reader.format().is_none() {
        reader.set_format(entry.format.image_format());
    }
    let img = reader
        .decode()
        .with_context(|| format!("decode image '{}'", entry.path.display()))?;
    Ok(RawFrame::from_image(img.to_rgba8()))
}

#[cfg(test)]
#[path = "../../tests/unit/decode/still.rs"]
mod tests;
