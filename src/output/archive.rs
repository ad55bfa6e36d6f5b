use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{
    foundation::{core::FrameIndex, error::PackResult},
    output::{descriptor::PART_NAME, layout::OutputLayout},
};

/// Archive entries in write order as `(name in archive, path on disk)`:
/// `desc.txt`, frames `00000.png` up to `frames - 1`, then `trim.txt`.
///
/// Only files of the current run are listed, so frames left in the part
/// directory by an earlier, longer run are never packed.
pub fn archive_entries(layout: &OutputLayout, frames: u64) -> Vec<(String, PathBuf)> {
    let mut out = Vec::with_capacity(frames as usize + 2);
    out.push(("desc.txt".to_string(), layout.descriptor_path()));
    for i in 0..frames {
        let index = FrameIndex(i);
        out.push((
            format!("{PART_NAME}/{}", index.file_name()),
            layout.frame_path(index),
        ));
    }
    out.push((format!("{PART_NAME}/trim.txt"), layout.trim_path()));
    out
}

/// Pack the `frames` frames of this run into an uncompressed `bootanimation.zip`.
#[tracing::instrument(skip(layout), fields(root = %layout.root().display()))]
pub fn write_archive(layout: &OutputLayout, frames: u64) -> PackResult<PathBuf> {
    let out_path = layout.archive_path();
    let entries = archive_entries(layout, frames);

    let f = File::create(&out_path)
        .with_context(|| format!("create archive '{}'", out_path.display()))?;
    let mut zip = ZipWriter::new(BufWriter::new(f));
    let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, path) in &entries {
        add_file(&mut zip, name, path, opts)?;
    }
    let mut inner = zip
        .finish()
        .with_context(|| format!("finish archive '{}'", out_path.display()))?;
    inner
        .flush()
        .with_context(|| format!("flush archive '{}'", out_path.display()))?;

    tracing::info!(entries = entries.len(), path = %out_path.display(), "archive written");
    Ok(out_path)
}

fn add_file(
    zip: &mut ZipWriter<BufWriter<File>>,
    name: &str,
    path: &Path,
    opts: SimpleFileOptions,
) -> PackResult<()> {
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    zip.start_file(name, opts)
        .with_context(|| format!("start archive entry '{name}'"))?;
    zip.write_all(&bytes)
        .with_context(|| format!("write archive entry '{name}'"))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/output/archive.rs"]
mod tests;
