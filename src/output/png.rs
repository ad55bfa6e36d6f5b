use std::{fs::File, io::BufWriter, path::Path};

use anyhow::Context as _;

use crate::foundation::{
    core::IndexedImage,
    error::{PackError, PackResult},
};

/// Encode `img` as an 8-bit palette PNG.
pub fn encode_indexed<W: std::io::Write>(w: W, img: &IndexedImage) -> PackResult<()> {
    if img.palette.is_empty() || img.palette.len() > 256 {
        return Err(PackError::Other(anyhow::anyhow!(
            "palette must hold 1..=256 colors, got {}",
            img.palette.len()
        )));
    }

    let mut encoder = png::Encoder::new(w, img.width, img.height);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_palette(img.palette.concat());

    let mut writer = encoder.write_header().context("png header")?;
    writer
        .write_image_data(&img.indices)
        .context("png image data")?;
    writer.finish().context("png finish")?;
    Ok(())
}

/// Write `img` to `path` as a palette PNG.
pub fn write_indexed(path: &Path, img: &IndexedImage) -> PackResult<()> {
    let f = File::create(path).with_context(|| format!("create png '{}'", path.display()))?;
    encode_indexed(BufWriter::new(f), img)
        .map_err(|e| PackError::Other(anyhow::anyhow!("write png '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/output/png.rs"]
mod tests;
