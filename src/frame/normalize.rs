use anyhow::anyhow;
use image::{Rgb, RgbImage, RgbaImage, imageops::FilterType};

use crate::{
    config::RunSettings,
    foundation::{
        core::{Canvas, FrameIndex, NormalizedFrame, RawFrame},
        error::{PackError, PackResult},
    },
    frame::{crop, quantize},
};

/// Resize to `width` keeping the aspect ratio (Lanczos3).
pub fn scale_to_width(img: &RgbaImage, width: u32) -> PackResult<RgbaImage> {
    let (src_w, src_h) = img.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(PackError::Other(anyhow!(
            "cannot scale an empty {src_w}x{src_h} frame"
        )));
    }
    let ratio = f64::from(width) / f64::from(src_w);
    let height = ((f64::from(src_h) * ratio) as u32).max(1);
    Ok(image::imageops::resize(
        img,
        width,
        height,
        FilterType::Lanczos3,
    ))
}

/// Place `scaled` on an opaque canvas: left-aligned, vertically centered.
///
/// The canvas is filled with the color of `scaled`'s top-left pixel, which is
/// what the crop step later treats as background. Alpha is dropped, not
/// blended. Rows that do not fit are clipped.
pub fn letterbox(scaled: &RgbaImage, canvas: Canvas) -> RgbImage {
    let fill = scaled
        .get_pixel_checked(0, 0)
        .map(|p| Rgb([p[0], p[1], p[2]]))
        .unwrap_or(Rgb([0, 0, 0]));
    let mut out = RgbImage::from_pixel(canvas.width, canvas.height, fill);

    let rgb = RgbImage::from_fn(scaled.width(), scaled.height(), |x, y| {
        let p = scaled.get_pixel(x, y);
        Rgb([p[0], p[1], p[2]])
    });
    let top = (f64::from(canvas.height) / 2.0 - f64::from(rgb.height()) / 2.0) as i64;
    image::imageops::replace(&mut out, &rgb, 0, top);
    out
}

/// Scale, letterbox, crop and quantize one frame.
#[tracing::instrument(skip(raw, settings), fields(src_w = raw.width, src_h = raw.height))]
pub fn normalize(
    raw: RawFrame,
    index: FrameIndex,
    settings: &RunSettings,
) -> PackResult<NormalizedFrame> {
    let (w, h) = (raw.width, raw.height);
    let img = raw
        .into_image()
        .ok_or_else(|| PackError::Other(anyhow!("pixel buffer does not match {w}x{h}")))?;

    let scaled = scale_to_width(&img, settings.canvas.width)?;
    let composed = letterbox(&scaled, settings.canvas);
    tracing::debug!(
        width = composed.width(),
        height = composed.height(),
        "size before crop"
    );

    let cropped = crop::crop(&composed, settings.tolerance, settings.steps);
    tracing::debug!(
        width = cropped.image.width(),
        height = cropped.image.height(),
        "size after crop"
    );

    let image = quantize::quantize(&cropped.image, settings.colors);
    Ok(NormalizedFrame {
        index,
        image,
        pos_x: cropped.pos_x,
        pos_y: cropped.pos_y,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/frame/normalize.rs"]
mod tests;
