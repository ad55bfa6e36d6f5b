//! Animated GIF to full-canvas RGBA frames.
//!
//! A GIF sub-image may cover only part of the logical screen. Whether such
//! updates accumulate over earlier frames is decided once per file by a
//! pre-scan ([`detect_redraw_mode`]) and then applied to every frame, since a
//! file that mixes full and partial updates renders wrong if judged frame by
//! frame.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;
use image::{Rgba, RgbaImage};

use crate::foundation::{
    core::RawFrame,
    error::{PackError, PackResult},
};

/// How sub-images relate to the frames before them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedrawMode {
    /// Every sub-image covers the whole screen and stands alone.
    Full,
    /// At least one sub-image updates a region; frames accumulate.
    Partial,
}

/// One decoded GIF sub-image with its color table resolved.
#[derive(Clone, Copy, Debug)]
pub struct SubImage<'a> {
    /// Left offset on the logical screen.
    pub left: u32,
    /// Top offset on the logical screen.
    pub top: u32,
    /// Region width.
    pub width: u32,
    /// Region height.
    pub height: u32,
    /// One color index per region pixel, row-major.
    pub indices: &'a [u8],
    /// Flat RGB color table (local if present, otherwise global).
    pub palette: &'a [u8],
    /// Index that marks a transparent pixel.
    pub transparent: Option<u8>,
}

impl SubImage<'_> {
    fn color(&self, index: u8) -> Option<Rgba<u8>> {
        if self.transparent == Some(index) {
            return None;
        }
        let at = usize::from(index) * 3;
        // Short tables behave as if padded with black.
        let rgb = self.palette.get(at..at + 3).unwrap_or(&[0, 0, 0]);
        Some(Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }
}

fn open_decoder(path: &Path) -> PackResult<gif::Decoder<BufReader<File>>> {
    let file = File::open(path).with_context(|| format!("open gif '{}'", path.display()))?;
    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::Indexed);
    opts.read_info(BufReader::new(file))
        .map_err(|e| PackError::decode(format!("'{}': {e}", path.display())))
}

/// Scan every sub-image header and report whether any covers less than the screen.
///
/// Stops at the first partial region; one is enough to switch the whole file.
#[tracing::instrument]
pub fn detect_redraw_mode(path: &Path) -> PackResult<RedrawMode> {
    let mut decoder = open_decoder(path)?;
    let screen = (u32::from(decoder.width()), u32::from(decoder.height()));
    loop {
        let frame = decoder
            .read_next_frame()
            .map_err(|e| PackError::decode(format!("'{}': {e}", path.display())))?;
        let Some(frame) = frame else {
            return Ok(RedrawMode::Full);
        };
        if (u32::from(frame.width), u32::from(frame.height)) != screen {
            return Ok(RedrawMode::Partial);
        }
    }
}

/// Compose the next full-screen frame.
///
/// `carried` is the previously emitted canvas. It is used as the base in
/// [`RedrawMode::Partial`] and ignored in [`RedrawMode::Full`], where the
/// sub-image is pasted onto a transparent canvas. Transparent pixels of the
/// sub-image leave the base untouched; anything outside the screen is clipped.
pub fn next_canvas(
    carried: Option<RgbaImage>,
    sub: &SubImage<'_>,
    mode: RedrawMode,
    screen_width: u32,
    screen_height: u32,
) -> RgbaImage {
    let mut canvas = match (mode, carried) {
        (RedrawMode::Partial, Some(prev))
            if prev.dimensions() == (screen_width, screen_height) =>
        {
            prev
        }
        _ => RgbaImage::new(screen_width, screen_height),
    };

    for row in 0..sub.height {
        let y = sub.top + row;
        if y >= screen_height {
            break;
        }
        for col in 0..sub.width {
            let x = sub.left + col;
            if x >= screen_width {
                break;
            }
            let at = (row * sub.width + col) as usize;
            let Some(&index) = sub.indices.get(at) else {
                continue;
            };
            if let Some(px) = sub.color(index) {
                canvas.put_pixel(x, y, px);
            }
        }
    }
    canvas
}

/// Forward-only stream of composited GIF frames.
pub struct GifFrames {
    decoder: gif::Decoder<BufReader<File>>,
    mode: RedrawMode,
    screen_width: u32,
    screen_height: u32,
    global_palette: Option<Vec<u8>>,
    carried: Option<RgbaImage>,
    decoded: u64,
    done: bool,
}

impl GifFrames {
    /// Redraw mode applied to this file.
    pub fn mode(&self) -> RedrawMode {
        self.mode
    }

    /// Logical screen size.
    pub fn screen(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }
}

/// Open `path`, pre-scan its redraw mode and return the frame stream.
#[tracing::instrument]
pub fn decode(path: &Path) -> PackResult<GifFrames> {
    let mode = detect_redraw_mode(path)?;
    let decoder = open_decoder(path)?;
    let screen_width = u32::from(decoder.width());
    let screen_height = u32::from(decoder.height());
    let global_palette = decoder.global_palette().map(<[u8]>::to_vec);
    tracing::debug!(?mode, screen_width, screen_height, "gif opened");

    Ok(GifFrames {
        decoder,
        mode,
        screen_width,
        screen_height,
        global_palette,
        carried: None,
        decoded: 0,
        done: false,
    })
}

impl Iterator for GifFrames {
    type Item = PackResult<RawFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let frame = match self.decoder.read_next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                self.done = true;
                return None;
            }
            Err(e) => {
                self.done = true;
                return Some(Err(PackError::decode(format!(
                    "sub-image {}: {e}",
                    self.decoded
                ))));
            }
        };

        let Some(palette) = frame
            .palette
            .as_deref()
            .or(self.global_palette.as_deref())
        else {
            self.done = true;
            return Some(Err(PackError::decode(format!(
                "sub-image {} has no color table",
                self.decoded
            ))));
        };

        let sub = SubImage {
            left: u32::from(frame.left),
            top: u32::from(frame.top),
            width: u32::from(frame.width),
            height: u32::from(frame.height),
            indices: &frame.buffer,
            palette,
            transparent: frame.transparent,
        };
        let canvas = next_canvas(
            self.carried.take(),
            &sub,
            self.mode,
            self.screen_width,
            self.screen_height,
        );
        if self.mode == RedrawMode::Partial {
            self.carried = Some(canvas.clone());
        }
        self.decoded += 1;

        Some(Ok(RawFrame::from_image(canvas)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/decode/gif.rs"]
mod tests;
