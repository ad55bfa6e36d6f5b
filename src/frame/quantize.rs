//! Palette reduction for indexed PNG output.
//!
//! Frames that already fit the budget keep their exact colors. Everything else
//! goes through NeuQuant, which is deterministic for a given input and budget.

use std::collections::{BTreeSet, HashMap};

use color_quant::NeuQuant;
use image::RgbImage;

use crate::{config::MAX_PALETTE, foundation::core::IndexedImage};

type Rgb = [u8; 3];

/// NeuQuant sampling factor for regular frames (1 = every pixel, 30 = fastest).
const SAMPLE_FAC: i32 = 10;

/// Below this many pixels every pixel is used for training.
const FULL_SAMPLE_BELOW: usize = 64 * 64;

/// Sorted unique colors, or `None` as soon as there are more than `max_colors`.
fn exact_palette(img: &RgbImage, max_colors: usize) -> Option<Vec<Rgb>> {
    let mut seen = BTreeSet::new();
    for px in img.pixels() {
        if seen.insert(px.0) && seen.len() > max_colors {
            return None;
        }
    }
    Some(seen.into_iter().collect())
}

fn index_exact(img: &RgbImage, palette: &[Rgb]) -> Vec<u8> {
    let lookup: HashMap<Rgb, u8> = palette
        .iter()
        .enumerate()
        .map(|(i, &c)| (c, i as u8))
        .collect();
    img.pixels()
        .map(|px| lookup.get(&px.0).copied().unwrap_or_default())
        .collect()
}

fn index_neuquant(img: &RgbImage, max_colors: usize) -> (Vec<Rgb>, Vec<u8>) {
    let rgba: Vec<u8> = img
        .pixels()
        .flat_map(|px| [px[0], px[1], px[2], 255])
        .collect();
    let pixel_count = rgba.len() / 4;
    let sample_fac = if pixel_count < FULL_SAMPLE_BELOW {
        1
    } else {
        SAMPLE_FAC
    };

    let nq = NeuQuant::new(sample_fac, max_colors, &rgba);
    let palette = nq
        .color_map_rgb()
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();
    let indices = rgba
        .chunks_exact(4)
        .map(|px| nq.index_of(px) as u8)
        .collect();
    (palette, indices)
}

/// Reduce `img` to at most `max_colors` palette entries (capped at 256).
///
/// Images that already fit keep their exact colors, sorted.
#[tracing::instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn quantize(img: &RgbImage, max_colors: u32) -> IndexedImage {
    let max_colors = max_colors.clamp(1, MAX_PALETTE) as usize;

    let (palette, indices) = match exact_palette(img, max_colors) {
        Some(palette) => {
            let indices = index_exact(img, &palette);
            (palette, indices)
        }
        None => index_neuquant(img, max_colors),
    };
    tracing::debug!(palette = palette.len(), "palette built");

    IndexedImage {
        width: img.width(),
        height: img.height(),
        palette,
        indices,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/quantize.rs"]
mod tests;
