use image::RgbImage;

use crate::foundation::core::{BoundingBox, CropResult};

/// Whether two colors are within `tolerance` on each of R, G and B.
///
/// The distance must be strictly below the tolerance. A tolerance of zero
/// behaves like one: only identical channels match.
pub fn is_background(color: [u8; 3], background: [u8; 3], tolerance: u32) -> bool {
    let limit = tolerance.max(1);
    color
        .iter()
        .zip(background.iter())
        .all(|(&c, &b)| u32::from(c.abs_diff(b)) < limit)
}

/// Grid spacing along an axis of `extent` pixels split into `steps` cells.
pub fn grid_step(extent: u32, steps: u32) -> u32 {
    (extent / steps.max(1)).max(1)
}

/// Bounding box of everything that does not match the color at `(0, 0)`.
///
/// Only grid points are inspected, so the cost is bounded by `steps²`
/// regardless of resolution. The last row and column are never sampled. The
/// sampled box is grown by one grid step per side (right and bottom stay
/// inside `extent - 1`). When nothing is found the result is
/// [`BoundingBox::DEGENERATE`].
pub fn find_bounds(img: &RgbImage, tolerance: u32, steps: u32) -> BoundingBox {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return BoundingBox::DEGENERATE;
    }

    let background = img.get_pixel(0, 0).0;
    let step_x = grid_step(width, steps);
    let step_y = grid_step(height, steps);

    let mut hit: Option<(u32, u32, u32, u32)> = None;
    for y in (0..height - 1).step_by(step_y as usize) {
        for x in (0..width - 1).step_by(step_x as usize) {
            if is_background(img.get_pixel(x, y).0, background, tolerance) {
                continue;
            }
            hit = Some(match hit {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }

    let Some((x0, y0, x1, y1)) = hit else {
        return BoundingBox::DEGENERATE;
    };

    let bounds = BoundingBox {
        min_x: x0.saturating_sub(step_x),
        min_y: y0.saturating_sub(step_y),
        max_x: (x1 + step_x).min(width - 1),
        max_y: (y1 + step_y).min(height - 1),
    };

    // A collapsed axis falls back to [0, 1).
    let (min_x, max_x) = if bounds.min_x < bounds.max_x {
        (bounds.min_x, bounds.max_x)
    } else {
        (0, 1)
    };
    let (min_y, max_y) = if bounds.min_y < bounds.max_y {
        (bounds.min_y, bounds.max_y)
    } else {
        (0, 1)
    };
    BoundingBox {
        min_x,
        min_y,
        max_x,
        max_y,
    }
}

/// Cut `img` down to its content box.
#[tracing::instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn crop(img: &RgbImage, tolerance: u32, steps: u32) -> CropResult {
    let bounds = find_bounds(img, tolerance, steps);
    tracing::debug!(
        background = ?img.get_pixel_checked(0, 0).map(|p| p.0),
        ?bounds,
        "crop bounds"
    );

    let image = image::imageops::crop_imm(
        img,
        bounds.min_x,
        bounds.min_y,
        bounds.width(),
        bounds.height(),
    )
    .to_image();

    let result = CropResult {
        image,
        pos_x: bounds.min_x,
        pos_y: bounds.min_y,
    };
    tracing::debug!(trim = %result.trim_line(), "cropped");
    result
}

#[cfg(test)]
#[path = "../../tests/unit/frame/crop.rs"]
mod tests;
