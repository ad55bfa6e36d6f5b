use image::{RgbImage, RgbaImage};

/// Zero-based position of a frame in the output sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Output file name for this index (`00042.png`).
    pub fn file_name(self) -> String {
        format!("{:05}.png", self.0)
    }
}

/// Fixed target canvas every frame is letterboxed onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Straight-alpha RGBA8 frame as produced by a decoder or a still image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8, tightly packed.
    pub rgba8: Vec<u8>,
}

impl RawFrame {
    /// Take ownership of an `image` buffer.
    pub fn from_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            rgba8: img.into_raw(),
        }
    }

    /// Give the pixels back as an `image` buffer.
    pub fn into_image(self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.rgba8)
    }
}

/// Content bounds in canvas coordinates.
///
/// `min` is inclusive and `max` exclusive, so the box is never empty:
/// `min_x < max_x` and `min_y < max_y` always hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    /// Left edge (inclusive).
    pub min_x: u32,
    /// Top edge (inclusive).
    pub min_y: u32,
    /// Right edge (exclusive).
    pub max_x: u32,
    /// Bottom edge (exclusive).
    pub max_y: u32,
}

impl BoundingBox {
    /// The 1x1 box at the origin used when no foreground is detected.
    pub const DEGENERATE: Self = Self {
        min_x: 0,
        min_y: 0,
        max_x: 1,
        max_y: 1,
    };

    /// Box width in pixels.
    pub fn width(self) -> u32 {
        self.max_x - self.min_x
    }

    /// Box height in pixels.
    pub fn height(self) -> u32 {
        self.max_y - self.min_y
    }

    /// Whether `(x, y)` lies inside the box.
    pub fn contains(self, x: u32, y: u32) -> bool {
        self.min_x <= x && x < self.max_x && self.min_y <= y && y < self.max_y
    }
}

/// Cropped region plus where it sat on the canvas it was cut from.
#[derive(Clone, Debug)]
pub struct CropResult {
    /// Cropped pixels.
    pub image: RgbImage,
    /// Left offset on the source canvas.
    pub pos_x: u32,
    /// Top offset on the source canvas.
    pub pos_y: u32,
}

impl CropResult {
    /// Crop-geometry log line: `<w>x<h>+<x>+<y>`.
    pub fn trim_line(&self) -> String {
        format!(
            "{}x{}+{}+{}",
            self.image.width(),
            self.image.height(),
            self.pos_x,
            self.pos_y
        )
    }
}

/// Palette-indexed frame ready to be written out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Flat RGB palette, at most 256 entries.
    pub palette: Vec<[u8; 3]>,
    /// One palette index per pixel, row-major.
    pub indices: Vec<u8>,
}

impl IndexedImage {
    /// Resolve indices back to RGB. Indices past the palette read as black.
    pub fn to_rgb(&self) -> RgbImage {
        let mut out = RgbImage::new(self.width, self.height);
        for (px, &i) in out.pixels_mut().zip(&self.indices) {
            px.0 = self
                .palette
                .get(usize::from(i))
                .copied()
                .unwrap_or_default();
        }
        out
    }
}

/// Quantized, cropped frame together with its placement on the target canvas.
#[derive(Clone, Debug)]
pub struct NormalizedFrame {
    /// Position in the output sequence.
    pub index: FrameIndex,
    /// Quantized cropped pixels; intrinsic size equals the crop box.
    pub image: IndexedImage,
    /// Left offset on the target canvas.
    pub pos_x: u32,
    /// Top offset on the target canvas.
    pub pos_y: u32,
}

impl NormalizedFrame {
    /// Crop-geometry log line: `<w>x<h>+<x>+<y>`.
    pub fn trim_line(&self) -> String {
        format!(
            "{}x{}+{}+{}",
            self.image.width, self.image.height, self.pos_x, self.pos_y
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
