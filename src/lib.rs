//! bootpack turns an animated GIF or a directory of still images into a boot
//! animation package: fixed-canvas, palette-reduced PNG frames plus a `desc.txt`
//! descriptor, optionally stored in an uncompressed `bootanimation.zip`.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: a directory lists its stills in name order, a `.gif` is decoded
//!    into full-canvas RGBA frames ([`decode_gif`]).
//! 2. **Normalize**: each frame is scaled to the target width, letterboxed onto the
//!    target canvas, cropped to its content box and quantized ([`normalize`]).
//! 3. **Write**: frames go to `part0/NNNNN.png`, crop geometry to `part0/trim.txt`,
//!    and the descriptor is finalized once every frame is on disk ([`assemble`]).
//!
//! Output is deterministic: the same input and settings give byte-identical
//! descriptors and logs and pixel-identical frames.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod decode;
mod foundation;
mod frame;
mod output;
mod pipeline;

pub use config::{MAX_PALETTE, PackConfig, RunSettings, Threading, Violation};
pub use decode::gif::{
    GifFrames, RedrawMode, SubImage, decode as decode_gif, detect_redraw_mode, next_canvas,
};
pub use decode::still::{Classified, StillEntry, StillFormat, list_still_images, load_still};
pub use foundation::core::{
    BoundingBox, Canvas, CropResult, FrameIndex, IndexedImage, NormalizedFrame, RawFrame,
};
pub use foundation::error::{PackError, PackResult};
pub use frame::crop::{crop, find_bounds, grid_step, is_background};
pub use frame::normalize::{letterbox, normalize, scale_to_width};
pub use frame::quantize::quantize;
pub use output::archive::{archive_entries, write_archive};
pub use output::descriptor::{DescriptorWriter, PART_NAME, PartDirective, SequenceDescriptor};
pub use output::layout::{OutputLayout, TrimLog};
pub use output::png::{encode_indexed, write_indexed};
pub use pipeline::{FrameSource, PackStats, SourceFrame, assemble};
