use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use rayon::prelude::*;

use crate::{
    config::{PackConfig, RunSettings, Threading},
    decode::{
        gif,
        still::{self, StillEntry},
    },
    foundation::{
        core::{FrameIndex, NormalizedFrame, RawFrame},
        error::{PackError, PackResult},
    },
    frame::normalize,
    output::{
        archive,
        descriptor::{DescriptorWriter, SequenceDescriptor},
        layout::{OutputLayout, TrimLog},
        png,
    },
};

/// Where the frames of a run come from.
#[derive(Clone, Debug)]
pub enum FrameSource {
    /// Still images from a directory, already sorted.
    Stills(Vec<StillEntry>),
    /// An animated GIF.
    Gif(PathBuf),
}

impl FrameSource {
    /// Classify `path` as a directory of stills or a GIF container.
    pub fn resolve(path: &Path) -> PackResult<Self> {
        if path.is_dir() {
            return Ok(Self::Stills(still::list_still_images(path)?));
        }
        let is_gif = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("gif"));
        if path.is_file() && is_gif {
            return Ok(Self::Gif(path.to_path_buf()));
        }
        Err(PackError::InvalidSource(path.to_path_buf()))
    }

    /// Lazily produce frames in source order.
    pub fn into_frames(self) -> PackResult<Box<dyn Iterator<Item = PackResult<SourceFrame>>>> {
        match self {
            Self::Stills(entries) => Ok(Box::new(entries.into_iter().enumerate().map(
                |(i, entry)| {
                    still::load_still(&entry)
                        .map(|raw| SourceFrame {
                            origin: entry.path.clone(),
                            raw,
                        })
                        .map_err(|e| PackError::frame(i as u64, &entry.path, e))
                },
            ))),
            Self::Gif(path) => {
                let frames = gif::decode(&path)?;
                Ok(Box::new(frames.map(move |raw| {
                    raw.map(|raw| SourceFrame {
                        origin: path.clone(),
                        raw,
                    })
                })))
            }
        }
    }
}

/// A decoded frame and the file it came from.
#[derive(Debug)]
pub struct SourceFrame {
    /// Still image path, or the GIF path for container frames.
    pub origin: PathBuf,
    /// Decoded pixels.
    pub raw: RawFrame,
}

/// Summary of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackStats {
    /// Frames written.
    pub frames: u64,
    /// Wall time of the run.
    pub elapsed: Duration,
    /// Archive path when one was requested.
    pub archive: Option<PathBuf>,
}

/// Run the whole conversion described by `config`.
///
/// Frames are written strictly in source order. The descriptor's part line is
/// appended only after the last frame is on disk; any failure before that
/// leaves a header-only `desc.txt`.
#[tracing::instrument(skip(config), fields(source = %config.source.display()))]
pub fn assemble(config: &PackConfig) -> PackResult<PackStats> {
    let started = Instant::now();
    let settings = config.validate()?;
    tracing::info!("start creating boot animation");

    let source = FrameSource::resolve(&config.source)?;
    match &source {
        FrameSource::Stills(entries) => {
            tracing::info!(count = entries.len(), "images are ready to process");
        }
        FrameSource::Gif(path) => {
            tracing::info!(path = %path.display(), "decoding gif");
        }
    }

    let mut frames = source.into_frames()?.peekable();
    if frames.peek().is_none() {
        return Err(PackError::NoFramesFound(config.source.clone()));
    }

    let layout = OutputLayout::new(&config.save_to);
    layout.create_dirs()?;
    let descriptor = DescriptorWriter::begin(
        &layout.descriptor_path(),
        SequenceDescriptor::single_part(settings.canvas, settings.fps),
    )?;
    let mut trim = TrimLog::create(layout.trim_path())?;

    let written = write_frames(&mut frames, &settings, &config.threading, &layout, &mut trim)?;
    descriptor.finish()?;

    let archive = if config.zip {
        Some(archive::write_archive(&layout, written)?)
    } else {
        None
    };

    let elapsed = started.elapsed();
    tracing::info!(
        frames = written,
        "done in {:.3} seconds",
        elapsed.as_secs_f64()
    );
    Ok(PackStats {
        frames: written,
        elapsed,
        archive,
    })
}

fn write_frames<I>(
    frames: &mut I,
    settings: &RunSettings,
    threading: &Threading,
    layout: &OutputLayout,
    trim: &mut TrimLog,
) -> PackResult<u64>
where
    I: Iterator<Item = PackResult<SourceFrame>>,
{
    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };
    let batch_size = if pool.is_some() {
        threading.chunk_size.max(1)
    } else {
        1
    };

    let mut next = 0u64;
    loop {
        // A load failure ends the batch; frames before it are still written.
        let mut batch = Vec::with_capacity(batch_size);
        let mut failed = None;
        for item in frames.by_ref().take(batch_size) {
            match item {
                Ok(frame) => {
                    batch.push((FrameIndex(next), frame));
                    next += 1;
                }
                Err(e) => {
                    failed = Some(e);
                    break;
                }
            }
        }
        if batch.is_empty() && failed.is_none() {
            break;
        }

        let normalized: Vec<(PathBuf, PackResult<NormalizedFrame>)> = match &pool {
            Some(pool) => pool.install(|| {
                batch
                    .into_par_iter()
                    .map(|(index, frame)| normalize_one(index, frame, settings))
                    .collect()
            }),
            None => batch
                .into_iter()
                .map(|(index, frame)| normalize_one(index, frame, settings))
                .collect(),
        };

        for (origin, result) in normalized {
            let frame = result?;
            let index = frame.index;
            write_frame(&frame, layout, trim)
                .map_err(|e| PackError::frame(index.0, origin, e))?;
        }
        if let Some(e) = failed {
            return Err(e);
        }
    }
    Ok(next)
}

fn normalize_one(
    index: FrameIndex,
    frame: SourceFrame,
    settings: &RunSettings,
) -> (PathBuf, PackResult<NormalizedFrame>) {
    tracing::info!(
        "processing frame {}: {}",
        index.0,
        frame.origin.display()
    );
    let result = normalize::normalize(frame.raw, index, settings)
        .map_err(|e| PackError::frame(index.0, &frame.origin, e));
    (frame.origin, result)
}

fn write_frame(
    frame: &NormalizedFrame,
    layout: &OutputLayout,
    trim: &mut TrimLog,
) -> PackResult<()> {
    png::write_indexed(&layout.frame_path(frame.index), &frame.image)?;
    trim.append(&frame.trim_line())
}

fn build_thread_pool(threads: Option<usize>) -> PackResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(PackError::Other(anyhow::anyhow!(
            "threads must be >= 1 when set"
        )));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PackError::Other(anyhow::anyhow!("failed to build thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
