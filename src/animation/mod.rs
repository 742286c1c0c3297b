//! Animation assembly and GIF output
//!
//! Frames are collected in sweep order and encoded in one pass at the end of
//! the run. The file is written next to its destination under a temporary
//! name and renamed into place once complete.

use std::borrow::Cow;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail, ensure};

use crate::palette::{Palette, PaletteFrame};

/// Ordered indexed frames and their delays, one entry per rotation step
#[derive(Clone, Debug)]
pub struct AnimationSequence {
    width: u32,
    height: u32,
    frames: Vec<PaletteFrame>,
    /// Per-frame delay in hundredths of a second
    delays: Vec<u16>,
}

impl AnimationSequence {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_capacity(width, height, 0)
    }

    pub fn with_capacity(width: u32, height: u32, capacity: usize) -> Self {
        Self {
            width,
            height,
            frames: Vec::with_capacity(capacity),
            delays: Vec::with_capacity(capacity),
        }
    }

    /// Append the next frame of the sweep
    pub fn push(&mut self, frame: PaletteFrame, delay: u16) -> Result<()> {
        ensure!(
            frame.width == self.width && frame.height == self.height,
            "Frame {} is {}x{}, animation is {}x{}",
            self.frames.len(),
            frame.width,
            frame.height,
            self.width,
            self.height
        );
        ensure!(
            frame.indices.len() == (frame.width as usize) * (frame.height as usize),
            "Frame {} has {} pixels, expected {}",
            self.frames.len(),
            frame.indices.len(),
            frame.width as usize * frame.height as usize
        );
        self.frames.push(frame);
        self.delays.push(delay);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[PaletteFrame] {
        &self.frames
    }

    pub fn delays(&self) -> &[u16] {
        &self.delays
    }

    /// Encode every frame as a looping GIF sharing `palette` as its global color table
    pub fn encode<W: Write>(&self, palette: &Palette, writer: W) -> Result<W> {
        if self.frames.is_empty() {
            bail!("No frames to encode");
        }
        let width = u16::try_from(self.width).context("Canvas too wide for GIF")?;
        let height = u16::try_from(self.height).context("Canvas too tall for GIF")?;

        let mut encoder = gif::Encoder::new(writer, width, height, &palette.rgb_table())
            .context("Failed to write GIF header")?;
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .context("Failed to write GIF loop extension")?;

        for (index, (frame, delay)) in self.frames.iter().zip(&self.delays).enumerate() {
            let gif_frame = gif::Frame {
                width,
                height,
                delay: *delay,
                buffer: Cow::Borrowed(frame.indices.as_slice()),
                ..Default::default()
            };
            encoder
                .write_frame(&gif_frame)
                .with_context(|| format!("Failed to encode frame {}", index))?;
        }

        encoder
            .into_inner()
            .context("Failed to finish GIF stream")
    }

    /// Encode to `path`. Nothing appears at `path` unless encoding succeeds.
    pub fn write_gif(&self, palette: &Palette, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = tempfile::Builder::new()
            .prefix(".earthspin-")
            .suffix(".gif")
            .tempfile_in(dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        {
            let writer = self.encode(palette, BufWriter::new(file.as_file_mut()))?;
            writer
                .into_inner()
                .map_err(|err| err.into_error())
                .context("Failed to flush GIF")?;
        }
        file.as_file()
            .sync_all()
            .context("Failed to sync GIF to disk")?;

        file.persist(path)
            .with_context(|| format!("Failed to move GIF into place at {}", path.display()))?;
        log::debug!(
            "Wrote {} ({} bytes)",
            path.display(),
            fs::metadata(path).map(|m| m.len()).unwrap_or_default()
        );
        Ok(())
    }
}
