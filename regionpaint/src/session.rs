//! Painting session
//!
//! A [`Session`] owns everything an interactive front end needs: the
//! canvas being painted, the region store of the current image, and one
//! color control per region. Loading a new image replaces all of it at
//! once, and only after the new image has been fully labeled.
//!
//! Loading is cooperative. [`Session::begin_load`] decodes and binarizes
//! eagerly, then each [`Session::poll_load`] advances labeling by one
//! chunk. While a load is in flight, pointer input is ignored.

use crate::error::{Error, Result};
use crate::options::SessionOptions;
use regionpaint_color::binarize;
use regionpaint_core::{Color, Raster, RasterMut};
use regionpaint_region::{
    LabelJob, LabelProgress, RegionKey, RegionStore, paint_at, preview, recolor, repaint,
};

/// State of the session's image pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing loaded yet
    Idle,
    /// Labeling in progress
    Loading(LabelProgress),
    /// An image is loaded and ready for painting
    Ready {
        /// Number of paintable regions
        regions: usize,
    },
}

/// A color control bound to one region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorControl {
    /// Region the control belongs to
    pub key: RegionKey,
    /// Color applied when the region is clicked
    pub value: Color,
}

struct Painting {
    canvas: RasterMut,
    store: RegionStore,
    /// Control value per region, indexed like the store's keys
    controls: Vec<Color>,
}

impl Painting {
    fn control_slot(&mut self, key: RegionKey) -> Result<&mut Color> {
        self.store.region(key)?;
        Ok(&mut self.controls[key.number() as usize - 1])
    }
}

struct PendingLoad {
    binary: Raster,
    job: LabelJob,
}

/// Interactive painting session over one image at a time
pub struct Session {
    options: SessionOptions,
    painting: Option<Painting>,
    pending: Option<PendingLoad>,
    hovered: Option<RegionKey>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl Session {
    /// Create an empty session
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            painting: None,
            pending: None,
            hovered: None,
        }
    }

    /// Options the session was created with
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Start loading an encoded image (PNG, JPEG, BMP, ...).
    ///
    /// Decoding and binarization happen here; labeling is driven by
    /// [`poll_load`](Self::poll_load). A load already in flight is
    /// discarded. On error nothing changes, including any pending load.
    pub fn begin_load(&mut self, bytes: &[u8]) -> Result<()> {
        let raster = regionpaint_io::read_image_mem(bytes).inspect_err(|e| {
            log::warn!("image rejected: {}", e);
        })?;
        self.begin_load_raster(&raster)
    }

    /// Start loading an already decoded raster.
    pub fn begin_load_raster(&mut self, raster: &Raster) -> Result<()> {
        let binary = binarize(raster, &self.options.threshold)?;
        let job = LabelJob::new(binary.clone(), self.options.label)?;
        if self.pending.is_some() {
            log::debug!("discarding unfinished load");
        }
        log::debug!(
            "load started: {}x{} ({} threshold)",
            binary.width(),
            binary.height(),
            self.options.threshold
        );
        self.pending = Some(PendingLoad { binary, job });
        Ok(())
    }

    /// Advance a pending load by one chunk of labeling work.
    ///
    /// When labeling completes, the new painting replaces the old one.
    pub fn poll_load(&mut self) -> Result<LoadStatus> {
        let Some(pending) = self.pending.as_mut() else {
            return Ok(self.status());
        };

        let progress = pending.job.step(self.options.label.chunk.max(1));
        if !progress.done {
            return Ok(LoadStatus::Loading(progress));
        }

        let Some(PendingLoad { binary, job }) = self.pending.take() else {
            return Ok(self.status());
        };
        let store = RegionStore::from_labeling(job.finish())?;
        log::info!(
            "loaded {}x{} image with {} regions",
            binary.width(),
            binary.height(),
            store.len()
        );
        let controls = store.iter().map(|(_, color)| color).collect();
        self.painting = Some(Painting {
            canvas: binary.to_mut(),
            store,
            controls,
        });
        self.hovered = None;
        Ok(self.status())
    }

    /// Load an encoded image to completion.
    pub fn load(&mut self, bytes: &[u8]) -> Result<()> {
        self.begin_load(bytes)?;
        self.finish_load()
    }

    /// Load a decoded raster to completion.
    pub fn load_raster(&mut self, raster: &Raster) -> Result<()> {
        self.begin_load_raster(raster)?;
        self.finish_load()
    }

    fn finish_load(&mut self) -> Result<()> {
        while self.is_busy() {
            self.poll_load()?;
        }
        Ok(())
    }

    /// Whether a load is in flight
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Current pipeline state
    pub fn status(&self) -> LoadStatus {
        if let Some(pending) = &self.pending {
            LoadStatus::Loading(pending.job.progress())
        } else if let Some(painting) = &self.painting {
            LoadStatus::Ready {
                regions: painting.store.len(),
            }
        } else {
            LoadStatus::Idle
        }
    }

    /// Snapshot of the canvas
    pub fn canvas(&self) -> Option<Raster> {
        self.painting.as_ref().map(|p| p.canvas.snapshot())
    }

    /// Region store of the current image
    pub fn store(&self) -> Option<&RegionStore> {
        self.painting.as_ref().map(|p| &p.store)
    }

    /// Region under (x, y)
    pub fn lookup(&self, x: i64, y: i64) -> Option<RegionKey> {
        self.painting.as_ref()?.store.lookup(x, y)
    }

    /// Stored color of a region
    pub fn color_of(&self, key: RegionKey) -> Result<Color> {
        let painting = self.painting.as_ref().ok_or(Error::NoImage)?;
        Ok(painting.store.color_of(key)?)
    }

    /// One control per region, in key order
    pub fn controls(&self) -> Vec<ColorControl> {
        self.painting
            .as_ref()
            .map(|p| {
                p.store
                    .keys()
                    .zip(p.controls.iter().copied())
                    .map(|(key, value)| ColorControl { key, value })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Change a control's value without painting.
    pub fn set_control(&mut self, key: RegionKey, color: Color) -> Result<()> {
        let painting = self.painting.as_mut().ok_or(Error::NoImage)?;
        *painting.control_slot(key)? = color;
        Ok(())
    }

    /// Color picker change: set the control and recolor its region.
    pub fn pick(&mut self, key: RegionKey, color: Color) -> Result<()> {
        let painting = self.painting.as_mut().ok_or(Error::NoImage)?;
        recolor(&mut painting.canvas, &mut painting.store, key, color)?;
        *painting.control_slot(key)? = color;
        Ok(())
    }

    /// Pointer click: fill the region under (x, y) with its control value.
    ///
    /// Returns the recolored key. Misses, clicks without an image, and
    /// clicks during a load do nothing.
    pub fn click(&mut self, x: i64, y: i64) -> Result<Option<RegionKey>> {
        if self.is_busy() {
            log::debug!("click at ({}, {}) ignored while loading", x, y);
            return Ok(None);
        }
        let Some(painting) = self.painting.as_mut() else {
            return Ok(None);
        };
        let Some(key) = painting.store.lookup(x, y) else {
            log::debug!("click at ({}, {}) hit no region", x, y);
            return Ok(None);
        };
        let color = *painting.control_slot(key)?;
        Ok(paint_at(&mut painting.canvas, &mut painting.store, x, y, color)?)
    }

    /// Pointer move: highlight the region under (x, y).
    ///
    /// Leaving a hovered region repaints every region from its stored
    /// color. Nothing is highlighted when no hover color is configured.
    /// Stored colors never change.
    pub fn hover(&mut self, x: i64, y: i64) -> Result<Option<RegionKey>> {
        if self.is_busy() {
            log::debug!("hover at ({}, {}) ignored while loading", x, y);
            return Ok(None);
        }
        let Some(painting) = self.painting.as_mut() else {
            return Ok(None);
        };
        let key = painting.store.lookup(x, y);
        if key == self.hovered {
            return Ok(key);
        }

        if self.hovered.take().is_some() {
            repaint(&mut painting.canvas, &painting.store)?;
        }
        if let (Some(key), Some(highlight)) = (key, self.options.hover) {
            preview(&mut painting.canvas, &painting.store, key, highlight)?;
        }
        self.hovered = key;
        Ok(key)
    }

    /// Pointer left the canvas: drop any highlight.
    pub fn leave(&mut self) -> Result<()> {
        self.hovered = None;
        if let Some(painting) = self.painting.as_mut() {
            repaint(&mut painting.canvas, &painting.store)?;
        }
        Ok(())
    }

    /// Encode the canvas as PNG.
    ///
    /// A hover highlight, if shown, is not part of the export.
    pub fn export_png(&self) -> Result<Vec<u8>> {
        let painting = self.painting.as_ref().ok_or(Error::NoImage)?;
        let mut canvas = painting.canvas.snapshot().to_mut();
        repaint(&mut canvas, &painting.store)?;
        Ok(regionpaint_io::write_png_mem(&canvas.into())?)
    }
}
