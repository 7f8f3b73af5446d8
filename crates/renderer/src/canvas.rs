use std::sync::Arc;

use catalog::Artwork;
use tracing::{debug, error, info, warn};

use crate::backend::RenderBackend;
use crate::error::SetupError;
use crate::grid::GridMapping;
use crate::input::{CanvasEvent, CanvasRect, PointerState};
use crate::runtime::{BoxedTimeSource, SystemTimeSource, TimeSource};
use crate::textures::{ImageSource, TextureLoader};
use crate::types::{GRID_COLUMNS, TEXTURE_SLOT_CAPACITY};
use crate::uniforms::WatercolorUniforms;
use crate::viewport::{self, DisplayMetrics};

/// Callback producing a fresh drawing context for each mount.
pub type AcquireBackend<B> = Box<dyn FnMut() -> Result<B, SetupError>>;

/// Hooks through which the canvas talks to its owner.
pub struct CanvasCallbacks {
    /// Called with `false` at most once, when no drawing context exists.
    pub on_capability: Box<dyn FnMut(bool)>,
    /// Called with the artwork under a click.
    pub on_select: Box<dyn FnMut(&Artwork)>,
}

impl CanvasCallbacks {
    pub fn new(
        on_capability: impl FnMut(bool) + 'static,
        on_select: impl FnMut(&Artwork) + 'static,
    ) -> Self {
        Self {
            on_capability: Box::new(on_capability),
            on_select: Box::new(on_select),
        }
    }
}

/// Outcome of [`WatercolorCanvas::frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// A frame was drawn and the next one has been requested.
    Drawn,
    /// Nothing is mounted; no frame was drawn or requested.
    Idle,
}

struct Mounted<B> {
    backend: B,
    grid: GridMapping,
    slot_count: usize,
}

/// Interactive watercolor grid over a list of artworks.
///
/// The canvas owns the drawing context, the pointer state and the texture
/// loader for one artwork list. Changing the list tears everything down and
/// builds it again; there is no partial update path.
pub struct WatercolorCanvas<B: RenderBackend> {
    acquire: AcquireBackend<B>,
    source: Arc<dyn ImageSource>,
    callbacks: CanvasCallbacks,
    time: BoxedTimeSource,
    loader: TextureLoader,
    pointer: PointerState,
    artworks: Vec<Artwork>,
    mounted: Option<Mounted<B>>,
    frame_requested: bool,
    capability_reported: bool,
}

impl<B: RenderBackend> WatercolorCanvas<B> {
    pub fn new(
        acquire: impl FnMut() -> Result<B, SetupError> + 'static,
        source: Arc<dyn ImageSource>,
        callbacks: CanvasCallbacks,
    ) -> Self {
        Self {
            acquire: Box::new(acquire),
            source,
            callbacks,
            time: Box::new(SystemTimeSource::new()),
            loader: TextureLoader::new(),
            pointer: PointerState::default(),
            artworks: Vec::new(),
            mounted: None,
            frame_requested: false,
            capability_reported: false,
        }
    }

    pub fn with_time_source(mut self, time: impl TimeSource + 'static) -> Self {
        self.time = Box::new(time);
        self
    }

    /// Builds the drawing context for `artworks` and starts the frame loop.
    ///
    /// Any previous mount is torn down first. When the context cannot be
    /// created the capability callback reports `false`; when the shader
    /// program cannot be built the failure is logged. In both cases the
    /// canvas stays inert until the next mount.
    pub fn mount(&mut self, artworks: Vec<Artwork>) {
        self.unmount();
        self.artworks = artworks;

        let mut backend = match (self.acquire)() {
            Ok(backend) => backend,
            Err(SetupError::ContextUnavailable(reason)) => {
                warn!(%reason, "drawing context unavailable; gallery falls back to a listing");
                if !self.capability_reported {
                    self.capability_reported = true;
                    (self.callbacks.on_capability)(false);
                }
                return;
            }
            Err(SetupError::Program(err)) => {
                error!(error = %err, "failed to build watercolor shader program");
                return;
            }
        };

        let slot_count = self.artworks.len().min(TEXTURE_SLOT_CAPACITY);
        backend.allocate_slots(slot_count);
        let grid = GridMapping::new(GRID_COLUMNS, self.artworks.len());
        let loads = self.loader.spawn(&self.artworks, Arc::clone(&self.source));
        self.time.reset();
        self.pointer = PointerState::default();
        self.mounted = Some(Mounted {
            backend,
            grid,
            slot_count,
        });
        self.frame_requested = true;
        info!(
            artworks = self.artworks.len(),
            slots = slot_count,
            rows = grid.rows(),
            loads,
            generation = self.loader.generation(),
            "watercolor canvas mounted"
        );
    }

    /// Replaces the artwork list; equivalent to a full unmount and mount.
    pub fn set_artworks(&mut self, artworks: Vec<Artwork>) {
        self.mount(artworks);
    }

    /// Stops the frame loop, cancels loads and releases the drawing context.
    /// Safe to call repeatedly.
    pub fn unmount(&mut self) {
        self.loader.cancel();
        self.frame_requested = false;
        self.pointer = PointerState::default();
        if self.mounted.take().is_some() {
            debug!(generation = self.loader.generation(), "watercolor canvas unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Routes pointer input. Ignored while unmounted.
    pub fn handle_event(&mut self, event: CanvasEvent, rect: &CanvasRect) {
        let Some(mounted) = self.mounted.as_ref() else {
            return;
        };

        match event {
            CanvasEvent::PointerMoved { x, y } => self.pointer.moved(x, y),
            CanvasEvent::PointerLeft => self.pointer.left(),
            CanvasEvent::Click { x, y } => {
                let (x, y) = rect.relative(x, y);
                let Some(index) = mounted.grid.cell_at(x, y, rect.width, rect.height) else {
                    return;
                };
                // Rows were derived from this same list, but the index can
                // still land on an empty cell in the last row.
                match self.artworks.get(index) {
                    Some(artwork) => {
                        debug!(index, id = artwork.id, title = %artwork.title, "artwork selected");
                        (self.callbacks.on_select)(artwork);
                    }
                    None => debug!(index, "click on empty grid cell"),
                }
            }
        }
    }

    /// Takes the pending redraw request, if any.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    /// Renders one frame: applies finished texture loads, matches the backing
    /// buffer to `display`, writes uniforms and draws.
    ///
    /// The next frame is requested before drawing, so a surface error does
    /// not stop the loop; the caller decides how to recover.
    pub fn frame(&mut self, display: &DisplayMetrics) -> Result<FrameStatus, wgpu::SurfaceError> {
        let Some(mounted) = self.mounted.as_mut() else {
            return Ok(FrameStatus::Idle);
        };

        for load in self.loader.drain() {
            mounted.backend.upload(load.slot, &load.image);
        }

        let limit = mounted.backend.max_dimension();
        if let Some(size) = viewport::reconcile(mounted.backend.backing_size(), display, limit) {
            debug!(width = size.width, height = size.height, "resizing canvas backing buffer");
            mounted.backend.resize(size);
        }

        let size = mounted.backend.backing_size();
        let sample = self.time.sample();
        if sample.frame_index == 0 {
            debug!(
                width = size.width,
                height = size.height,
                generation = self.loader.generation(),
                "first watercolor frame"
            );
        }
        let uniforms = WatercolorUniforms::new(
            [size.width as f32, size.height as f32],
            sample.seconds,
            self.pointer.uniform(&display.rect, display.scale_factor),
            mounted.grid.dims(),
            mounted.slot_count,
        );

        self.frame_requested = true;
        mounted.backend.draw(&uniforms)?;
        Ok(FrameStatus::Drawn)
    }

    /// Reconfigures the surface at its current size after it was lost or
    /// became outdated.
    pub fn recover_surface(&mut self) {
        if let Some(mounted) = self.mounted.as_mut() {
            let size = mounted.backend.backing_size();
            mounted.backend.resize(size);
        }
    }
}

impl<B: RenderBackend> Drop for WatercolorCanvas<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}
