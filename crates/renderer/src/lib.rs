//! Watercolor gallery renderer.
//!
//! Draws an artwork list as a live grid: up to six artwork textures are
//! sampled through a simplex-noise distortion over a paper background, and a
//! ripple follows the pointer. Clicks map back to the artwork under them.
//!
//! ```text
//!   run_gallery ──▶ winit event loop ──▶ WatercolorCanvas ──▶ RenderBackend (GpuState)
//!                        │   pointer / click        │  frame(): drain loads,
//!                        │                          │  sync viewport, uniforms,
//!                        ▼                          ▼  draw quad
//!                  GalleryDelegate            TextureLoader ◀── ImageSource threads
//! ```
//!
//! [`WatercolorCanvas`] holds the lifecycle (mount, input, frame, unmount) and
//! is generic over [`RenderBackend`], so everything except the `wgpu` calls in
//! [`gpu`] can run without a GPU.

mod backend;
mod canvas;
mod compile;
mod error;
pub mod gpu;
mod grid;
mod input;
mod runtime;
mod textures;
mod types;
mod uniforms;
mod viewport;
mod window;

pub use backend::RenderBackend;
pub use canvas::{AcquireBackend, CanvasCallbacks, FrameStatus, WatercolorCanvas};
pub use error::{ProgramError, SetupError, ShaderStageKind};
pub use grid::GridMapping;
pub use input::{CanvasEvent, CanvasRect, PointerState};
pub use runtime::{BoxedTimeSource, FixedTimeSource, SystemTimeSource, TimeSample, TimeSource};
pub use textures::{
    DecodedImage, ImageSource, PlaceholderOnlySource, RemoteImageSource, TextureLoad,
    TextureLoader,
};
pub use types::{
    RendererConfig, GRID_COLUMNS, PLACEHOLDER_RGBA, POINTER_SENTINEL, TEXTURE_SLOT_CAPACITY,
};
pub use uniforms::WatercolorUniforms;
pub use viewport::{reconcile, DisplayMetrics};
pub use window::{run_gallery, DelegateAction, GalleryDelegate, KeyInput, WindowOutcome};
