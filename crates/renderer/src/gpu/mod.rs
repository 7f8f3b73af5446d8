//! `wgpu` side of the watercolor canvas.
//!
//! - `context` owns the instance, device and window surface, and reconfigures
//!   the surface when the backing size changes.
//! - `pipeline` compiles the GLSL stages and links them into the render
//!   pipeline together with the full-screen quad.
//! - `slots` holds the artwork textures and rebuilds their bind group when an
//!   image arrives.
//! - `state` ties these together as [`GpuState`], the `RenderBackend` used by
//!   the window runtime.

mod context;
mod pipeline;
mod slots;
mod state;

pub use state::GpuState;
