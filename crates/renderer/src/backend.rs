use winit::dpi::PhysicalSize;

use crate::textures::DecodedImage;
use crate::uniforms::WatercolorUniforms;

/// Drawing context the canvas renders through.
///
/// [`crate::gpu::GpuState`] is the `wgpu` implementation; the trait keeps the
/// canvas lifecycle independent of a physical GPU.
pub trait RenderBackend {
    /// Current backing-buffer size in device pixels.
    fn backing_size(&self) -> PhysicalSize<u32>;

    /// Largest backing-buffer edge the context accepts.
    fn max_dimension(&self) -> u32;

    /// Resizes the backing buffer and viewport. Also used to recover a lost
    /// surface by reconfiguring at the current size.
    fn resize(&mut self, size: PhysicalSize<u32>);

    /// Creates `count` placeholder texture slots, replacing any existing ones.
    fn allocate_slots(&mut self, count: usize);

    /// Replaces the texture in `slot` with `image`. Out-of-range slots are
    /// ignored.
    fn upload(&mut self, slot: usize, image: &DecodedImage);

    /// Writes `uniforms`, binds every slot and draws the full-screen quad.
    fn draw(&mut self, uniforms: &WatercolorUniforms) -> Result<(), wgpu::SurfaceError>;
}
