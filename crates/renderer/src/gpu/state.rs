use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::backend::RenderBackend;
use crate::error::SetupError;
use crate::textures::DecodedImage;
use crate::uniforms::WatercolorUniforms;

use super::context::GpuContext;
use super::pipeline::{WatercolorProgram, QUAD_VERTEX_COUNT};
use super::slots::ArtworkSlots;

/// `wgpu` implementation of [`RenderBackend`] drawing into a window.
pub struct GpuState {
    context: GpuContext,
    program: WatercolorProgram,
    slots: ArtworkSlots,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    frame_count: u64,
    frames_since_last_update: u32,
    last_fps_update: Instant,
    // Keeps the surface's window alive for as long as the surface exists.
    _window: Arc<Window>,
}

impl GpuState {
    pub fn new(window: Arc<Window>) -> Result<Self, SetupError> {
        let size = window.inner_size();
        let context = GpuContext::new(Arc::clone(&window), size)
            .map_err(|err| SetupError::context_unavailable(format!("{err:#}")))?;
        let program = WatercolorProgram::new(&context.device, context.surface_format)?;

        let uniforms = WatercolorUniforms::new(
            [context.size.width as f32, context.size.height as f32],
            0.0,
            [0.0; 2],
            [0.0; 2],
            0,
        );
        let uniform_buffer =
            context
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("watercolor uniforms"),
                    contents: bytemuck::bytes_of(&uniforms),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("uniform bind group"),
                layout: &program.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });
        let slots = ArtworkSlots::new(
            &context.device,
            &context.queue,
            &program.slot_layout,
            context.max_texture_dimension,
        );

        Ok(Self {
            context,
            program,
            slots,
            uniform_buffer,
            uniform_bind_group,
            frame_count: 0,
            frames_since_last_update: 0,
            last_fps_update: Instant::now(),
            _window: window,
        })
    }

    fn record_frame(&mut self, uniforms: &WatercolorUniforms) {
        self.frame_count = self.frame_count.saturating_add(1);
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_fps_update);
        if elapsed >= Duration::from_secs(1) {
            let fps = self.frames_since_last_update as f32 / elapsed.as_secs_f32();
            debug!(
                fps = fps.round(),
                frame_count = self.frame_count,
                time = uniforms.time,
                slots = self.slots.len(),
                "render stats"
            );
            self.frames_since_last_update = 0;
            self.last_fps_update = now;
        }
    }
}

impl RenderBackend for GpuState {
    fn backing_size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    fn max_dimension(&self) -> u32 {
        self.context.max_texture_dimension
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.context.resize(size);
    }

    fn allocate_slots(&mut self, count: usize) {
        self.slots.allocate(
            &self.context.device,
            &self.context.queue,
            &self.program.slot_layout,
            count,
        );
    }

    fn upload(&mut self, slot: usize, image: &DecodedImage) {
        self.slots.upload(
            &self.context.device,
            &self.context.queue,
            &self.program.slot_layout,
            slot,
            image,
        );
    }

    fn draw(&mut self, uniforms: &WatercolorUniforms) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.context
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("watercolor encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("watercolor pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            let size = self.context.size;
            render_pass.set_viewport(0.0, 0.0, size.width as f32, size.height as f32, 0.0, 1.0);
            render_pass.set_pipeline(&self.program.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_bind_group(1, self.slots.bind_group(), &[]);
            render_pass.set_vertex_buffer(0, self.program.quad.slice(..));
            render_pass.draw(0..QUAD_VERTEX_COUNT, 0..1);
        }

        self.context.queue.submit(Some(encoder.finish()));
        frame.present();
        self.record_frame(uniforms);
        Ok(())
    }
}
