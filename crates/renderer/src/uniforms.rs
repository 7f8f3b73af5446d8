use bytemuck::{Pod, Zeroable};

/// CPU mirror of the `WatercolorParams` std140 block in the fragment shader.
///
/// Every member is a scalar or `vec2`, so the std140 offsets are the packed
/// offsets; the trailing pad rounds the block to 16 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct WatercolorUniforms {
    /// Backing-buffer size in device pixels.
    pub resolution: [f32; 2],
    /// Seconds since the loop started.
    pub time: f32,
    /// `resolution.x / resolution.y`.
    pub aspect: f32,
    /// Pointer in device pixels, bottom-left origin.
    pub mouse: [f32; 2],
    /// `(columns, rows)`.
    pub grid_dims: [f32; 2],
    /// Number of bound artwork slots; cells at or beyond it show paper only.
    pub slot_count: f32,
    pub _padding: [f32; 3],
}

impl WatercolorUniforms {
    pub fn new(
        resolution: [f32; 2],
        time: f32,
        mouse: [f32; 2],
        grid_dims: [f32; 2],
        slot_count: usize,
    ) -> Self {
        let aspect = if resolution[1] > 0.0 {
            resolution[0] / resolution[1]
        } else {
            1.0
        };
        Self {
            resolution,
            time,
            aspect,
            mouse,
            grid_dims,
            slot_count: slot_count as f32,
            _padding: [0.0; 3],
        }
    }
}
