/// Number of artwork textures the fragment shader can sample.
///
/// The shader selects a slot through an explicit branch per index, so this
/// constant and the generated cascade in `compile` must stay in lockstep.
pub const TEXTURE_SLOT_CAPACITY: usize = 6;

/// Column count of the artwork grid. Rows follow from the artwork count.
pub const GRID_COLUMNS: u32 = 3;

/// Off-canvas pointer position (logical pixels) used until the pointer
/// enters the canvas and again after it leaves.
pub const POINTER_SENTINEL: f64 = -999.0;

/// Opaque black, shown in a slot until its image has been decoded.
pub const PLACEHOLDER_RGBA: [u8; 4] = [0, 0, 0, 255];

/// Configuration consumed by [`crate::run_gallery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Initial window size in logical pixels.
    pub surface_size: (u32, u32),
    pub title: String,
    /// Skip image fetching entirely; every cell keeps its placeholder.
    pub placeholder_only: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            title: "Haizor".to_string(),
            placeholder_only: false,
        }
    }
}
