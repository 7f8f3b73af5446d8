use winit::dpi::PhysicalSize;

use crate::input::CanvasRect;

/// Displayed canvas size plus the device pixel ratio, sampled each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMetrics {
    pub rect: CanvasRect,
    pub scale_factor: f64,
}

impl DisplayMetrics {
    pub fn new(rect: CanvasRect, scale_factor: f64) -> Self {
        Self { rect, scale_factor }
    }

    /// Backing-buffer size the canvas should have: `floor(logical * dpr)`,
    /// never smaller than 1x1.
    pub fn backing_size(&self) -> PhysicalSize<u32> {
        let scale = if self.scale_factor.is_finite() && self.scale_factor > 0.0 {
            self.scale_factor
        } else {
            1.0
        };
        PhysicalSize::new(
            to_pixels(self.rect.width * scale),
            to_pixels(self.rect.height * scale),
        )
    }
}

fn to_pixels(value: f64) -> u32 {
    if value.is_finite() {
        (value.floor() as u32).max(1)
    } else {
        1
    }
}

/// Returns the size to resize to when the backing buffer no longer matches
/// the displayed size.
pub fn reconcile(
    current: PhysicalSize<u32>,
    display: &DisplayMetrics,
    max_dimension: u32,
) -> Option<PhysicalSize<u32>> {
    let wanted = display.backing_size();
    let limit = max_dimension.max(1);
    let target = PhysicalSize::new(wanted.width.min(limit), wanted.height.min(limit));
    (target != current).then_some(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backing_size_floors_and_clamps() {
        let display = DisplayMetrics::new(CanvasRect::filling(300.5, 0.2), 1.5);
        assert_eq!(display.backing_size(), PhysicalSize::new(450, 1));

        let broken = DisplayMetrics::new(CanvasRect::filling(100.0, 100.0), f64::NAN);
        assert_eq!(broken.backing_size(), PhysicalSize::new(100, 100));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let display = DisplayMetrics::new(CanvasRect::filling(300.0, 200.0), 2.0);
        let first = reconcile(PhysicalSize::new(1, 1), &display, u32::MAX);
        assert_eq!(first, Some(PhysicalSize::new(600, 400)));
        assert_eq!(reconcile(PhysicalSize::new(600, 400), &display, u32::MAX), None);
    }

    #[test]
    fn reconcile_targets_the_clamped_size() {
        let display = DisplayMetrics::new(CanvasRect::filling(3000.0, 1000.0), 2.0);
        let first = reconcile(PhysicalSize::new(1, 1), &display, 4096);
        assert_eq!(first, Some(PhysicalSize::new(4096, 2000)));
        assert_eq!(reconcile(PhysicalSize::new(4096, 2000), &display, 4096), None);
    }
}
