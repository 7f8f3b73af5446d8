use crate::types::POINTER_SENTINEL;

/// Canvas placement inside the window, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    /// A canvas covering a `width` x `height` window.
    pub fn filling(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Converts a window-space point to canvas-relative coordinates.
    pub fn relative(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.left, y - self.top)
    }
}

/// Pointer input delivered to the canvas. Coordinates are window-space
/// logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    PointerMoved { x: f64, y: f64 },
    PointerLeft,
    Click { x: f64, y: f64 },
}

/// Latest pointer position, unsmoothed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    x: f64,
    y: f64,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            x: POINTER_SENTINEL,
            y: POINTER_SENTINEL,
        }
    }
}

impl PointerState {
    pub fn moved(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn left(&mut self) {
        *self = Self::default();
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn is_tracking(&self) -> bool {
        *self != Self::default()
    }

    /// Pointer in backing-buffer pixels with a bottom-left origin, the layout
    /// the fragment shader expects for `mouse`.
    pub fn uniform(&self, rect: &CanvasRect, scale_factor: f64) -> [f32; 2] {
        let (x, y) = rect.relative(self.x, self.y);
        [
            (x * scale_factor) as f32,
            ((rect.height - y) * scale_factor) as f32,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_flips_y_and_scales() {
        let rect = CanvasRect::filling(300.0, 200.0);
        let mut pointer = PointerState::default();
        pointer.moved(100.0, 50.0);
        assert_eq!(pointer.uniform(&rect, 2.0), [200.0, 300.0]);
    }

    #[test]
    fn uniform_respects_canvas_offset() {
        let rect = CanvasRect {
            left: 20.0,
            top: 10.0,
            width: 100.0,
            height: 100.0,
        };
        let mut pointer = PointerState::default();
        pointer.moved(20.0, 10.0);
        assert_eq!(pointer.uniform(&rect, 1.0), [0.0, 100.0]);
    }

    #[test]
    fn sentinel_lands_off_canvas() {
        let rect = CanvasRect::filling(300.0, 200.0);
        let mut pointer = PointerState::default();
        assert!(!pointer.is_tracking());
        let [x, y] = pointer.uniform(&rect, 1.5);
        assert!(x < 0.0);
        assert!(y > 200.0 * 1.5);

        pointer.moved(5.0, 5.0);
        assert!(pointer.is_tracking());
        pointer.left();
        assert_eq!(pointer.position(), (POINTER_SENTINEL, POINTER_SENTINEL));
    }
}
