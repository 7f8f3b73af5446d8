/// Maps canvas regions onto artwork indices.
///
/// Cells are laid out row-major from the top-left corner: index
/// `row * columns + column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridMapping {
    columns: u32,
    rows: u32,
}

impl GridMapping {
    pub fn new(columns: u32, count: usize) -> Self {
        let columns = columns.max(1);
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        Self {
            columns,
            rows: count.div_ceil(columns),
        }
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// `(columns, rows)` as written into the shader uniforms.
    pub fn dims(&self) -> [f32; 2] {
        [self.columns as f32, self.rows as f32]
    }

    /// Resolves a canvas-relative point to a cell index.
    ///
    /// Returns `None` for points outside `width` x `height`, for an empty grid
    /// and for a degenerate canvas. The index is not checked against the
    /// artwork list; callers look it up in the list they currently hold.
    pub fn cell_at(&self, x: f64, y: f64, width: f64, height: f64) -> Option<usize> {
        if self.rows == 0 || width <= 0.0 || height <= 0.0 {
            return None;
        }
        if !(0.0..width).contains(&x) || !(0.0..height).contains(&y) {
            return None;
        }

        let column = ((x / width) * f64::from(self.columns)).floor() as u32;
        let row = ((y / height) * f64::from(self.rows)).floor() as u32;
        let column = column.min(self.columns - 1);
        let row = row.min(self.rows - 1);
        usize::try_from(row * self.columns + column).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_round_up() {
        assert_eq!(GridMapping::new(3, 0).rows(), 0);
        assert_eq!(GridMapping::new(3, 1).rows(), 1);
        assert_eq!(GridMapping::new(3, 6).rows(), 2);
        assert_eq!(GridMapping::new(3, 7).rows(), 3);
        assert_eq!(GridMapping::new(0, 4).columns(), 1);
    }

    #[test]
    fn maps_click_to_row_major_index() {
        let grid = GridMapping::new(3, 6);
        assert_eq!(grid.cell_at(250.0, 150.0, 300.0, 200.0), Some(5));
        assert_eq!(grid.cell_at(0.0, 0.0, 300.0, 200.0), Some(0));
        assert_eq!(grid.cell_at(150.0, 50.0, 300.0, 200.0), Some(1));
        assert_eq!(grid.cell_at(10.0, 199.9, 300.0, 200.0), Some(3));
    }

    #[test]
    fn index_may_exceed_count() {
        // Four artworks still produce a 3x2 grid whose last cells are empty.
        let grid = GridMapping::new(3, 4);
        assert_eq!(grid.cell_at(250.0, 150.0, 300.0, 200.0), Some(5));
    }

    #[test]
    fn rejects_points_outside_canvas() {
        let grid = GridMapping::new(3, 6);
        assert_eq!(grid.cell_at(-1.0, 10.0, 300.0, 200.0), None);
        assert_eq!(grid.cell_at(300.0, 10.0, 300.0, 200.0), None);
        assert_eq!(grid.cell_at(10.0, 200.0, 300.0, 200.0), None);
        assert_eq!(grid.cell_at(10.0, 10.0, 0.0, 200.0), None);
        assert_eq!(GridMapping::new(3, 0).cell_at(1.0, 1.0, 300.0, 200.0), None);
    }
}
