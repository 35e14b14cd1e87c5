use glyph_core::{Bounds, Color, Ellipse, RenderSurface, SpawnLayout, Vector2D};
use std::fmt;

/// A character-cell surface for terminals.
///
/// Every cell covers `cell_width` x `cell_height` surface units, so text laid
/// out with [`AsciiSurface::layout`] spawns each agent exactly on the cell its
/// character came from.
#[derive(Debug, Clone)]
pub struct AsciiSurface {
    cols: usize,
    rows: usize,
    cell_width: f32,
    cell_height: f32,
    cells: Vec<char>,
}

impl AsciiSurface {
    pub fn new(cols: usize, rows: usize, cell_width: f32, cell_height: f32) -> Self {
        Self {
            cols,
            rows,
            cell_width,
            cell_height,
            cells: vec![' '; cols * rows],
        }
    }

    pub fn layout(&self) -> SpawnLayout {
        SpawnLayout::new(
            Bounds::new(
                self.cols as f32 * self.cell_width,
                self.rows as f32 * self.cell_height,
            ),
            self.cell_width,
            self.cell_height,
        )
    }

    fn cell_of(&self, at: Vector2D) -> Option<usize> {
        if at.x < 0.0 || at.y < 0.0 {
            return None;
        }
        let col = (at.x / self.cell_width) as usize;
        let row = (at.y / self.cell_height) as usize;
        (col < self.cols && row < self.rows).then(|| row * self.cols + col)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<char> {
        (row < self.rows && col < self.cols).then(|| self.cells[row * self.cols + col])
    }

    pub fn row(&self, row: usize) -> String {
        self.cells[row * self.cols..(row + 1) * self.cols]
            .iter()
            .collect()
    }

    /// Number of non-blank cells.
    pub fn ink(&self) -> usize {
        self.cells.iter().filter(|cell| **cell != ' ').count()
    }
}

fn stroke_char(from: Vector2D, to: Vector2D) -> char {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.abs() < dy.abs() / 2.0 {
        '|'
    } else if dy.abs() < dx.abs() / 2.0 {
        '-'
    } else if dx * dy > 0.0 {
        '\\'
    } else {
        '/'
    }
}

impl RenderSurface for AsciiSurface {
    fn size(&self) -> Option<Bounds> {
        (self.cols > 0 && self.rows > 0).then(|| self.layout().bounds)
    }

    fn clear(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let first_col = (x / self.cell_width).max(0.0) as usize;
        let first_row = (y / self.cell_height).max(0.0) as usize;
        let last_col = (((x + width) / self.cell_width).ceil() as usize).min(self.cols);
        let last_row = (((y + height) / self.cell_height).ceil() as usize).min(self.rows);

        for row in first_row..last_row {
            for col in first_col..last_col {
                self.cells[row * self.cols + col] = ' ';
            }
        }
    }

    fn draw_glyph(&mut self, glyph: char, at: Vector2D, _color: Color) {
        if let Some(index) = self.cell_of(at) {
            self.cells[index] = glyph;
        }
    }

    fn stroke_polyline(&mut self, points: &[Vector2D], _color: Color, _line_width: f32) {
        // Limbs only fill blank cells so they never hide a glyph.
        for segment in points.windows(2) {
            let mark = stroke_char(segment[0], segment[1]);
            if let Some(index) = self.cell_of(segment[1]) {
                if self.cells[index] == ' ' {
                    self.cells[index] = mark;
                }
            }
        }
    }

    fn fill_ellipse(&mut self, ellipse: &Ellipse, color: Color) {
        // Only the opaque body shows up; halos and wings are too fine for cells.
        if color.a < 1.0 {
            return;
        }
        if let Some(index) = self.cell_of(ellipse.center) {
            self.cells[index] = '@';
        }
    }
}

impl fmt::Display for AsciiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            writeln!(f, "{}", self.row(row))?;
        }
        Ok(())
    }
}
