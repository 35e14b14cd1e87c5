//! Drawing primitives the simulation needs from a host surface.

use crate::Vector2D;
use core::fmt;

/// Current pixel size of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vector2D {
        Vector2D::new(self.width / 2.0, self.height / 2.0)
    }
}

/// An RGBA colour. `Display` renders it as a CSS `rgba(...)` string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Glyph colours, borrowed from a dark editor theme.
pub const PALETTE: [Color; 8] = [
    Color::rgb(0x56, 0x9c, 0xd6),
    Color::rgb(0x4e, 0xc9, 0xb0),
    Color::rgb(0xc5, 0x86, 0xc0),
    Color::rgb(0xdc, 0xdc, 0xaa),
    Color::rgb(0xce, 0x91, 0x78),
    Color::rgb(0x9c, 0xdc, 0xfe),
    Color::rgb(0xb5, 0xce, 0xa8),
    Color::rgb(0xd1, 0x69, 0x69),
];

/// A filled, optionally rotated ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub center: Vector2D,
    pub radius_x: f32,
    pub radius_y: f32,
    /// Rotation in radians around `center`.
    pub rotation: f32,
}

/// A 2D drawing target supplied by the host.
///
/// The simulation re-reads [`RenderSurface::size`] every frame, so hosts may
/// resize the underlying canvas at any time.
pub trait RenderSurface {
    /// Current size, or `None` while the surface is not mounted or sized.
    fn size(&self) -> Option<Bounds>;

    fn clear(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Draw a single character centred on `at`.
    fn draw_glyph(&mut self, glyph: char, at: Vector2D, color: Color);

    fn stroke_polyline(&mut self, points: &[Vector2D], color: Color, line_width: f32);

    fn fill_ellipse(&mut self, ellipse: &Ellipse, color: Color);

    /// Clear the whole surface, if it has a size.
    fn clear_all(&mut self) {
        if let Some(bounds) = self.size() {
            self.clear(0.0, 0.0, bounds.width, bounds.height);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use alloc::vec::Vec;

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        Clear,
        Glyph(char, Vector2D),
        Polyline(Vec<Vector2D>),
        Ellipse(Ellipse),
    }

    /// Surface that records every draw call.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub bounds: Option<Bounds>,
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub fn sized(width: f32, height: f32) -> Self {
            Self {
                bounds: Some(Bounds::new(width, height)),
                calls: Vec::new(),
            }
        }

        pub fn polylines(&self) -> usize {
            self.calls
                .iter()
                .filter(|call| matches!(call, DrawCall::Polyline(_)))
                .count()
        }

        pub fn glyphs(&self) -> Vec<char> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    DrawCall::Glyph(glyph, _) => Some(*glyph),
                    _ => None,
                })
                .collect()
        }
    }

    impl RenderSurface for RecordingSurface {
        fn size(&self) -> Option<Bounds> {
            self.bounds
        }

        fn clear(&mut self, _x: f32, _y: f32, _width: f32, _height: f32) {
            self.calls.push(DrawCall::Clear);
        }

        fn draw_glyph(&mut self, glyph: char, at: Vector2D, _color: Color) {
            self.calls.push(DrawCall::Glyph(glyph, at));
        }

        fn stroke_polyline(&mut self, points: &[Vector2D], _color: Color, _line_width: f32) {
            self.calls.push(DrawCall::Polyline(points.to_vec()));
        }

        fn fill_ellipse(&mut self, ellipse: &Ellipse, _color: Color) {
            self.calls.push(DrawCall::Ellipse(*ellipse));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_color_css() {
        let color = Color::rgb(86, 156, 214).with_alpha(0.5);
        assert_eq!(color.to_string(), "rgba(86, 156, 214, 0.5)");
    }

    #[test]
    fn test_clear_all_skips_unsized_surface() {
        let mut surface = testing::RecordingSurface::default();
        surface.clear_all();
        assert!(surface.calls.is_empty());

        let mut surface = testing::RecordingSurface::sized(100.0, 50.0);
        surface.clear_all();
        assert_eq!(surface.calls, [testing::DrawCall::Clear]);
    }
}
