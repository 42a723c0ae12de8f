//! Drawing-surface abstraction the renderer paints through.
//!
//! Coordinates are millimetres. A surface exposes a small primitive set plus a
//! save/restore transform stack; [`TransformGuard`] scopes that stack so every exit
//! path, including a failed primitive, leaves the surface as it found it.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::error::SurfaceError;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle given by its edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }
}

/// RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const LIME: Color = Color::rgb(0, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Vertical font metrics, both measured as positive distances from the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontMetrics {
    pub ascent: f32,
    pub descent: f32,
}

impl FontMetrics {
    /// Full glyph extent, top of the ascenders to the bottom of the descenders.
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// Text measurement at a given font size. Widths come back in the units of `size`.
pub trait TextMeasurer {
    fn measure_text(&self, text: &str, size: f32) -> f32;

    fn font_metrics(&self, size: f32) -> FontMetrics;
}

/// Vector drawing target.
pub trait DrawingSurface: TextMeasurer {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), SurfaceError>;

    fn fill_oval(&mut self, bounds: Rect, color: Color) -> Result<(), SurfaceError>;

    /// Fill a closed polygon.
    fn fill_polygon(&mut self, points: &[Point], color: Color) -> Result<(), SurfaceError>;

    fn stroke_line(
        &mut self,
        from: Point,
        to: Point,
        width: f32,
        color: Color,
    ) -> Result<(), SurfaceError>;

    /// Stroke the outline of a closed polygon.
    fn stroke_polygon(
        &mut self,
        points: &[Point],
        width: f32,
        color: Color,
    ) -> Result<(), SurfaceError>;

    /// Stroke the outline of the ellipse inscribed in `bounds`.
    fn stroke_oval(&mut self, bounds: Rect, width: f32, color: Color) -> Result<(), SurfaceError>;

    /// Draw text with its baseline starting at `origin`.
    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        size: f32,
        color: Color,
    ) -> Result<(), SurfaceError>;

    fn save(&mut self);

    fn restore(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);

    fn rotate(&mut self, degrees: f32);
}

/// Saves the surface transform on creation and restores it on drop.
pub struct TransformGuard<'a, S: DrawingSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: DrawingSurface + ?Sized> TransformGuard<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: DrawingSurface + ?Sized> Deref for TransformGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: DrawingSurface + ?Sized> DerefMut for TransformGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: DrawingSurface + ?Sized> Drop for TransformGuard<'_, S> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            log::warn!("restoring surface transform while unwinding");
        }
        self.surface.restore();
    }
}

/// Fixed-pitch metrics: every character advances `advance × size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPitch {
    pub advance: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl Default for FixedPitch {
    fn default() -> Self {
        Self {
            advance: 0.6,
            ascent: 0.8,
            descent: 0.2,
        }
    }
}

impl TextMeasurer for FixedPitch {
    fn measure_text(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * self.advance * size
    }

    fn font_metrics(&self, size: f32) -> FontMetrics {
        FontMetrics {
            ascent: self.ascent * size,
            descent: self.descent * size,
        }
    }
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect { rect: Rect, color: Color },
    FillOval { bounds: Rect, color: Color },
    FillPolygon { points: Vec<Point>, color: Color },
    StrokeLine { from: Point, to: Point, width: f32, color: Color },
    StrokePolygon { points: Vec<Point>, width: f32, color: Color },
    StrokeOval { bounds: Rect, width: f32, color: Color },
    Text { text: String, origin: Point, size: f32, color: Color },
    Save,
    Restore,
    Translate { dx: f32, dy: f32 },
    Rotate { degrees: f32 },
}

impl DrawOp {
    /// Whether the op paints anything.
    pub fn is_paint(&self) -> bool {
        !matches!(
            self,
            DrawOp::Save | DrawOp::Restore | DrawOp::Translate { .. } | DrawOp::Rotate { .. }
        )
    }
}

/// Display-list surface: records every call instead of rasterising.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    metrics: FixedPitch,
    depth: usize,
    painted: usize,
    fail_at: Option<usize>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(metrics: FixedPitch) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    /// Make the `n`th paint call (zero based) fail.
    pub fn failing_at(mut self, n: usize) -> Self {
        self.fail_at = Some(n);
        self
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn paint_ops(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| op.is_paint())
    }

    /// Current save depth; zero when every save has been restored.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    fn paint(&mut self, op: DrawOp) -> Result<(), SurfaceError> {
        if self.fail_at == Some(self.painted) {
            return Err(SurfaceError::new(format!("injected failure at paint {}", self.painted)));
        }
        self.painted += 1;
        self.ops.push(op);
        Ok(())
    }
}

impl TextMeasurer for RecordingSurface {
    fn measure_text(&self, text: &str, size: f32) -> f32 {
        self.metrics.measure_text(text, size)
    }

    fn font_metrics(&self, size: f32) -> FontMetrics {
        self.metrics.font_metrics(size)
    }
}

impl DrawingSurface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), SurfaceError> {
        self.paint(DrawOp::FillRect { rect, color })
    }

    fn fill_oval(&mut self, bounds: Rect, color: Color) -> Result<(), SurfaceError> {
        self.paint(DrawOp::FillOval { bounds, color })
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) -> Result<(), SurfaceError> {
        self.paint(DrawOp::FillPolygon {
            points: points.to_vec(),
            color,
        })
    }

    fn stroke_line(
        &mut self,
        from: Point,
        to: Point,
        width: f32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.paint(DrawOp::StrokeLine {
            from,
            to,
            width,
            color,
        })
    }

    fn stroke_polygon(
        &mut self,
        points: &[Point],
        width: f32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.paint(DrawOp::StrokePolygon {
            points: points.to_vec(),
            width,
            color,
        })
    }

    fn stroke_oval(&mut self, bounds: Rect, width: f32, color: Color) -> Result<(), SurfaceError> {
        self.paint(DrawOp::StrokeOval {
            bounds,
            width,
            color,
        })
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        size: f32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.paint(DrawOp::Text {
            text: text.to_string(),
            origin,
            size,
            color,
        })
    }

    fn save(&mut self) {
        self.depth += 1;
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.ops.push(DrawOp::Translate { dx, dy });
    }

    fn rotate(&mut self, degrees: f32) {
        self.ops.push(DrawOp::Rotate { degrees });
    }
}
