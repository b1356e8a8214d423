use crate::*;

/// CSS color literal understood by a 2D canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub &'static str);

impl Color {
    pub const HIDDEN: Color = Color("#fff");
    pub const ALERT: Color = Color("#ff0000");
    pub const REVEALED: Color = Color("#ccc");
    pub const INK: Color = Color("#000");

    pub const fn as_css(self) -> &'static str {
        self.0
    }
}

/// 2D drawing target with a fixed pixel size.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color);

    /// Draws `text` centered on `center` using a `font_px` sized font.
    fn fill_text(
        &mut self,
        text: &str,
        center: Point,
        font_px: u32,
        color: Color,
    ) -> Result<(), SurfaceError>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear,
    FillRect(Rect, Color),
    StrokeRect(Rect, Color),
    Text {
        text: String,
        center: Point,
        font_px: u32,
        color: Color,
    },
}

/// Surface keeping every draw call in memory, for headless checks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Operations since the most recent clear, i.e. what is currently visible.
    pub fn frame(&self) -> &[DrawOp] {
        let start = self
            .ops
            .iter()
            .rposition(|op| matches!(op, DrawOp::Clear))
            .unwrap_or(0);
        &self.ops[start..]
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        core::mem::take(&mut self.ops)
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::FillRect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::StrokeRect(rect, color));
    }

    fn fill_text(
        &mut self,
        text: &str,
        center: Point,
        font_px: u32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            center,
            font_px,
            color,
        });
        Ok(())
    }
}
