use sweepview_core::{Color, Point, Rect, Surface, SurfaceError};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::describe_js;

/// [`Surface`] backed by a `<canvas>` 2D context.
pub(crate) struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub(crate) fn new(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let context = canvas
            .get_context("2d")
            .map_err(|err| SurfaceError::Draw(describe_js(&err)))?
            .ok_or_else(|| SurfaceError::Draw("2d context not available".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::Draw("unexpected context type".to_string()))?;
        Ok(Self { canvas, context })
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn clear(&mut self) {
        self.context
            .clear_rect(0., 0., self.width() as f64, self.height() as f64);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.context.set_fill_style_str(color.as_css());
        self.context
            .fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        self.context.set_stroke_style_str(color.as_css());
        self.context
            .stroke_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn fill_text(
        &mut self,
        text: &str,
        center: Point,
        font_px: u32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        let context = &self.context;
        context.set_font(&format!("{}px Arial", font_px));
        context.set_text_align("center");
        context.set_text_baseline("middle");
        context.set_fill_style_str(color.as_css());
        context
            .fill_text(text, center.x, center.y)
            .map_err(|err| SurfaceError::Draw(describe_js(&err)))
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use gloo::utils::document;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn canvas(width: u32, height: u32) -> HtmlCanvasElement {
        let canvas = document()
            .create_element("canvas")
            .unwrap()
            .dyn_into::<HtmlCanvasElement>()
            .unwrap();
        canvas.set_width(width);
        canvas.set_height(height);
        canvas
    }

    #[wasm_bindgen_test]
    fn reports_canvas_size() {
        let surface = CanvasSurface::new(canvas(360, 200)).unwrap();
        assert_eq!((surface.width(), surface.height()), (360, 200));
    }

    #[wasm_bindgen_test]
    fn draws_glyphs_without_error() {
        let mut surface = CanvasSurface::new(canvas(40, 40)).unwrap();
        surface.clear();
        surface.fill_rect(Rect::new(0., 0., 40., 40.), Color::ALERT);
        surface.stroke_rect(Rect::new(0., 0., 40., 40.), Color::INK);
        assert!(surface
            .fill_text("💣", Point::new(20., 20.), 20, Color::INK)
            .is_ok());
    }
}
