use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

use super::host;
use crate::raster::{Backing, CellRect, Extent, Surface};

/// A 2D canvas overlaid on a container element. The container's box is the
/// drawing extent.
pub struct CanvasSurface {
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// `Ok(None)` when the browser refuses a 2D context.
    pub fn attach(
        container: HtmlElement,
        canvas: HtmlCanvasElement,
    ) -> Result<Option<Self>, JsValue> {
        let Some(ctx) = canvas.get_context("2d")? else {
            return Ok(None);
        };
        let ctx: CanvasRenderingContext2d = ctx.dyn_into()?;
        Ok(Some(Self {
            container,
            canvas,
            ctx,
        }))
    }
}

impl Surface for CanvasSurface {
    fn extent(&self) -> Extent {
        host::element_extent(&self.container)
    }

    fn apply_backing(&mut self, backing: &Backing) {
        let extent = self.extent();
        self.canvas.set_width(backing.width);
        self.canvas.set_height(backing.height);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", extent.width));
        let _ = style.set_property("height", &format!("{}px", extent.height));
        // Resizing resets the context state, so scale after every resize.
        let _ = self
            .ctx
            .set_transform(backing.scale, 0.0, 0.0, backing.scale, 0.0, 0.0);
    }

    fn clear(&mut self, extent: Extent) {
        self.ctx.clear_rect(0.0, 0.0, extent.width, extent.height);
    }

    fn set_fill(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn fill_rect(&mut self, rect: CellRect) {
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }
}
