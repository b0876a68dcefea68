use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use kokuban_engine::{
    Color, PenStyle, Segment, Snapshot, Surface, SurfaceError, SurfaceLayout, SurfaceResult,
};

fn backend_error(err: JsValue) -> SurfaceError {
    SurfaceError::Backend(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// Surface backed by a `<canvas>` element and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    layout: SurfaceLayout,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        Ok(Self {
            canvas,
            ctx,
            layout: SurfaceLayout::default(),
        })
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, layout: &SurfaceLayout) -> SurfaceResult<()> {
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", layout.css_width));
        let _ = style.set_property("height", &format!("{}px", layout.css_height));
        self.canvas.set_width(layout.pixel_width);
        self.canvas.set_height(layout.pixel_height);
        // Resizing reset the context; drawing stays in CSS pixels from here on.
        self.ctx
            .set_transform(layout.scale, 0.0, 0.0, layout.scale, 0.0, 0.0)
            .map_err(backend_error)?;
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
        self.layout = *layout;
        Ok(())
    }

    fn snapshot(&self) -> SurfaceResult<Snapshot> {
        let image = self
            .ctx
            .get_image_data(
                0.0,
                0.0,
                f64::from(self.canvas.width()),
                f64::from(self.canvas.height()),
            )
            .map_err(backend_error)?;
        Ok(Snapshot {
            width: image.width(),
            height: image.height(),
            scale: self.layout.scale,
            data: image.data().0,
        })
    }

    fn restore(&mut self, snapshot: &Snapshot) -> SurfaceResult<()> {
        snapshot.check()?;
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(&snapshot.data[..]),
            snapshot.width,
            snapshot.height,
        )
        .map_err(backend_error)?;
        // putImageData ignores the transform and writes device pixels.
        self.ctx
            .put_image_data(&image, 0.0, 0.0)
            .map_err(backend_error)
    }

    fn clear(&mut self) {
        let (width, height) = self.layout.logical_size();
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_background(&mut self, color: Color) {
        let css = color.css();
        let (width, height) = self.layout.logical_size();
        // The element background shows through erased pixels.
        let _ = self.canvas.style().set_property("background-color", &css);
        self.ctx.save();
        let _ = self.ctx.set_global_composite_operation("source-over");
        self.ctx.set_fill_style_str(&css);
        self.ctx.fill_rect(0.0, 0.0, width, height);
        self.ctx.restore();
    }

    fn apply_style(&mut self, style: &PenStyle) {
        let _ = self
            .ctx
            .set_global_composite_operation(style.blend.composite_operation());
        self.ctx.set_stroke_style_str(&style.color.css());
        self.ctx.set_line_width(style.width);
    }

    fn stroke(&mut self, segment: &Segment) {
        let ctx = &self.ctx;
        ctx.begin_path();
        match *segment {
            Segment::Line { from, to } => {
                ctx.move_to(from.x, from.y);
                ctx.line_to(to.x, to.y);
            }
            Segment::Quadratic { from, control, to } => {
                ctx.move_to(from.x, from.y);
                ctx.quadratic_curve_to(control.x, control.y, to.x, to.y);
            }
        }
        ctx.stroke();
    }
}
