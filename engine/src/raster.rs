//! In-memory surface backed by a tiny-skia pixmap. Renders with the same
//! semantics as a 2D canvas context: a scale transform from logical to device
//! pixels, round caps and joins, `source-over` and `destination-out` blending.

use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect, Transform};

use crate::error::{SurfaceError, SurfaceResult};
use crate::stroke::Segment;
use crate::surface::{Snapshot, Surface, SurfaceLayout};
use crate::tool::{BlendMode, Color, PenStyle};

pub struct RasterSurface {
    pixmap: Pixmap,
    layout: SurfaceLayout,
    style: PenStyle,
    backdrop: Color,
}

impl RasterSurface {
    pub fn new() -> SurfaceResult<Self> {
        let layout = SurfaceLayout::default();
        Ok(Self {
            pixmap: allocate(&layout)?,
            layout,
            style: PenStyle {
                blend: BlendMode::DrawOver,
                width: 1.0,
                color: Color::WHITE,
            },
            backdrop: Color::BLACK,
        })
    }

    pub fn layout(&self) -> &SurfaceLayout {
        &self.layout
    }

    /// Raw premultiplied RGBA bytes, row-major in device pixels.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Stored color of a device pixel, un-premultiplied.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color {
            r: color.red(),
            g: color.green(),
            b: color.blue(),
            a: color.alpha(),
        })
    }

    /// What a viewer sees at a device pixel: the stored pixel composited over
    /// the background that sits behind the surface.
    pub fn visible_pixel(&self, x: u32, y: u32) -> Option<Color> {
        let color = self.pixmap.pixel(x, y)?;
        let cover = 255 - u16::from(color.alpha());
        let blend = |src: u8, dst: u8| (u16::from(src) + u16::from(dst) * cover / 255) as u8;
        Some(Color {
            r: blend(color.red(), self.backdrop.r),
            g: blend(color.green(), self.backdrop.g),
            b: blend(color.blue(), self.backdrop.b),
            a: 255,
        })
    }

    /// [`RasterSurface::visible_pixel`] addressed in logical pixels.
    pub fn visible_at(&self, x: f64, y: f64) -> Option<Color> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let scale = self.layout.scale;
        self.visible_pixel((x * scale) as u32, (y * scale) as u32)
    }

    fn transform(&self) -> Transform {
        let scale = self.layout.scale as f32;
        Transform::from_scale(scale, scale)
    }
}

fn allocate(layout: &SurfaceLayout) -> SurfaceResult<Pixmap> {
    Pixmap::new(layout.pixel_width, layout.pixel_height).ok_or(SurfaceError::Allocation {
        width: layout.pixel_width,
        height: layout.pixel_height,
    })
}

fn paint_for(color: Color, blend: BlendMode) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint.blend_mode = match blend {
        BlendMode::DrawOver => tiny_skia::BlendMode::SourceOver,
        BlendMode::Erase => tiny_skia::BlendMode::DestinationOut,
    };
    paint
}

impl Surface for RasterSurface {
    fn resize(&mut self, layout: &SurfaceLayout) -> SurfaceResult<()> {
        self.pixmap = allocate(layout)?;
        self.layout = *layout;
        Ok(())
    }

    fn snapshot(&self) -> SurfaceResult<Snapshot> {
        Ok(Snapshot {
            width: self.pixmap.width(),
            height: self.pixmap.height(),
            scale: self.layout.scale,
            data: self.pixmap.data().to_vec(),
        })
    }

    fn restore(&mut self, snapshot: &Snapshot) -> SurfaceResult<()> {
        snapshot.check()?;
        let columns = snapshot.width.min(self.pixmap.width()) as usize * 4;
        let rows = snapshot.height.min(self.pixmap.height()) as usize;
        let src_stride = snapshot.width as usize * 4;
        let dst_stride = self.pixmap.width() as usize * 4;
        let data = self.pixmap.data_mut();
        for row in 0..rows {
            let src = &snapshot.data[row * src_stride..row * src_stride + columns];
            data[row * dst_stride..row * dst_stride + columns].copy_from_slice(src);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn fill_background(&mut self, color: Color) {
        self.backdrop = color;
        let (width, height) = self.layout.logical_size();
        let Some(rect) = Rect::from_xywh(0.0, 0.0, width as f32, height as f32) else {
            return;
        };
        let paint = paint_for(color, BlendMode::DrawOver);
        let transform = self.transform();
        self.pixmap.fill_rect(rect, &paint, transform, None);
    }

    fn apply_style(&mut self, style: &PenStyle) {
        self.style = *style;
    }

    fn stroke(&mut self, segment: &Segment) {
        let mut builder = PathBuilder::new();
        match *segment {
            Segment::Line { from, to } => {
                builder.move_to(from.x as f32, from.y as f32);
                builder.line_to(to.x as f32, to.y as f32);
            }
            Segment::Quadratic { from, control, to } => {
                builder.move_to(from.x as f32, from.y as f32);
                builder.quad_to(control.x as f32, control.y as f32, to.x as f32, to.y as f32);
            }
        }
        let Some(path) = builder.finish() else {
            tracing::trace!("Skipping degenerate segment {segment:?}");
            return;
        };
        let paint = paint_for(self.style.color, self.style.blend);
        let stroke = tiny_skia::Stroke {
            width: self.style.width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..tiny_skia::Stroke::default()
        };
        let transform = self.transform();
        self.pixmap.stroke_path(&path, &paint, &stroke, transform, None);
    }
}
