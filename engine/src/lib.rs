//! Freehand drawing core: a two-state stroke engine that smooths pointer
//! samples into quadratic segments, and a surface manager that keeps a raster
//! fitted to the viewport. Both are driven through [`Board`].

mod board;
mod config;
mod error;
mod geometry;
mod input;
#[cfg(feature = "raster")]
mod raster;
mod stroke;
mod surface;
mod tool;

pub use board::Board;
pub use config::BoardConfig;
pub use error::{SurfaceError, SurfaceResult};
pub use geometry::{client_to_logical, midpoint, Origin};
pub use input::{InputSource, Modifiers, PointerSample, Shortcut};
#[cfg(feature = "raster")]
pub use raster::RasterSurface;
pub use stroke::{ActiveStroke, Segment, StrokeEngine, StrokeState};
pub use surface::{ResizePolicy, Snapshot, Surface, SurfaceLayout, SurfaceManager, Viewport};
pub use tool::{
    sanitize_thickness, BlendMode, Color, PenStyle, Tool, ToolLabels, ToolState, ToolView,
    DEFAULT_ERASER_THICKNESS, DEFAULT_PEN_THICKNESS, MAX_THICKNESS, MIN_THICKNESS,
};

/// A position in logical (CSS) pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
