//! Raster surface abstraction and the manager that keeps it fitted to the
//! viewport.

use serde::Deserialize;

use crate::error::{SurfaceError, SurfaceResult};
use crate::stroke::Segment;
use crate::tool::{Color, PenStyle};

/// Browser viewport metrics at the moment of a fit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub inner_width: f64,
    pub inner_height: f64,
    /// Visual viewport size, when the host exposes one. Mobile browsers shrink
    /// it while the address bar or keyboard is shown.
    pub visual: Option<(f64, f64)>,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(inner_width: f64, inner_height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            inner_width,
            inner_height,
            visual: None,
            device_pixel_ratio,
        }
    }

    pub fn with_visual(mut self, width: f64, height: f64) -> Self {
        self.visual = Some((width, height));
        self
    }
}

/// One fitted size: logical (CSS) pixels, backing device pixels and the scale
/// between them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceLayout {
    pub css_width: u32,
    pub css_height: u32,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub scale: f64,
}

impl Default for SurfaceLayout {
    fn default() -> Self {
        Self {
            css_width: 1,
            css_height: 1,
            pixel_width: 1,
            pixel_height: 1,
            scale: 1.0,
        }
    }
}

impl SurfaceLayout {
    pub fn from_viewport(viewport: &Viewport) -> Self {
        let scale = if viewport.device_pixel_ratio.is_finite() && viewport.device_pixel_ratio > 0.0
        {
            viewport.device_pixel_ratio
        } else {
            1.0
        };
        let (visual_width, visual_height) = viewport.visual.unwrap_or((0.0, 0.0));
        let css_width = logical_extent(visual_width, viewport.inner_width);
        let css_height = logical_extent(visual_height, viewport.inner_height);
        Self {
            css_width,
            css_height,
            pixel_width: device_extent(css_width, scale),
            pixel_height: device_extent(css_height, scale),
            scale,
        }
    }

    pub fn logical_size(&self) -> (f64, f64) {
        (f64::from(self.css_width), f64::from(self.css_height))
    }
}

fn logical_extent(preferred: f64, fallback: f64) -> u32 {
    let value = if preferred.is_finite() && preferred > 0.0 {
        preferred
    } else {
        fallback
    };
    if !value.is_finite() {
        return 1;
    }
    (value.floor() as u32).max(1)
}

fn device_extent(css: u32, scale: f64) -> u32 {
    ((f64::from(css) * scale).round() as u32).max(1)
}

/// What happens to painted pixels when the surface is resized.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResizePolicy {
    /// Every resize starts from a blank background.
    #[default]
    Blank,
    /// Device pixels are copied across a resize when the scale is unchanged.
    Preserve,
}

/// Device pixels captured before a resize, in the surface's native layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
    pub data: Vec<u8>,
}

impl Snapshot {
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    pub fn check(&self) -> SurfaceResult<()> {
        if self.data.len() != self.expected_len() {
            return Err(SurfaceError::SnapshotSize {
                len: self.data.len(),
                expected: self.expected_len(),
            });
        }
        Ok(())
    }
}

/// A raster the board paints on. Coordinates passed in are logical pixels;
/// implementations scale to device pixels themselves.
pub trait Surface {
    /// Reallocates the backing store for `layout` and installs the logical to
    /// device transform. Prior content is discarded.
    fn resize(&mut self, layout: &SurfaceLayout) -> SurfaceResult<()>;

    fn snapshot(&self) -> SurfaceResult<Snapshot>;

    /// Writes `snapshot` back at the device origin, clipped to the surface.
    fn restore(&mut self, snapshot: &Snapshot) -> SurfaceResult<()>;

    /// Makes every pixel fully transparent.
    fn clear(&mut self);

    /// Paints the whole logical area with `color`, regardless of the current
    /// pen style. The same color is what shows through erased pixels.
    fn fill_background(&mut self, color: Color);

    fn apply_style(&mut self, style: &PenStyle);

    /// Commits one segment using the last applied style.
    fn stroke(&mut self, segment: &Segment);
}

pub struct SurfaceManager {
    policy: ResizePolicy,
    background: Color,
    layout: Option<SurfaceLayout>,
}

impl SurfaceManager {
    pub fn new(policy: ResizePolicy) -> Self {
        Self {
            policy,
            background: Color::BLACK,
            layout: None,
        }
    }

    /// Sizes `surface` to the viewport and repaints the background. Returns
    /// false when nothing changed, so frequent viewport scroll events do not
    /// wipe the drawing.
    pub fn fit<S: Surface>(&mut self, surface: &mut S, viewport: &Viewport) -> bool {
        let layout = SurfaceLayout::from_viewport(viewport);
        if self.layout == Some(layout) {
            tracing::trace!("Surface already fitted to {layout:?}");
            return false;
        }

        let snapshot = match (self.policy, self.layout) {
            (ResizePolicy::Preserve, Some(_)) => match surface.snapshot() {
                Ok(snapshot) => Some(snapshot),
                Err(err) => {
                    tracing::warn!("Could not snapshot surface before resize: {err}");
                    None
                }
            },
            _ => None,
        };

        if let Err(err) = surface.resize(&layout) {
            tracing::warn!("Surface resize to {layout:?} failed: {err}");
            self.layout = None;
            return false;
        }
        tracing::debug!(
            "Fitted surface to {}x{} css, {}x{} device, scale {}",
            layout.css_width,
            layout.css_height,
            layout.pixel_width,
            layout.pixel_height,
            layout.scale
        );
        self.layout = Some(layout);
        surface.fill_background(self.background);

        if let Some(snapshot) = snapshot {
            if let Err(err) = restore_snapshot(surface, &snapshot, &layout) {
                tracing::warn!("Continuing with a blank surface: {err}");
                surface.fill_background(self.background);
            }
        }
        true
    }

    /// Clears to transparent and repaints the background.
    pub fn reset<S: Surface>(&self, surface: &mut S) {
        surface.clear();
        surface.fill_background(self.background);
    }
}

fn restore_snapshot<S: Surface>(
    surface: &mut S,
    snapshot: &Snapshot,
    layout: &SurfaceLayout,
) -> SurfaceResult<()> {
    if snapshot.scale != layout.scale {
        return Err(SurfaceError::ScaleMismatch {
            snapshot: snapshot.scale,
            surface: layout.scale,
        });
    }
    snapshot.check()?;
    surface.restore(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_scales_backing_store_by_device_pixel_ratio() {
        let layout = SurfaceLayout::from_viewport(&Viewport::new(800.0, 600.0, 2.0));
        assert_eq!((layout.css_width, layout.css_height), (800, 600));
        assert_eq!((layout.pixel_width, layout.pixel_height), (1600, 1200));
        assert_eq!(layout.scale, 2.0);
    }

    #[test]
    fn layout_prefers_visual_viewport() {
        let viewport = Viewport::new(390.0, 844.0, 3.0).with_visual(390.0, 664.5);
        let layout = SurfaceLayout::from_viewport(&viewport);
        assert_eq!((layout.css_width, layout.css_height), (390, 664));
        assert_eq!((layout.pixel_width, layout.pixel_height), (1170, 1992));
    }

    #[test]
    fn empty_visual_viewport_falls_back_to_window() {
        let viewport = Viewport::new(1024.0, 768.0, 1.0).with_visual(0.0, 0.0);
        let layout = SurfaceLayout::from_viewport(&viewport);
        assert_eq!((layout.css_width, layout.css_height), (1024, 768));
    }

    #[test]
    fn fractional_ratio_rounds_to_whole_pixels() {
        let layout = SurfaceLayout::from_viewport(&Viewport::new(333.0, 100.0, 1.5));
        assert_eq!((layout.pixel_width, layout.pixel_height), (500, 150));
    }

    #[test]
    fn degenerate_viewport_is_at_least_one_pixel() {
        let layout = SurfaceLayout::from_viewport(&Viewport::new(0.0, f64::NAN, 0.0));
        assert_eq!(layout, SurfaceLayout::default());
    }

    #[test]
    fn snapshot_check_detects_short_buffers() {
        let snapshot = Snapshot {
            width: 2,
            height: 2,
            scale: 1.0,
            data: vec![0; 12],
        };
        assert!(matches!(
            snapshot.check(),
            Err(SurfaceError::SnapshotSize {
                len: 12,
                expected: 16
            })
        ));
    }

    #[test]
    fn resize_policy_deserializes_lowercase() {
        let policy: ResizePolicy = serde_json::from_str("\"preserve\"").unwrap();
        assert_eq!(policy, ResizePolicy::Preserve);
        assert_eq!(ResizePolicy::default(), ResizePolicy::Blank);
    }
}
