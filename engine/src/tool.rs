use serde::Deserialize;

pub const DEFAULT_PEN_THICKNESS: f64 = 6.0;
pub const DEFAULT_ERASER_THICKNESS: f64 = 20.0;
pub const MIN_THICKNESS: f64 = 1.0;
pub const MAX_THICKNESS: f64 = 100.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
}

impl Tool {
    pub fn toggled(self) -> Tool {
        match self {
            Tool::Pen => Tool::Eraser,
            Tool::Eraser => Tool::Pen,
        }
    }

    pub fn blend(self) -> BlendMode {
        match self {
            Tool::Pen => BlendMode::DrawOver,
            Tool::Eraser => BlendMode::Erase,
        }
    }
}

/// How a committed segment combines with the pixels already on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// Source color and alpha are painted over the destination.
    DrawOver,
    /// Destination alpha is reduced by source coverage; source color is ignored.
    Erase,
}

impl BlendMode {
    /// The matching `globalCompositeOperation` of a 2D canvas context.
    pub fn composite_operation(self) -> &'static str {
        match self {
            BlendMode::DrawOver => "source-over",
            BlendMode::Erase => "destination-out",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            f64::from(self.a) / 255.0
        )
    }
}

/// Everything a surface needs to know to commit a segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PenStyle {
    pub blend: BlendMode,
    pub width: f64,
    pub color: Color,
}

/// Clamps a requested width into the supported range. Non-finite input is
/// rejected so a garbled slider value never reaches the surface.
pub fn sanitize_thickness(value: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    Some(value.max(MIN_THICKNESS).min(MAX_THICKNESS))
}

/// Active tool plus one remembered width per tool.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolState {
    tool: Tool,
    pen_thickness: f64,
    eraser_thickness: f64,
}

impl Default for ToolState {
    fn default() -> Self {
        Self::new(DEFAULT_PEN_THICKNESS, DEFAULT_ERASER_THICKNESS)
    }
}

impl ToolState {
    pub fn new(pen_thickness: f64, eraser_thickness: f64) -> Self {
        Self {
            tool: Tool::Pen,
            pen_thickness: sanitize_thickness(pen_thickness).unwrap_or(DEFAULT_PEN_THICKNESS),
            eraser_thickness: sanitize_thickness(eraser_thickness)
                .unwrap_or(DEFAULT_ERASER_THICKNESS),
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Width of the active tool.
    pub fn thickness(&self) -> f64 {
        self.thickness_for(self.tool)
    }

    pub fn thickness_for(&self, tool: Tool) -> f64 {
        match tool {
            Tool::Pen => self.pen_thickness,
            Tool::Eraser => self.eraser_thickness,
        }
    }

    /// Stores `value` into the active tool's slot only. Returns the width that
    /// was stored, or `None` when the value was rejected.
    pub fn set_thickness(&mut self, value: f64) -> Option<f64> {
        let value = sanitize_thickness(value)?;
        match self.tool {
            Tool::Pen => self.pen_thickness = value,
            Tool::Eraser => self.eraser_thickness = value,
        }
        Some(value)
    }

    pub fn pen_style(&self) -> PenStyle {
        PenStyle {
            blend: self.tool.blend(),
            width: self.thickness(),
            color: Color::WHITE,
        }
    }
}

/// Localized captions for the tool toggle.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolLabels {
    pub pen: String,
    pub eraser: String,
}

impl Default for ToolLabels {
    fn default() -> Self {
        Self {
            pen: "ペン".to_string(),
            eraser: "消しゴム".to_string(),
        }
    }
}

impl ToolLabels {
    pub fn label(&self, tool: Tool) -> &str {
        match tool {
            Tool::Pen => &self.pen,
            Tool::Eraser => &self.eraser,
        }
    }
}

/// What the toolbar should show after a tool change.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolView {
    pub tool: Tool,
    pub label: String,
    /// `aria-pressed` of the toggle: true while the eraser is active.
    pub pressed: bool,
    pub thickness: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thickness_is_remembered_per_tool() {
        let mut tools = ToolState::default();
        assert_eq!(tools.set_thickness(12.0), Some(12.0));
        tools.set_tool(tools.tool().toggled());
        assert_eq!(tools.thickness(), DEFAULT_ERASER_THICKNESS);
        tools.set_thickness(40.0);
        tools.set_tool(tools.tool().toggled());
        assert_eq!(tools.thickness(), 12.0);
        assert_eq!(tools.thickness_for(Tool::Eraser), 40.0);
    }

    #[test]
    fn thickness_is_clamped_and_garbage_rejected() {
        let mut tools = ToolState::default();
        assert_eq!(tools.set_thickness(0.0), Some(MIN_THICKNESS));
        assert_eq!(tools.set_thickness(500.0), Some(MAX_THICKNESS));
        assert_eq!(tools.set_thickness(f64::NAN), None);
        assert_eq!(tools.thickness(), MAX_THICKNESS);
    }

    #[test]
    fn invalid_initial_thickness_falls_back_to_defaults() {
        let tools = ToolState::new(f64::NAN, f64::INFINITY);
        assert_eq!(tools.thickness_for(Tool::Pen), DEFAULT_PEN_THICKNESS);
        assert_eq!(tools.thickness_for(Tool::Eraser), DEFAULT_ERASER_THICKNESS);
    }

    #[test]
    fn pen_style_follows_active_tool() {
        let mut tools = ToolState::new(4.0, 30.0);
        let pen = tools.pen_style();
        assert_eq!(pen.blend, BlendMode::DrawOver);
        assert_eq!(pen.color, Color::WHITE);
        assert_eq!(pen.width, 4.0);

        tools.set_tool(Tool::Eraser);
        let eraser = tools.pen_style();
        assert_eq!(eraser.blend, BlendMode::Erase);
        assert_eq!(eraser.width, 30.0);
    }

    #[test]
    fn composite_operations_match_canvas_names() {
        assert_eq!(BlendMode::DrawOver.composite_operation(), "source-over");
        assert_eq!(BlendMode::Erase.composite_operation(), "destination-out");
    }

    #[test]
    fn color_css_uses_unit_alpha() {
        assert_eq!(Color::BLACK.css(), "rgba(0, 0, 0, 1)");
        assert_eq!(Color::TRANSPARENT.css(), "rgba(0, 0, 0, 0)");
    }
}
