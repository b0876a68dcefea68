use crate::config::BoardConfig;
use crate::geometry::Origin;
use crate::input::{PointerSample, Shortcut};
use crate::stroke::{Segment, StrokeEngine};
use crate::surface::{Surface, SurfaceManager, Viewport};
use crate::tool::{Tool, ToolLabels, ToolState, ToolView};

/// One drawing surface with its tools and in-flight stroke. Every host event
/// maps to exactly one method call.
pub struct Board<S: Surface> {
    surface: S,
    manager: SurfaceManager,
    tools: ToolState,
    labels: ToolLabels,
    strokes: StrokeEngine,
}

impl<S: Surface> Board<S> {
    /// The surface is not fitted yet; call [`Board::fit`] once the viewport
    /// is known.
    pub fn new(surface: S, config: &BoardConfig) -> Self {
        Self {
            surface,
            manager: SurfaceManager::new(config.resize_policy),
            tools: ToolState::new(config.pen_thickness, config.eraser_thickness),
            labels: config.labels.clone(),
            strokes: StrokeEngine::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn is_drawing(&self) -> bool {
        self.strokes.is_active()
    }

    /// Refits the surface to `viewport`. The pen style is re-applied because
    /// resizing a canvas resets its drawing state.
    pub fn fit(&mut self, viewport: &Viewport) -> bool {
        let refitted = self.manager.fit(&mut self.surface, viewport);
        if refitted {
            self.apply_style();
        }
        refitted
    }

    pub fn pointer_down(&mut self, sample: &PointerSample, origin: Origin) {
        let point = sample.logical_point(origin);
        if self.strokes.is_active() {
            tracing::debug!("Stroke restarted by pointer {:?}", sample.pointer_id);
        }
        self.strokes.begin(point, sample.pointer_id);
        self.apply_style();
    }

    pub fn pointer_move(&mut self, sample: &PointerSample, origin: Origin) {
        if !self.strokes.is_active() {
            return;
        }
        if !sample.engaged {
            tracing::debug!("Pointer {:?} lost engagement", sample.pointer_id);
            self.pointer_up();
            return;
        }
        let point = sample.logical_point(origin);
        if let Some(segment) = self.strokes.extend(point) {
            self.commit(&segment);
        }
    }

    /// Ends the active stroke, flushing its tail. Returns false when no stroke
    /// was active.
    pub fn pointer_up(&mut self) -> bool {
        if !self.strokes.is_active() {
            return false;
        }
        if let Some(segment) = self.strokes.finish() {
            self.commit(&segment);
        }
        true
    }

    pub fn toggle_tool(&mut self) -> ToolView {
        let tool = self.tools.tool().toggled();
        self.set_tool(tool)
    }

    pub fn set_tool(&mut self, tool: Tool) -> ToolView {
        self.tools.set_tool(tool);
        self.apply_style();
        tracing::debug!("Tool set to {tool:?} at width {}", self.tools.thickness());
        self.tool_view()
    }

    /// Stores the width for the active tool and applies it from the next
    /// committed segment on.
    pub fn set_thickness(&mut self, value: f64) -> Option<f64> {
        let Some(applied) = self.tools.set_thickness(value) else {
            tracing::debug!("Ignoring thickness {value}");
            return None;
        };
        self.apply_style();
        Some(applied)
    }

    /// Wipes every stroke and restores the black background, keeping the
    /// active tool's blend mode.
    pub fn clear(&mut self) {
        self.manager.reset(&mut self.surface);
        self.apply_style();
        tracing::debug!("Board cleared");
    }

    /// Runs a keyboard shortcut. Returns the new toolbar state when the tool
    /// changed.
    pub fn shortcut(&mut self, shortcut: Shortcut) -> Option<ToolView> {
        match shortcut {
            Shortcut::ToggleTool => Some(self.toggle_tool()),
            Shortcut::Clear => {
                self.clear();
                None
            }
        }
    }

    pub fn tool_view(&self) -> ToolView {
        let tool = self.tools.tool();
        ToolView {
            tool,
            label: self.labels.label(tool).to_string(),
            pressed: tool == Tool::Eraser,
            thickness: self.tools.thickness(),
        }
    }

    fn apply_style(&mut self) {
        let style = self.tools.pen_style();
        self.surface.apply_style(&style);
    }

    fn commit(&mut self, segment: &Segment) {
        self.apply_style();
        tracing::trace!("Commit {segment:?}");
        self.surface.stroke(segment);
    }
}
