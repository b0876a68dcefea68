use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, HtmlButtonElement, HtmlCanvasElement, HtmlInputElement, PointerEvent, TouchEvent,
    Window,
};

use kokuban_engine::{Origin, PointerSample, Tool, ToolView, Viewport};

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

/// The page controls the board reads from and reflects into.
#[derive(Clone)]
pub struct Controls {
    pub tool_toggle: HtmlButtonElement,
    pub thickness: HtmlInputElement,
    pub clear: HtmlButtonElement,
}

impl Controls {
    pub fn find(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            tool_toggle: get_element(document, "toolToggle")?,
            thickness: get_element(document, "thickness")?,
            clear: get_element(document, "clearBtn")?,
        })
    }

    pub fn show_tool(&self, canvas: &HtmlCanvasElement, view: &ToolView) {
        set_tool_button(&self.tool_toggle, view);
        self.thickness.set_value(&view.thickness.to_string());
        set_canvas_mode(canvas, view.tool);
    }
}

pub fn set_tool_button(button: &HtmlButtonElement, view: &ToolView) {
    button.set_text_content(Some(&view.label));
    let pressed = if view.pressed { "true" } else { "false" };
    let _ = button.set_attribute("aria-pressed", pressed);
}

pub fn set_canvas_mode(canvas: &HtmlCanvasElement, tool: Tool) {
    let cursor = match tool {
        Tool::Pen => "crosshair",
        Tool::Eraser => "cell",
    };
    let _ = canvas.style().set_property("cursor", cursor);
}

pub fn read_viewport(window: &Window) -> Viewport {
    let inner_width = window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    let inner_height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    let viewport = Viewport::new(inner_width, inner_height, window.device_pixel_ratio());
    match window.visual_viewport() {
        Some(visual) => viewport.with_visual(visual.width(), visual.height()),
        None => viewport,
    }
}

pub fn canvas_origin(canvas: &HtmlCanvasElement) -> Origin {
    let rect = canvas.get_bounding_client_rect();
    Origin::new(rect.left(), rect.top())
}

pub fn has_pointer_events(window: &Window) -> bool {
    js_sys::Reflect::has(window.as_ref(), &JsValue::from_str("onpointerdown")).unwrap_or(false)
}

pub fn pointer_sample(event: &PointerEvent) -> PointerSample {
    let sample = PointerSample::new(
        Some(event.pointer_id()),
        event.client_x() as f64,
        event.client_y() as f64,
    );
    // Contact or a held button; zero means the release happened elsewhere.
    if event.buttons() == 0 {
        sample.disengaged()
    } else {
        sample
    }
}

/// First active touch, or the touch that just lifted on `touchend`.
pub fn touch_sample(event: &TouchEvent) -> PointerSample {
    let touch = event
        .touches()
        .get(0)
        .or_else(|| event.changed_touches().get(0));
    match touch {
        Some(touch) => PointerSample::new(
            Some(touch.identifier()),
            touch.client_x() as f64,
            touch.client_y() as f64,
        ),
        None => PointerSample::without_position(None),
    }
}
