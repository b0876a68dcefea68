use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Event, HtmlCanvasElement, KeyboardEvent, PointerEvent, TouchEvent,
};

use kokuban_engine::{Board, InputSource, Modifiers, Shortcut, Tool};

use crate::canvas::CanvasSurface;
use crate::config::{debug_enabled, page_search, parse_thickness, ClientConfig};
use crate::dom::{
    canvas_origin, get_element, has_pointer_events, pointer_sample, read_viewport, touch_sample,
    Controls,
};
use crate::logging;
use crate::state::{SharedState, State};

fn document_ready_state(document: &web_sys::Document) -> Option<String> {
    Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    if document_ready_state(&document).as_deref() == Some("complete") {
        return start_app();
    }

    let started = Cell::new(false);
    let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
        if started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            web_sys::console::error_1(&err);
        }
    });
    window.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
    onload.forget();

    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let canvas: HtmlCanvasElement = get_element(&document, "drawCanvas")?;
    let controls = Controls::find(&document)?;
    logging::init(debug_enabled(&page_search(&window)));
    let config = ClientConfig::load(&window, &canvas, &controls.thickness);

    let source = InputSource::detect(has_pointer_events(&window));
    tracing::debug!("Input source {source:?}, config {:?}", config.board);

    let surface = CanvasSurface::new(canvas.clone())?;
    let state: SharedState = Rc::new(RefCell::new(State {
        board: Board::new(surface, &config.board),
    }));

    {
        let mut state = state.borrow_mut();
        state.board.fit(&read_viewport(&window));
        let view = state.board.set_tool(Tool::Pen);
        controls.show_tool(&canvas, &view);
    }

    {
        let fit_state = state.clone();
        let window_cb = window.clone();
        let onfit = Closure::<dyn FnMut()>::new(move || {
            let viewport = read_viewport(&window_cb);
            fit_state.borrow_mut().board.fit(&viewport);
        });
        window.add_event_listener_with_callback("resize", onfit.as_ref().unchecked_ref())?;
        if let Some(visual) = window.visual_viewport() {
            visual.add_event_listener_with_callback("resize", onfit.as_ref().unchecked_ref())?;
            visual.add_event_listener_with_callback("scroll", onfit.as_ref().unchecked_ref())?;
        }
        onfit.forget();
    }

    match source {
        InputSource::Pointer => listen_pointer(&window, &canvas, &state)?,
        InputSource::Touch => listen_touch(&window, &canvas, &state)?,
    }

    {
        let toggle_state = state.clone();
        let toggle_controls = controls.clone();
        let toggle_canvas = canvas.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let view = toggle_state.borrow_mut().board.toggle_tool();
            toggle_controls.show_tool(&toggle_canvas, &view);
        });
        controls
            .tool_toggle
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let clear_state = state.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            clear_state.borrow_mut().board.clear();
        });
        controls
            .clear
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let thickness_state = state.clone();
        let thickness_input = controls.thickness.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            let Some(value) = parse_thickness(&thickness_input.value()) else {
                return;
            };
            let applied = thickness_state.borrow_mut().board.set_thickness(value);
            if let Some(applied) = applied.filter(|applied| *applied != value) {
                thickness_input.set_value(&applied.to_string());
            }
        });
        controls
            .thickness
            .add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let key_state = state.clone();
        let key_controls = controls.clone();
        let key_canvas = canvas.clone();
        let onkeydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            let modifiers = Modifiers {
                ctrl: event.ctrl_key(),
                meta: event.meta_key(),
                alt: event.alt_key(),
            };
            let Some(shortcut) = Shortcut::from_key(&event.key(), modifiers) else {
                return;
            };
            let view = key_state.borrow_mut().board.shortcut(shortcut);
            if let Some(view) = view {
                key_controls.show_tool(&key_canvas, &view);
            }
        });
        window.add_event_listener_with_callback("keydown", onkeydown.as_ref().unchecked_ref())?;
        onkeydown.forget();
    }

    tracing::debug!("Board ready");
    Ok(())
}

fn listen_pointer(
    window: &web_sys::Window,
    canvas: &HtmlCanvasElement,
    state: &SharedState,
) -> Result<(), JsValue> {
    {
        let down_state = state.clone();
        let down_canvas = canvas.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if event.button() != 0 {
                return;
            }
            event.prevent_default();
            let origin = canvas_origin(&down_canvas);
            down_state
                .borrow_mut()
                .board
                .pointer_down(&pointer_sample(&event), origin);
            let _ = down_canvas.set_pointer_capture(event.pointer_id());
        });
        canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let move_state = state.clone();
        let move_canvas = canvas.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut state = move_state.borrow_mut();
            if !state.board.is_drawing() {
                return;
            }
            event.prevent_default();
            let origin = canvas_origin(&move_canvas);
            state.board.pointer_move(&pointer_sample(&event), origin);
        });
        window.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let stop_state = state.clone();
        let stop_canvas = canvas.clone();
        let onstop = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            stop_state.borrow_mut().board.pointer_up();
            if stop_canvas.has_pointer_capture(event.pointer_id()) {
                let _ = stop_canvas.release_pointer_capture(event.pointer_id());
            }
        });
        window.add_event_listener_with_callback("pointerup", onstop.as_ref().unchecked_ref())?;
        window
            .add_event_listener_with_callback("pointercancel", onstop.as_ref().unchecked_ref())?;
        canvas.add_event_listener_with_callback(
            "lostpointercapture",
            onstop.as_ref().unchecked_ref(),
        )?;
        onstop.forget();
    }

    Ok(())
}

fn listen_touch(
    window: &web_sys::Window,
    canvas: &HtmlCanvasElement,
    state: &SharedState,
) -> Result<(), JsValue> {
    // Non-passive so preventDefault can stop the page from scrolling.
    let options = AddEventListenerOptions::new();
    options.set_passive(false);

    {
        let start_state = state.clone();
        let start_canvas = canvas.clone();
        let onstart = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
            event.prevent_default();
            let origin = canvas_origin(&start_canvas);
            start_state
                .borrow_mut()
                .board
                .pointer_down(&touch_sample(&event), origin);
        });
        canvas.add_event_listener_with_callback_and_add_event_listener_options(
            "touchstart",
            onstart.as_ref().unchecked_ref(),
            &options,
        )?;
        onstart.forget();
    }

    {
        let move_state = state.clone();
        let move_canvas = canvas.clone();
        let onmove = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
            let mut state = move_state.borrow_mut();
            if !state.board.is_drawing() {
                return;
            }
            event.prevent_default();
            let origin = canvas_origin(&move_canvas);
            state.board.pointer_move(&touch_sample(&event), origin);
        });
        window.add_event_listener_with_callback_and_add_event_listener_options(
            "touchmove",
            onmove.as_ref().unchecked_ref(),
            &options,
        )?;
        onmove.forget();
    }

    {
        let end_state = state.clone();
        let onend = Closure::<dyn FnMut(TouchEvent)>::new(move |_event: TouchEvent| {
            end_state.borrow_mut().board.pointer_up();
        });
        window.add_event_listener_with_callback("touchend", onend.as_ref().unchecked_ref())?;
        window.add_event_listener_with_callback("touchcancel", onend.as_ref().unchecked_ref())?;
        onend.forget();
    }

    Ok(())
}
