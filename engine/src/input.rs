use crate::geometry::{client_to_logical, Origin};
use crate::Point;

/// One raw input sample, adapted from either a pointer or a touch event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub pointer_id: Option<i32>,
    pub client_x: Option<f64>,
    pub client_y: Option<f64>,
    /// False when the device reports no contact or held button, which ends
    /// an active stroke.
    pub engaged: bool,
}

impl PointerSample {
    pub fn new(pointer_id: Option<i32>, client_x: f64, client_y: f64) -> Self {
        Self {
            pointer_id,
            client_x: Some(client_x),
            client_y: Some(client_y),
            engaged: true,
        }
    }

    /// A sample whose event carried no coordinates at all.
    pub fn without_position(pointer_id: Option<i32>) -> Self {
        Self {
            pointer_id,
            client_x: None,
            client_y: None,
            engaged: true,
        }
    }

    pub fn disengaged(mut self) -> Self {
        self.engaged = false;
        self
    }

    pub fn logical_point(&self, origin: Origin) -> Point {
        client_to_logical(self.client_x, self.client_y, origin)
    }
}

/// The host event family the board listens to. Exactly one is subscribed so
/// a single touch never produces two strokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSource {
    Pointer,
    Touch,
}

impl InputSource {
    pub fn detect(has_pointer_events: bool) -> Self {
        if has_pointer_events {
            InputSource::Pointer
        } else {
            InputSource::Touch
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.ctrl || self.meta || self.alt
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    ToggleTool,
    Clear,
}

impl Shortcut {
    /// `e` toggles the tool and `c` clears, in either case. Chorded keys are
    /// left to the browser so Ctrl+C never wipes the board.
    pub fn from_key(key: &str, modifiers: Modifiers) -> Option<Self> {
        if modifiers.any() {
            return None;
        }
        if key.eq_ignore_ascii_case("e") {
            return Some(Shortcut::ToggleTool);
        }
        if key.eq_ignore_ascii_case("c") {
            return Some(Shortcut::Clear);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcuts_accept_both_cases() {
        let none = Modifiers::default();
        assert_eq!(Shortcut::from_key("e", none), Some(Shortcut::ToggleTool));
        assert_eq!(Shortcut::from_key("E", none), Some(Shortcut::ToggleTool));
        assert_eq!(Shortcut::from_key("c", none), Some(Shortcut::Clear));
        assert_eq!(Shortcut::from_key("C", none), Some(Shortcut::Clear));
        assert_eq!(Shortcut::from_key("x", none), None);
        assert_eq!(Shortcut::from_key("Escape", none), None);
    }

    #[test]
    fn chorded_shortcuts_are_ignored() {
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        let meta = Modifiers {
            meta: true,
            ..Modifiers::default()
        };
        assert_eq!(Shortcut::from_key("c", ctrl), None);
        assert_eq!(Shortcut::from_key("e", meta), None);
    }

    #[test]
    fn detect_picks_a_single_source() {
        assert_eq!(InputSource::detect(true), InputSource::Pointer);
        assert_eq!(InputSource::detect(false), InputSource::Touch);
    }

    #[test]
    fn sample_maps_to_logical_point() {
        let sample = PointerSample::new(Some(1), 25.0, 40.0);
        assert_eq!(
            sample.logical_point(Origin::new(5.0, 10.0)),
            Point::new(20.0, 30.0)
        );
        let blank = PointerSample::without_position(None);
        assert_eq!(blank.logical_point(Origin::new(5.0, 10.0)), Point::new(-5.0, -10.0));
    }
}
