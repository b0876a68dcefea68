use std::cell::RefCell;
use std::rc::Rc;

use kokuban_engine::Board;

use crate::canvas::CanvasSurface;

pub struct State {
    pub board: Board<CanvasSurface>,
}

/// Shared by every event callback; each handler borrows it for its own
/// duration only.
pub type SharedState = Rc<RefCell<State>>;
