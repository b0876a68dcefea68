use serde::Deserialize;

use crate::surface::ResizePolicy;
use crate::tool::{ToolLabels, DEFAULT_ERASER_THICKNESS, DEFAULT_PEN_THICKNESS};

/// Startup settings for a [`crate::Board`]. Every field is optional in the
/// serialized form.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    pub pen_thickness: f64,
    pub eraser_thickness: f64,
    pub resize_policy: ResizePolicy,
    pub labels: ToolLabels,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            pen_thickness: DEFAULT_PEN_THICKNESS,
            eraser_thickness: DEFAULT_ERASER_THICKNESS,
            resize_policy: ResizePolicy::default(),
            labels: ToolLabels::default(),
        }
    }
}
