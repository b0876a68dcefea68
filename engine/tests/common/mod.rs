#![allow(dead_code)]

use kokuban_engine::{
    Color, PenStyle, Segment, Snapshot, Surface, SurfaceError, SurfaceLayout, SurfaceResult,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Resize(SurfaceLayout),
    Restore,
    Clear,
    FillBackground(Color),
    ApplyStyle(PenStyle),
    Stroke(Segment),
}

/// Surface that records every call instead of rendering.
#[derive(Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
    pub fail_restore: bool,
}

impl Recorder {
    pub fn segments(&self) -> Vec<Segment> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Stroke(segment) => Some(*segment),
                _ => None,
            })
            .collect()
    }

    /// The style in effect when each segment was committed.
    pub fn styled_segments(&self) -> Vec<(PenStyle, Segment)> {
        let mut style = None;
        let mut out = Vec::new();
        for call in &self.calls {
            match call {
                Call::ApplyStyle(applied) => style = Some(*applied),
                Call::Stroke(segment) => {
                    if let Some(style) = style {
                        out.push((style, *segment));
                    }
                }
                _ => {}
            }
        }
        out
    }

    pub fn last_style(&self) -> Option<PenStyle> {
        self.calls.iter().rev().find_map(|call| match call {
            Call::ApplyStyle(style) => Some(*style),
            _ => None,
        })
    }
}

impl Surface for Recorder {
    fn resize(&mut self, layout: &SurfaceLayout) -> SurfaceResult<()> {
        self.calls.push(Call::Resize(*layout));
        Ok(())
    }

    fn snapshot(&self) -> SurfaceResult<Snapshot> {
        Ok(Snapshot {
            width: 1,
            height: 1,
            scale: 1.0,
            data: vec![0; 4],
        })
    }

    fn restore(&mut self, _snapshot: &Snapshot) -> SurfaceResult<()> {
        self.calls.push(Call::Restore);
        if self.fail_restore {
            return Err(SurfaceError::Backend("restore refused".to_string()));
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }

    fn fill_background(&mut self, color: Color) {
        self.calls.push(Call::FillBackground(color));
    }

    fn apply_style(&mut self, style: &PenStyle) {
        self.calls.push(Call::ApplyStyle(*style));
    }

    fn stroke(&mut self, segment: &Segment) {
        self.calls.push(Call::Stroke(*segment));
    }
}
