//! Stroke state machine with midpoint/quadratic smoothing.
//!
//! Each new sample becomes the control point of a quadratic whose endpoint is
//! the midpoint between that sample and the next one, so consecutive segments
//! share endpoints and tangents and nothing already committed is redrawn.

use crate::geometry::midpoint;
use crate::Point;

/// A piece of a stroke, in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    Line {
        from: Point,
        to: Point,
    },
    Quadratic {
        from: Point,
        control: Point,
        to: Point,
    },
}

impl Segment {
    pub fn start(&self) -> Point {
        match self {
            Segment::Line { from, .. } | Segment::Quadratic { from, .. } => *from,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Line { to, .. } | Segment::Quadratic { to, .. } => *to,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveStroke {
    pointer_id: Option<i32>,
    points: Vec<Point>,
    last_mid: Point,
}

impl ActiveStroke {
    pub fn pointer_id(&self) -> Option<i32> {
        self.pointer_id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Endpoint of the last committed segment.
    pub fn last_mid(&self) -> Point {
        self.last_mid
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum StrokeState {
    #[default]
    Idle,
    Active(ActiveStroke),
}

#[derive(Clone, Debug, Default)]
pub struct StrokeEngine {
    state: StrokeState,
}

impl StrokeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &StrokeState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, StrokeState::Active(_))
    }

    pub fn active(&self) -> Option<&ActiveStroke> {
        match &self.state {
            StrokeState::Active(stroke) => Some(stroke),
            StrokeState::Idle => None,
        }
    }

    /// Idle -> Active. A second start while active replaces the buffer; only
    /// one stroke is tracked at a time.
    pub fn begin(&mut self, point: Point, pointer_id: Option<i32>) {
        self.state = StrokeState::Active(ActiveStroke {
            pointer_id,
            points: vec![point],
            last_mid: point,
        });
    }

    /// Active -> Active. Returns the segment to commit for this sample.
    pub fn extend(&mut self, point: Point) -> Option<Segment> {
        let StrokeState::Active(stroke) = &mut self.state else {
            return None;
        };
        stroke.points.push(point);
        let [.., prev, cur] = stroke.points[..] else {
            return None;
        };
        let mid = midpoint(prev, cur);
        let segment = Segment::Quadratic {
            from: stroke.last_mid,
            control: prev,
            to: mid,
        };
        stroke.last_mid = mid;
        Some(segment)
    }

    /// Active -> Idle. Returns the tail segment that closes the stroke.
    pub fn finish(&mut self) -> Option<Segment> {
        let StrokeState::Active(stroke) = std::mem::replace(&mut self.state, StrokeState::Idle)
        else {
            return None;
        };
        match stroke.points[..] {
            [from, to] => Some(Segment::Line { from, to }),
            [.., prev, last] => Some(Segment::Quadratic {
                from: stroke.last_mid,
                control: prev,
                to: last,
            }),
            _ => None,
        }
    }
}
