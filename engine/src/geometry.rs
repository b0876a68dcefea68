use crate::Point;

/// Top-left corner of the surface's bounding rect, in client coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Origin {
    pub left: f64,
    pub top: f64,
}

impl Origin {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

pub fn midpoint(a: Point, b: Point) -> Point {
    Point {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
    }
}

/// Maps client coordinates to logical surface coordinates. Missing or
/// non-finite values count as zero so a malformed event still yields a point.
pub fn client_to_logical(client_x: Option<f64>, client_y: Option<f64>, origin: Origin) -> Point {
    let x = finite_or_zero(client_x) - finite_or_zero(Some(origin.left));
    let y = finite_or_zero(client_y) - finite_or_zero(Some(origin.top));
    Point { x, y }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|value| value.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_is_halfway() {
        let mid = midpoint(Point::new(0.0, 10.0), Point::new(20.0, 30.0));
        assert_eq!(mid, Point::new(10.0, 20.0));
    }

    #[test]
    fn client_coordinates_are_offset_by_origin() {
        let point = client_to_logical(Some(110.0), Some(60.0), Origin::new(100.0, 50.0));
        assert_eq!(point, Point::new(10.0, 10.0));
    }

    #[test]
    fn missing_coordinates_default_to_zero() {
        let point = client_to_logical(None, Some(f64::NAN), Origin::default());
        assert_eq!(point, Point::ORIGIN);
    }
}
