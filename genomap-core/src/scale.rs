//! Coordinate scales
//!
//! Three linear scales drive every transform on the map:
//! - `bp`: base pair → radians (circular) or map-space x (linear)
//! - `x`: map-space x → canvas pixels
//! - `y`: map-space y → canvas pixels (map space is y-up, the canvas is y-down)
//!
//! Map space always spans exactly the canvas size, so panning is a shift of the
//! x/y domains and zooming only touches the bp scale and the backbone radius.

use serde::{Deserialize, Serialize};

use crate::types::{CanvasSize, Domains, Point};

/// Linear interpolation between a domain and a range, with exact inverse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn set_domain(&mut self, domain: [f64; 2]) {
        self.domain = domain;
    }

    pub fn set_range(&mut self, range: [f64; 2]) {
        self.range = range;
    }

    /// Map a domain value into the range. No clamping or wrap handling.
    #[inline]
    pub fn apply(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        r0 + (value - d0) * (r1 - r0) / (d1 - d0)
    }

    #[inline]
    pub fn invert(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        d0 + (value - r0) * (d1 - d0) / (r1 - r0)
    }

    /// Range units per domain unit
    pub fn slope(&self) -> f64 {
        (self.range[1] - self.range[0]) / (self.domain[1] - self.domain[0])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateScale {
    pub x: LinearScale,
    pub y: LinearScale,
    pub bp: LinearScale,
}

impl CoordinateScale {
    /// Scales with the map origin at the canvas center. The bp range is left
    /// at `[0, 1]` until a geometry strategy adjusts it.
    pub fn new(canvas: &CanvasSize, sequence_length: u64) -> Self {
        let half_width = canvas.width / 2.0;
        let half_height = canvas.height / 2.0;
        Self {
            x: LinearScale::new([-half_width, half_width], [0.0, canvas.width]),
            y: LinearScale::new([half_height, -half_height], [0.0, canvas.height]),
            bp: LinearScale::new([1.0, sequence_length as f64], [0.0, 1.0]),
        }
    }

    /// Resize one axis to `dimension` pixels, keeping the map origin at the
    /// same fractional position of the canvas. Repeating a resize to the
    /// current dimension leaves the scale untouched.
    pub fn update_axis(&mut self, axis: Axis, dimension: f64) {
        match axis {
            Axis::X => {
                if self.x.range() == [0.0, dimension] {
                    return;
                }
                let [d0, d1] = self.x.domain();
                let ratio = -d0 / (d1 - d0);
                let min = -(dimension * ratio);
                self.x = LinearScale::new([min, min + dimension], [0.0, dimension]);
            }
            Axis::Y => {
                if self.y.range() == [0.0, dimension] {
                    return;
                }
                let [top, bottom] = self.y.domain();
                let ratio = top / (top - bottom);
                let max = dimension * ratio;
                self.y = LinearScale::new([max, max - dimension], [0.0, dimension]);
            }
        }
    }

    pub fn set_bp_domain(&mut self, sequence_length: u64) {
        self.bp.set_domain([1.0, sequence_length as f64]);
    }

    pub fn set_domains(&mut self, domains: &Domains) {
        self.x.set_domain([domains.x_min, domains.x_max]);
        self.y.set_domain([domains.y_max, domains.y_min]);
    }

    pub fn domains(&self) -> Domains {
        let [x_min, x_max] = self.x.domain();
        let [y_max, y_min] = self.y.domain();
        Domains {
            x_min,
            x_max,
            y_max,
            y_min,
        }
    }

    /// Canvas pixel position of the map origin
    pub fn origin(&self) -> Point {
        Point::new(self.x.apply(0.0), self.y.apply(0.0))
    }

    pub fn map_to_canvas(&self, point: Point) -> Point {
        Point::new(self.x.apply(point.x), self.y.apply(point.y))
    }

    pub fn canvas_to_map(&self, point: Point) -> Point {
        Point::new(self.x.invert(point.x), self.y.invert(point.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale_roundtrip() {
        let s = LinearScale::new([1.0, 10_001.0], [-250.0, 250.0]);
        assert_eq!(s.apply(1.0), -250.0);
        assert_eq!(s.apply(10_001.0), 250.0);
        assert!((s.invert(s.apply(1234.5)) - 1234.5).abs() < 1e-9);
        assert_eq!(s.slope(), 0.05);
    }

    #[test]
    fn test_degenerate_scale_propagates_nan() {
        let s = LinearScale::new([1.0, 1.0], [0.0, 10.0]);
        assert!(s.apply(1.0).is_nan());
        assert!(LinearScale::new([0.0, 1.0], [0.0, 1.0]).apply(f64::NAN).is_nan());
    }

    #[test]
    fn test_origin_centered() {
        let scale = CoordinateScale::new(&CanvasSize::new(600.0, 400.0), 5_000);
        assert_eq!(scale.origin(), Point::new(300.0, 200.0));
        // Map space is y-up
        assert_eq!(scale.map_to_canvas(Point::new(0.0, 100.0)), Point::new(300.0, 100.0));
        assert_eq!(scale.canvas_to_map(Point::new(300.0, 100.0)), Point::new(0.0, 100.0));
    }

    #[test]
    fn test_update_axis_keeps_origin_ratio() {
        let mut scale = CoordinateScale::new(&CanvasSize::new(400.0, 400.0), 5_000);
        scale.set_domains(&Domains::centered_on(Point::new(100.0, 50.0), 400.0, 400.0));
        // origin sits at 1/4 of the width and 3/8 of the height
        assert_eq!(scale.origin(), Point::new(100.0, 250.0));

        scale.update_axis(Axis::X, 800.0);
        scale.update_axis(Axis::Y, 800.0);
        assert_eq!(scale.origin(), Point::new(200.0, 500.0));
        assert_eq!(scale.x.range(), [0.0, 800.0]);
    }

    #[test]
    fn test_update_axis_is_idempotent() {
        let mut a = CoordinateScale::new(&CanvasSize::new(333.0, 777.0), 9_999);
        a.set_domains(&Domains::centered_on(Point::new(12.3, -45.6), 333.0, 777.0));
        let mut b = a;
        a.update_axis(Axis::X, 512.0);
        a.update_axis(Axis::Y, 256.0);
        b.update_axis(Axis::X, 512.0);
        b.update_axis(Axis::Y, 256.0);
        b.update_axis(Axis::X, 512.0);
        b.update_axis(Axis::Y, 256.0);
        assert_eq!(a.x.domain().map(f64::to_bits), b.x.domain().map(f64::to_bits));
        assert_eq!(a.y.domain().map(f64::to_bits), b.y.domain().map(f64::to_bits));
    }
}
