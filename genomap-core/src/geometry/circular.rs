//! Circular map geometry
//!
//! bp 1 sits at the top of the circle and positions increase clockwise. The
//! bp scale maps `[1, length]` onto `[-π/2, 3π/2 - 2π/length]` radians, so the
//! last bp stops one step short of a full turn.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use log::trace;

use super::{
    line_path, stroke_center_line, GeometryStrategy, MapState, VisibleRangeOptions,
    ARC_SPLIT_FRACTION, LINE_SPAN_DIVISOR, MAX_PIXELS_PER_BP,
};
use crate::canvas::{DrawingSurface, Layer, StartType};
use crate::range::MapRange;
use crate::types::{length_of_range, Bp, Domains, Format, Point};

/// Intersections closer than this (radians) are treated as one point
const ANGLE_EPSILON: f64 = 1e-9;
const WORKING_SPACE_FRACTION: f64 = 0.25;
const MIN_INSIDE_BUFFER_FRACTION: f64 = 0.15;

#[derive(Debug, Default, Clone, Copy)]
pub struct CircularGeometry;

impl CircularGeometry {
    pub fn new() -> Self {
        Self
    }

    /// Convert a bp-scale angle back to a bp, wrapping `length + 1` to 1
    fn bp_for_angle(&self, state: &MapState, angle: f64, float: bool) -> Bp {
        let length = state.sequence_length() as f64;
        let bp = state.scale.bp.invert(angle);
        if float {
            return bp.clamp(1.0, length);
        }
        let bp = bp.round();
        if bp > length {
            bp - length
        } else {
            bp
        }
    }

    fn arc(
        &self,
        state: &MapState,
        surface: &mut dyn DrawingSurface,
        layer: Layer,
        radius: f64,
        start: Bp,
        stop: Bp,
        anticlockwise: bool,
    ) {
        let origin = state.scale.origin();
        surface.arc(
            layer,
            origin.x,
            origin.y,
            radius,
            state.scale.bp.apply(start),
            state.scale.bp.apply(stop),
            anticlockwise,
        );
    }
}

/// Canvas-convention angle (clockwise from +x) of a map-space point,
/// normalized into `[-π/2, 3π/2)`
fn bp_angle(map_x: f64, map_y: f64) -> f64 {
    let angle = (-map_y).atan2(map_x);
    if angle < -FRAC_PI_2 {
        angle + TAU
    } else {
        angle
    }
}

/// Axis-aligned rectangle in map space (y-up)
#[derive(Debug, Clone, Copy)]
struct MapRect {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl MapRect {
    fn from_domains(domains: &Domains, margin: f64) -> Self {
        Self {
            x_min: domains.x_min - margin,
            x_max: domains.x_max + margin,
            y_min: domains.y_min - margin,
            y_max: domains.y_max + margin,
        }
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Distance from the origin to the farthest corner
    fn max_distance(&self) -> f64 {
        let dx = self.x_min.abs().max(self.x_max.abs());
        let dy = self.y_min.abs().max(self.y_max.abs());
        dx.hypot(dy)
    }

    /// Distance from the origin to the closest point of the rectangle
    fn min_distance(&self) -> f64 {
        let dx = self.x_min.max(-self.x_max).max(0.0);
        let dy = self.y_min.max(-self.y_max).max(0.0);
        dx.hypot(dy)
    }

    /// Angles where a circle around the origin crosses the rectangle edges,
    /// sorted and deduplicated
    fn circle_crossings(&self, radius: f64) -> Vec<f64> {
        let mut angles = Vec::with_capacity(8);
        if !(radius > 0.0) {
            return angles;
        }
        let r2 = radius * radius;
        for x in [self.x_min, self.x_max] {
            if x.abs() <= radius {
                let h = (r2 - x * x).sqrt();
                for y in [h, -h] {
                    if y >= self.y_min && y <= self.y_max {
                        angles.push(bp_angle(x, y));
                    }
                }
            }
        }
        for y in [self.y_min, self.y_max] {
            if y.abs() <= radius {
                let w = (r2 - y * y).sqrt();
                for x in [w, -w] {
                    if x >= self.x_min && x <= self.x_max {
                        angles.push(bp_angle(x, y));
                    }
                }
            }
        }
        angles.sort_by(|a, b| a.total_cmp(b));
        angles.dedup_by(|a, b| (*a - *b).abs() < ANGLE_EPSILON);
        // Same point seen on both sides of the normalization seam
        if angles.len() > 1 {
            let first = angles[0];
            let last = angles[angles.len() - 1];
            if (last - first - TAU).abs() < ANGLE_EPSILON {
                angles.pop();
            }
        }
        angles
    }
}

impl GeometryStrategy for CircularGeometry {
    fn format(&self) -> Format {
        Format::Circular
    }

    fn point_for_bp(&self, state: &MapState, bp: Bp, center_offset: f64) -> Point {
        let radians = state.scale.bp.apply(bp);
        let origin = state.scale.origin();
        Point::new(
            origin.x + center_offset * radians.cos(),
            origin.y + center_offset * radians.sin(),
        )
    }

    fn map_point_for_bp(&self, state: &MapState, bp: Bp, center_offset: f64) -> Point {
        let radians = state.scale.bp.apply(bp);
        Point::new(center_offset * radians.cos(), -center_offset * radians.sin())
    }

    fn bp_for_point(&self, state: &MapState, point: Point, float: bool) -> Bp {
        let map_point = state.scale.canvas_to_map(point);
        self.bp_for_angle(state, bp_angle(map_point.x, map_point.y), float)
    }

    fn center_offset_for_point(&self, state: &MapState, point: Point) -> f64 {
        let map_point = state.scale.canvas_to_map(point);
        map_point.x.hypot(map_point.y)
    }

    fn domains_for(&self, state: &MapState, bp: Bp, zoom_factor: f64, bb_offset: f64) -> Domains {
        let center = if zoom_factor <= 1.0 {
            Point::default()
        } else {
            let radius = state.backbone.center_offset * zoom_factor - bb_offset;
            self.map_point_for_bp(state, bp, radius)
        };
        Domains::centered_on(center, state.canvas.width, state.canvas.height)
    }

    fn adjust_bp_scale_range(&self, state: &mut MapState, initialize: bool) {
        // bp -> radians does not depend on zoom
        if !initialize {
            return;
        }
        let length = state.sequence_length();
        state.scale.set_bp_domain(length);
        state
            .scale
            .bp
            .set_range([-FRAC_PI_2, 3.0 * FRAC_PI_2 - TAU / length as f64]);
    }

    fn visible_range_for_center_offset(
        &self,
        state: &MapState,
        center_offset: f64,
        options: VisibleRangeOptions,
    ) -> Option<MapRange> {
        let rect = MapRect::from_domains(&state.scale.domains(), options.margin);
        let mut angles = rect.circle_crossings(center_offset);

        if angles.len() > 1 {
            // Make sure the arc from the first crossing runs inside the rect
            let mid = (angles[0] + angles[1]) / 2.0;
            let (x, y) = (center_offset * mid.cos(), -center_offset * mid.sin());
            if !rect.contains(x, y) {
                angles.rotate_left(1);
            }
            if angles.len() > 2 {
                trace!("{} circle crossings, using the outer envelope", angles.len());
            }
            let start = self.bp_for_angle(state, angles[0], options.float);
            let stop = self.bp_for_angle(state, angles[angles.len() - 1], options.float);
            return Some(MapRange::new(state.contig(), start, stop));
        }

        if center_offset > rect.max_distance() || center_offset < rect.min_distance() {
            None
        } else {
            Some(MapRange::full(state.contig()))
        }
    }

    fn max_map_thickness(&self, state: &MapState) -> f64 {
        state.canvas.min_dimension() / 2.0
    }

    fn pixels_per_bp(&self, state: &MapState, center_offset: f64) -> f64 {
        center_offset * TAU / state.sequence_length() as f64
    }

    fn clock_position_for_bp(&self, state: &MapState, bp: Bp, inverse: bool) -> u8 {
        let mut radians = state.scale.bp.apply(bp);
        if inverse {
            radians += PI;
        }
        let hour = (((radians + FRAC_PI_2) * 6.0 / PI).round() as i64).rem_euclid(12);
        if hour == 0 {
            12
        } else {
            hour as u8
        }
    }

    fn zoom_factor_for_length(&self, state: &MapState, bp_length: Bp) -> f64 {
        let length = state.sequence_length() as f64;
        let radians = bp_length / length * TAU;
        (state.canvas.width / radians) / state.backbone.center_offset
    }

    fn path(
        &self,
        state: &MapState,
        surface: &mut dyn DrawingSurface,
        layer: Layer,
        center_offset: f64,
        start: Bp,
        stop: Bp,
        anticlockwise: bool,
        start_type: StartType,
    ) {
        let sequence_length = state.sequence_length();
        let length = sequence_length as f64;
        let range_length = if anticlockwise {
            length_of_range(sequence_length, stop, start)
        } else {
            length_of_range(sequence_length, start, stop)
        };

        if range_length < length / LINE_SPAN_DIVISOR {
            line_path(self, state, surface, layer, center_offset, start, stop, start_type);
            return;
        }

        if start_type == StartType::MoveTo {
            let p = self.point_for_bp(state, start, center_offset);
            surface.move_to(layer, p.x, p.y);
        }

        if range_length / length > ARC_SPLIT_FRACTION {
            let half = range_length / 2.0;
            let mid = if anticlockwise {
                let mid = start - half;
                if mid < 1.0 {
                    mid + length
                } else {
                    mid
                }
            } else {
                let mid = start + half;
                if mid > length {
                    mid - length
                } else {
                    mid
                }
            };
            trace!("splitting arc {start}..{stop} at {mid}");
            self.arc(state, surface, layer, center_offset, start, mid, anticlockwise);
            self.arc(state, surface, layer, center_offset, mid, stop, anticlockwise);
        } else {
            self.arc(state, surface, layer, center_offset, start, stop, anticlockwise);
        }
    }

    fn center_caption_point(&self, state: &MapState) -> Point {
        state.scale.origin()
    }

    fn draw_center_line(&self, state: &MapState, surface: &mut dyn DrawingSurface) {
        let radius = self.adjusted_center_offset(state, state.backbone.center_offset)
            + state.thickness.outside;
        let to = self.point_for_bp(state, state.bp_float, radius);
        stroke_center_line(surface, state.scale.origin(), to);
    }

    fn adjusted_center_offset(&self, state: &MapState, center_offset: f64) -> f64 {
        center_offset * state.zoom_factor
    }

    fn initial_working_space(&self, state: &MapState) -> f64 {
        WORKING_SPACE_FRACTION * state.canvas.min_dimension()
    }

    fn initial_backbone_center_offset(&self, state: &MapState, inside: f64, outside: f64) -> f64 {
        let half = state.canvas.min_dimension() / 2.0;
        let leftover = half - (inside + outside);
        let min_inside_buffer = MIN_INSIDE_BUFFER_FRACTION * half;
        inside + (leftover / 2.0).max(min_inside_buffer)
    }

    fn max_zoom_factor(&self, state: &MapState) -> f64 {
        let center_offset = state.backbone.center_offset;
        if !(center_offset > 0.0) {
            return 1.0;
        }
        let length = state.sequence_length() as f64;
        (MAX_PIXELS_PER_BP * length / (TAU * center_offset)).max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{CommandRecorder, DrawCommand};
    use crate::types::{CanvasSize, MapSequence};
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn state(length: u64, width: f64, height: f64) -> MapState {
        let seq = MapSequence::new("test", length).unwrap();
        let mut state = MapState::new(seq, CanvasSize::new(width, height));
        CircularGeometry.adjust_bp_scale_range(&mut state, true);
        state.backbone.center_offset = 200.0;
        state
    }

    fn sweep(cmd: &DrawCommand) -> f64 {
        match cmd {
            DrawCommand::Arc {
                start_angle,
                end_angle,
                anticlockwise,
                ..
            } => {
                if *anticlockwise {
                    (start_angle - end_angle).rem_euclid(TAU)
                } else {
                    (end_angle - start_angle).rem_euclid(TAU)
                }
            }
            _ => panic!("not an arc: {cmd:?}"),
        }
    }

    #[test]
    fn test_bp_one_is_north() {
        let s = state(10_000, 500.0, 500.0);
        let p = CircularGeometry.point_for_bp(&s, 1.0, 100.0);
        assert!((p.x - 250.0).abs() < EPS);
        assert!((p.y - 150.0).abs() < EPS);
    }

    #[test]
    fn test_quarter_is_east() {
        let s = state(10_000, 500.0, 500.0);
        let p = CircularGeometry.point_for_bp(&s, 2_501.0, 100.0);
        assert!((p.x - 350.0).abs() < 1e-6);
        assert!((p.y - 250.0).abs() < 1e-6);
    }

    #[test]
    fn test_bp_scale_slope_is_full_turn() {
        let s = state(10_000, 500.0, 500.0);
        assert!((s.scale.bp.slope() - TAU / 10_000.0).abs() < 1e-15);
        assert_eq!(s.scale.bp.apply(1.0), -FRAC_PI_2);
    }

    #[test]
    fn test_bp_for_point_wraps_origin() {
        let s = state(10_000, 500.0, 500.0);
        // just left of north is the end of the sequence
        let p = CircularGeometry.point_for_bp(&s, 10_000.0, 150.0);
        assert_eq!(CircularGeometry.bp_for_point(&s, p, false), 10_000.0);
        let north = Point::new(250.0, 100.0);
        assert_eq!(CircularGeometry.bp_for_point(&s, north, false), 1.0);
    }

    #[test]
    fn test_center_offset_for_point() {
        let s = state(10_000, 500.0, 500.0);
        let p = CircularGeometry.point_for_bp(&s, 1_234.0, 123.0);
        assert!((CircularGeometry.center_offset_for_point(&s, p) - 123.0).abs() < 1e-9);
    }

    #[test]
    fn test_nan_propagates() {
        let s = state(10_000, 500.0, 500.0);
        let p = CircularGeometry.point_for_bp(&s, f64::NAN, 100.0);
        assert!(p.x.is_nan() && p.y.is_nan());
        let p = CircularGeometry.point_for_bp(&s, 10.0, f64::NAN);
        assert!(!p.is_finite());
    }

    #[test]
    fn test_visible_range_small_radius_is_full() {
        let s = state(10_000, 500.0, 500.0);
        let range = CircularGeometry
            .visible_range_for_center_offset(&s, 100.0, VisibleRangeOptions::default())
            .unwrap();
        assert_eq!(range.start(), 1.0);
        assert_eq!(range.stop(), 10_000.0);
    }

    #[test]
    fn test_visible_range_outside_canvas_is_none() {
        let s = state(10_000, 500.0, 500.0);
        // corners are ~353.6 px away, radius 500 never touches the canvas
        assert!(CircularGeometry
            .visible_range_for_center_offset(&s, 500.0, VisibleRangeOptions::default())
            .is_none());
        // a margin large enough pulls the circle back in
        assert!(CircularGeometry
            .visible_range_for_center_offset(&s, 500.0, VisibleRangeOptions::with_margin(150.0))
            .is_some());
    }

    #[test]
    fn test_visible_range_two_crossings() {
        let mut s = state(10_000, 500.0, 500.0);
        // look at the east side of the circle, origin off canvas to the left
        s.scale
            .set_domains(&Domains::centered_on(Point::new(600.0, 0.0), 500.0, 500.0));
        let range = CircularGeometry
            .visible_range_for_center_offset(&s, 500.0, VisibleRangeOptions::default())
            .unwrap();
        assert!(!range.is_wrapped());
        assert!(range.contains(2_501.0));
        assert!(range.start() > 1_500.0 && range.stop() < 3_500.0);
    }

    #[test]
    fn test_visible_range_wraps_at_north() {
        let mut s = state(10_000, 500.0, 500.0);
        s.scale
            .set_domains(&Domains::centered_on(Point::new(0.0, 600.0), 500.0, 500.0));
        let range = CircularGeometry
            .visible_range_for_center_offset(&s, 500.0, VisibleRangeOptions::default())
            .unwrap();
        assert!(range.is_wrapped());
        assert!(range.contains(1.0));
        assert!(range.contains(10_000.0));
        assert!(!range.contains(5_000.0));
    }

    #[test]
    fn test_visible_range_many_crossings_uses_envelope() {
        let s = state(10_000, 500.0, 500.0);
        // radius between the edge (250) and corner (353) distances: 8 crossings
        let range = CircularGeometry
            .visible_range_for_center_offset(&s, 300.0, VisibleRangeOptions::default())
            .unwrap();
        let covered = range.length();
        assert!(covered > 5_000.0, "envelope should cover most of the circle: {covered}");
    }

    #[test]
    fn test_pixels_per_bp_scales_with_radius() {
        let s = state(1_000, 500.0, 500.0);
        let a = CircularGeometry.pixels_per_bp(&s, 100.0);
        let b = CircularGeometry.pixels_per_bp(&s, 200.0);
        assert!((b - 2.0 * a).abs() < 1e-12);
        assert!((a - TAU / 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_clock_positions() {
        let s = state(12_000, 500.0, 500.0);
        assert_eq!(CircularGeometry.clock_position_for_bp(&s, 1.0, false), 12);
        assert_eq!(CircularGeometry.clock_position_for_bp(&s, 3_001.0, false), 3);
        assert_eq!(CircularGeometry.clock_position_for_bp(&s, 6_001.0, false), 6);
        assert_eq!(CircularGeometry.clock_position_for_bp(&s, 9_001.0, false), 9);
        assert_eq!(CircularGeometry.clock_position_for_bp(&s, 1.0, true), 6);
    }

    #[test]
    fn test_zoom_factor_for_length() {
        let s = state(10_000, 500.0, 500.0);
        let zoom = CircularGeometry.zoom_factor_for_length(&s, 1_000.0);
        // at that zoom, 1000 bp of backbone spans the canvas width
        let arc = 1_000.0 * CircularGeometry.pixels_per_bp(&s, 200.0 * zoom);
        assert!((arc - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_span_draws_lines() {
        let s = state(100_000, 500.0, 500.0);
        let mut rec = CommandRecorder::new();
        CircularGeometry.path(&s, &mut rec, Layer::Map, 100.0, 10.0, 50.0, false, StartType::MoveTo);
        let cmds = rec.commands(Layer::Map);
        assert_eq!(cmds.len(), 2);
        assert!(matches!(cmds[0], DrawCommand::MoveTo { .. }));
        assert!(matches!(cmds[1], DrawCommand::LineTo { .. }));
    }

    #[test]
    fn test_medium_span_draws_one_arc() {
        let s = state(10_000, 500.0, 500.0);
        let mut rec = CommandRecorder::new();
        CircularGeometry.path(&s, &mut rec, Layer::Map, 100.0, 1.0, 2_501.0, false, StartType::LineTo);
        let arcs = rec.arcs(Layer::Map);
        assert_eq!(arcs.len(), 1);
        assert!((sweep(arcs[0]) - FRAC_PI_2).abs() < 1e-9);
        // LineTo relies on the implicit arc line
        assert_eq!(rec.commands(Layer::Map).len(), 1);
    }

    #[test]
    fn test_near_full_span_splits_in_two() {
        let s = state(10_000, 500.0, 500.0);
        let mut rec = CommandRecorder::new();
        CircularGeometry.path(&s, &mut rec, Layer::Map, 100.0, 100.0, 99.0, false, StartType::MoveTo);
        let arcs = rec.arcs(Layer::Map);
        assert_eq!(arcs.len(), 2);
        let total: f64 = arcs.iter().map(|a| sweep(a)).sum();
        assert!((total - 9_999.0 * TAU / 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_anticlockwise_split() {
        let s = state(10_000, 500.0, 500.0);
        let mut rec = CommandRecorder::new();
        CircularGeometry.path(&s, &mut rec, Layer::Map, 100.0, 9_900.0, 9_950.0, true, StartType::NoMoveTo);
        let arcs = rec.arcs(Layer::Map);
        assert_eq!(arcs.len(), 2);
        let total: f64 = arcs.iter().map(|a| sweep(a)).sum();
        assert!((total - 9_950.0 * TAU / 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_initial_backbone_offset() {
        let s = state(10_000, 600.0, 400.0);
        // half = 200, leftover = 200 - 100 = 100, buffer = 30
        assert_eq!(CircularGeometry.initial_backbone_center_offset(&s, 40.0, 60.0), 90.0);
        // crowded stack falls back to the minimum inside buffer
        assert_eq!(CircularGeometry.initial_backbone_center_offset(&s, 100.0, 100.0), 130.0);
        assert_eq!(CircularGeometry.initial_working_space(&s), 100.0);
        assert_eq!(CircularGeometry.max_map_thickness(&s), 200.0);
    }

    #[test]
    fn test_domains_for_is_pure() {
        let s = state(10_000, 500.0, 500.0);
        let before = s.clone();
        let d = CircularGeometry.domains_for(&s, 2_501.0, 4.0, 0.0);
        assert_eq!(s, before);
        // backbone at zoom 4 is 800 px out, due east
        assert!((d.center().x - 800.0).abs() < 1e-6);
        assert!(d.center().y.abs() < 1e-6);
        let d1 = CircularGeometry.domains_for(&s, 2_501.0, 1.0, 0.0);
        assert_eq!(d1.center(), Point::default());
    }

    #[test]
    fn test_center_line_on_ui_layer() {
        let s = state(10_000, 500.0, 500.0);
        let mut rec = CommandRecorder::new();
        CircularGeometry.draw_center_line(&s, &mut rec);
        assert!(rec.commands(Layer::Map).is_empty());
        let ui = rec.commands(Layer::Ui);
        assert_eq!(ui[0], DrawCommand::SetLineDash(vec![2.0, 2.0]));
        assert!(ui.iter().any(|c| matches!(c, DrawCommand::Stroke { .. })));
    }

    proptest! {
        #[test]
        fn bp_point_round_trip(len in 10u64..2_000_000, frac in 0.0f64..1.0, offset in 50.0f64..400.0) {
            let s = state(len, 800.0, 600.0);
            let bp = (1.0 + frac * (len - 1) as f64).round();
            let p = CircularGeometry.point_for_bp(&s, bp, offset);
            let back = CircularGeometry.bp_for_point(&s, p, false);
            let diff = (back - bp).abs();
            prop_assert!(diff <= 1.0 || (len as f64 - diff) <= 1.0, "bp {} came back as {}", bp, back);
        }

        #[test]
        fn visible_arc_stays_on_canvas(radius in 360.0f64..840.0, frac in 0.0f64..1.0) {
            let mut s = state(10_000, 500.0, 500.0);
            s.scale.set_domains(&Domains::centered_on(Point::new(600.0, 0.0), 500.0, 500.0));
            let range = CircularGeometry
                .visible_range_for_center_offset(&s, radius, VisibleRangeOptions::default())
                .unwrap();
            let bp = range.start() + (frac * range.length()).floor();
            let tolerance = CircularGeometry.pixels_per_bp(&s, radius) + 1e-6;
            let p = CircularGeometry.point_for_bp(&s, bp, radius);
            prop_assert!(s.canvas.contains(&p, tolerance), "bp {} -> {:?}", bp, p);
        }
    }
}
