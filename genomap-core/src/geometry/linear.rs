//! Linear map geometry
//!
//! The bp scale maps `[1, length]` onto map-space x. At zoom 1 the sequence
//! spans exactly the canvas width; zooming widens the bp range, so unlike the
//! circular layout it has to be re-ranged on every zoom change.

use log::trace;

use super::{
    line_path, stroke_center_line, GeometryStrategy, MapState, VisibleRangeOptions, CAPTION_GAP,
    MAX_PIXELS_PER_BP,
};
use crate::canvas::{DrawingSurface, Layer, StartType};
use crate::range::MapRange;
use crate::scale::LinearScale;
use crate::types::{Bp, Domains, Format, Point};

const WORKING_SPACE_FRACTION: f64 = 0.40;

#[derive(Debug, Default, Clone, Copy)]
pub struct LinearGeometry;

impl LinearGeometry {
    pub fn new() -> Self {
        Self
    }

    fn bp_range(width: f64, zoom_factor: f64) -> [f64; 2] {
        let half = width * zoom_factor / 2.0;
        [-half, half]
    }
}

impl GeometryStrategy for LinearGeometry {
    fn format(&self) -> Format {
        Format::Linear
    }

    fn point_for_bp(&self, state: &MapState, bp: Bp, center_offset: f64) -> Point {
        let scale = &state.scale;
        Point::new(scale.x.apply(scale.bp.apply(bp)), scale.y.apply(center_offset))
    }

    fn map_point_for_bp(&self, state: &MapState, bp: Bp, center_offset: f64) -> Point {
        Point::new(state.scale.bp.apply(bp), center_offset)
    }

    fn bp_for_point(&self, state: &MapState, point: Point, float: bool) -> Bp {
        let map_x = state.scale.x.invert(point.x);
        let bp = state.scale.bp.invert(map_x);
        let bp = if float { bp } else { bp.round() };
        bp.clamp(1.0, state.sequence_length() as f64)
    }

    fn center_offset_for_point(&self, state: &MapState, point: Point) -> f64 {
        state.scale.y.invert(point.y)
    }

    fn domains_for(&self, state: &MapState, bp: Bp, zoom_factor: f64, bb_offset: f64) -> Domains {
        let x = if zoom_factor <= 1.0 {
            0.0
        } else {
            let bp_scale = LinearScale::new(
                [1.0, state.sequence_length() as f64],
                Self::bp_range(state.canvas.width, zoom_factor),
            );
            bp_scale.apply(bp)
        };
        let y = state.backbone.center_offset - bb_offset;
        Domains::centered_on(Point::new(x, y), state.canvas.width, state.canvas.height)
    }

    fn adjust_bp_scale_range(&self, state: &mut MapState, initialize: bool) {
        if initialize {
            state.scale.set_bp_domain(state.sequence_length());
        }
        let range = Self::bp_range(state.canvas.width, state.zoom_factor);
        trace!("linear bp range {:?} at zoom {}", range, state.zoom_factor);
        state.scale.bp.set_range(range);
    }

    fn visible_range_for_center_offset(
        &self,
        state: &MapState,
        _center_offset: f64,
        options: VisibleRangeOptions,
    ) -> Option<MapRange> {
        let margin = options.margin;
        let length = state.sequence_length() as f64;
        let [x_min, x_max] = state.scale.x.domain();
        let mut start = state.scale.bp.invert(x_min - margin);
        let mut stop = state.scale.bp.invert(x_max + margin);
        if !options.float {
            start = start.floor();
            stop = stop.ceil();
        }
        if start > length || stop < 1.0 {
            return None;
        }
        Some(MapRange::new(
            state.contig(),
            start.max(1.0),
            stop.min(length),
        ))
    }

    fn max_map_thickness(&self, state: &MapState) -> f64 {
        state.canvas.height / 2.0
    }

    fn pixels_per_bp(&self, state: &MapState, _center_offset: f64) -> f64 {
        let [r0, r1] = state.scale.bp.range();
        (r1 - r0) / state.sequence_length() as f64
    }

    fn clock_position_for_bp(&self, _state: &MapState, _bp: Bp, inverse: bool) -> u8 {
        if inverse {
            6
        } else {
            12
        }
    }

    fn zoom_factor_for_length(&self, state: &MapState, bp_length: Bp) -> f64 {
        state.sequence_length() as f64 / bp_length
    }

    fn path(
        &self,
        state: &MapState,
        surface: &mut dyn DrawingSurface,
        layer: Layer,
        center_offset: f64,
        start: Bp,
        stop: Bp,
        _anticlockwise: bool,
        start_type: StartType,
    ) {
        line_path(self, state, surface, layer, center_offset, start, stop, start_type);
    }

    fn center_caption_point(&self, state: &MapState) -> Point {
        let bottom = self.adjusted_center_offset(state, state.backbone.center_offset)
            - state.thickness.inside;
        Point::new(
            state.canvas.width / 2.0,
            state.scale.y.apply(bottom) + CAPTION_GAP,
        )
    }

    fn draw_center_line(&self, state: &MapState, surface: &mut dyn DrawingSurface) {
        let x = state.scale.x.apply(state.scale.bp.apply(state.bp_float));
        stroke_center_line(
            surface,
            Point::new(x, 0.0),
            Point::new(x, state.canvas.height),
        );
    }

    fn adjusted_center_offset(&self, _state: &MapState, center_offset: f64) -> f64 {
        center_offset
    }

    fn initial_working_space(&self, state: &MapState) -> f64 {
        WORKING_SPACE_FRACTION * state.canvas.min_dimension()
    }

    fn initial_backbone_center_offset(&self, _state: &MapState, _inside: f64, _outside: f64) -> f64 {
        0.0
    }

    fn max_zoom_factor(&self, state: &MapState) -> f64 {
        let length = state.sequence_length() as f64;
        (MAX_PIXELS_PER_BP * length / state.canvas.width).max(1.0)
    }
}
