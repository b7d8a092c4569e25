//! Geometry strategies
//!
//! Both map formats implement [`GeometryStrategy`] with identical method
//! signatures, so [`crate::layout::Layout`] can swap them at runtime and
//! forward calls without branching on the format.
//!
//! Strategies are stateless. Everything they read (scales, canvas, backbone,
//! zoom) lives in [`MapState`], which the layout owns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::canvas::{DrawingSurface, Layer, StartType};
use crate::range::MapRange;
use crate::scale::CoordinateScale;
use crate::types::{Backbone, Bp, CanvasSize, ContigRef, Domains, Format, MapSequence, MapThickness, Point};

pub mod circular;
pub mod linear;

pub use circular::CircularGeometry;
pub use linear::LinearGeometry;

/// Spans shorter than `length / LINE_SPAN_DIVISOR` are drawn as straight lines
pub const LINE_SPAN_DIVISOR: f64 = 1000.0;
/// Arcs covering more than this fraction of the circle are split in two
pub const ARC_SPLIT_FRACTION: f64 = 0.95;
/// Densest zoom allowed, in pixels per bp along the backbone
pub const MAX_PIXELS_PER_BP: f64 = 2.0;
/// Gap between the bottom of a linear map and its caption
pub const CAPTION_GAP: f64 = 20.0;
pub const CENTER_LINE_COLOR: &str = "rgba(0,0,0,0.4)";
pub const CENTER_LINE_DASH: [f64; 2] = [2.0, 2.0];

/// Mutable view state shared by the layout and its active strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapState {
    pub scale: CoordinateScale,
    pub canvas: CanvasSize,
    pub sequence: MapSequence,
    pub backbone: Backbone,
    pub zoom_factor: f64,
    /// Current focus position, possibly fractional
    pub bp_float: Bp,
    pub thickness: MapThickness,
}

impl MapState {
    pub fn new(sequence: MapSequence, canvas: CanvasSize) -> Self {
        Self {
            scale: CoordinateScale::new(&canvas, sequence.length),
            canvas,
            sequence,
            backbone: Backbone::default(),
            zoom_factor: 1.0,
            bp_float: 1.0,
            thickness: MapThickness::default(),
        }
    }

    pub fn sequence_length(&self) -> u64 {
        self.sequence.length
    }

    pub fn contig(&self) -> ContigRef {
        self.sequence.map_contig()
    }
}

/// Options for [`GeometryStrategy::visible_range_for_center_offset`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VisibleRangeOptions {
    /// Extra pixels around the canvas that still count as visible
    pub margin: f64,
    /// Return fractional bp instead of rounding
    pub float: bool,
}

impl VisibleRangeOptions {
    pub fn with_margin(margin: f64) -> Self {
        Self {
            margin,
            float: false,
        }
    }
}

/// Coordinate math and path primitives for one map format.
///
/// Hot-path methods never fail. NaN input yields NaN output.
pub trait GeometryStrategy: fmt::Debug + Send + Sync {
    fn format(&self) -> Format;

    /// Canvas pixel position of `bp` at `center_offset` from the map center
    fn point_for_bp(&self, state: &MapState, bp: Bp, center_offset: f64) -> Point;

    /// Map-space (y-up, origin at map center) position of `bp`
    fn map_point_for_bp(&self, state: &MapState, bp: Bp, center_offset: f64) -> Point;

    fn bp_for_point(&self, state: &MapState, point: Point, float: bool) -> Bp;

    fn center_offset_for_point(&self, state: &MapState, point: Point) -> f64;

    /// x/y domains that would center the view on `bp` at `zoom_factor`.
    /// Does not touch `state`.
    fn domains_for(&self, state: &MapState, bp: Bp, zoom_factor: f64, bb_offset: f64) -> Domains;

    fn adjust_bp_scale_range(&self, state: &mut MapState, initialize: bool);

    fn visible_range_for_center_offset(
        &self,
        state: &MapState,
        center_offset: f64,
        options: VisibleRangeOptions,
    ) -> Option<MapRange>;

    fn max_map_thickness(&self, state: &MapState) -> f64;

    fn pixels_per_bp(&self, state: &MapState, center_offset: f64) -> f64;

    /// Hour-hand direction (1-12) pointing at `bp`
    fn clock_position_for_bp(&self, state: &MapState, bp: Bp, inverse: bool) -> u8;

    fn zoom_factor_for_length(&self, state: &MapState, bp_length: Bp) -> f64;

    #[allow(clippy::too_many_arguments)]
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
    );

    fn center_caption_point(&self, state: &MapState) -> Point;

    fn draw_center_line(&self, state: &MapState, surface: &mut dyn DrawingSurface);

    /// Backbone offset after zoom scaling
    fn adjusted_center_offset(&self, state: &MapState, center_offset: f64) -> f64;

    fn initial_working_space(&self, state: &MapState) -> f64;

    fn initial_backbone_center_offset(&self, state: &MapState, inside: f64, outside: f64) -> f64;

    /// Zoom at which the backbone reaches [`MAX_PIXELS_PER_BP`]
    fn max_zoom_factor(&self, state: &MapState) -> f64;
}

/// Factory for geometry strategies
pub struct GeometryFactory;

impl GeometryFactory {
    pub fn create(format: Format) -> Box<dyn GeometryStrategy> {
        match format {
            Format::Circular => Box::new(CircularGeometry::new()),
            Format::Linear => Box::new(LinearGeometry::new()),
        }
    }

    pub fn available_formats() -> Vec<&'static str> {
        vec!["circular", "linear"]
    }
}

/// Stroke the dashed position indicator between two canvas points
pub(crate) fn stroke_center_line(surface: &mut dyn DrawingSurface, from: Point, to: Point) {
    let layer = Layer::Ui;
    surface.set_line_dash(layer, &CENTER_LINE_DASH);
    surface.begin_path(layer);
    surface.move_to(layer, from.x, from.y);
    surface.line_to(layer, to.x, to.y);
    surface.stroke(layer, CENTER_LINE_COLOR, 1.0);
    surface.set_line_dash(layer, &[]);
}

/// Straight segment from `start` to `stop`, honouring `start_type`
#[allow(clippy::too_many_arguments)]
pub(crate) fn line_path(
    strategy: &dyn GeometryStrategy,
    state: &MapState,
    surface: &mut dyn DrawingSurface,
    layer: Layer,
    center_offset: f64,
    start: Bp,
    stop: Bp,
    start_type: StartType,
) {
    let p1 = strategy.point_for_bp(state, start, center_offset);
    let p2 = strategy.point_for_bp(state, stop, center_offset);
    match start_type {
        StartType::MoveTo => surface.move_to(layer, p1.x, p1.y),
        StartType::LineTo => surface.line_to(layer, p1.x, p1.y),
        StartType::NoMoveTo => {}
    }
    surface.line_to(layer, p2.x, p2.y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_formats() {
        assert_eq!(GeometryFactory::create(Format::Circular).format(), Format::Circular);
        assert_eq!(GeometryFactory::create(Format::Linear).format(), Format::Linear);
        assert_eq!(GeometryFactory::available_formats(), vec!["circular", "linear"]);
    }

    #[test]
    fn test_state_defaults() {
        let seq = MapSequence::new("chr", 5_000).unwrap();
        let state = MapState::new(seq, CanvasSize::new(400.0, 300.0));
        assert_eq!(state.zoom_factor, 1.0);
        assert_eq!(state.contig().length, 5_000);
        assert_eq!(state.scale.bp.domain(), [1.0, 5_000.0]);
    }
}
