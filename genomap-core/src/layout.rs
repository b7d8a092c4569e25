//! Layout façade
//!
//! Owns the active [`GeometryStrategy`] and the [`MapState`] it works on.
//! Every strategy operation is forwarded unchanged; the layout adds the
//! stateful operations (format switch, resize, zoom, sequence changes) that
//! keep the scales consistent.

use log::{debug, warn};

use crate::canvas::{DrawingSurface, Layer, StartType};
use crate::error::MapResult;
use crate::geometry::{GeometryFactory, GeometryStrategy, MapState, VisibleRangeOptions};
use crate::range::MapRange;
use crate::scale::Axis;
use crate::types::{Bp, CanvasSize, Domains, Format, MapSequence, MapThickness, Point};

#[derive(Debug)]
pub struct Layout {
    strategy: Box<dyn GeometryStrategy>,
    state: MapState,
}

impl Layout {
    pub fn new(format: Format, sequence: MapSequence, canvas: CanvasSize) -> Self {
        debug!(
            "new {} layout for '{}' ({} bp) on {}x{} canvas",
            format, sequence.name, sequence.length, canvas.width, canvas.height
        );
        let mut layout = Self {
            strategy: GeometryFactory::create(format),
            state: MapState::new(sequence, canvas),
        };
        layout.strategy.adjust_bp_scale_range(&mut layout.state, true);
        layout.update_initial_backbone_center_offset(0.0, 0.0);
        layout.refresh_domains();
        layout
    }

    /// Like [`Layout::new`], parsing the format name first
    pub fn from_format_str(format: &str, sequence: MapSequence, canvas: CanvasSize) -> MapResult<Self> {
        Ok(Self::new(format.parse()?, sequence, canvas))
    }

    pub fn format(&self) -> Format {
        self.strategy.format()
    }

    pub fn state(&self) -> &MapState {
        &self.state
    }

    pub fn strategy(&self) -> &dyn GeometryStrategy {
        self.strategy.as_ref()
    }

    pub fn sequence(&self) -> &MapSequence {
        &self.state.sequence
    }

    pub fn canvas(&self) -> CanvasSize {
        self.state.canvas
    }

    pub fn zoom_factor(&self) -> f64 {
        self.state.zoom_factor
    }

    pub fn bp_float(&self) -> Bp {
        self.state.bp_float
    }

    pub fn thickness(&self) -> MapThickness {
        self.state.thickness
    }

    /// Swap the geometry strategy, keeping the current bp and zoom
    pub fn set_format(&mut self, format: Format) {
        if format == self.format() {
            return;
        }
        debug!("switching layout {} -> {}", self.format(), format);
        self.strategy = GeometryFactory::create(format);
        let MapThickness { inside, outside } = self.state.thickness;
        self.update_initial_backbone_center_offset(inside, outside);
        self.strategy.adjust_bp_scale_range(&mut self.state, true);
        self.state.zoom_factor = self.clamp_zoom(self.state.zoom_factor);
        self.strategy.adjust_bp_scale_range(&mut self.state, false);
        self.refresh_domains();
    }

    pub fn set_format_str(&mut self, format: &str) -> MapResult<()> {
        self.set_format(format.parse()?);
        Ok(())
    }

    /// Replace the sequence length and re-derive the bp domain
    pub fn set_sequence_length(&mut self, length: u64) -> MapResult<()> {
        let sequence = MapSequence::new(self.state.sequence.name.clone(), length)?;
        if sequence.length == self.state.sequence.length {
            return Ok(());
        }
        debug!(
            "sequence length {} -> {}",
            self.state.sequence.length, sequence.length
        );
        self.state.sequence = sequence;
        self.state.bp_float = self.state.bp_float.clamp(1.0, length as f64);
        self.strategy.adjust_bp_scale_range(&mut self.state, true);
        self.state.zoom_factor = self.clamp_zoom(self.state.zoom_factor);
        self.strategy.adjust_bp_scale_range(&mut self.state, false);
        self.refresh_domains();
        Ok(())
    }

    /// Resize the canvas, keeping the map origin at the same relative position
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        if !(width > 0.0 && height > 0.0) {
            warn!("ignoring canvas size {width}x{height}");
            return;
        }
        self.state.canvas.width = width;
        self.state.canvas.height = height;
        self.state.scale.update_axis(Axis::X, width);
        self.state.scale.update_axis(Axis::Y, height);
        self.strategy.adjust_bp_scale_range(&mut self.state, false);
    }

    /// Center the view on `bp` at `zoom_factor` (clamped to the valid range)
    pub fn zoom_to(&mut self, bp: Bp, zoom_factor: f64) {
        let length = self.state.sequence_length() as f64;
        let zoom = self.clamp_zoom(zoom_factor);
        if zoom != zoom_factor {
            debug!("zoom {zoom_factor} clamped to {zoom}");
        }
        self.state.zoom_factor = zoom;
        self.state.bp_float = bp.clamp(1.0, length);
        self.strategy.adjust_bp_scale_range(&mut self.state, false);
        self.refresh_domains();
    }

    pub fn move_to_bp(&mut self, bp: Bp) {
        self.zoom_to(bp, self.state.zoom_factor);
    }

    /// Zoom at which the backbone reaches the densest allowed bp spacing
    pub fn max_zoom_factor(&self) -> f64 {
        self.strategy.max_zoom_factor(&self.state)
    }

    fn clamp_zoom(&self, zoom_factor: f64) -> f64 {
        if !zoom_factor.is_finite() {
            return 1.0;
        }
        zoom_factor.clamp(1.0, self.max_zoom_factor())
    }

    fn refresh_domains(&mut self) {
        let domains = self.strategy.domains_for(
            &self.state,
            self.state.bp_float,
            self.state.zoom_factor,
            0.0,
        );
        self.state.scale.set_domains(&domains);
    }

    /// Store the track stack thickness and place the backbone for it
    pub fn update_initial_backbone_center_offset(&mut self, inside: f64, outside: f64) {
        self.state.thickness = MapThickness { inside, outside };
        self.state.backbone.center_offset =
            self.strategy
                .initial_backbone_center_offset(&self.state, inside, outside);
        debug!(
            "backbone center offset {} (inside {inside}, outside {outside})",
            self.state.backbone.center_offset
        );
    }

    pub fn initial_working_space(&self) -> f64 {
        self.strategy.initial_working_space(&self.state)
    }

    /// Backbone offset at the current zoom
    pub fn backbone_offset(&self) -> f64 {
        self.strategy
            .adjusted_center_offset(&self.state, self.state.backbone.center_offset)
    }

    /// bp and track offset under a canvas point
    pub fn hit_test(&self, point: Point) -> (Bp, f64) {
        (
            self.bp_for_point(point, false),
            self.center_offset_for_point(point),
        )
    }

    // Forwarded strategy operations

    pub fn point_for_bp(&self, bp: Bp, center_offset: f64) -> Point {
        self.strategy.point_for_bp(&self.state, bp, center_offset)
    }

    pub fn map_point_for_bp(&self, bp: Bp, center_offset: f64) -> Point {
        self.strategy.map_point_for_bp(&self.state, bp, center_offset)
    }

    pub fn bp_for_point(&self, point: Point, float: bool) -> Bp {
        self.strategy.bp_for_point(&self.state, point, float)
    }

    pub fn center_offset_for_point(&self, point: Point) -> f64 {
        self.strategy.center_offset_for_point(&self.state, point)
    }

    pub fn domains_for(&self, bp: Bp, zoom_factor: f64, bb_offset: f64) -> Domains {
        self.strategy
            .domains_for(&self.state, bp, zoom_factor, bb_offset)
    }

    pub fn adjust_bp_scale_range(&mut self, initialize: bool) {
        self.strategy
            .adjust_bp_scale_range(&mut self.state, initialize);
    }

    pub fn visible_range_for_center_offset(
        &self,
        center_offset: f64,
        options: VisibleRangeOptions,
    ) -> Option<MapRange> {
        self.strategy
            .visible_range_for_center_offset(&self.state, center_offset, options)
    }

    /// Visible range along the backbone
    pub fn visible_range(&self, options: VisibleRangeOptions) -> Option<MapRange> {
        self.visible_range_for_center_offset(self.backbone_offset(), options)
    }

    pub fn max_map_thickness(&self) -> f64 {
        self.strategy.max_map_thickness(&self.state)
    }

    /// Pixels per bp along the backbone
    pub fn pixels_per_bp(&self) -> f64 {
        self.pixels_per_bp_at(self.backbone_offset())
    }

    pub fn pixels_per_bp_at(&self, center_offset: f64) -> f64 {
        self.strategy.pixels_per_bp(&self.state, center_offset)
    }

    pub fn clock_position_for_bp(&self, bp: Bp, inverse: bool) -> u8 {
        self.strategy.clock_position_for_bp(&self.state, bp, inverse)
    }

    pub fn zoom_factor_for_length(&self, bp_length: Bp) -> f64 {
        self.strategy.zoom_factor_for_length(&self.state, bp_length)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn path(
        &self,
        surface: &mut dyn DrawingSurface,
        layer: Layer,
        center_offset: f64,
        start: Bp,
        stop: Bp,
        anticlockwise: bool,
        start_type: StartType,
    ) {
        self.strategy.path(
            &self.state,
            surface,
            layer,
            center_offset,
            start,
            stop,
            anticlockwise,
            start_type,
        );
    }

    pub fn center_caption_point(&self) -> Point {
        self.strategy.center_caption_point(&self.state)
    }

    pub fn draw_center_line(&self, surface: &mut dyn DrawingSurface) {
        self.strategy.draw_center_line(&self.state, surface);
    }

    pub fn adjusted_center_offset(&self, center_offset: f64) -> f64 {
        self.strategy
            .adjusted_center_offset(&self.state, center_offset)
    }
}
