//! Plot series rendering
//!
//! A plot is a `(positions, scores)` series drawn as a filled band between
//! a baseline and the score line, inside a radial (circular) or vertical
//! (linear) slot. Fast draws thin the series to a power-of-two stride so the
//! number of plotted points stays near [`FAST_TARGET_POINTS`].

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::canvas::{DrawingSurface, Layer, StartType};
use crate::error::{MapError, MapResult};
use crate::layout::Layout;
use crate::range::MapRange;
use crate::types::Bp;

/// Points a fast draw aims for
pub const FAST_TARGET_POINTS: usize = 4000;
/// Minimum radius change (px) before a new radial segment is emitted
pub const FAST_RADIAL_DIFF: f64 = 1.0;
pub const FULL_RADIAL_DIFF: f64 = 0.5;

/// Score series with axis bounds. Positions are ascending 1-based bp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    positions: Vec<u64>,
    scores: Vec<f64>,
    baseline: f64,
    axis_min: f64,
    axis_max: f64,
}

impl PlotSeries {
    /// Build a series with a baseline of 0 and axis bounds spanning the
    /// scores and the baseline
    pub fn new(positions: Vec<u64>, scores: Vec<f64>) -> MapResult<Self> {
        if positions.len() != scores.len() {
            return Err(MapError::SeriesLengthMismatch {
                positions: positions.len(),
                scores: scores.len(),
            });
        }
        if positions.is_empty() {
            warn!("plot series is empty");
        }
        let (min, max) = scores
            .iter()
            .filter(|s| s.is_finite())
            .fold((0.0f64, 0.0f64), |(lo, hi), &s| (lo.min(s), hi.max(s)));
        let mut series = Self {
            positions,
            scores,
            baseline: 0.0,
            axis_min: min,
            axis_max: max,
        };
        series.fix_axis_span();
        Ok(series)
    }

    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = baseline;
        self.axis_min = self.axis_min.min(baseline);
        self.axis_max = self.axis_max.max(baseline);
        self.fix_axis_span();
        self
    }

    pub fn with_axis(mut self, axis_min: f64, axis_max: f64) -> Self {
        self.axis_min = axis_min;
        self.axis_max = axis_max;
        self.fix_axis_span();
        self
    }

    fn fix_axis_span(&mut self) {
        if !(self.axis_max > self.axis_min) {
            self.axis_max = self.axis_min + 1.0;
        }
    }

    pub fn positions(&self) -> &[u64] {
        &self.positions
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    pub fn axis_min(&self) -> f64 {
        self.axis_min
    }

    pub fn axis_max(&self) -> f64 {
        self.axis_max
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn mean_score(&self) -> Option<f64> {
        if self.scores.is_empty() {
            None
        } else {
            Some(self.scores.iter().sum::<f64>() / self.scores.len() as f64)
        }
    }
}

/// Radial (circular) or vertical (linear) band the plot is drawn into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotSlot {
    pub center_offset: f64,
    pub thickness: f64,
}

impl PlotSlot {
    pub fn new(center_offset: f64, thickness: f64) -> Self {
        Self {
            center_offset,
            thickness,
        }
    }

    /// Offset of `score` within the slot, axis_min at the inner edge
    pub fn offset_for_score(&self, score: f64, series: &PlotSeries) -> f64 {
        let fraction = (score - series.axis_min) / (series.axis_max - series.axis_min);
        self.center_offset - self.thickness / 2.0 + self.thickness * fraction
    }
}

/// Which side of the baseline a pass keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Both,
    Positive,
    Negative,
}

impl Orientation {
    fn filter(self, score: f64, baseline: f64) -> f64 {
        match self {
            Orientation::Both => score,
            Orientation::Positive if score < baseline => baseline,
            Orientation::Negative if score > baseline => baseline,
            _ => score,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlotDrawStats {
    pub passes: usize,
    pub points: usize,
    pub step: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRenderer {
    pub positive_color: String,
    pub negative_color: String,
}

impl Default for PlotRenderer {
    fn default() -> Self {
        Self::new("rgb(0,0,0)")
    }
}

impl PlotRenderer {
    /// Single-colour plot
    pub fn new<S: Into<String>>(color: S) -> Self {
        let color = color.into();
        Self {
            positive_color: color.clone(),
            negative_color: color,
        }
    }

    pub fn with_colors<S: Into<String>>(positive: S, negative: S) -> Self {
        Self {
            positive_color: positive.into(),
            negative_color: negative.into(),
        }
    }

    /// Draw `series` over `range` into the map layer. `None` or an empty
    /// range draws nothing.
    pub fn draw(
        &self,
        layout: &Layout,
        surface: &mut dyn DrawingSurface,
        series: &PlotSeries,
        slot: PlotSlot,
        range: Option<&MapRange>,
        fast: bool,
    ) -> PlotDrawStats {
        let Some(range) = range else {
            return PlotDrawStats::default();
        };
        if range.is_empty() || series.is_empty() {
            trace!("nothing to plot for {range:?}");
            return PlotDrawStats::default();
        }

        let count = count_positions_from_range(series.positions(), range.start(), range.stop());
        let step = if fast { fast_step(count) } else { 1 };
        let radial_diff = if fast {
            FAST_RADIAL_DIFF
        } else {
            FULL_RADIAL_DIFF
        };
        debug!("plot: {count} positions in view, step {step}, fast {fast}");

        let mut stats = PlotDrawStats {
            passes: 0,
            points: 0,
            step,
        };
        let passes: Vec<(Orientation, &str)> = if self.positive_color == self.negative_color {
            vec![(Orientation::Both, self.positive_color.as_str())]
        } else {
            vec![
                (Orientation::Positive, self.positive_color.as_str()),
                (Orientation::Negative, self.negative_color.as_str()),
            ]
        };
        for (orientation, color) in passes {
            stats.points += draw_pass(
                layout,
                surface,
                series,
                slot,
                range,
                orientation,
                color,
                step,
                radial_diff,
            );
            stats.passes += 1;
        }
        stats
    }
}

/// Stride that keeps a fast draw under twice the target point count
pub fn fast_step(count: usize) -> usize {
    let ratio = count as f64 / FAST_TARGET_POINTS as f64;
    if ratio > 1.0 {
        base2(ratio) as usize
    } else {
        1
    }
}

/// Largest power of two not above `value`
pub fn base2(value: f64) -> f64 {
    2f64.powf(value.log2().floor())
}

#[allow(clippy::too_many_arguments)]
fn draw_pass(
    layout: &Layout,
    surface: &mut dyn DrawingSurface,
    series: &PlotSeries,
    slot: PlotSlot,
    range: &MapRange,
    orientation: Orientation,
    color: &str,
    step: usize,
    radial_diff: f64,
) -> usize {
    let layer = Layer::Map;
    let positions = series.positions();
    let scores = series.scores();
    let length = layout.sequence().length as f64;
    let baseline = series.baseline();
    let baseline_offset = slot.offset_for_score(baseline, series);
    let offset_at = |i: usize| slot.offset_for_score(orientation.filter(scores[i], baseline), series);

    let start_index = index_of_value(positions, range.start(), false);
    let start_position = if start_index == 0 {
        (positions[0] as f64).max(range.start())
    } else {
        range.start()
    };
    let stop_position = range.stop();
    if !range.is_wrapped() && start_position > stop_position {
        return 0;
    }

    let mut saved_offset = offset_at(start_index);
    let mut saved_position: Bp = start_position;
    let mut crossed_origin = false;
    let mut points = 0;

    surface.begin_path(layer);
    let p = layout.point_for_bp(start_position, baseline_offset);
    surface.move_to(layer, p.x, p.y);
    let p = layout.point_for_bp(start_position, saved_offset);
    surface.line_to(layer, p.x, p.y);

    positions_from_range(positions, range.start(), range.stop(), step, |i| {
        let current_position = positions[i] as f64;
        if range.is_wrapped() && !crossed_origin && current_position < saved_position {
            // walked past the end of the sequence
            layout.path(surface, layer, saved_offset, saved_position, length, false, StartType::NoMoveTo);
            saved_position = 1.0;
            crossed_origin = true;
        }
        points += 1;
        let current_offset = offset_at(i);
        if (current_offset - saved_offset).abs() >= radial_diff {
            layout.path(
                surface,
                layer,
                saved_offset,
                saved_position,
                current_position,
                false,
                StartType::NoMoveTo,
            );
            let p = layout.point_for_bp(current_position, current_offset);
            surface.line_to(layer, p.x, p.y);
            saved_offset = current_offset;
            saved_position = current_position;
        }
    });

    if range.is_wrapped() && !crossed_origin {
        layout.path(surface, layer, saved_offset, saved_position, length, false, StartType::NoMoveTo);
        saved_position = 1.0;
    }
    layout.path(
        surface,
        layer,
        saved_offset,
        saved_position,
        stop_position,
        false,
        StartType::NoMoveTo,
    );
    // back along the baseline
    layout.path(
        surface,
        layer,
        baseline_offset,
        stop_position,
        start_position,
        true,
        StartType::LineTo,
    );
    surface.fill(layer, color);
    points
}

/// Index of `value` in ascending `values`. Without an exact match, returns
/// the first index above (`round_up`) or the last index below, clamped to
/// the slice.
pub fn index_of_value(values: &[u64], value: f64, round_up: bool) -> usize {
    if values.is_empty() {
        return 0;
    }
    let index = values.partition_point(|&v| (v as f64) < value);
    if index < values.len() && values[index] as f64 == value {
        return index;
    }
    if round_up {
        index.min(values.len() - 1)
    } else {
        index.saturating_sub(1)
    }
}

/// Number of positions inside `start..=stop` (wrap-aware)
pub fn count_positions_from_range(positions: &[u64], start: Bp, stop: Bp) -> usize {
    let Some((&first, &last)) = positions.first().zip(positions.last()) else {
        return 0;
    };
    let len = positions.len() as i64;
    let mut start_index = index_of_value(positions, start, true) as i64;
    let mut stop_index = index_of_value(positions, stop, false) as i64;
    if start > last as f64 {
        start_index += 1;
    }
    if stop < first as f64 {
        stop_index -= 1;
    }
    let count = if stop >= start {
        stop_index - start_index + 1
    } else {
        (len - start_index) + stop_index + 1
    };
    count.max(0) as usize
}

/// Call `f` with every `step`-th index whose position lies in
/// `start..=stop`. Indices are aligned to multiples of `step`. Wrapped ranges
/// visit the tail of the array first, then restart from index 0.
pub fn positions_from_range<F>(positions: &[u64], start: Bp, stop: Bp, step: usize, mut f: F)
where
    F: FnMut(usize),
{
    if positions.is_empty() {
        return;
    }
    let step = step.max(1);
    let mut start_index = index_of_value(positions, start, true);
    let stop_index = index_of_value(positions, stop, false);
    let remainder = start_index % step;
    if remainder != 0 {
        start_index += step - remainder;
    }

    if stop >= start {
        match positions.get(start_index) {
            Some(&p) if p as f64 <= stop => {}
            _ => return,
        }
        if (positions[stop_index] as f64) < start {
            return;
        }
        for i in (start_index..=stop_index).step_by(step) {
            f(i);
        }
    } else {
        if let Some(&p) = positions.get(start_index) {
            if p as f64 >= start {
                for i in (start_index..positions.len()).step_by(step) {
                    f(i);
                }
            }
        }
        if positions[stop_index] as f64 <= stop {
            for i in (0..=stop_index).step_by(step) {
                f(i);
            }
        }
    }
}
