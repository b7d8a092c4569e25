//! Draws one frame of a map into a drawing surface

use genomap_core::{
    DrawingSurface, Layer, Layout, MapRange, PlotDrawStats, PlotRenderer, PlotSeries, PlotSlot,
    StartType, VisibleRangeOptions,
};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::lod::DrawMode;

/// Pixels beyond the canvas edge that still count as on screen
pub const VISIBLE_MARGIN: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapStyle {
    pub backbone_color: String,
    pub show_center_line: bool,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            backbone_color: "rgb(128,128,128)".to_string(),
            show_center_line: true,
        }
    }
}

/// A plot series and the slot it occupies
#[derive(Debug, Clone, Copy)]
pub struct PlotTrack<'a> {
    pub series: &'a PlotSeries,
    pub slot: PlotSlot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderStats {
    pub backbone_range: Option<MapRange>,
    pub plot: Option<PlotDrawStats>,
}

#[derive(Debug, Clone, Default)]
pub struct MapRenderer {
    pub style: MapStyle,
    pub plot: PlotRenderer,
}

impl MapRenderer {
    pub fn new(style: MapStyle, plot: PlotRenderer) -> Self {
        Self { style, plot }
    }

    /// Backbone, then the plot track, then the center line on the `ui` layer
    pub fn render(
        &self,
        layout: &Layout,
        surface: &mut dyn DrawingSurface,
        track: Option<PlotTrack<'_>>,
        mode: DrawMode,
    ) -> RenderStats {
        let backbone_range = self.draw_backbone(layout, surface);

        let plot = track.map(|track| {
            let range = layout.visible_range_for_center_offset(
                track.slot.center_offset,
                VisibleRangeOptions::with_margin(VISIBLE_MARGIN),
            );
            self.plot.draw(
                layout,
                surface,
                track.series,
                track.slot,
                range.as_ref(),
                mode.is_fast(),
            )
        });

        if self.style.show_center_line {
            layout.draw_center_line(surface);
        }

        debug!(
            "rendered {} map ({mode}): backbone {:?}, plot {:?}",
            layout.format(),
            backbone_range,
            plot
        );
        RenderStats {
            backbone_range,
            plot,
        }
    }

    /// Stroke the visible part of the backbone. Returns the range drawn.
    pub fn draw_backbone(&self, layout: &Layout, surface: &mut dyn DrawingSurface) -> Option<MapRange> {
        let offset = layout.backbone_offset();
        let Some(range) =
            layout.visible_range_for_center_offset(offset, VisibleRangeOptions::with_margin(VISIBLE_MARGIN))
        else {
            trace!("backbone at {offset} is off canvas");
            return None;
        };

        let layer = Layer::Map;
        surface.begin_path(layer);
        layout.path(
            surface,
            layer,
            offset,
            range.start(),
            range.stop(),
            false,
            StartType::MoveTo,
        );
        surface.stroke(
            layer,
            &self.style.backbone_color,
            layout.state().backbone.thickness,
        );
        Some(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genomap_core::{CanvasSize, CommandRecorder, DrawCommand, Format, MapSequence};

    fn layout(format: Format) -> Layout {
        let seq = MapSequence::new("test", 50_000).unwrap();
        let mut layout = Layout::new(format, seq, CanvasSize::new(600.0, 600.0));
        layout.update_initial_backbone_center_offset(60.0, 60.0);
        layout
    }

    fn series() -> PlotSeries {
        let positions: Vec<u64> = (0..500).map(|i| i * 100 + 1).collect();
        let scores: Vec<f64> = (0..500).map(|i| ((i % 20) as f64 - 10.0) / 10.0).collect();
        PlotSeries::new(positions, scores).unwrap()
    }

    #[test]
    fn test_full_circle_backbone() {
        let layout = layout(Format::Circular);
        let mut surface = CommandRecorder::new();
        let range = MapRenderer::default()
            .draw_backbone(&layout, &mut surface)
            .expect("backbone visible");
        assert!(range.is_full_length());
        // near-full circles are split in two
        assert_eq!(surface.arcs(Layer::Map).len(), 2);
        assert!(matches!(
            surface.commands(Layer::Map).last(),
            Some(DrawCommand::Stroke { .. })
        ));
    }

    #[test]
    fn test_render_layers() {
        for format in [Format::Circular, Format::Linear] {
            let layout = layout(format);
            let series = series();
            let track = PlotTrack {
                series: &series,
                slot: PlotSlot::new(layout.backbone_offset() - 40.0, 30.0),
            };
            let renderer = MapRenderer::new(
                MapStyle::default(),
                PlotRenderer::with_colors("rgb(0,128,0)", "rgb(128,0,128)"),
            );
            let mut surface = CommandRecorder::new();
            let stats = renderer.render(&layout, &mut surface, Some(track), DrawMode::Final);

            assert!(stats.backbone_range.is_some());
            let plot = stats.plot.expect("plot drawn");
            assert_eq!(plot.passes, 2);
            assert_eq!(plot.step, 1);
            assert!(!surface.commands(Layer::Ui).is_empty(), "{format}: center line");
        }
    }

    #[test]
    fn test_center_line_can_be_disabled() {
        let layout = layout(Format::Linear);
        let style = MapStyle {
            show_center_line: false,
            ..MapStyle::default()
        };
        let mut surface = CommandRecorder::new();
        let stats = MapRenderer::new(style, PlotRenderer::default()).render(
            &layout,
            &mut surface,
            None,
            DrawMode::Interactive,
        );
        assert!(stats.plot.is_none());
        assert!(surface.commands(Layer::Ui).is_empty());
    }

    #[test]
    fn test_linear_slot_straddling_canvas_edge_is_drawn() {
        let layout = layout(Format::Linear);
        let [top, bottom] = layout.state().scale.y.domain();
        let series = series();
        let track = PlotTrack {
            series: &series,
            // centre row sits 50 px past the edge, half the slot reaches back in
            slot: PlotSlot::new(top.min(bottom) - 50.0, 120.0),
        };
        let mut surface = CommandRecorder::new();
        let stats = MapRenderer::default().render(&layout, &mut surface, Some(track), DrawMode::Final);
        let plot = stats.plot.expect("plot drawn");
        assert!(plot.points > 0);
    }

    #[test]
    fn test_zoomed_backbone_is_partial() {
        let mut layout = layout(Format::Circular);
        layout.zoom_to(12_500.0, 10.0);
        let mut surface = CommandRecorder::new();
        let range = MapRenderer::default()
            .draw_backbone(&layout, &mut surface)
            .expect("backbone through the view");
        assert!(!range.is_full_length());
        assert!(range.contains(12_500.0));
    }
}
