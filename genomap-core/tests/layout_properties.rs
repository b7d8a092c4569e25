use genomap_core::{
    CanvasSize, CommandRecorder, Format, Layout, MapRange, MapSequence, PlotRenderer, PlotSeries,
    PlotSlot, Point, VisibleRangeOptions,
};
use proptest::prelude::*;

fn layout(format: Format, length: u64, width: f64, height: f64) -> Layout {
    let seq = MapSequence::new("prop", length).expect("valid length");
    Layout::new(format, seq, CanvasSize::new(width, height))
}

fn format_strategy() -> impl Strategy<Value = Format> {
    prop_oneof![Just(Format::Circular), Just(Format::Linear)]
}

#[test]
fn linear_zoom_one_covers_sequence() {
    let l = layout(Format::Linear, 10_000, 500.0, 500.0);
    let range = l
        .visible_range_for_center_offset(0.0, VisibleRangeOptions::default())
        .expect("visible");
    assert_eq!((range.start(), range.stop()), (1.0, 10_000.0));
}

#[test]
fn circular_bp_one_points_north() {
    let l = layout(Format::Circular, 10_000, 500.0, 500.0);
    let p = l.point_for_bp(1.0, 100.0);
    assert!((p.x - 250.0).abs() < 1e-9);
    assert!((p.y - 150.0).abs() < 1e-9);
}

#[test]
fn circular_radius_beyond_corners_is_not_visible() {
    // corners of a centered 500x500 canvas are ~353.6 px from the map center
    let l = layout(Format::Circular, 10_000, 500.0, 500.0);
    assert!(l
        .visible_range_for_center_offset(500.0, VisibleRangeOptions::default())
        .is_none());
    let inner = l
        .visible_range_for_center_offset(200.0, VisibleRangeOptions::default())
        .expect("inner circle visible");
    assert!(inner.is_full_length());
}

#[test]
fn nan_inputs_propagate() {
    for format in [Format::Circular, Format::Linear] {
        let l = layout(format, 10_000, 500.0, 500.0);
        assert!(!l.point_for_bp(f64::NAN, 100.0).is_finite());
        assert!(l.bp_for_point(Point::new(f64::NAN, f64::NAN), false).is_nan());
    }
}

#[test]
fn fast_redraw_while_zoomed_in() {
    let mut l = layout(Format::Circular, 1_000_000, 800.0, 800.0);
    l.zoom_to(500_000.0, 40.0);
    let positions: Vec<u64> = (1..=100_000).map(|i| i * 10).collect();
    let scores: Vec<f64> = positions.iter().map(|&p| ((p / 1000) % 9) as f64).collect();
    let series = PlotSeries::new(positions, scores).expect("series");
    let range: Option<MapRange> = l.visible_range(VisibleRangeOptions::with_margin(20.0));
    assert!(range.is_some());
    let slot = PlotSlot::new(l.backbone_offset() - 50.0, 60.0);
    let mut surface = CommandRecorder::new();
    let stats = PlotRenderer::default().draw(&l, &mut surface, &series, slot, range.as_ref(), true);
    assert!(stats.points > 0);
    assert!(stats.points < series.len());
}

proptest! {
    #[test]
    fn bp_round_trip_within_one(
        format in format_strategy(),
        length in 100u64..3_000_000,
        frac in 0.0f64..1.0,
        zoom in 1.0f64..20.0,
    ) {
        let mut l = layout(format, length, 700.0, 500.0);
        let bp = (1.0 + frac * (length - 1) as f64).round();
        l.zoom_to(bp, zoom);
        let offset = l.backbone_offset();
        let p = l.point_for_bp(bp, offset);
        let back = l.bp_for_point(p, false);
        let diff = (back - bp).abs();
        prop_assert!(diff <= 1.0 || (length as f64 - diff) <= 1.0, "{} -> {}", bp, back);
    }

    #[test]
    fn pixels_per_bp_grows_with_zoom(
        format in format_strategy(),
        length in 1_000u64..10_000_000,
        z1 in 1.0f64..50.0,
        z2 in 1.0f64..50.0,
        offset in 10.0f64..300.0,
    ) {
        let (lo, hi) = if z1 <= z2 { (z1, z2) } else { (z2, z1) };
        let mut l = layout(format, length, 600.0, 600.0);
        l.zoom_to(1.0, lo);
        let before = l.pixels_per_bp_at(offset);
        l.zoom_to(1.0, hi);
        let after = l.pixels_per_bp_at(offset);
        prop_assert!(after >= before, "{} < {}", after, before);
    }

    #[test]
    fn visible_backbone_lies_on_canvas(
        format in format_strategy(),
        frac in 0.0f64..1.0,
        zoom in 8.0f64..30.0,
        pick in 0.0f64..1.0,
    ) {
        let length = 200_000u64;
        let mut l = layout(format, length, 640.0, 480.0);
        l.zoom_to(1.0 + frac * (length - 1) as f64, zoom);
        let offset = l.backbone_offset();
        let range = l
            .visible_range_for_center_offset(offset, VisibleRangeOptions::default())
            .expect("backbone through the view center is visible");
        // a zoomed circle crosses the canvas twice, so the range is one arc
        let bp = range.start() + (pick * range.length()).floor();
        let bp = if bp > length as f64 { bp - length as f64 } else { bp };
        let tolerance = l.pixels_per_bp_at(offset) + 1e-6;
        let p = l.point_for_bp(bp, offset);
        prop_assert!(l.canvas().contains(&p, tolerance), "bp {} in {:?} -> {:?}", bp, range, p);
    }
}
