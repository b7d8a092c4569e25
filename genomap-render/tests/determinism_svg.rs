use genomap_core::{
    extract, CanvasSize, Format, Layout, MapSequence, PlotRenderer, PlotSlot, SequenceStat,
    WindowParams,
};
use genomap_render::{export_svg, DrawMode, ExportConfig, MapRenderer, MapStyle, PlotTrack};

fn demo_sequence() -> Vec<u8> {
    // GC-rich first half, AT-rich second half
    let mut seq = b"GGCCGCGATC".repeat(2_000);
    seq.extend(b"ATTATAGCTA".repeat(2_000));
    seq
}

fn demo_layout(format: Format, length: u64) -> Layout {
    let seq = MapSequence::new("demo", length).unwrap();
    let mut layout = Layout::new(format, seq, CanvasSize::new(800.0, 600.0));
    layout.update_initial_backbone_center_offset(80.0, 60.0);
    layout
}

fn export_twice(layout: &Layout, mode: DrawMode) -> (Vec<u8>, Vec<u8>) {
    let sequence = demo_sequence();
    let series = extract(&sequence, SequenceStat::GcSkew, WindowParams { window: 200, step: 100 }).unwrap();
    let track = PlotTrack {
        series: &series,
        slot: PlotSlot::new(layout.backbone_offset() - 50.0, 40.0),
    };
    let renderer = MapRenderer::new(
        MapStyle::default(),
        PlotRenderer::with_colors("#2a6fef", "#e53935"),
    );
    let cfg = ExportConfig {
        show_legend: true,
        show_footer: false, // disable dynamic timestamp
        title: Some("Determinism Test".into()),
        provenance_comment: Some("genomap render --format circular".into()),
        ..ExportConfig::default()
    };

    let dir = tempfile::tempdir().unwrap();
    let f1 = dir.path().join("a.svg");
    let f2 = dir.path().join("b.svg");

    export_svg(&f1, layout, &renderer, Some(track), &cfg, mode).unwrap();
    export_svg(&f2, layout, &renderer, Some(track), &cfg, mode).unwrap();

    (std::fs::read(&f1).unwrap(), std::fs::read(&f2).unwrap())
}

#[test]
fn svg_export_is_deterministic() {
    let _ = env_logger::builder().is_test(true).try_init();
    let length = demo_sequence().len() as u64;
    for format in [Format::Circular, Format::Linear] {
        let mut layout = demo_layout(format, length);
        layout.zoom_to(length as f64 / 3.0, 4.0);
        for mode in [DrawMode::Interactive, DrawMode::Final] {
            let (b1, b2) = export_twice(&layout, mode);
            assert!(!b1.is_empty());
            assert_eq!(b1, b2, "SVG bytes differ between identical {format} renders");
        }
    }
}

#[test]
fn svg_export_contains_layers_and_comment() {
    let length = demo_sequence().len() as u64;
    let layout = demo_layout(Format::Circular, length);
    let (bytes, _) = export_twice(&layout, DrawMode::Final);
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("<svg"));
    assert!(text.contains("genomap render --format circular"));
    assert!(text.contains("id=\"map\""));
    assert!(text.contains("id=\"ui\""));
    assert!(text.contains("Determinism Test"));
}

#[test]
fn footer_carries_timestamp() {
    let length = demo_sequence().len() as u64;
    let layout = demo_layout(Format::Linear, length);
    let cfg = ExportConfig::default();
    let (document, stats) =
        genomap_render::render_svg(&layout, &MapRenderer::default(), None, &cfg, DrawMode::Final);
    assert!(stats.backbone_range.is_some());
    let text = document.to_string();
    assert!(text.contains("Generated:"));
    assert!(text.contains(&format!("{length} bp")));
}
