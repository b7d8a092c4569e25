/*!
# SVG Export

`SvgSurface` implements the core drawing surface on top of the `svg` crate.
Canvas-style commands are buffered into path data per layer and emitted as one
`<g id="layer">` group per layer, bottom layer first. Output is deterministic
as long as the timestamped footer is switched off.
*/

use std::collections::BTreeMap;
use std::f64::consts::{PI, TAU};
use std::path::Path as FsPath;

use anyhow::{Context, Result};
use genomap_core::{DrawingSurface, Layer, Layout};
use log::{debug, info};
use svg::node::element::path::Data;
use svg::node::element::{Group, Path, Rectangle, Text};
use svg::node::Comment;
use svg::Document;

use crate::lod::DrawMode;
use crate::map_renderer::{MapRenderer, PlotTrack, RenderStats};
use crate::ExportConfig;

/// Path state for one layer
#[derive(Debug)]
struct LayerPath {
    data: Data,
    has_commands: bool,
    current: Option<(f64, f64)>,
    dash: Vec<f64>,
    elements: Vec<Path>,
}

impl Default for LayerPath {
    fn default() -> Self {
        Self {
            data: Data::new(),
            has_commands: false,
            current: None,
            dash: Vec::new(),
            elements: Vec::new(),
        }
    }
}

impl LayerPath {
    fn take_data(&mut self) -> Data {
        std::mem::replace(&mut self.data, Data::new())
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.data = self.take_data().move_to((x as f32, y as f32));
        self.has_commands = true;
        self.current = Some((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if self.current.is_none() {
            // canvas treats a line with no current point as a move
            self.move_to(x, y);
            return;
        }
        self.data = self.take_data().line_to((x as f32, y as f32));
        self.has_commands = true;
        self.current = Some((x, y));
    }

    fn arc_to(&mut self, radius: f64, sweep: f64, x: f64, y: f64) {
        let large_arc = if sweep.abs() > PI { 1.0 } else { 0.0 };
        let sweep_flag = if sweep > 0.0 { 1.0 } else { 0.0 };
        self.data = self.take_data().elliptical_arc_to((
            radius as f32,
            radius as f32,
            0.0,
            large_arc,
            sweep_flag,
            x as f32,
            y as f32,
        ));
        self.has_commands = true;
        self.current = Some((x, y));
    }
}

/// Signed sweep of a canvas arc; positive runs clockwise on screen
fn arc_sweep(start_angle: f64, end_angle: f64, anticlockwise: bool) -> f64 {
    if anticlockwise {
        let delta = start_angle - end_angle;
        if delta >= TAU {
            -TAU
        } else {
            -delta.rem_euclid(TAU)
        }
    } else {
        let delta = end_angle - start_angle;
        if delta >= TAU {
            TAU
        } else {
            delta.rem_euclid(TAU)
        }
    }
}

/// Drawing surface that records into SVG elements
#[derive(Debug)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    layers: BTreeMap<Layer, LayerPath>,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            layers: BTreeMap::new(),
        }
    }

    fn layer(&mut self, layer: Layer) -> &mut LayerPath {
        self.layers.entry(layer).or_default()
    }

    /// Number of `<path>` elements emitted so far
    pub fn element_count(&self) -> usize {
        self.layers.values().map(|l| l.elements.len()).sum()
    }

    /// Assemble the document: background, drawn layers, legend and footer
    pub fn to_document(&self, config: &ExportConfig, footer: Option<&str>) -> Document {
        let mut document = Document::new()
            .set("width", self.width)
            .set("height", self.height)
            .set("viewBox", format!("0 0 {} {}", self.width, self.height));

        if let Some(comment) = &config.provenance_comment {
            for line in comment.lines() {
                document = document.add(Comment::new(format!(" {line} ")));
            }
        }

        document = document.add(
            Rectangle::new()
                .set("width", self.width)
                .set("height", self.height)
                .set("fill", config.background_color.as_str()),
        );

        for (layer, path) in &self.layers {
            if path.elements.is_empty() {
                continue;
            }
            let mut group = Group::new().set("id", layer.name());
            for element in &path.elements {
                group = group.add(element.clone());
            }
            document = document.add(group);
        }

        if let Some(title) = &config.title {
            document = document.add(
                Text::new()
                    .set("x", self.width / 2.0)
                    .set("y", config.font_size as f64 + 10.0)
                    .set("font-family", config.font_family.as_str())
                    .set("font-size", format!("{}px", config.font_size + 4))
                    .set("text-anchor", "middle")
                    .set("font-weight", "bold")
                    .add(svg::node::Text::new(title.as_str())),
            );
        }

        if let Some(footer) = footer {
            document = document.add(
                Text::new()
                    .set("x", 10)
                    .set("y", self.height - 10.0)
                    .set("font-family", config.font_family.as_str())
                    .set("font-size", format!("{}px", config.font_size.saturating_sub(2)))
                    .set("fill", "gray")
                    .add(svg::node::Text::new(footer)),
            );
        }

        document
    }

    fn emit(&mut self, layer: Layer, element: Path) {
        let path = self.layer(layer);
        let element = if path.dash.is_empty() {
            element
        } else {
            let dash: Vec<String> = path.dash.iter().map(|d| d.to_string()).collect();
            element.set("stroke-dasharray", dash.join(","))
        };
        path.elements.push(element);
    }
}

impl DrawingSurface for SvgSurface {
    fn begin_path(&mut self, layer: Layer) {
        let path = self.layer(layer);
        path.data = Data::new();
        path.has_commands = false;
        path.current = None;
    }

    fn move_to(&mut self, layer: Layer, x: f64, y: f64) {
        self.layer(layer).move_to(x, y);
    }

    fn line_to(&mut self, layer: Layer, x: f64, y: f64) {
        self.layer(layer).line_to(x, y);
    }

    fn arc(
        &mut self,
        layer: Layer,
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) {
        let path = self.layer(layer);
        let (sx, sy) = (cx + radius * start_angle.cos(), cy + radius * start_angle.sin());
        if path.has_commands {
            path.line_to(sx, sy);
        } else {
            path.move_to(sx, sy);
        }

        let sweep = arc_sweep(start_angle, end_angle, anticlockwise);
        if sweep == 0.0 || radius <= 0.0 {
            return;
        }
        // one SVG arc cannot describe a full circle
        if sweep.abs() >= TAU {
            let mid = start_angle + sweep / 2.0;
            path.arc_to(radius, sweep / 2.0, cx + radius * mid.cos(), cy + radius * mid.sin());
            path.arc_to(radius, sweep / 2.0, sx, sy);
            return;
        }
        let end = start_angle + sweep;
        path.arc_to(radius, sweep, cx + radius * end.cos(), cy + radius * end.sin());
    }

    fn close_path(&mut self, layer: Layer) {
        let path = self.layer(layer);
        if path.has_commands {
            path.data = path.take_data().close();
        }
    }

    fn fill(&mut self, layer: Layer, color: &str) {
        let path = self.layer(layer);
        if !path.has_commands {
            return;
        }
        let element = Path::new()
            .set("fill", color)
            .set("stroke", "none")
            .set("d", path.data.clone());
        self.emit(layer, element);
    }

    fn stroke(&mut self, layer: Layer, color: &str, width: f64) {
        let path = self.layer(layer);
        if !path.has_commands {
            return;
        }
        let element = Path::new()
            .set("fill", "none")
            .set("stroke", color)
            .set("stroke-width", width)
            .set("d", path.data.clone());
        self.emit(layer, element);
    }

    fn set_line_dash(&mut self, layer: Layer, segments: &[f64]) {
        self.layer(layer).dash = segments.to_vec();
    }
}

fn footer_text(layout: &Layout, mode: DrawMode) -> String {
    format!(
        "Genomap v{} | {} | {} bp | zoom {:.2} | center {:.0} | {} | Generated: {}",
        genomap_core::VERSION,
        layout.format(),
        layout.sequence().length,
        layout.zoom_factor(),
        layout.bp_float(),
        mode,
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
}

/// Render one frame of `layout` into an SVG document
pub fn render_svg(
    layout: &Layout,
    renderer: &MapRenderer,
    track: Option<PlotTrack<'_>>,
    config: &ExportConfig,
    mode: DrawMode,
) -> (Document, RenderStats) {
    let canvas = layout.canvas();
    let mut surface = SvgSurface::new(canvas.width, canvas.height);
    let stats = renderer.render(layout, &mut surface, track, mode);

    if config.show_legend && track.is_some() {
        draw_legend(&mut surface, renderer, config);
    }

    let footer = config.show_footer.then(|| footer_text(layout, mode));
    debug!("svg surface holds {} path elements", surface.element_count());
    (surface.to_document(config, footer.as_deref()), stats)
}

/// Render and write to `path`
pub fn export_svg<P: AsRef<FsPath>>(
    path: P,
    layout: &Layout,
    renderer: &MapRenderer,
    track: Option<PlotTrack<'_>>,
    config: &ExportConfig,
    mode: DrawMode,
) -> Result<RenderStats> {
    let path = path.as_ref();
    let (document, stats) = render_svg(layout, renderer, track, config, mode);
    svg::save(path, &document).with_context(|| format!("writing {}", path.display()))?;
    info!("SVG exported to {}", path.display());
    Ok(stats)
}

/// Swatches for the two plot colours in the top-left corner
fn draw_legend(surface: &mut SvgSurface, renderer: &MapRenderer, config: &ExportConfig) {
    let layer = Layer::Export;
    let size = config.font_size as f64;
    let mut entries = vec![renderer.plot.positive_color.as_str()];
    if renderer.plot.negative_color != renderer.plot.positive_color {
        entries.push(renderer.plot.negative_color.as_str());
    }
    for (i, color) in entries.into_iter().enumerate() {
        let x = 10.0;
        let y = 10.0 + i as f64 * (size + 6.0);
        surface.begin_path(layer);
        surface.move_to(layer, x, y);
        surface.line_to(layer, x + size, y);
        surface.line_to(layer, x + size, y + size);
        surface.line_to(layer, x, y + size);
        surface.close_path(layer);
        surface.fill(layer, color);
    }
}
