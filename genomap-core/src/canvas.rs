//! Drawing surface abstraction
//!
//! The core never rasterizes anything itself. Geometry strategies and the plot
//! renderer emit 2D-canvas style commands into a [`DrawingSurface`], keyed by
//! named layer. Backends (SVG export, a GUI canvas) implement the trait;
//! [`CommandRecorder`] keeps the raw commands for inspection and tests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Named drawing layers, bottom to top
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Background,
    Map,
    Foreground,
    Canvas,
    Ui,
    Debug,
    Export,
}

impl Layer {
    pub const ALL: [Layer; 7] = [
        Layer::Background,
        Layer::Map,
        Layer::Foreground,
        Layer::Canvas,
        Layer::Ui,
        Layer::Debug,
        Layer::Export,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Layer::Background => "background",
            Layer::Map => "map",
            Layer::Foreground => "foreground",
            Layer::Canvas => "canvas",
            Layer::Ui => "ui",
            Layer::Debug => "debug",
            Layer::Export => "export",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a path segment connects to whatever was drawn before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StartType {
    /// Start a new sub-path at the segment start
    #[default]
    MoveTo,
    /// Draw a straight line from the current point to the segment start
    LineTo,
    /// Continue from the current point without an explicit connection
    NoMoveTo,
}

/// Minimal 2D-canvas command surface.
///
/// `arc` follows canvas semantics: angles in radians measured clockwise from
/// the positive x axis (y-down), and an implicit line from the current point
/// to the arc start.
pub trait DrawingSurface {
    fn begin_path(&mut self, layer: Layer);
    fn move_to(&mut self, layer: Layer, x: f64, y: f64);
    fn line_to(&mut self, layer: Layer, x: f64, y: f64);
    #[allow(clippy::too_many_arguments)]
    fn arc(
        &mut self,
        layer: Layer,
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    );
    fn close_path(&mut self, layer: Layer);
    fn fill(&mut self, layer: Layer, color: &str);
    fn stroke(&mut self, layer: Layer, color: &str, width: f64);
    fn set_line_dash(&mut self, layer: Layer, segments: &[f64]);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    BeginPath,
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    Arc {
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    },
    ClosePath,
    Fill {
        color: String,
    },
    Stroke {
        color: String,
        width: f64,
    },
    SetLineDash(Vec<f64>),
}

impl DrawCommand {
    pub fn is_arc(&self) -> bool {
        matches!(self, DrawCommand::Arc { .. })
    }

    /// True for commands that add geometry to the current path
    pub fn is_segment(&self) -> bool {
        matches!(
            self,
            DrawCommand::LineTo { .. } | DrawCommand::Arc { .. }
        )
    }
}

/// Surface that records every command per layer
#[derive(Debug, Default, Clone)]
pub struct CommandRecorder {
    layers: BTreeMap<Layer, Vec<DrawCommand>>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self, layer: Layer) -> &[DrawCommand] {
        self.layers.get(&layer).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn arcs(&self, layer: Layer) -> Vec<&DrawCommand> {
        self.commands(layer).iter().filter(|c| c.is_arc()).collect()
    }

    pub fn count_segments(&self, layer: Layer) -> usize {
        self.commands(layer).iter().filter(|c| c.is_segment()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.values().all(Vec::is_empty)
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    fn push(&mut self, layer: Layer, command: DrawCommand) {
        self.layers.entry(layer).or_default().push(command);
    }
}

impl DrawingSurface for CommandRecorder {
    fn begin_path(&mut self, layer: Layer) {
        self.push(layer, DrawCommand::BeginPath);
    }

    fn move_to(&mut self, layer: Layer, x: f64, y: f64) {
        self.push(layer, DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, layer: Layer, x: f64, y: f64) {
        self.push(layer, DrawCommand::LineTo { x, y });
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
        self.push(
            layer,
            DrawCommand::Arc {
                cx,
                cy,
                radius,
                start_angle,
                end_angle,
                anticlockwise,
            },
        );
    }

    fn close_path(&mut self, layer: Layer) {
        self.push(layer, DrawCommand::ClosePath);
    }

    fn fill(&mut self, layer: Layer, color: &str) {
        self.push(
            layer,
            DrawCommand::Fill {
                color: color.to_string(),
            },
        );
    }

    fn stroke(&mut self, layer: Layer, color: &str, width: f64) {
        self.push(
            layer,
            DrawCommand::Stroke {
                color: color.to_string(),
                width,
            },
        );
    }

    fn set_line_dash(&mut self, layer: Layer, segments: &[f64]) {
        self.push(layer, DrawCommand::SetLineDash(segments.to_vec()));
    }
}
