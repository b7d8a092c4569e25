/*!
# Genomap Render

Drawing-surface backends for the genomap core:
- `MapRenderer` draws the backbone, a plot track and the center line into any
  [`DrawingSurface`](genomap_core::DrawingSurface)
- `SvgSurface` collects those commands as one SVG group per layer
- `DrawMode` picks between the fast interactive plot path and the full export path
*/

use serde::{Deserialize, Serialize};

pub mod lod;
pub mod map_renderer;
#[cfg(feature = "vector-export")]
pub mod svg_export;

pub use lod::DrawMode;
pub use map_renderer::{MapRenderer, MapStyle, PlotTrack, RenderStats};
#[cfg(feature = "vector-export")]
pub use svg_export::{export_svg, render_svg, SvgSurface};

/// Static export settings shared by the CLI and the SVG backend. Image size
/// follows the layout canvas; the center line belongs to [`MapStyle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub show_legend: bool,
    pub show_footer: bool,
    pub title: Option<String>,
    pub background_color: String,
    pub font_family: String,
    pub font_size: u32,
    pub provenance_comment: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            show_legend: true,
            show_footer: true,
            title: None,
            background_color: "#ffffff".to_string(),
            font_family: "Arial, sans-serif".to_string(),
            font_size: 12,
            provenance_comment: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_export_config() {
        let cfg = ExportConfig::default();
        assert!(cfg.show_legend);
        assert!(cfg.show_footer);
        assert!(cfg.title.is_none());
    }
}
