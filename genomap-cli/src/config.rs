//! Configuration handling for the genomap CLI
//!
//! Supports loading configuration from genomap.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use genomap_core::{Format, SequenceStat};
use genomap_render::{ExportConfig, MapStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "genomap.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub export: ExportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Layout format ("circular" or "linear")
    #[serde(default = "default_format")]
    pub format: String,

    /// Sequence length when no FASTA is given
    #[serde(default)]
    pub sequence_length: Option<u64>,

    /// Initial zoom factor
    #[serde(default = "default_zoom")]
    pub zoom: f64,

    /// bp the view is centered on
    #[serde(default = "default_center_bp")]
    pub center_bp: f64,

    /// Canvas width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Canvas height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Track thickness stacked inside the backbone
    #[serde(default = "default_track_thickness")]
    pub inside_thickness: f64,

    /// Track thickness stacked outside the backbone
    #[serde(default = "default_track_thickness")]
    pub outside_thickness: f64,

    /// Backbone stroke colour
    #[serde(default = "default_backbone_color")]
    pub backbone_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Statistic computed from the sequence ("gc-content" or "gc-skew")
    #[serde(default = "default_stat")]
    pub stat: String,

    /// Colour above the baseline
    #[serde(default = "default_positive_color")]
    pub positive_color: String,

    /// Colour below the baseline
    #[serde(default = "default_negative_color")]
    pub negative_color: String,

    /// Sliding window in bp; derived from the sequence length when unset
    #[serde(default)]
    pub window: Option<usize>,

    /// Window step in bp; half the window when unset
    #[serde(default)]
    pub step: Option<usize>,

    /// Fixed score axis; spans the data when unset
    #[serde(default)]
    pub axis_min: Option<f64>,

    #[serde(default)]
    pub axis_max: Option<f64>,

    /// Plot thickness as a fraction of the inside track space
    #[serde(default = "default_plot_fraction")]
    pub thickness_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSection {
    /// Background fill
    #[serde(default = "default_background")]
    pub background: String,

    /// Show plot colour swatches
    #[serde(default = "default_true")]
    pub legend: bool,

    /// Timestamped footer; disable for byte-identical output
    #[serde(default = "default_true")]
    pub footer: bool,

    /// Dashed current-position line
    #[serde(default = "default_true")]
    pub center_line: bool,

    #[serde(default)]
    pub title: Option<String>,
}

// Default value functions
fn default_format() -> String { "circular".to_string() }
fn default_zoom() -> f64 { 1.0 }
fn default_center_bp() -> f64 { 1.0 }
fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 800 }
fn default_track_thickness() -> f64 { 60.0 }
fn default_backbone_color() -> String { "rgb(128,128,128)".to_string() }
fn default_stat() -> String { "gc-skew".to_string() }
fn default_positive_color() -> String { "rgb(0,153,0)".to_string() }
fn default_negative_color() -> String { "rgb(153,0,153)".to_string() }
fn default_plot_fraction() -> f64 { 0.8 }
fn default_background() -> String { "#ffffff".to_string() }
fn default_true() -> bool { true }

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            sequence_length: None,
            zoom: default_zoom(),
            center_bp: default_center_bp(),
            width: default_width(),
            height: default_height(),
            inside_thickness: default_track_thickness(),
            outside_thickness: default_track_thickness(),
            backbone_color: default_backbone_color(),
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            stat: default_stat(),
            positive_color: default_positive_color(),
            negative_color: default_negative_color(),
            window: None,
            step: None,
            axis_min: None,
            axis_max: None,
            thickness_fraction: default_plot_fraction(),
        }
    }
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            background: default_background(),
            legend: true,
            footer: true,
            center_line: true,
            title: None,
        }
    }
}

impl MapConfig {
    pub fn format(&self) -> Result<Format> {
        self.format
            .parse()
            .with_context(|| format!("invalid [map] format '{}'", self.format))
    }
}

impl PlotConfig {
    pub fn stat(&self) -> Result<SequenceStat> {
        self.stat
            .parse()
            .with_context(|| format!("invalid [plot] stat '{}'", self.stat))
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {DEFAULT_CONFIG_FILE}");
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default configuration")
    }

    /// Backbone colour and center line for the map renderer
    pub fn map_style(&self) -> MapStyle {
        MapStyle {
            backbone_color: self.map.backbone_color.clone(),
            show_center_line: self.export.center_line,
        }
    }

    /// Export settings for the SVG backend
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            show_legend: self.export.legend,
            show_footer: self.export.footer,
            title: self.export.title.clone(),
            background_color: self.export.background.clone(),
            ..ExportConfig::default()
        }
    }
}
