use anyhow::Result;
use clap::{Parser, Subcommand};
use genomap_core::io::{read_plot_tsv, FastaParser};
use genomap_core::*;
use genomap_render::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

mod config;
mod error;

use config::Config;
use error::{print_error_and_exit, CliError, CliResult};

#[derive(Parser)]
#[command(name = "genomap")]
#[command(about = "Genomap - circular and linear genome maps")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./genomap.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

/// Sequence and view options shared by the map commands
#[derive(clap::Args, Debug, Clone)]
struct ViewArgs {
    /// FASTA/FASTQ file (optionally gzipped); all records are joined
    #[arg(short, long)]
    fasta: Option<PathBuf>,

    /// Sequence length in bp when no FASTA is given
    #[arg(short, long)]
    length: Option<u64>,

    /// Layout format (circular, linear)
    #[arg(long)]
    format: Option<String>,

    /// Zoom factor, clamped to the valid range
    #[arg(short, long)]
    zoom: Option<f64>,

    /// bp to center the view on
    #[arg(long)]
    center: Option<f64>,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a map with an optional plot track to SVG
    Render {
        #[command(flatten)]
        view: ViewArgs,

        /// Plot track from a position<TAB>score file
        #[arg(short, long)]
        plot: Option<PathBuf>,

        /// Plot computed from the FASTA sequence (gc-content, gc-skew)
        #[arg(long)]
        stat: Option<String>,

        /// Sliding window in bp
        #[arg(long)]
        window: Option<usize>,

        /// Window step in bp
        #[arg(long)]
        step: Option<usize>,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,

        /// Sample the plot the way interactive redraws do
        #[arg(long)]
        draft: bool,

        /// Leave out the timestamped footer
        #[arg(long)]
        no_footer: bool,

        /// Title drawn at the top of the image
        #[arg(long)]
        title: Option<String>,
    },

    /// Report the bp range visible at a track offset
    Visible {
        #[command(flatten)]
        view: ViewArgs,

        /// Track offset from the map center; defaults to the backbone
        #[arg(long)]
        offset: Option<f64>,

        /// Extra pixels around the canvas that count as visible
        #[arg(long, default_value = "0")]
        margin: f64,

        /// Return fractional bp
        #[arg(long)]
        float: bool,
    },

    /// Configuration helpers
    Config {
        /// Print an example genomap.toml
        #[arg(long)]
        example: bool,

        /// Write the example configuration to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    if let Err(err) = run() {
        match err.downcast_ref::<CliError>() {
            Some(cli_err) => print_error_and_exit(cli_err),
            None => {
                eprintln!("Error: {err:#}");
                std::process::exit(1);
            }
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = Config::load(cli.config.as_deref())
        .map_err(|e| CliError::config(format!("{e:#}")))?;

    match cli.command {
        Commands::Render {
            view,
            plot,
            stat,
            window,
            step,
            output,
            draft,
            no_footer,
            title,
        } => {
            let mut config = config;
            if no_footer {
                config.export.footer = false;
            }
            if title.is_some() {
                config.export.title = title;
            }
            if let Some(stat) = stat {
                config.plot.stat = stat;
            }
            if window.is_some() {
                config.plot.window = window;
            }
            if step.is_some() {
                config.plot.step = step;
            }
            cmd_render(&config, &view, plot.as_deref(), &output, DrawMode::for_motion(draft))
        }
        Commands::Visible {
            view,
            offset,
            margin,
            float,
        } => cmd_visible(&config, &view, offset, VisibleRangeOptions { margin, float }),
        Commands::Config { example, output } => cmd_config(example, output.as_deref()),
    }
}

/// Map sequence plus the bases when they came from a FASTA file
fn load_sequence(config: &Config, view: &ViewArgs) -> CliResult<(MapSequence, Option<Vec<u8>>)> {
    if let Some(path) = &view.fasta {
        if !path.exists() {
            return Err(CliError::file_not_found(path.clone()));
        }
        let name = path.display().to_string();
        let records = FastaParser::parse_file(path).map_err(|e| CliError::from_map_error(&name, e))?;
        let record = FastaParser::concatenate(records).map_err(|e| CliError::from_map_error(&name, e))?;
        log::info!("Loaded '{}' ({} bp) from {}", record.id, record.len(), name);
        let sequence = record
            .map_sequence()
            .map_err(|e| CliError::from_map_error(&name, e))?;
        return Ok((sequence, Some(record.sequence)));
    }

    let length = view
        .length
        .or(config.map.sequence_length)
        .ok_or_else(|| CliError::validation("no sequence: pass --fasta or --length"))?;
    let sequence =
        MapSequence::new("sequence", length).map_err(|e| CliError::validation(e.to_string()))?;
    Ok((sequence, None))
}

fn build_layout(config: &Config, view: &ViewArgs, sequence: MapSequence) -> CliResult<Layout> {
    let format = match view.format.as_deref() {
        Some(name) => name
            .parse()
            .map_err(|e: MapError| CliError::invalid_format(e.to_string()))?,
        None => config
            .map
            .format()
            .map_err(|e| CliError::invalid_format(format!("{e:#}")))?,
    };
    let width = view.width.unwrap_or(config.map.width);
    let height = view.height.unwrap_or(config.map.height);

    let mut layout = Layout::new(format, sequence, CanvasSize::new(width as f64, height as f64));
    layout.update_initial_backbone_center_offset(
        config.map.inside_thickness,
        config.map.outside_thickness,
    );
    let zoom = view.zoom.unwrap_or(config.map.zoom);
    let center = view.center.unwrap_or(config.map.center_bp);
    layout.zoom_to(center, zoom);
    log::debug!(
        "{} layout {}x{} at zoom {:.2} (max {:.2})",
        layout.format(),
        width,
        height,
        layout.zoom_factor(),
        layout.max_zoom_factor()
    );
    Ok(layout)
}

fn load_plot(config: &Config, plot: Option<&Path>, bases: Option<&[u8]>) -> CliResult<Option<PlotSeries>> {
    let series = match (plot, bases) {
        (Some(path), _) => {
            let name = path.display().to_string();
            Some(read_plot_tsv(path).map_err(|e| CliError::from_map_error(&name, e))?)
        }
        (None, Some(bases)) => {
            let stat = config
                .plot
                .stat()
                .map_err(|e| CliError::validation(format!("{e:#}")))?;
            let defaults = WindowParams::default_for_length(bases.len());
            let window = config.plot.window.unwrap_or(defaults.window);
            let params = WindowParams {
                window,
                step: config.plot.step.unwrap_or((window / 2).max(1)),
            };
            log::info!("Computing {stat} (window {}, step {})", params.window, params.step);
            Some(extract(bases, stat, params).map_err(|e| CliError::validation(e.to_string()))?)
        }
        (None, None) => None,
    };

    Ok(series.map(|s| match (config.plot.axis_min, config.plot.axis_max) {
        (Some(min), Some(max)) => s.with_axis(min, max),
        _ => s,
    }))
}

fn cmd_render(
    config: &Config,
    view: &ViewArgs,
    plot: Option<&Path>,
    output: &Path,
    mode: DrawMode,
) -> Result<()> {
    let (sequence, bases) = load_sequence(config, view)?;
    let layout = build_layout(config, view, sequence)?;
    let series = load_plot(config, plot, bases.as_deref())?;

    let thickness = config.map.inside_thickness * config.plot.thickness_fraction;
    let backbone = layout.state().backbone;
    let track = series.as_ref().map(|series| PlotTrack {
        series,
        slot: PlotSlot::new(
            layout.backbone_offset() - backbone.thickness - thickness / 2.0,
            thickness,
        ),
    });

    let renderer = MapRenderer::new(
        config.map_style(),
        PlotRenderer::with_colors(
            config.plot.positive_color.clone(),
            config.plot.negative_color.clone(),
        ),
    );
    let export = config.export_config();

    let stats = export_svg(output, &layout, &renderer, track, &export, mode)
        .map_err(|e| CliError::rendering(format!("{e:#}")))?;
    match stats.backbone_range {
        Some(range) => log::info!("Backbone drawn over {:.0}..{:.0}", range.start(), range.stop()),
        None => log::warn!("Backbone is outside the canvas at this zoom"),
    }
    if let Some(plot) = stats.plot {
        log::info!("Plot: {} points in {} pass(es), step {}", plot.points, plot.passes, plot.step);
    }
    Ok(())
}

#[derive(Serialize)]
struct VisibleReport {
    format: Format,
    sequence_length: u64,
    zoom_factor: f64,
    center_bp: f64,
    center_offset: f64,
    pixels_per_bp: f64,
    clock_position: u8,
    range: Option<MapRange>,
}

fn cmd_visible(
    config: &Config,
    view: &ViewArgs,
    offset: Option<f64>,
    options: VisibleRangeOptions,
) -> Result<()> {
    let (sequence, _) = load_sequence(config, view)?;
    let layout = build_layout(config, view, sequence)?;
    let center_offset = offset.unwrap_or_else(|| layout.backbone_offset());

    let report = VisibleReport {
        format: layout.format(),
        sequence_length: layout.sequence().length,
        zoom_factor: layout.zoom_factor(),
        center_bp: layout.bp_float(),
        center_offset,
        pixels_per_bp: layout.pixels_per_bp_at(center_offset),
        clock_position: layout.clock_position_for_bp(layout.bp_float(), false),
        range: layout.visible_range_for_center_offset(center_offset, options),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_config(example: bool, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            Config::default()
                .save_to_file(path)
                .map_err(|e| CliError::io(format!("{e:#}")))?;
            log::info!("Wrote example configuration to {}", path.display());
        }
        None if example => print!("{}", Config::example_toml()?),
        None => {
            log::info!("Use --example to print a sample {}", config::DEFAULT_CONFIG_FILE);
        }
    }
    Ok(())
}
