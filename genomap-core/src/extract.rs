//! Plot series derived from sequence composition
//!
//! GC content and GC skew over sliding windows. Windows are scored in
//! parallel with rayon; positions are the 1-based window starts.

use std::fmt;
use std::str::FromStr;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};
use crate::plot::PlotSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequenceStat {
    GcContent,
    GcSkew,
}

impl FromStr for SequenceStat {
    type Err = MapError;

    fn from_str(s: &str) -> MapResult<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "gc-content" | "gc" => Ok(SequenceStat::GcContent),
            "gc-skew" | "skew" => Ok(SequenceStat::GcSkew),
            other => Err(MapError::InvalidParams(format!(
                "unknown sequence statistic '{other}' (expected gc-content or gc-skew)"
            ))),
        }
    }
}

impl fmt::Display for SequenceStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceStat::GcContent => write!(f, "gc-content"),
            SequenceStat::GcSkew => write!(f, "gc-skew"),
        }
    }
}

/// Sliding window size and step, in bp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowParams {
    pub window: usize,
    pub step: usize,
}

impl WindowParams {
    /// Roughly a thousand windows over the sequence, each overlapping the
    /// next by half
    pub fn default_for_length(length: usize) -> Self {
        let window = (length / 1000).max(1);
        Self {
            window,
            step: (window / 2).max(1),
        }
    }

    fn validate(&self) -> MapResult<()> {
        if self.window == 0 || self.step == 0 {
            return Err(MapError::InvalidParams(format!(
                "window ({}) and step ({}) must be positive",
                self.window, self.step
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct BaseCounts {
    g: usize,
    c: usize,
    at: usize,
}

impl BaseCounts {
    fn of(window: &[u8]) -> Self {
        let mut counts = Self::default();
        for base in window {
            match base.to_ascii_uppercase() {
                b'G' => counts.g += 1,
                b'C' => counts.c += 1,
                b'A' | b'T' | b'U' => counts.at += 1,
                _ => {}
            }
        }
        counts
    }

    fn gc_content(&self) -> f64 {
        let total = self.g + self.c + self.at;
        if total == 0 {
            0.0
        } else {
            (self.g + self.c) as f64 / total as f64
        }
    }

    fn gc_skew(&self) -> f64 {
        let gc = self.g + self.c;
        if gc == 0 {
            0.0
        } else {
            (self.g as f64 - self.c as f64) / gc as f64
        }
    }
}

/// Score `sequence` over sliding windows. Windows near the end are
/// truncated rather than wrapped.
///
/// GC content is baselined at its mean; GC skew at 0 with a symmetric axis.
pub fn extract(sequence: &[u8], stat: SequenceStat, params: WindowParams) -> MapResult<PlotSeries> {
    params.validate()?;
    if sequence.is_empty() {
        return Err(MapError::EmptyInput("sequence has no bases".into()));
    }

    let length = sequence.len();
    let starts: Vec<usize> = (0..length).step_by(params.step).collect();
    let scores: Vec<f64> = starts
        .par_iter()
        .map(|&start| {
            let counts = BaseCounts::of(&sequence[start..(start + params.window).min(length)]);
            match stat {
                SequenceStat::GcContent => counts.gc_content(),
                SequenceStat::GcSkew => counts.gc_skew(),
            }
        })
        .collect();
    debug!(
        "{stat}: {} windows (window {}, step {})",
        scores.len(),
        params.window,
        params.step
    );

    let positions = starts.iter().map(|&s| s as u64 + 1).collect();
    let series = PlotSeries::new(positions, scores)?;
    Ok(match stat {
        SequenceStat::GcContent => {
            let mean = series.mean_score().unwrap_or(0.0);
            series.with_axis(0.0, 1.0).with_baseline(mean)
        }
        SequenceStat::GcSkew => {
            let extent = series
                .scores()
                .iter()
                .fold(0.0f64, |m, s| m.max(s.abs()));
            series.with_axis(-extent, extent)
        }
    })
}
