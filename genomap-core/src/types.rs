use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{MapError, MapResult};

/// Base-pair position. Fractional values are allowed for smooth panning.
pub type Bp = f64;

/// A point in canvas pixel space (or map space, depending on context).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Geometry mode of the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Circular,
    Linear,
}

impl FromStr for Format {
    type Err = MapError;

    fn from_str(s: &str) -> MapResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circular" => Ok(Format::Circular),
            "linear" => Ok(Format::Linear),
            _ => Err(MapError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Circular => write!(f, "circular"),
            Format::Linear => write!(f, "linear"),
        }
    }
}

/// Canvas dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn min_dimension(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn max_dimension(&self) -> f64 {
        self.width.max(self.height)
    }

    pub fn contains(&self, point: &Point, margin: f64) -> bool {
        point.x >= -margin
            && point.x <= self.width + margin
            && point.y >= -margin
            && point.y <= self.height + margin
    }
}

/// Reference to the contig a range is measured against.
///
/// Only the length matters for wrap arithmetic; the id keeps ranges from
/// different contigs apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContigRef {
    pub id: u32,
    pub length: u64,
}

/// The sequence being mapped. Multi-contig sequences are concatenated
/// into a single map contig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSequence {
    pub name: String,
    pub length: u64,
}

impl MapSequence {
    pub fn new<S: Into<String>>(name: S, length: u64) -> MapResult<Self> {
        if length == 0 {
            return Err(MapError::InvalidSequenceLength(length));
        }
        Ok(Self {
            name: name.into(),
            length,
        })
    }

    pub fn map_contig(&self) -> ContigRef {
        ContigRef {
            id: 0,
            length: self.length,
        }
    }

    /// Number of bp travelled going clockwise from `start` to `stop`
    pub fn length_of_range(&self, start: Bp, stop: Bp) -> Bp {
        length_of_range(self.length, start, stop)
    }
}

pub(crate) fn length_of_range(sequence_length: u64, start: Bp, stop: Bp) -> Bp {
    if stop >= start {
        stop - start
    } else {
        (sequence_length as f64 - start) + stop
    }
}

/// Reference track the rest of the map is stacked around
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Backbone {
    /// Distance from the map center (circular) or map midline (linear) at zoom 1
    pub center_offset: f64,
    pub thickness: f64,
}

impl Default for Backbone {
    fn default() -> Self {
        Self {
            center_offset: 0.0,
            thickness: 5.0,
        }
    }
}

/// Total thickness of the tracks stacked inside and outside the backbone
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MapThickness {
    pub inside: f64,
    pub outside: f64,
}

impl MapThickness {
    pub fn total(&self) -> f64 {
        self.inside + self.outside
    }
}

/// Map-space domains for the x and y scales: `[x_min, x_max, y_max, y_min]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domains {
    pub x_min: f64,
    pub x_max: f64,
    pub y_max: f64,
    pub y_min: f64,
}

impl Domains {
    pub fn centered_on(center: Point, width: f64, height: f64) -> Self {
        let half_width = width / 2.0;
        let half_height = height / 2.0;
        Self {
            x_min: center.x - half_width,
            x_max: center.x + half_width,
            y_max: center.y + half_height,
            y_min: center.y - half_height,
        }
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.x_min, self.x_max, self.y_max, self.y_min]
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }
}
