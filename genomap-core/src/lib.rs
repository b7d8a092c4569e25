//! Genomap Core Library
//!
//! Coordinate scales, circular and linear geometry strategies, the layout
//! façade, wrap-aware ranges and the level-of-detail plot renderer for
//! genome maps.

pub mod canvas;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod io;
pub mod layout;
pub mod plot;
pub mod range;
pub mod scale;
pub mod types;

// Re-export commonly used types and functions
pub use canvas::{CommandRecorder, DrawCommand, DrawingSurface, Layer, StartType};
pub use error::{MapError, MapResult};
pub use extract::{extract, SequenceStat, WindowParams};
pub use geometry::{GeometryFactory, GeometryStrategy, MapState, VisibleRangeOptions};
pub use layout::Layout;
pub use plot::{PlotDrawStats, PlotRenderer, PlotSeries, PlotSlot};
pub use range::MapRange;
pub use scale::{CoordinateScale, LinearScale};
pub use types::{Backbone, Bp, CanvasSize, ContigRef, Domains, Format, MapSequence, MapThickness, Point};

/// Version information for the genomap core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
