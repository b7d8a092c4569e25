//! Wrap-aware base-pair ranges
//!
//! A [`MapRange`] is an interval over `1..=length` on a contig. When `stop`
//! is smaller than `start` the range runs through the end of the sequence and
//! continues from bp 1.
//!
//! Construction does not validate bounds. Callers clamp to `[1, length]`;
//! out-of-bounds values give unspecified wrap arithmetic.

use serde::{Deserialize, Serialize};

use crate::types::{length_of_range, Bp, ContigRef};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapRange {
    contig: ContigRef,
    start: Bp,
    stop: Bp,
}

impl MapRange {
    pub fn new(contig: ContigRef, start: Bp, stop: Bp) -> Self {
        Self { contig, start, stop }
    }

    /// Range covering the whole contig
    pub fn full(contig: ContigRef) -> Self {
        Self::new(contig, 1.0, contig.length as f64)
    }

    pub fn contig(&self) -> ContigRef {
        self.contig
    }

    pub fn start(&self) -> Bp {
        self.start
    }

    pub fn stop(&self) -> Bp {
        self.stop
    }

    pub fn sequence_length(&self) -> u64 {
        self.contig.length
    }

    pub fn is_wrapped(&self) -> bool {
        self.stop < self.start
    }

    pub fn length(&self) -> Bp {
        length_of_range(self.contig.length, self.start, self.stop)
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0.0
    }

    pub fn is_full_length(&self) -> bool {
        self.start == 1.0 && self.stop == self.contig.length as f64
    }

    /// Midpoint going clockwise from start, wrapped back into `1..=length`
    pub fn middle(&self) -> Bp {
        let mid = self.start + self.length() / 2.0;
        let length = self.contig.length as f64;
        if mid > length {
            mid - length
        } else {
            mid
        }
    }

    pub fn contains(&self, bp: Bp) -> bool {
        if self.is_wrapped() {
            bp >= self.start || bp <= self.stop
        } else {
            bp >= self.start && bp <= self.stop
        }
    }

    /// True if the two ranges share at least one bp. Ranges on different
    /// contigs never overlap.
    pub fn overlaps_map_range(&self, other: &MapRange) -> bool {
        self.contig.id == other.contig.id
            && (self.contains(other.start) || other.contains(self.start))
    }

    /// Splits a wrapped range at the origin into `start..=length` and `1..=stop`
    pub fn split_at_origin(&self) -> (MapRange, Option<MapRange>) {
        if self.is_wrapped() {
            (
                MapRange::new(self.contig, self.start, self.contig.length as f64),
                Some(MapRange::new(self.contig, 1.0, self.stop)),
            )
        } else {
            (*self, None)
        }
    }
}
