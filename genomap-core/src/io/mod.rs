//! Input formats
//!
//! Sequences come from FASTA/FASTQ (optionally gzipped) through needletail.
//! Precomputed plot series come from a two-column TSV file.

#[cfg(feature = "io-fasta")] pub mod fasta;
pub mod plot_tsv;

#[cfg(feature = "io-fasta")] pub use fasta::{FastaParser, FastaRecord};
pub use plot_tsv::{parse_plot_tsv, read_plot_tsv};
