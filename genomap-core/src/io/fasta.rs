//! FASTA/FASTQ sequence input
//!
//! Parsing goes through needletail, which also detects gzip compression.
//! Multi-record files can be concatenated into a single map sequence.

use std::path::Path;

use log::{debug, warn};
use needletail::{parse_fastx_file, parse_fastx_reader, FastxReader};

use crate::error::{MapError, MapResult};
use crate::types::MapSequence;

/// One sequence record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub sequence: Vec<u8>,
}

impl FastaRecord {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn map_sequence(&self) -> MapResult<MapSequence> {
        MapSequence::new(self.id.clone(), self.sequence.len() as u64)
    }
}

pub struct FastaParser;

impl FastaParser {
    /// Read every record in a file
    pub fn parse_file<P: AsRef<Path>>(path: P) -> MapResult<Vec<FastaRecord>> {
        let path = path.as_ref();
        let reader = parse_fastx_file(path).map_err(|e| MapError::Fasta(format!("{}: {}", path.display(), e)))?;
        let records = Self::collect(reader)?;
        debug!("read {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Read every record from any source
    pub fn parse_reader<R: std::io::Read + Send>(reader: R) -> MapResult<Vec<FastaRecord>> {
        let reader = parse_fastx_reader(reader).map_err(|e| MapError::Fasta(e.to_string()))?;
        Self::collect(reader)
    }

    /// First record of a file
    pub fn read_first<P: AsRef<Path>>(path: P) -> MapResult<FastaRecord> {
        let path = path.as_ref();
        let mut reader =
            parse_fastx_file(path).map_err(|e| MapError::Fasta(format!("{}: {}", path.display(), e)))?;
        match reader.next() {
            Some(record) => {
                let record = record.map_err(|e| MapError::Fasta(e.to_string()))?;
                Ok(FastaRecord {
                    id: String::from_utf8_lossy(record.id()).to_string(),
                    sequence: record.seq().to_vec(),
                })
            }
            None => Err(MapError::EmptyInput(format!("no sequences in {}", path.display()))),
        }
    }

    /// All records joined end to end, named after the first one
    pub fn concatenate(records: Vec<FastaRecord>) -> MapResult<FastaRecord> {
        let mut iter = records.into_iter();
        let Some(mut first) = iter.next() else {
            return Err(MapError::EmptyInput("no sequences to concatenate".into()));
        };
        let mut contigs = 1;
        for record in iter {
            first.sequence.extend_from_slice(&record.sequence);
            contigs += 1;
        }
        if contigs > 1 {
            debug!("concatenated {contigs} contigs into '{}' ({} bp)", first.id, first.len());
        }
        Ok(first)
    }

    fn collect(mut reader: Box<dyn FastxReader + '_>) -> MapResult<Vec<FastaRecord>> {
        let mut records = Vec::new();
        while let Some(record) = reader.next() {
            let record = record.map_err(|e| MapError::Fasta(e.to_string()))?;
            let id = String::from_utf8_lossy(record.id()).to_string();
            let sequence = record.seq().to_vec();
            if sequence.is_empty() {
                warn!("record '{id}' has no bases");
            }
            records.push(FastaRecord { id, sequence });
        }
        if records.is_empty() {
            return Err(MapError::EmptyInput("no sequences found".into()));
        }
        Ok(records)
    }
}
