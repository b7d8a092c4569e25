//! Two-column plot files: `position<TAB>score`
//!
//! Blank lines and `#` comments are skipped. Positions must be 1-based and
//! strictly ascending.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::error::{MapError, MapResult};
use crate::plot::PlotSeries;

pub fn read_plot_tsv<P: AsRef<Path>>(path: P) -> MapResult<PlotSeries> {
    let file = File::open(path.as_ref())?;
    let series = parse_plot_tsv(BufReader::new(file))?;
    debug!("read {} plot points from {}", series.len(), path.as_ref().display());
    Ok(series)
}

pub fn parse_plot_tsv<R: BufRead>(reader: R) -> MapResult<PlotSeries> {
    let mut positions: Vec<u64> = Vec::new();
    let mut scores = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split('\t');
        let (Some(position), Some(score)) = (fields.next(), fields.next()) else {
            return Err(MapError::parse(line_no, "expected 2 tab-separated columns"));
        };
        let position: u64 = position
            .trim()
            .parse()
            .map_err(|_| MapError::parse(line_no, format!("invalid position '{position}'")))?;
        let score: f64 = score
            .trim()
            .parse()
            .map_err(|_| MapError::parse(line_no, format!("invalid score '{score}'")))?;

        if position == 0 {
            return Err(MapError::parse(line_no, "positions are 1-based"));
        }
        if let Some(&last) = positions.last() {
            if position <= last {
                return Err(MapError::parse(
                    line_no,
                    format!("position {position} does not follow {last}"),
                ));
            }
        }
        positions.push(position);
        scores.push(score);
    }

    if positions.is_empty() {
        return Err(MapError::EmptyInput("plot file has no data lines".into()));
    }
    PlotSeries::new(positions, scores)
}
