// ribodist: Read coverage around annotated start and stop codons.
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//

//! ribodist is a library and a command-line client for computing read
//! coverage distributions around annotated start and stop codons from
//! ribosome profiling data.
//!
//! The expected input is the tab-separated output of joining split read
//! alignments against a start/stop codon annotation, for example:
//!
//! ```text
//! bamToBed -i RPF.bam -bed12 -split | \
//!     windowBed -w 100 -sm -b stdin -a start_stop.bed | \
//!     cut -f 7- | sort -k1,1 -k2,2g | \
//!     closestBed -s -t "last" -a stdin -b start_stop.bed > codon_analysis.tsv
//! ```
//!
//! Each line pairs one read alignment with its closest codon annotation.
//! Records are filtered by strand and chromosome self-consistency, mapping
//! quality, and read length, deduplicated by read identifier, and
//! accumulated per codon site. Reducing the accumulated data yields one
//! read-length × signed-distance coverage matrix per codon class.
//!
//! ## Rust API
//!
//! For processing an entire stream, use [aggregate_from_read] or
//! [aggregate_from_path] (the latter transparently decompresses `.gz`
//! inputs). For record-at-a-time use, the following are provided:
//!
//!   - [read_record](record::read_record): parses one tab-separated line into a [GenomicRecord](record::GenomicRecord).
//!   - [RecordFilterer](filter::RecordFilterer): filters records and routes accepted ones into a [StartStopData](aggregate::StartStopData).
//!   - [StartStopData](aggregate::StartStopData): accumulates observations and reduces them into [CoverageMatrix](aggregate::CoverageMatrix) values.
//!   - [write_tsv](printer::write_tsv): formats a coverage matrix as a tab-separated table.
//!
//! ## Usage
//!
//! ```rust
//! use ribodist::{aggregate_from_read, AnalysisParams, CodonClass};
//! use std::io::Cursor;
//!
//! let mut input_bytes: Vec<u8> = Vec::new();
//! input_bytes.extend_from_slice(b"chr1\t100\t130\tread1\t15\t+\t100\t130\t0\t1\t30,\t0,\tchr1\t110\t113\tstart_codon\tgene1\t+\n");
//! input_bytes.extend_from_slice(b"chr1\t200\t230\tread2\t15\t+\t200\t230\t0\t1\t30,\t0,\tchr1\t222\t225\tstop_codon\tgene1\t+\n");
//! let mut input = Cursor::new(input_bytes);
//!
//! let params = AnalysisParams::default();
//! let data = aggregate_from_read(&params, &mut input).unwrap();
//!
//! // Read 5' end at 100, start codon at 110: distance 10
//! let start = data.reduce(CodonClass::Start, params.min_site_count);
//! assert_eq!(start.get(30, 10), Some(1));
//!
//! // Read 3' end at 230, stop codon end at 225: distance -5
//! let stop = data.reduce(CodonClass::Stop, params.min_site_count);
//! assert_eq!(stop.get(30, -5), Some(1));
//! ```
//!

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::aggregate::StartStopData;
use crate::filter::RecordFilterer;

pub mod aggregate;
pub mod filter;
pub mod printer;
pub mod record;

type E = Box<dyn std::error::Error>;

/// Strand of a read or codon annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}

impl std::str::FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            _ => Err(format!("'{}' is not a valid Strand", s)),
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

/// Codon annotation class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CodonClass {
    Start,
    Stop,
}

/// Filtering and reduction parameters for one analysis run.
#[derive(Clone, Debug)]
pub struct AnalysisParams {
    /// Codon type tag marking start codon annotations.
    pub start_tag: String,
    /// Codon type tag marking stop codon annotations.
    pub stop_tag: String,
    /// Minimum mapping quality; lower-quality alignments are skipped.
    pub min_quality: f64,
    /// Minimum read length; shorter reads are skipped.
    pub min_read_len: u64,
    /// Minimum per-site observation count for inclusion in the reduced matrix.
    pub min_site_count: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            start_tag: "start_codon".to_string(),
            stop_tag: "stop_codon".to_string(),
            min_quality: 10.0,
            min_read_len: 20,
            min_site_count: 0,
        }
    }
}

/// Aggregate codon distance observations from [Read](std::io::Read).
///
/// Runs the full single-pass pipeline over a line-oriented stream: each line
/// is filtered, deduplicated by read identifier, and accumulated into the
/// returned [StartStopData]. Non-matching and filtered-out lines are skipped
/// silently; a malformed matching line terminates with a
/// [MalformedRecord](record::MalformedRecord) carrying the line number.
///
pub fn aggregate_from_read<R: Read>(
    params: &AnalysisParams,
    conn_in: &mut R,
) -> Result<StartStopData, E> {
    let reader = BufReader::new(conn_in);
    let mut filterer = RecordFilterer::new(params.clone());
    let mut data = StartStopData::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        filterer.process_line(&line, idx as u64 + 1, &mut data)?;
    }

    Ok(data)
}

/// Aggregate codon distance observations from a file path.
///
/// Inputs with a `.gz` extension are decompressed on the fly. All failures,
/// including malformed records, are reported with the offending path.
///
pub fn aggregate_from_path(
    params: &AnalysisParams,
    path: &Path,
) -> Result<StartStopData, E> {
    let file = File::open(path).map_err(|err| format!("{}: {}", path.display(), err))?;

    let res = if path.extension().is_some_and(|ext| ext == "gz") {
        let mut conn_in = MultiGzDecoder::new(file);
        aggregate_from_read(params, &mut conn_in)
    } else {
        let mut conn_in = file;
        aggregate_from_read(params, &mut conn_in)
    };

    res.map_err(|err| format!("{}: {}", path.display(), err).into())
}

// Tests
#[cfg(test)]
mod tests {

    fn example_lines() -> Vec<u8> {
        let mut data: Vec<u8> = Vec::new();
        data.extend_from_slice(b"chr1\t100\t130\tread1\t15\t+\t100\t130\t0\t1\t30,\t0,\tchr1\t110\t113\tstart_codon\tgene1\t+\n");
        data.extend_from_slice(b"chr1\t200\t230\tread2\t15\t+\t200\t230\t0\t1\t30,\t0,\tchr1\t222\t225\tstop_codon\tgene1\t+\n");
        data.extend_from_slice(b"chr2\t500\t528\tread3\t30\t-\t500\t528\t0\t1\t28,\t0,\tchr2\t520\t523\tstart_codon\tgene2\t-\n");
        // Not a codon line, ignored without error despite the short layout
        data.extend_from_slice(b"chr1\t100\t130\texon\n");
        data
    }

    #[test]
    fn aggregate_from_read_accepts_qualifying_records() {
        use crate::AnalysisParams;
        use crate::CodonClass;
        use super::aggregate_from_read;
        use std::io::Cursor;

        let mut input = Cursor::new(example_lines());
        let data = aggregate_from_read(&AnalysisParams::default(), &mut input).unwrap();

        let start = data.reduce(CodonClass::Start, 0);
        // distance 10 for read1, -5 for read3 (codon end 523, read end 528)
        assert_eq!(start.get(30, 10), Some(1));
        assert_eq!(start.get(28, -5), Some(1));

        let stop = data.reduce(CodonClass::Stop, 0);
        assert_eq!(stop.get(30, -5), Some(1));
    }

    #[test]
    fn low_quality_input_yields_empty_matrices() {
        use crate::AnalysisParams;
        use crate::CodonClass;
        use super::aggregate_from_read;
        use std::io::Cursor;

        let line = b"chr1\t100\t130\tread1\t5\t+\t100\t130\t0\t1\t30,\t0,\tchr1\t110\t113\tstart_codon\tgene1\t+\n".to_vec();
        let mut input = Cursor::new(line);

        let data = aggregate_from_read(&AnalysisParams::default(), &mut input).unwrap();

        assert!(data.reduce(CodonClass::Start, 0).is_empty());
        assert!(data.reduce(CodonClass::Stop, 0).is_empty());
    }

    #[test]
    fn malformed_matching_line_reports_line_number() {
        use crate::AnalysisParams;
        use super::aggregate_from_read;
        use std::io::Cursor;

        let mut data: Vec<u8> = Vec::new();
        data.extend_from_slice(b"chr1\t100\t130\tread1\t15\t+\t100\t130\t0\t1\t30,\t0,\tchr1\t110\t113\tstart_codon\tgene1\t+\n");
        data.extend_from_slice(b"chr1\tnot_a_number\t130\tread2\t15\t+\t100\t130\t0\t1\t30,\t0,\tchr1\t110\t113\tstart_codon\tgene1\t+\n");
        let mut input = Cursor::new(data);

        let got = aggregate_from_read(&AnalysisParams::default(), &mut input);

        assert!(got.is_err());
        assert!(got.unwrap_err().to_string().contains("line 2"));
    }

    #[test]
    fn gzip_input_yields_identical_matrices() {
        use crate::AnalysisParams;
        use crate::CodonClass;
        use super::aggregate_from_path;
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::fs::File;
        use std::io::Write;

        let lines = example_lines();
        let dir = std::env::temp_dir();
        let plain_path = dir.join(format!("ribodist_test_{}.tsv", std::process::id()));
        let gz_path = dir.join(format!("ribodist_test_{}.tsv.gz", std::process::id()));

        File::create(&plain_path).unwrap().write_all(&lines).unwrap();
        let mut encoder = GzEncoder::new(File::create(&gz_path).unwrap(), Compression::default());
        encoder.write_all(&lines).unwrap();
        encoder.finish().unwrap();

        let params = AnalysisParams::default();
        let from_plain = aggregate_from_path(&params, &plain_path).unwrap();
        let from_gz = aggregate_from_path(&params, &gz_path).unwrap();

        assert_eq!(from_plain.reduce(CodonClass::Start, 0), from_gz.reduce(CodonClass::Start, 0));
        assert_eq!(from_plain.reduce(CodonClass::Stop, 0), from_gz.reduce(CodonClass::Stop, 0));

        std::fs::remove_file(&plain_path).unwrap();
        std::fs::remove_file(&gz_path).unwrap();
    }

    #[test]
    fn missing_input_reports_path() {
        use crate::AnalysisParams;
        use super::aggregate_from_path;
        use std::path::Path;

        let got = aggregate_from_path(&AnalysisParams::default(), Path::new("/nonexistent/codon_analysis.tsv"));

        assert!(got.is_err());
        assert!(got.unwrap_err().to_string().contains("/nonexistent/codon_analysis.tsv"));
    }
}
