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

//! Per-record filtering and routing into [StartStopData].
//!
//! A [RecordFilterer] decides for each input line whether it represents
//! valid, non-duplicate evidence of proximity between a read end and a start
//! or stop codon, computes the signed distance, and routes accepted records
//! into the aggregator. Rejections are silent: unrelated annotation lines,
//! chromosome or strand mismatches, and low-quality alignments are expected
//! noise in large inputs.

use std::collections::HashSet;

use crate::AnalysisParams;
use crate::CodonClass;
use crate::Strand;
use crate::aggregate::StartStopData;
use crate::record::MalformedRecord;
use crate::record::read_record;

type E = Box<dyn std::error::Error>;

/// Stateful record filter for one parse run.
///
/// Owns the seen-read set that enforces at-most-one contribution per read
/// identifier across both codon classes. Call [reset](RecordFilterer::reset)
/// before reusing the filterer for another input.
pub struct RecordFilterer {
    params: AnalysisParams,
    start_needle: String,
    stop_needle: String,
    seen_reads: HashSet<String>,
}

impl RecordFilterer {
    pub fn new(params: AnalysisParams) -> Self {
        let start_needle = format!("\t{}\t", params.start_tag.to_ascii_lowercase());
        let stop_needle = format!("\t{}\t", params.stop_tag.to_ascii_lowercase());
        Self {
            params,
            start_needle,
            stop_needle,
            seen_reads: HashSet::new(),
        }
    }

    /// Clears the seen-read set for a new parse run.
    pub fn reset(&mut self) {
        self.seen_reads.clear();
    }

    /// Number of read identifiers consumed so far.
    pub fn n_seen_reads(&self) -> usize {
        self.seen_reads.len()
    }

    /// Cheap case-insensitive prefilter on the raw line, checked before any
    /// field splitting. Skips lines that cannot describe a codon pairing.
    fn matches_codon_tag(&self, line: &str) -> bool {
        let lowered = line.to_ascii_lowercase();
        lowered.contains(&self.start_needle) || lowered.contains(&self.stop_needle)
    }

    /// Filter one input line
    ///
    /// Applies, in order: the codon tag prefilter, the chromosome/strand
    /// self-consistency check, the mapping quality threshold, the read
    /// deduplication check, and the per-branch sign and length constraints.
    /// Accepted records are routed into `data` with the position pair for
    /// their strand and codon class.
    ///
    /// A read identifier is consumed by the first record that reaches the
    /// sign/length checks, even when those checks reject it. A later valid
    /// candidate for the same read is then never counted; see DESIGN.md.
    ///
    /// Returns a [MalformedRecord] error if the line matches the prefilter
    /// but cannot be parsed.
    ///
    pub fn process_line(
        &mut self,
        line: &str,
        line_number: u64,
        data: &mut StartStopData,
    ) -> Result<(), E> {
        if !self.matches_codon_tag(line) {
            return Ok(());
        }

        let record = read_record(line)
            .map_err(|reason| MalformedRecord { line_number, reason })?;

        if record.chrom != record.codon_chrom
            || record.strand != record.codon_strand
            || record.quality < self.params.min_quality
        {
            return Ok(());
        }

        // The prefilter is case-insensitive but routing requires an exact tag
        // match; anything else is a non-matching line.
        let class = if record.codon_type == self.params.start_tag {
            CodonClass::Start
        } else if record.codon_type == self.params.stop_tag {
            CodonClass::Stop
        } else {
            return Ok(());
        };

        let read_len = record.read_length();
        let distance: i64 = match (class, record.strand) {
            (CodonClass::Start, Strand::Forward) | (CodonClass::Stop, Strand::Reverse) => {
                record.codon_begin as i64 - record.read_start as i64
            }
            (CodonClass::Start, Strand::Reverse) | (CodonClass::Stop, Strand::Forward) => {
                record.codon_end as i64 - record.read_end as i64
            }
        };

        if self.seen_reads.contains(&record.read_id) {
            return Ok(());
        }

        let within_read = distance.unsigned_abs() <= read_len && read_len >= self.params.min_read_len;
        match (class, record.strand) {
            (CodonClass::Start, Strand::Forward) if within_read && distance >= 0 => {
                data.record(class, &record.chrom, record.codon_begin, record.strand, record.read_start, read_len);
            }
            (CodonClass::Stop, Strand::Forward) if within_read && distance <= 0 => {
                data.record(class, &record.chrom, record.codon_end, record.strand, record.read_end, read_len);
            }
            (CodonClass::Start, Strand::Reverse) if within_read && distance <= 0 => {
                data.record(class, &record.chrom, record.codon_end, record.strand, record.read_end, read_len);
            }
            (CodonClass::Stop, Strand::Reverse) if within_read && distance >= 0 => {
                data.record(class, &record.chrom, record.codon_begin, record.strand, record.read_start, read_len);
            }
            _ => {}
        }
        // The read is used up regardless of the sign/length outcome.
        self.seen_reads.insert(record.read_id);

        Ok(())
    }
}
