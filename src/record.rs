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
use crate::Strand;

/// A line matched the codon tag pattern but could not be parsed.
///
/// Lines that reach record parsing are expected to honor the upstream
/// pipeline contract, so a bad field count or a non-numeric position aborts
/// the run instead of being skipped.
#[derive(Debug, Clone)]
pub struct MalformedRecord {
    pub line_number: u64,
    pub reason: String,
}

impl std::fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "malformed record on line {}: {}", self.line_number, self.reason)
    }
}

impl std::error::Error for MalformedRecord {}

/// One parsed genomic interval record joined with its closest codon annotation.
///
/// Built from a single tab-separated line (see [read_record] for the field
/// layout). Coordinates are 0-based half-open.
#[derive(Clone, Debug, PartialEq)]
pub struct GenomicRecord {
    pub chrom: String,
    pub read_start: u64,
    pub read_end: u64,
    pub read_id: String,
    pub quality: f64,
    pub strand: Strand,
    pub block_sizes: Vec<u64>,
    pub codon_chrom: String,
    pub codon_begin: u64,
    pub codon_end: u64,
    pub codon_type: String,
    pub gene_id: String,
    pub codon_strand: Strand,
}

impl GenomicRecord {
    /// Read length is the sum of the aligned block sizes.
    pub fn read_length(&self) -> u64 {
        self.block_sizes.iter().sum()
    }
}

fn parse_u64(field: &str, name: &str) -> Result<u64, String> {
    field.parse::<u64>().map_err(|_| format!("non-numeric {}: '{}'", name, field))
}

/// Parse a record line
///
/// Reads one tab-separated record with at least 18 fields in this order:
/// read chromosome, read start, read end, read id, mapping quality, read
/// strand, 3 unused fields, block count, comma-separated block sizes
/// (trailing comma tolerated), block starts (unused), codon chromosome,
/// codon begin, codon end, codon type, codon gene id, codon strand.
///
/// Returns the [GenomicRecord] on the line, or the failure reason.
///
pub fn read_record(
    line: &str,
) -> Result<GenomicRecord, String> {
    let separator: char = '\t';
    let fields: Vec<&str> = line.trim_end_matches('\n').split(separator).collect();

    if fields.len() < 18 {
        return Err(format!("expected at least 18 tab-separated fields, found {}", fields.len()));
    }

    let read_start = parse_u64(fields[1], "read start")?;
    let read_end = parse_u64(fields[2], "read end")?;
    let quality = fields[4].parse::<f64>().map_err(|_| format!("non-numeric mapping quality: '{}'", fields[4]))?;
    let strand = fields[5].parse::<Strand>()?;

    let block_sizes = fields[10]
        .split(',')
        .filter(|block| !block.is_empty())
        .map(|block| parse_u64(block, "block size"))
        .collect::<Result<Vec<u64>, String>>()?;

    let codon_begin = parse_u64(fields[13], "codon begin")?;
    let codon_end = parse_u64(fields[14], "codon end")?;
    let codon_strand = fields[17].parse::<Strand>()?;

    let res = GenomicRecord {
        chrom: fields[0].to_string(),
        read_start,
        read_end,
        read_id: fields[3].to_string(),
        quality,
        strand,
        block_sizes,
        codon_chrom: fields[12].to_string(),
        codon_begin,
        codon_end,
        codon_type: fields[15].to_string(),
        gene_id: fields[16].to_string(),
        codon_strand,
    };
    Ok(res)
}
