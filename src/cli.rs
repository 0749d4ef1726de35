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
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(version)]
#[command(about = "Read coverage around annotated start and stop codons from ribosome profiling data")]
pub struct Cli {
    // Input file from closestBed, .gz supported
    #[arg(short = 'f', long = "input", required = true, help = "Codon coverage file from closestBed (supports .gz)")]
    pub input: PathBuf,

    // Codon type tags used in the annotation BED file
    #[arg(long = "start", default_value = "start_codon", help = "Start codon name tag used in the BED file")]
    pub start_tag: String,

    #[arg(long = "stop", default_value = "stop_codon", help = "Stop codon name tag used in the BED file")]
    pub stop_tag: String,

    // Filtering thresholds
    #[arg(short = 'l', long = "min-length", default_value_t = 20, help = "Prune alignments with read length below this")]
    pub min_read_len: u64,

    #[arg(short = 'q', long = "min-quality", default_value_t = 10.0, help = "Prune alignments with mapping quality below this")]
    pub min_quality: f64,

    #[arg(short = 'c', long = "min-count", default_value_t = 0, help = "Prune codon sites with fewer reads mapped than this")]
    pub min_site_count: usize,

    // Base name for the output tables
    #[arg(short = 'n', long = "name", required = true, help = "Base name for the output files")]
    pub name: String,

    // Verbosity
    #[arg(long = "verbose", default_value_t = false)]
    pub verbose: bool,
}
