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
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use log::warn;

use ribodist::AnalysisParams;
use ribodist::CodonClass;
use ribodist::aggregate::CoverageMatrix;

mod cli;

/// Initializes the logger with verbosity given in `log_max_level`.
fn init_log(log_max_level: usize) {
    stderrlog::new()
    .module(module_path!())
    .quiet(false)
    .verbosity(log_max_level)
    .timestamp(stderrlog::Timestamp::Off)
    .init()
    .unwrap();
}

/// Warns if an existing file is about to be rewritten.
fn check_file(path: &Path) -> &Path {
    if path.exists() {
        warn!("Rewriting existing file: {}", path.display());
    }
    path
}

fn write_matrix(matrix: &CoverageMatrix, path: &Path) {
    let f = File::create(check_file(path)).unwrap_or_else(|err| {
        log::error!("{}: {}", path.display(), err);
        std::process::exit(1)
    });
    let mut conn_out = BufWriter::new(f);
    ribodist::printer::write_tsv(matrix, &mut conn_out).unwrap_or_else(|err| {
        log::error!("{}: {}", path.display(), err);
        std::process::exit(1)
    });
}

fn main() {
    let cli = cli::Cli::parse();

    init_log(if cli.verbose { 3 } else { 2 });

    let params = AnalysisParams {
        start_tag: cli.start_tag,
        stop_tag: cli.stop_tag,
        min_quality: cli.min_quality,
        min_read_len: cli.min_read_len,
        min_site_count: cli.min_site_count,
    };

    let basename: String = cli.name.split_whitespace().collect::<Vec<&str>>().join("_");

    info!("Parsing file: {}", cli.input.display());
    info!("Start codon tag: {}", params.start_tag);
    info!("Stop codon tag: {}", params.stop_tag);
    info!("Minimum read length: {}", params.min_read_len);
    info!("Minimum quality: {}", params.min_quality);
    info!("Minimum site count: {}", params.min_site_count);
    info!("Basename: {}", basename);

    let data = ribodist::aggregate_from_path(&params, &cli.input).unwrap_or_else(|err| {
        log::error!("{}", err);
        std::process::exit(1)
    });

    let start_matrix = data.reduce(CodonClass::Start, params.min_site_count);
    let stop_matrix = data.reduce(CodonClass::Stop, params.min_site_count);

    let start_path = PathBuf::from(basename.clone() + "_start_codon.tsv");
    let stop_path = PathBuf::from(basename + "_stop_codon.tsv");

    write_matrix(&start_matrix, &start_path);
    write_matrix(&stop_matrix, &stop_path);

    info!("Start codon analysis file: {}", start_path.display());
    info!("Stop codon analysis file: {}", stop_path.display());
}
