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

//! Accumulates per-codon-site observations and reduces them into
//! read-length × distance coverage matrices.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;

use indexmap::IndexMap;

use crate::CodonClass;
use crate::Strand;

/// One annotated codon instance: (chromosome, position, strand).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SiteKey {
    pub chrom: String,
    pub pos: u64,
    pub strand: Strand,
}

/// One read observed near a codon site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Observation {
    pub codon_pos: u64,
    pub read_pos: u64,
    pub distance: i64,
    pub read_len: u64,
}

/// Accumulated start and stop codon observations for one parse run.
///
/// Owned exclusively by a single parsing pass; mutated only through
/// [record](StartStopData::record). The distance sets grow class-wide so that
/// [reduce](StartStopData::reduce) can derive a stable column universe that
/// does not depend on the site-count filter.
#[derive(Debug, Default)]
pub struct StartStopData {
    start_sites: IndexMap<SiteKey, Vec<Observation>>,
    stop_sites: IndexMap<SiteKey, Vec<Observation>>,
    start_distances: BTreeSet<i64>,
    stop_distances: BTreeSet<i64>,
}

impl StartStopData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observation for a codon site
    ///
    /// `codon_pos` and `read_pos` are the position pair routed by the filter:
    /// codon begin with read start on the 5' branches, codon end with read
    /// end on the 3' branches. The signed distance is always
    /// `codon_pos - read_pos`.
    ///
    pub fn record(
        &mut self,
        class: CodonClass,
        chrom: &str,
        codon_pos: u64,
        strand: Strand,
        read_pos: u64,
        read_len: u64,
    ) {
        let distance = codon_pos as i64 - read_pos as i64;
        let key = SiteKey { chrom: chrom.to_string(), pos: codon_pos, strand };
        let obs = Observation { codon_pos, read_pos, distance, read_len };

        let (sites, distances) = match class {
            CodonClass::Start => (&mut self.start_sites, &mut self.start_distances),
            CodonClass::Stop => (&mut self.stop_sites, &mut self.stop_distances),
        };
        sites.entry(key).or_default().push(obs);
        distances.insert(distance);
    }

    /// Number of distinct codon sites recorded for a class.
    pub fn n_sites(&self, class: CodonClass) -> usize {
        match class {
            CodonClass::Start => self.start_sites.len(),
            CodonClass::Stop => self.stop_sites.len(),
        }
    }

    /// Reduce one class into a [CoverageMatrix]
    ///
    /// Sites with fewer than `min_site_count` observations are excluded. Rows
    /// are the sorted distinct read lengths among the remaining observations.
    /// Columns are the sorted class-wide distance set, independent of the
    /// site-count filter, so the matrix shape is stable across different
    /// `min_site_count` settings.
    ///
    pub fn reduce(
        &self,
        class: CodonClass,
        min_site_count: usize,
    ) -> CoverageMatrix {
        let (sites, distances) = match class {
            CodonClass::Start => (&self.start_sites, &self.start_distances),
            CodonClass::Stop => (&self.stop_sites, &self.stop_distances),
        };

        let mut by_len: BTreeMap<u64, Vec<i64>> = BTreeMap::new();
        for observations in sites.values() {
            if observations.len() >= min_site_count {
                for obs in observations {
                    by_len.entry(obs.read_len).or_default().push(obs.distance);
                }
            }
        }

        let columns: Vec<i64> = distances.iter().copied().collect();
        let col_index: HashMap<i64, usize> = columns.iter().enumerate().map(|(idx, dist)| (*dist, idx)).collect();

        let mut read_lengths: Vec<u64> = Vec::with_capacity(by_len.len());
        let mut counts: Vec<Vec<u64>> = Vec::with_capacity(by_len.len());
        for (read_len, row_distances) in by_len {
            let mut row: Vec<u64> = vec![0; columns.len()];
            for dist in row_distances {
                row[col_index[&dist]] += 1;
            }
            read_lengths.push(read_len);
            counts.push(row);
        }

        CoverageMatrix { read_lengths, distances: columns, counts }
    }
}

/// Read-length × signed-distance coverage counts for one codon class.
///
/// Rows are sorted ascending by read length, columns ascending by distance.
/// Immutable after construction by [StartStopData::reduce].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoverageMatrix {
    pub read_lengths: Vec<u64>,
    pub distances: Vec<i64>,
    pub counts: Vec<Vec<u64>>,
}

impl CoverageMatrix {
    /// Count for a (read length, distance) pair, None if either is absent.
    pub fn get(&self, read_len: u64, distance: i64) -> Option<u64> {
        let row = self.read_lengths.iter().position(|len| *len == read_len)?;
        let col = self.distances.iter().position(|dist| *dist == distance)?;
        Some(self.counts[row][col])
    }

    pub fn n_rows(&self) -> usize {
        self.read_lengths.len()
    }

    pub fn n_cols(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_lengths.is_empty()
    }
}
