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

//! Printer for formatting a [CoverageMatrix] as a tab-separated table.
//!
//! The first line is a header with an empty leading cell followed by the
//! signed distances. Each following line holds one read length and its
//! counts per distance.

use std::io::Write;

use crate::aggregate::CoverageMatrix;

type E = Box<dyn std::error::Error>;

/// Format the header line: empty index cell, then the distance columns.
pub fn format_header_line(
    matrix: &CoverageMatrix,
) -> Vec<u8> {
    let separator: char = '\t';
    let mut formatted: String = String::new();

    for dist in &matrix.distances {
        formatted += &separator.to_string();
        formatted += &dist.to_string();
    }
    formatted += "\n";

    formatted.into_bytes()
}

/// Format one matrix row: the read length, then the counts per distance.
pub fn format_row(
    read_len: u64,
    counts: &[u64],
) -> Vec<u8> {
    let separator: char = '\t';
    let mut formatted: String = read_len.to_string();

    for count in counts {
        formatted += &separator.to_string();
        formatted += &count.to_string();
    }
    formatted += "\n";

    formatted.into_bytes()
}

/// Write a coverage matrix as a tab-separated table
///
/// Writes the header line and one line per read length to `conn`. An empty
/// matrix produces only the header line.
///
pub fn write_tsv<W: Write>(
    matrix: &CoverageMatrix,
    conn: &mut W,
) -> Result<(), E> {
    conn.write_all(&format_header_line(matrix))?;
    for (row, read_len) in matrix.read_lengths.iter().enumerate() {
        conn.write_all(&format_row(*read_len, &matrix.counts[row]))?;
    }
    conn.flush()?;
    Ok(())
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn format_header_line_lists_distances() {
        use crate::aggregate::CoverageMatrix;
        use super::format_header_line;

        let matrix = CoverageMatrix {
            read_lengths: vec![28],
            distances: vec![-3, 0, 12],
            counts: vec![vec![1, 0, 2]],
        };

        let got = format_header_line(&matrix);
        assert_eq!(got, b"\t-3\t0\t12\n".to_vec());
    }

    #[test]
    fn format_row_leads_with_read_length() {
        use super::format_row;

        let got = format_row(30, &[0, 5, 1]);
        assert_eq!(got, b"30\t0\t5\t1\n".to_vec());
    }

    #[test]
    fn write_tsv_whole_matrix() {
        use crate::aggregate::CoverageMatrix;
        use super::write_tsv;
        use std::io::Cursor;

        let matrix = CoverageMatrix {
            read_lengths: vec![28, 30],
            distances: vec![-5, 10],
            counts: vec![vec![1, 0], vec![0, 3]],
        };

        let mut output: Cursor<Vec<u8>> = Cursor::new(Vec::new());
        write_tsv(&matrix, &mut output).unwrap();

        let mut expected: Vec<u8> = Vec::new();
        expected.extend_from_slice(b"\t-5\t10\n");
        expected.extend_from_slice(b"28\t1\t0\n");
        expected.extend_from_slice(b"30\t0\t3\n");

        assert_eq!(output.get_ref(), &expected);
    }

    #[test]
    fn write_tsv_empty_matrix_is_header_only() {
        use crate::aggregate::CoverageMatrix;
        use super::write_tsv;
        use std::io::Cursor;

        let matrix = CoverageMatrix::default();

        let mut output: Cursor<Vec<u8>> = Cursor::new(Vec::new());
        write_tsv(&matrix, &mut output).unwrap();

        assert_eq!(output.get_ref(), &b"\n".to_vec());
    }
}
