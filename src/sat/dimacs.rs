#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A reader and writer for the DIMACS CNF file format.
//!
//! The format is line based:
//! - Comment lines start with `c`.
//! - A problem line `p cnf <num_variables> <num_clauses>`. The counts are not
//!   trusted; the formula is built from the clauses actually present.
//! - Clauses are whitespace-separated signed integers, each clause terminated
//!   by `0`. A clause may span lines, and a lone `0` is the empty clause.
//! - A `%` line ends the data (seen in the SATLIB benchmark files).
//!
//! Variables are the absolute values of the integers, as `u32`.

use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use itertools::Itertools;
use std::io::{self, BufRead};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DimacsError {
    #[error("failed to read DIMACS input: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: failed to parse literal '{token}'")]
    InvalidLiteral { line: usize, token: String },
}

/// Parses DIMACS data from any buffered reader.
///
/// # Errors
///
/// `DimacsError::Io` if reading fails, `DimacsError::InvalidLiteral` if a
/// token in a clause line is not an integer.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Cnf<u32>, DimacsError> {
    let mut cnf = Cnf::default();
    let mut current = Clause::empty();
    let mut open = false;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let mut parts = line.split_whitespace().peekable();

        match parts.peek() {
            Some(&"%") => break,
            None => {}
            Some(first) if first.starts_with('c') || first.starts_with('p') => {}
            Some(_) => {
                for token in parts {
                    let value = token
                        .parse::<i32>()
                        .map_err(|_| DimacsError::InvalidLiteral {
                            line: index + 1,
                            token: token.to_string(),
                        })?;

                    if value == 0 {
                        cnf.push(std::mem::take(&mut current));
                        open = false;
                    } else {
                        current.push(Literal::from(value));
                        open = true;
                    }
                }
            }
        }
    }

    if open {
        cnf.push(current);
    }

    Ok(cnf)
}

/// Parses a DIMACS CNF file.
///
/// # Errors
///
/// See [`parse_dimacs`]; also fails if the file cannot be opened.
pub fn parse_file(file_path: impl AsRef<Path>) -> Result<Cnf<u32>, DimacsError> {
    let file = std::fs::File::open(file_path)?;
    parse_dimacs(io::BufReader::new(file))
}

/// Parses formula text as typed on the command line, with the DIMACS grammar.
///
/// # Errors
///
/// `DimacsError::InvalidLiteral` for a token that is not an integer.
pub fn parse_textual_cnf(input: &str) -> Result<Cnf<u32>, DimacsError> {
    parse_dimacs(io::Cursor::new(input))
}

/// Renders a formula as DIMACS, header included.
#[must_use]
pub fn to_dimacs(cnf: &Cnf<u32>) -> String {
    let num_vars = cnf
        .iter()
        .flat_map(|c| c.iter().map(|l| *l.variable()))
        .max()
        .unwrap_or(0);

    let clauses: String = cnf
        .iter()
        .map(|clause| {
            let line = clause
                .iter()
                .map(ToString::to_string)
                .chain(["0".to_string()])
                .join(" ");
            format!("{line}\n")
        })
        .collect();

    format!("p cnf {num_vars} {}\n{clauses}", cnf.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_simple_dimacs() {
        let dimacs_content = "c This is a comment\n\
                              p cnf 3 2\n\
                              1 -2 0\n\
                              2 3 0\n";
        let cnf = parse_dimacs(Cursor::new(dimacs_content)).expect("valid DIMACS");

        assert_eq!(cnf, Cnf::<u32>::from(vec![vec![1, -2], vec![2, 3]]));
        assert_eq!(cnf.variables(), vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_dimacs_with_empty_lines_and_end_marker() {
        let dimacs_content = "p cnf 2 2\n\
                              \n\
                              1 0\n\
                              \n\
                              -2 0\n\
                              %\n\
                              3 0\n";
        let cnf = parse_dimacs(Cursor::new(dimacs_content)).expect("valid DIMACS");
        assert_eq!(cnf, Cnf::<u32>::from(vec![vec![1], vec![-2]]));
    }

    #[test]
    fn test_parse_dimacs_empty_clause() {
        let cnf = parse_dimacs(Cursor::new("p cnf 1 2\n1 0\n0\n")).expect("valid DIMACS");
        assert_eq!(cnf.len(), 2);
        assert!(cnf.has_empty_clause());
    }

    #[test]
    fn test_parse_dimacs_clause_spanning_lines() {
        let cnf = parse_dimacs(Cursor::new("1 2\n-3 0 4\n")).expect("valid DIMACS");
        assert_eq!(cnf, Cnf::<u32>::from(vec![vec![1, 2, -3], vec![4]]));
    }

    #[test]
    fn test_parse_dimacs_malformed_literal() {
        let err = parse_dimacs(Cursor::new("1 0\n1 abc 0\n")).expect_err("malformed");
        assert!(matches!(
            err,
            DimacsError::InvalidLiteral { line: 2, ref token } if token == "abc"
        ));
    }

    #[test]
    fn test_parse_dimacs_no_clauses() {
        let cnf = parse_dimacs(Cursor::new("p cnf 0 0\n")).expect("valid DIMACS");
        assert!(cnf.is_empty());
    }

    #[test]
    fn test_parse_textual_cnf() {
        let cnf = parse_textual_cnf("1 -2 0\n3 4 0").expect("valid text");
        assert_eq!(cnf, Cnf::<u32>::from(vec![vec![1, -2], vec![3, 4]]));
    }

    #[test]
    fn test_to_dimacs() {
        let cnf = Cnf::<u32>::from(vec![vec![1, -3], vec![2]]);
        assert_eq!(to_dimacs(&cnf), "p cnf 3 2\n1 -3 0\n2 0\n");
        assert_eq!(
            parse_dimacs(Cursor::new(to_dimacs(&cnf))).expect("own output"),
            cnf
        );
    }

    #[test]
    fn test_to_dimacs_edge_cases() {
        assert_eq!(to_dimacs(&Cnf::default()), "p cnf 0 0\n");

        let with_empty = Cnf::<u32>::from(vec![vec![2], vec![]]);
        assert_eq!(to_dimacs(&with_empty), "p cnf 2 2\n2 0\n0\n");
        assert_eq!(
            parse_dimacs(Cursor::new(to_dimacs(&with_empty))).expect("own output"),
            with_empty
        );
    }

    #[test]
    fn test_parse_file_missing() {
        assert!(matches!(
            parse_file("does/not/exist.cnf"),
            Err(DimacsError::Io(_))
        ));
    }
}
