//! Plain-text problem and tour formats.
//!
//! Matrix files start with the dimension `n` on its own line, followed by
//! `n` lines of `n` whitespace-separated non-negative weights:
//!
//! ```text
//! 4
//! 0 10 15 20
//! 10 0 35 25
//! 15 35 0 30
//! 20 25 30 0
//! ```
//!
//! Tour files start with the number of entries, followed by one city index
//! per line. Blank lines are ignored in both formats.

use crate::error::{Result, TspError};
use crate::matrix::DistanceMatrix;
use std::fmt::Write as _;
use std::str::FromStr;

/// Non-blank lines with their 1-based line numbers.
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// Upper bound on the whitespace-separated tokens in `text`.
fn max_tokens(text: &str) -> usize {
    text.len() / 2 + 1
}

fn parse_token<T: FromStr>(token: &str, line: usize, what: &str) -> Result<T> {
    token.parse().map_err(|_| TspError::Parse {
        line,
        message: format!("invalid {what} `{token}`"),
    })
}

/// Parses a matrix in the plain-text format described in the module docs.
///
/// # Errors
/// [`TspError::Parse`] on a missing, malformed or oversized header, a row of the wrong
/// width, a bad weight, or a row count different from the header.
/// [`TspError::EmptyMatrix`] when the header declares zero cities.
///
/// # Examples
///
/// ```
/// use u_tsp::io::parse_matrix;
///
/// let m = parse_matrix("2\n0 7\n3 0\n").unwrap();
/// assert_eq!(m.get(0, 1), 7);
/// assert_eq!(m.get(1, 0), 3);
/// ```
pub fn parse_matrix(text: &str) -> Result<DistanceMatrix> {
    let mut lines = content_lines(text);
    let (header_line, header) = lines.next().ok_or_else(|| TspError::Parse {
        line: 1,
        message: "missing dimension header".into(),
    })?;
    let dimension: usize = parse_token(header, header_line, "dimension")?;
    if dimension == 0 {
        return Err(TspError::EmptyMatrix);
    }

    let cell_count = dimension.checked_mul(dimension).ok_or_else(|| TspError::Parse {
        line: header_line,
        message: format!("dimension {dimension} is too large"),
    })?;

    // The header is untrusted: never reserve more than the text can hold.
    let mut cells = Vec::with_capacity(cell_count.min(max_tokens(text)));
    let mut rows = 0;
    let mut last_line = header_line;
    for (line, content) in lines {
        last_line = line;
        if rows == dimension {
            return Err(TspError::Parse {
                line,
                message: format!("more than {dimension} rows"),
            });
        }
        let before = cells.len();
        for token in content.split_whitespace() {
            cells.push(parse_token::<u32>(token, line, "weight")?);
        }
        let width = cells.len() - before;
        if width != dimension {
            return Err(TspError::Parse {
                line,
                message: format!("expected {dimension} weights, got {width}"),
            });
        }
        rows += 1;
    }

    if rows != dimension {
        return Err(TspError::Parse {
            line: last_line,
            message: format!("expected {dimension} rows, got {rows}"),
        });
    }
    DistanceMatrix::new(dimension, dimension, cells)
}

/// Parses a tour: an entry count followed by one city index per line.
///
/// # Errors
/// [`TspError::Parse`] on a malformed line or when the number of entries
/// differs from the declared count.
pub fn parse_tour(text: &str) -> Result<Vec<usize>> {
    let mut lines = content_lines(text);
    let (header_line, header) = lines.next().ok_or_else(|| TspError::Parse {
        line: 1,
        message: "missing tour length".into(),
    })?;
    let count: usize = parse_token(header, header_line, "tour length")?;

    let mut path = Vec::with_capacity(count.min(max_tokens(text)));
    let mut last_line = header_line;
    for (line, content) in lines {
        last_line = line;
        path.push(parse_token(content, line, "city index")?);
    }

    if path.len() != count {
        return Err(TspError::Parse {
            line: last_line,
            message: format!("expected {count} cities, got {}", path.len()),
        });
    }
    Ok(path)
}

/// Formats a tour in the format read by [`parse_tour`].
pub fn format_tour(path: &[usize]) -> String {
    let mut out = String::with_capacity(4 * (path.len() + 1));
    let _ = writeln!(out, "{}", path.len());
    for city in path {
        let _ = writeln!(out, "{city}");
    }
    out
}
