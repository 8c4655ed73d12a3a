//! Reader for the comma-separated vector dump.
//!
//! Each line is `label,v0,v1,...,v(D-1)`. The label is written as a real
//! number and truncated to an integer; point ids are the zero-based row index.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::point::Point;

/// Reads up to `limit` points of `dimension` coordinates from the file at `path`.
pub fn load_points<P: AsRef<Path>>(path: P, dimension: usize, limit: Option<usize>) -> Result<Vec<Point>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let points = parse_points(BufReader::new(file), dimension, limit)?;
    info!(path = %path.display(), points = points.len(), dimension, "points loaded");
    Ok(points)
}

/// Parses points from `reader`.
///
/// With `Some(limit)` exactly `limit` rows must be present; lines past the
/// limit are not read. With `None` every line is parsed.
pub fn parse_points<R: BufRead>(reader: R, dimension: usize, limit: Option<usize>) -> Result<Vec<Point>> {
    let mut points = Vec::with_capacity(limit.unwrap_or(0).min(1 << 16));
    let mut lines = reader.lines();

    loop {
        if limit.is_some_and(|l| points.len() >= l) {
            break;
        }
        let line_no = points.len() + 1;
        let line = match lines.next() {
            Some(line) => line?,
            None => match limit {
                Some(_) => return Err(Error::parse(line_no, "file ended prematurely")),
                None => break,
            },
        };
        points.push(parse_line(&line, points.len(), line_no, dimension)?);
    }

    Ok(points)
}

fn parse_line(line: &str, id: usize, line_no: usize, dimension: usize) -> Result<Point> {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return Err(Error::parse(line_no, "malformed or empty line"));
    }

    let mut tokens = line.split(',');
    // split always yields at least one item
    let label_token = tokens.next().unwrap_or_default();
    let label = parse_number(label_token, line_no)? as i32;

    let mut vec = Vec::with_capacity(dimension);
    for token in tokens.by_ref().take(dimension) {
        vec.push(parse_number(token, line_no)?);
    }
    if vec.len() < dimension {
        return Err(Error::parse(
            line_no,
            format!("incomplete vector: expected {} coordinates, found {}", dimension, vec.len()),
        ));
    }
    if tokens.next().is_some() {
        return Err(Error::parse(
            line_no,
            format!("too many coordinates: expected {}", dimension),
        ));
    }

    Ok(Point::new(id, label, vec))
}

fn parse_number(token: &str, line_no: usize) -> Result<f64> {
    let token = token.trim();
    let value: f64 = token
        .parse()
        .map_err(|_| Error::parse(line_no, format!("invalid number {:?}", token)))?;
    if !value.is_finite() {
        return Err(Error::parse(line_no, format!("non-finite number {:?}", token)));
    }
    Ok(value)
}
