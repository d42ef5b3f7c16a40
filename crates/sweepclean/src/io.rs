//! CSV exchange of points and removal flags.
//!
//! The format is plain text with the header line `x,y,z,flag` and one row per
//! point. `flag` is `1` for points flagged for removal and `0` otherwise;
//! highlights are transient and are written as `0`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use glam::DVec3;
use sweepclean_core::{Dataset, Mark, PointCloudDataset, Result, SweepcleanError};

/// The exact header line of a marks file.
pub const CSV_HEADER: [&str; 4] = ["x", "y", "z", "flag"];

/// Writes every point of `dataset` with its removal flag.
pub fn write_marks<D: Dataset, W: Write>(dataset: &D, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for index in 0..dataset.point_count() {
        let p = dataset.raw_point_position(index);
        let flag = dataset.point_mark(index).flag_value();
        csv.write_record([
            p.x.to_string(),
            p.y.to_string(),
            p.z.to_string(),
            flag.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes `dataset` to a CSV file at `path`.
pub fn write_marks_csv<D: Dataset>(dataset: &D, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_marks(dataset, BufWriter::new(file))?;
    log::info!(
        "wrote {} point(s) of '{}' to {}",
        dataset.point_count(),
        dataset.name(),
        path.as_ref().display()
    );
    Ok(())
}

/// Reads points and flags into a new dataset named `name`.
///
/// Flagged rows come back as [`Mark::Flagged`], all others unmarked.
pub fn read_points<R: Read>(name: &str, reader: R) -> Result<PointCloudDataset> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = csv.headers()?.clone();
    if header.iter().ne(CSV_HEADER.iter().copied()) {
        return Err(SweepcleanError::CsvHeader {
            expected: CSV_HEADER.join(","),
            found: header.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut points = Vec::new();
    let mut flags = Vec::new();
    for (i, record) in csv.records().enumerate() {
        let record = record?;
        // Row numbers count the header as row 1.
        let row = i + 2;
        let field = |idx: usize| -> Result<f64> {
            let text = record.get(idx).unwrap_or_default();
            text.parse::<f64>().map_err(|e| SweepcleanError::CsvRow {
                row,
                reason: format!("column {}: '{text}': {e}", CSV_HEADER[idx]),
            })
        };
        points.push(DVec3::new(field(0)?, field(1)?, field(2)?));
        flags.push(match record.get(3).unwrap_or_default() {
            "0" => false,
            "1" => true,
            other => {
                return Err(SweepcleanError::CsvRow {
                    row,
                    reason: format!("flag must be 0 or 1, got '{other}'"),
                })
            }
        });
    }

    let mut dataset = PointCloudDataset::new(name, points);
    for (index, _) in flags.iter().enumerate().filter(|(_, f)| **f) {
        dataset.set_point_mark(index, Mark::Flagged);
    }
    Ok(dataset)
}

/// Reads a CSV file at `path` into a new dataset named `name`.
pub fn read_points_csv(name: &str, path: impl AsRef<Path>) -> Result<PointCloudDataset> {
    let file = File::open(path.as_ref())?;
    let dataset = read_points(name, BufReader::new(file))?;
    log::info!(
        "read {} point(s) into '{}' from {}",
        dataset.point_count(),
        name,
        path.as_ref().display()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_format() {
        let mut dataset =
            PointCloudDataset::new("d", vec![DVec3::new(1.5, -2.0, 3.25), DVec3::ZERO]);
        dataset.set_point_mark(0, Mark::Flagged);
        dataset.set_point_mark(1, Mark::Highlighted(0.5));
        let mut out = Vec::new();
        write_marks(&dataset, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "x,y,z,flag\n1.5,-2,3.25,1\n0,0,0,0\n");
    }

    #[test]
    fn test_read_back() {
        let text = "x,y,z,flag\n500000.125,4000000.5,-31.75,1\n1,2,3,0\n";
        let dataset = read_points("survey", text.as_bytes()).unwrap();
        assert_eq!(dataset.point_count(), 2);
        assert_eq!(
            dataset.raw_point_position(0),
            DVec3::new(500_000.125, 4_000_000.5, -31.75)
        );
        assert_eq!(dataset.point_mark(0), Mark::Flagged);
        assert_eq!(dataset.point_mark(1), Mark::Unmarked);
    }

    #[test]
    fn test_wrong_header() {
        let err = read_points("bad", "x,y,flag\n1,2,0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SweepcleanError::CsvHeader { .. }));
    }

    #[test]
    fn test_bad_flag() {
        let err = read_points("bad", "x,y,z,flag\n1,2,3,7\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SweepcleanError::CsvRow { row: 2, .. }));
    }

    #[test]
    fn test_bad_number() {
        let err = read_points("bad", "x,y,z,flag\n1,north,3,0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SweepcleanError::CsvRow { row: 2, .. }));
    }
}
