//! Line source loading.
//!
//! Streams `<timestamp> <count>` lines from a file, stdin or any
//! [`BufRead`] into a [`TrafficAggregator`]. The first bad line aborts the
//! whole run.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use traffic_core::error::{Result, TrafficError};
use traffic_core::parser::parse_line;

use crate::aggregator::TrafficAggregator;

/// Display name used for stdin in errors and logs.
pub const STDIN_NAME: &str = "<stdin>";

/// Line counts gathered while streaming one source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Every line read, blank ones included.
    pub lines_read: usize,
    /// Lines turned into readings.
    pub readings: usize,
    /// Whitespace-only lines that were skipped.
    pub blank_lines: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Open `path` and ingest every line into `aggregator`.
///
/// Fails with [`TrafficError::SourceUnavailable`] before touching the
/// aggregator when the file cannot be opened.
pub fn ingest_path(path: &Path, aggregator: &mut TrafficAggregator) -> Result<IngestSummary> {
    let file = std::fs::File::open(path).map_err(|source| TrafficError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Reading traffic data from {}", path.display());

    ingest_reader(std::io::BufReader::new(file), path, aggregator)
}

/// Ingest every line from standard input.
pub fn ingest_stdin(aggregator: &mut TrafficAggregator) -> Result<IngestSummary> {
    let stdin = std::io::stdin();
    ingest_reader(stdin.lock(), Path::new(STDIN_NAME), aggregator)
}

/// Ingest every line from `reader`. `source` only labels errors and logs.
///
/// Blank lines are skipped. Any other line that fails to parse stops
/// ingestion with a [`TrafficError::Parse`] carrying its 1-based line
/// number.
pub fn ingest_reader<R: BufRead>(
    reader: R,
    source: &Path,
    aggregator: &mut TrafficAggregator,
) -> Result<IngestSummary> {
    let mut summary = IngestSummary::default();

    for (index, line_result) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line_result.map_err(|source_err| TrafficError::SourceRead {
            path: PathBuf::from(source),
            line: line_number,
            source: source_err,
        })?;
        summary.lines_read += 1;

        if line.trim().is_empty() {
            summary.blank_lines += 1;
            continue;
        }

        let reading = parse_line(&line).map_err(|e| e.at_line(line_number))?;
        aggregator.ingest(reading)?;
        summary.readings += 1;
    }

    info!(
        "{}: {} lines read, {} readings, {} blank",
        source.display(),
        summary.lines_read,
        summary.readings,
        summary.blank_lines,
    );

    Ok(summary)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;
    use traffic_core::error::ParseErrorKind;
    use traffic_core::models::DuplicatePolicy;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn write_lines(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn ingest_str(text: &str, aggregator: &mut TrafficAggregator) -> Result<IngestSummary> {
        ingest_reader(Cursor::new(text.as_bytes()), Path::new("memory"), aggregator)
    }

    // ── ingest_path ───────────────────────────────────────────────────────────

    #[test]
    fn test_ingest_path_basic() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(
            dir.path(),
            "traffic.txt",
            &[
                "2021-12-01T05:00:00 5",
                "2021-12-01T05:30:00 12",
                "2021-12-01T06:00:00 14",
            ],
        );

        let mut agg = TrafficAggregator::new();
        let summary = ingest_path(&path, &mut agg).unwrap();

        assert_eq!(summary.readings, 3);
        assert_eq!(agg.total_cars(), 31);
        assert_eq!(agg.least_busy_window().unwrap().total, 31);
    }

    #[test]
    fn test_ingest_path_missing_file() {
        let mut agg = TrafficAggregator::new();
        let err = ingest_path(Path::new("/tmp/does-not-exist-traffic-xyz.txt"), &mut agg)
            .unwrap_err();

        match err {
            TrafficError::SourceUnavailable { path, .. } => {
                assert_eq!(path, PathBuf::from("/tmp/does-not-exist-traffic-xyz.txt"));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(agg.readings_ingested(), 0);
    }

    #[test]
    fn test_ingest_path_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(dir.path(), "empty.txt", &[]);

        let mut agg = TrafficAggregator::new();
        let summary = ingest_path(&path, &mut agg).unwrap();

        assert_eq!(summary, IngestSummary::default());
        assert_eq!(agg.total_cars(), 0);
    }

    // ── ingest_reader ─────────────────────────────────────────────────────────

    #[test]
    fn test_ingest_reader_skips_blank_lines() {
        let mut agg = TrafficAggregator::new();
        let summary = ingest_str(
            "2021-12-01T05:00:00 5\n\n   \n2021-12-01T05:30:00 7\n",
            &mut agg,
        )
        .unwrap();

        assert_eq!(summary.lines_read, 4);
        assert_eq!(summary.blank_lines, 2);
        assert_eq!(summary.readings, 2);
        assert_eq!(agg.total_cars(), 12);
    }

    #[test]
    fn test_ingest_reader_windows_line_endings() {
        let mut agg = TrafficAggregator::new();
        ingest_str("2021-12-01T05:00:00 5\r\n2021-12-01T05:30:00 7\r\n", &mut agg).unwrap();
        assert_eq!(agg.total_cars(), 12);
    }

    #[test]
    fn test_ingest_reader_reports_line_number() {
        let mut agg = TrafficAggregator::new();
        let err = ingest_str(
            "2021-12-01T05:00:00 5\n2021-12-01T05:30:00 lots\n2021-12-01T06:00:00 1\n",
            &mut agg,
        )
        .unwrap_err();

        match err {
            TrafficError::Parse {
                line,
                content,
                reason,
            } => {
                assert_eq!(line, 2);
                assert_eq!(content, "2021-12-01T05:30:00 lots");
                assert_eq!(reason, ParseErrorKind::InvalidCount("lots".to_string()));
            }
            other => panic!("unexpected: {other:?}"),
        }
        // Fail-fast: nothing after the bad line is ingested.
        assert_eq!(agg.readings_ingested(), 1);
    }

    #[test]
    fn test_ingest_reader_rejects_duplicates_when_asked() {
        let mut agg = TrafficAggregator::with_policy(DuplicatePolicy::Reject);
        let err = ingest_str(
            "2021-12-01T05:00:00 5\n2021-12-01T05:00:00 6\n",
            &mut agg,
        )
        .unwrap_err();

        assert!(matches!(err, TrafficError::DuplicateTimestamp { .. }));
    }

    #[test]
    fn test_ingest_reader_stops_on_count_overflow() {
        let mut agg = TrafficAggregator::new();
        let err = ingest_str(
            "2021-12-01T05:00:00 18446744073709551615\n2021-12-01T05:30:00 1\n2021-12-01T06:00:00 2\n",
            &mut agg,
        )
        .unwrap_err();

        assert!(matches!(err, TrafficError::CountOverflow { .. }));
        assert_eq!(agg.total_cars(), u64::MAX);
        assert_eq!(agg.readings_ingested(), 1);
    }

    #[test]
    fn test_ingest_reader_invalid_utf8() {
        let mut agg = TrafficAggregator::new();
        let bytes: &[u8] = b"2021-12-01T05:00:00 5\n\xff\xfe 1\n";
        let err = ingest_reader(Cursor::new(bytes), Path::new("memory"), &mut agg).unwrap_err();

        match err {
            TrafficError::SourceRead { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
