//! Report writer implementation

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::domain::model::AnalysisReport;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::output::{OutputFormat, CSV_HEADER};

/// Where a report goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

/// Renders an analysis report in one format
pub struct RecordWriter {
    format: OutputFormat,
}

impl RecordWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write one CSV row per record, in presentation order
    pub fn write_csv<W: Write>(report: &AnalysisReport, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", CSV_HEADER)?;
        for r in &report.records {
            writeln!(
                out,
                "{},{},{},{},{},{},{}",
                r.index,
                r.picture_type,
                r.error,
                r.counts.intra,
                r.counts.inter,
                r.counts.bidirectional,
                r.bits
            )?;
        }
        Ok(())
    }

    /// Write the whole report as pretty JSON
    pub fn write_json<W: Write>(report: &AnalysisReport, out: &mut W) -> AnalyzerResult<()> {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
        Ok(())
    }

    /// Render into any writer
    pub fn write<W: Write>(&self, report: &AnalysisReport, out: &mut W) -> AnalyzerResult<()> {
        match self.format {
            OutputFormat::Csv => Self::write_csv(report, out)?,
            OutputFormat::Json => Self::write_json(report, out)?,
        }
        Ok(())
    }

    /// Write to stdout or atomically replace a file
    pub fn write_to(&self, report: &AnalysisReport, target: &OutputTarget) -> AnalyzerResult<()> {
        match target {
            OutputTarget::Stdout => {
                let stdout = io::stdout();
                let mut out = BufWriter::new(stdout.lock());
                self.write(report, &mut out)?;
                out.flush()?;
                Ok(())
            }
            OutputTarget::File(path) => self.write_atomic(report, path),
        }
    }

    /// Write to a temporary file in the target directory, then rename over `path`
    fn write_atomic(&self, report: &AnalysisReport, path: &Path) -> AnalyzerResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| AnalyzerError::OutputError {
            message: format!("Failed to create temporary file in {}: {}", dir.display(), e),
        })?;

        {
            let mut out = BufWriter::new(temp.as_file_mut());
            self.write(report, &mut out)?;
            out.flush()?;
        }

        temp.persist(path).map_err(|e| AnalyzerError::OutputError {
            message: format!("Failed to persist {}: {}", path.display(), e.error),
        })?;

        info!(
            "Wrote {} records as {} to {}",
            report.records.len(),
            self.format,
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ModeCounts, PictureRecord, PictureType};

    fn report() -> AnalysisReport {
        let counts = ModeCounts {
            intra: 3,
            inter: 2,
            bidirectional: 1,
        };
        AnalysisReport {
            records: vec![
                PictureRecord::new(0, PictureType::I, 900, counts, 1102),
                PictureRecord::new(1, PictureType::B, 300, counts, 256),
                PictureRecord::new(2, PictureType::P, 500, counts, 135),
            ],
            frames_read: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_csv_rows_mask_counts_by_role() {
        let mut out = Vec::new();
        RecordWriter::write_csv(&report(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "0,I,900,3,0,0,1102");
        assert_eq!(lines[2], "1,B,300,3,2,1,256");
        assert_eq!(lines[3], "2,P,500,3,2,0,135");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_json_contains_records() {
        let mut out = Vec::new();
        RecordWriter::new(OutputFormat::Json)
            .write(&report(), &mut out)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["records"].as_array().unwrap().len(), 3);
        assert_eq!(value["frames_read"], 3);
    }

    #[test]
    fn test_atomic_file_write_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        std::fs::write(&path, "stale").unwrap();

        RecordWriter::new(OutputFormat::Csv)
            .write_to(&report(), &OutputTarget::File(path.clone()))
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(CSV_HEADER));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
