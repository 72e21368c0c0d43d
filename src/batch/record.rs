use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::FileError;
use crate::date_extract::{DateError, format_date};

/// Written in place of an output path or a date that could not be produced, so that line `i` of
/// every output file still belongs to input line `i`.
pub const MISSING: &str = "NA";

/// Outcome of one input file: where its ENVI cube went and which date its name carries.
#[derive(Debug)]
pub struct ConvertedFileRecord {
    pub input: PathBuf,
    pub output: Result<PathBuf, FileError>,
    pub date: Result<NaiveDate, DateError>,
}

impl ConvertedFileRecord {
    pub fn is_success(&self) -> bool {
        self.output.is_ok() && self.date.is_ok()
    }

    pub fn output_line(&self) -> String {
        match &self.output {
            Ok(path) => path.display().to_string(),
            Err(_) => MISSING.to_string(),
        }
    }

    pub fn time_line(&self, time_format: &str) -> Result<String, fmt::Error> {
        match &self.date {
            Ok(date) => format_date(date, time_format),
            Err(_) => Ok(MISSING.to_string()),
        }
    }

    pub fn failure_reasons(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        if let Err(e) = &self.output {
            reasons.push(format!("conversion failed: {}", e));
        }
        if let Err(e) = &self.date {
            reasons.push(format!("date extraction failed: {}", e));
        }
        reasons
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub records: Vec<ConvertedFileRecord>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ConvertedFileRecord> {
        self.records.iter().filter(|r| !r.is_success())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn converted_count(&self) -> usize {
        self.records.iter().filter(|r| r.output.is_ok()).count()
    }

    pub fn output_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.records.iter().map(ConvertedFileRecord::output_line)
    }

    pub fn time_lines(&self, time_format: &str) -> Result<Vec<String>, fmt::Error> {
        self.records
            .iter()
            .map(|r| r.time_line(time_format))
            .collect()
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            total: self.len(),
            converted: self.converted_count(),
            failed: self.failures().count(),
            records: self.records.iter().map(RecordSummary::from).collect(),
        }
    }
}

/// Serializable view of a [`BatchReport`], written by `--report`.
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub converted: usize,
    pub failed: usize,
    pub records: Vec<RecordSummary>,
}

#[derive(Debug, Serialize)]
pub struct RecordSummary {
    pub input: String,
    pub output: Option<String>,
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl From<&ConvertedFileRecord> for RecordSummary {
    fn from(record: &ConvertedFileRecord) -> Self {
        RecordSummary {
            input: display(&record.input),
            output: record.output.as_ref().ok().map(|p| display(p)),
            date: record.date.as_ref().ok().copied(),
            errors: record.failure_reasons(),
        }
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
