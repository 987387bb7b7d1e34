use std::path::Path;

use log::debug;

use crate::error::{ReportError, Result};
use crate::model::ReportSummary;
use crate::parser::parse_report;

/// Whether `path` exists on disk.
pub fn file_exists(path: &Path) -> bool {
    path.try_exists().unwrap_or(false)
}

/// Read a UTF-8 text file.
pub fn read_text_file(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// Locate, read and parse a report file. `display_name` is the path as the
/// user configured it and is what a missing-file error reports.
pub fn load_report(path: &Path, display_name: &str) -> Result<ReportSummary> {
    if !file_exists(path) {
        debug!("Failed to find report file at path {}", path.display());
        return Err(ReportError::ReportNotFound(display_name.to_string()));
    }
    let data = read_text_file(path)?;
    parse_report(&data)
}
