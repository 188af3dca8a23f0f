//! Export statistics

use std::path::PathBuf;

/// What an export wrote to disk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteStats {
    /// Files written, in write order
    pub files: Vec<PathBuf>,
    /// Sheets in the exported workbook
    pub sheets_written: usize,
    /// Rows across all files, header rows included
    pub rows_written: usize,
    /// Total bytes written
    pub bytes_written: usize,
}

impl WriteStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one written file
    pub fn record(&mut self, path: PathBuf, rows: usize, bytes: usize) {
        self.files.push(path);
        self.rows_written += rows;
        self.bytes_written += bytes;
    }

    /// Format bytes in human-readable form
    pub fn format_bytes(bytes: usize) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} files, {} rows, {}",
            self.files.len(),
            self.rows_written,
            Self::format_bytes(self.bytes_written)
        )
    }
}
