//! User input utilities for interactive CLI prompts
//!
//! When no spreadsheet is named on the command line, the files in the current
//! directory are listed and the user picks one from a numbered menu.

use crate::constants::SUPPORTED_EXTENSIONS;
use crate::{Error, Result};
use anyhow::Context;
use colored::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// List the spreadsheets (CSV/TXT, XLSX/XLS/ODS) directly inside `dir`, sorted by name
pub fn discover_spreadsheets(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
    {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();
        if path.is_file() && is_spreadsheet(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Display a numbered menu of spreadsheets and read the user's choice
///
/// Empty input selects the first file.
pub fn prompt_file_selection(files: &[PathBuf]) -> Result<PathBuf> {
    if files.is_empty() {
        return Err(Error::configuration(
            "No spreadsheets available for selection",
        ));
    }

    println!("\n{}", "Available spreadsheets:".bold());
    for (i, file) in files.iter().enumerate() {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file.display().to_string());
        println!("  {}. {}", (i + 1).to_string().cyan(), name);
    }
    println!();

    print!("Select a spreadsheet [1]: ");
    io::stdout()
        .flush()
        .map_err(|e| Error::io("Failed to flush stdout", e))?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| Error::io("Failed to read user input", e))?;

    parse_selection(input.trim(), files)
}

/// Resolve a typed menu answer into one of `files`
pub fn parse_selection(input: &str, files: &[PathBuf]) -> Result<PathBuf> {
    if input.is_empty() {
        return files
            .first()
            .cloned()
            .ok_or_else(|| Error::configuration("No spreadsheets available for selection"));
    }

    match input.parse::<usize>() {
        Ok(choice) if choice >= 1 && choice <= files.len() => Ok(files[choice - 1].clone()),
        Ok(choice) => Err(Error::data_validation(format!(
            "Invalid selection '{}'. Please choose 1-{}",
            choice,
            files.len()
        ))),
        Err(_) => Err(Error::data_validation(format!(
            "Invalid input '{}'. Please enter a number",
            input
        ))),
    }
}

/// Use `file` when given, otherwise list the current directory and prompt
pub fn resolve_input_file(file: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = file {
        return Ok(path.to_path_buf());
    }

    let files = std::env::current_dir()
        .context("Could not determine current directory")
        .and_then(|dir| discover_spreadsheets(&dir))
        .map_err(|e| Error::configuration(format!("{:#}", e)))?;

    if files.is_empty() {
        return Err(Error::configuration(
            "No FILE given and no spreadsheets (.csv, .txt, .xlsx, .xls, .ods) found in the current directory",
        ));
    }

    prompt_file_selection(&files)
}
