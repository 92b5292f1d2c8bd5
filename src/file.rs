// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// File operations for dashboard documents.
///
/// This is the I/O shell around the conversion engine: it owns reading and
/// validating source bytes, and serializing the converted dashboard and
/// report. Input limits are enforced here so the engine only ever sees
/// parsed documents.
use std::{
    fs,
    path::{Component, Path}
};

use serde::Serialize;

use crate::{
    error::{Error, io_error},
    report::ConversionReport,
    source::SourceDashboard,
    target::TargetDashboard
};

/// Maximum accepted input size in bytes (50 MB).
pub const MAX_INPUT_BYTES: u64 = 50 * 1024 * 1024;
/// Maximum accepted JSON nesting depth.
pub const MAX_JSON_DEPTH: usize = 100;

/// Import payload wrapping a dashboard with its destination folder label.
#[derive(Debug, Serialize)]
pub struct ImportEnvelope<'a> {
    /// Converted dashboard document.
    pub dashboard:    &'a TargetDashboard,
    /// Folder label shown by the destination platform.
    #[serde(rename = "folderTitle")]
    pub folder_title: &'a str,
    /// Whether an existing dashboard with the same uid is replaced.
    pub overwrite:    bool
}

/// Loads and parses a source dashboard from disk.
///
/// # Errors
///
/// Returns [`Error`] when the file is missing, empty, larger than
/// [`MAX_INPUT_BYTES`], nested deeper than [`MAX_JSON_DEPTH`], or not valid
/// JSON for the source schema.
pub fn load_dashboard(path: &Path) -> Result<SourceDashboard, Error> {
    let metadata = fs::metadata(path).map_err(|source| io_error(path, source))?;

    if !metadata.is_file() {
        return Err(Error::validation(format!(
            "input is not a file: {}",
            path.display()
        )));
    }
    if metadata.len() == 0 {
        return Err(Error::validation(format!(
            "input file is empty: {}",
            path.display()
        )));
    }
    if metadata.len() > MAX_INPUT_BYTES {
        return Err(Error::validation(format!(
            "input exceeds {} MB limit: {}",
            MAX_INPUT_BYTES / (1024 * 1024),
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    check_depth(&contents)?;

    serde_json::from_str(&contents).map_err(|source| Error::Parse {
        source
    })
}

/// Rejects output paths that escape the destination directory.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the path is empty or contains a `..`
/// component.
pub fn validate_output_path(path: &Path) -> Result<(), Error> {
    if path.as_os_str().is_empty() {
        return Err(Error::validation("output path cannot be empty"));
    }
    if path
        .components()
        .any(|component| matches!(component, Component::ParentDir))
    {
        return Err(Error::validation(format!(
            "output path must not contain '..': {}",
            path.display()
        )));
    }
    Ok(())
}

/// Writes the converted dashboard to disk.
///
/// # Errors
///
/// Returns [`Error`] when the output path is rejected, serialization fails,
/// or the file cannot be written.
pub fn write_dashboard(
    path: &Path,
    dashboard: &TargetDashboard,
    pretty: bool
) -> Result<(), Error> {
    validate_output_path(path)?;
    let payload = if pretty {
        serde_json::to_string_pretty(dashboard)?
    } else {
        serde_json::to_string(dashboard)?
    };
    fs::write(path, payload).map_err(|source| io_error(path, source))
}

/// Writes the dashboard wrapped in an import envelope carrying the folder
/// label.
///
/// # Errors
///
/// Same failure modes as [`write_dashboard`].
pub fn write_envelope(
    path: &Path,
    dashboard: &TargetDashboard,
    folder: &str,
    pretty: bool
) -> Result<(), Error> {
    validate_output_path(path)?;
    let envelope = ImportEnvelope {
        dashboard,
        folder_title: folder,
        overwrite: true
    };
    let payload = if pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    fs::write(path, payload).map_err(|source| io_error(path, source))
}

/// Writes the conversion report to disk as pretty-printed JSON.
///
/// # Errors
///
/// Same failure modes as [`write_dashboard`].
pub fn write_report(path: &Path, report: &ConversionReport) -> Result<(), Error> {
    validate_output_path(path)?;
    let payload = serde_json::to_string_pretty(report)?;
    fs::write(path, payload).map_err(|source| io_error(path, source))
}

/// Scans raw JSON text and rejects documents nested deeper than the limit.
///
/// Strings are skipped so braces inside quoted values do not count toward
/// the depth.
fn check_depth(contents: &str) -> Result<(), Error> {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for ch in contents.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' | '[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            '}' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    if deepest > MAX_JSON_DEPTH {
        return Err(Error::validation(format!(
            "input nesting depth {deepest} exceeds limit {MAX_JSON_DEPTH}"
        )));
    }
    Ok(())
}
