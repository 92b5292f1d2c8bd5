// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Batch conversion of many dashboard files.
///
/// Conversions are independent, so the batch fans out one rayon task per
/// document with no shared state between them. Failures are collected per
/// file instead of aborting the whole run.
use std::{
    fs,
    path::{Path, PathBuf}
};

use indicatif::{ProgressBar, ProgressStyle};
use masterror::AppError;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    convert::convert_dashboard,
    error::Error,
    file::{load_dashboard, write_dashboard},
    options::ConvertOptions
};

/// Outcome of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// Number of dashboards converted and written successfully.
    pub converted: usize,
    /// Per-file failures, in input order.
    pub failures:  Vec<BatchFailure>
}

/// Single failed input within a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    /// Input path that failed.
    pub input:   PathBuf,
    /// Human readable failure description.
    pub message: String
}

/// Converts every input file and writes the results into `output_dir`.
///
/// Output files reuse the input file stem with a `.grafana.json` suffix.
/// A progress bar tracks completion across worker threads.
///
/// # Errors
///
/// Returns [`AppError`] when the input list is empty or the output
/// directory cannot be created. Per-file conversion failures land in
/// [`BatchSummary::failures`] instead.
pub fn convert_files(
    inputs: &[PathBuf],
    output_dir: &Path,
    options: &ConvertOptions,
    pretty: bool
) -> Result<BatchSummary, AppError> {
    if inputs.is_empty() {
        return Err(AppError::validation("no input files provided"));
    }

    fs::create_dir_all(output_dir).map_err(|e| {
        AppError::service(format!(
            "failed to create output directory {}: {e}",
            output_dir.display()
        ))
    })?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("valid template")
    );

    info!(
        "converting {} dashboards into {}",
        inputs.len(),
        output_dir.display()
    );

    let results: Vec<Result<(), BatchFailure>> = inputs
        .par_iter()
        .map(|input| {
            let outcome = convert_one(input, output_dir, options, pretty);
            pb.inc(1);
            outcome.map_err(|error| BatchFailure {
                input:   input.clone(),
                message: error.to_display_string()
            })
        })
        .collect();

    pb.finish_with_message("batch conversion complete");

    let mut converted = 0;
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(()) => converted += 1,
            Err(failure) => {
                warn!("{}: {}", failure.input.display(), failure.message);
                failures.push(failure);
            }
        }
    }

    info!("batch finished: {converted} converted, {} failed", failures.len());

    Ok(BatchSummary {
        converted,
        failures
    })
}

fn convert_one(
    input: &Path,
    output_dir: &Path,
    options: &ConvertOptions,
    pretty: bool
) -> Result<(), Error> {
    let source = load_dashboard(input)?;
    let conversion = convert_dashboard(&source, options)?;

    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("dashboard");
    let output = output_dir.join(format!("{stem}.grafana.json"));

    write_dashboard(&output, &conversion.dashboard, pretty)?;
    debug!("wrote {}", output.display());
    Ok(())
}
