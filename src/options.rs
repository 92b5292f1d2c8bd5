// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Conversion options threaded into the document assembler.
//!
//! Options are an explicit immutable value rather than ambient state, so
//! concurrent conversions of independent documents never observe each
//! other's configuration. Defaults match the destination platform's common
//! setup and every field can be overridden from the CLI or a YAML file.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Error, io_error};

/// Default datasource name attached to panels and variables.
pub const DEFAULT_DATASOURCE: &str = "prometheus";
/// Default folder label used by the import envelope.
pub const DEFAULT_FOLDER: &str = "Converted";
/// Default start of the dashboard time range.
pub const DEFAULT_TIME_FROM: &str = "now-6h";
/// Default end of the dashboard time range.
pub const DEFAULT_TIME_TO: &str = "now";

/// Immutable configuration consumed by the document assembler.
///
/// # Examples
///
/// ```
/// use dagr::ConvertOptions;
///
/// let options = ConvertOptions::default();
/// assert_eq!(options.datasource, "prometheus");
/// assert_eq!(options.time_from, "now-6h");
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq,)]
#[serde(default)]
pub struct ConvertOptions
{
    /// Datasource name referenced by panels, targets, and variables.
    pub datasource: String,

    /// Folder label carried by the import envelope.
    #[serde(alias = "folder_title", alias = "folderTitle")]
    pub folder: String,

    /// Start of the default time range.
    #[serde(alias = "from")]
    pub time_from: String,

    /// End of the default time range.
    #[serde(alias = "to")]
    pub time_to: String,
}

impl Default for ConvertOptions
{
    fn default() -> Self
    {
        Self {
            datasource: DEFAULT_DATASOURCE.to_owned(),
            folder:     DEFAULT_FOLDER.to_owned(),
            time_from:  DEFAULT_TIME_FROM.to_owned(),
            time_to:    DEFAULT_TIME_TO.to_owned(),
        }
    }
}

/// Loads conversion options from a YAML file.
///
/// # Errors
///
/// Returns an [`Error`] when the file cannot be read, the YAML cannot be
/// decoded, or a field is blank after trimming.
pub fn load_options(path: &Path,) -> Result<ConvertOptions, Error,>
{
    let contents = fs::read_to_string(path,).map_err(|source| io_error(path, source,),)?;
    parse_options(&contents,)
}

/// Parses conversion options from a YAML document string.
///
/// This function is suitable for unit tests and higher-level callers that
/// already obtained the file contents.
///
/// # Errors
///
/// Propagates [`Error::Options`](Error::Options) when the YAML cannot be
/// decoded and [`Error::Validation`](Error::Validation) when a field is
/// blank.
pub fn parse_options(contents: &str,) -> Result<ConvertOptions, Error,>
{
    let options: ConvertOptions = serde_yaml::from_str(contents,)?;
    validate_options(&options,)?;
    Ok(options,)
}

/// Checks that every option field carries a usable value.
///
/// # Errors
///
/// Returns [`Error::Validation`](Error::Validation) naming the blank field.
pub fn validate_options(options: &ConvertOptions,) -> Result<(), Error,>
{
    require_value(&options.datasource, "datasource",)?;
    require_value(&options.folder, "folder",)?;
    require_value(&options.time_from, "time_from",)?;
    require_value(&options.time_to, "time_to",)?;
    Ok((),)
}

fn require_value(value: &str, field: &str,) -> Result<(), Error,>
{
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{field} cannot be empty"),),);
    }
    Ok((),)
}
