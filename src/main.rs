//! Command-line interface for the dagr binary.
//!
//! The CLI exposes subcommands for converting a single dashboard file and
//! for batch-converting whole directories worth of exports. Invocations
//! without a subcommand fall back to the legacy single-file form.

use std::{
    io,
    path::{Path, PathBuf},
    process,
};

use clap::{ArgAction, Args, Parser, Subcommand};
use dagr::{
    ConvertOptions, Error, convert_dashboard, convert_files, load_dashboard, load_options,
    validate_options, write_dashboard, write_envelope, write_report,
};
use tracing_subscriber::EnvFilter;

/// Command line interface for converting dashboard definitions.
#[derive(Debug, Parser,)]
#[command(name = "dagr", version, about = "Translate Datadog dashboards into Grafana dashboards")]
/// Top-level CLI options parsed from user input.
struct Cli
{
    #[command(subcommand)]
    command: Option<Command,>,

    /// Legacy argument support for the default convert command.
    #[command(flatten)]
    legacy: LegacyConvertArgs,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Convert a single dashboard export.
    Convert(ConvertArgs,),
    /// Convert many dashboard exports into a directory.
    Batch(BatchArgs,),
}

#[derive(Debug, Args,)]
/// Arguments accepted by the `convert` subcommand.
struct ConvertArgs
{
    /// Path to the source dashboard JSON file.
    #[arg(long = "input", value_name = "PATH")]
    input: PathBuf,

    /// Destination path for the converted dashboard; stdout when omitted.
    #[arg(long = "output", value_name = "PATH")]
    output: Option<PathBuf,>,

    #[command(flatten)]
    overrides: OptionOverrides,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,

    /// Optional path receiving the conversion report as JSON.
    #[arg(long = "report", value_name = "PATH")]
    report: Option<PathBuf,>,

    /// Wrap the dashboard in an import envelope carrying the folder label.
    #[arg(long = "envelope", action = ArgAction::SetTrue)]
    envelope: bool,
}

#[derive(Debug, Args,)]
/// Arguments accepted by the `batch` subcommand.
struct BatchArgs
{
    /// Source dashboard JSON files.
    #[arg(value_name = "PATH", required = true)]
    inputs: Vec<PathBuf,>,

    /// Directory receiving one converted dashboard per input.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "converted")]
    output_dir: PathBuf,

    #[command(flatten)]
    overrides: OptionOverrides,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

/// Conversion option overrides shared by the subcommands.
#[derive(Debug, Args, Default,)]
struct OptionOverrides
{
    /// Path to a YAML file with conversion options.
    #[arg(long = "options", value_name = "PATH")]
    options: Option<PathBuf,>,

    /// Datasource name referenced by panels and variables.
    #[arg(long = "datasource", value_name = "NAME")]
    datasource: Option<String,>,

    /// Folder label carried by the import envelope.
    #[arg(long = "folder", value_name = "LABEL")]
    folder: Option<String,>,

    /// Start of the default time range.
    #[arg(long = "from", value_name = "TIME")]
    time_from: Option<String,>,

    /// End of the default time range.
    #[arg(long = "to", value_name = "TIME")]
    time_to: Option<String,>,
}

impl OptionOverrides
{
    /// Resolves the effective options from the YAML file (when given) and
    /// the individual flag overrides.
    ///
    /// # Errors
    ///
    /// Propagates option-file loading errors and validation failures.
    fn resolve(&self,) -> Result<ConvertOptions, Error,>
    {
        let mut options = match self.options.as_deref() {
            Some(path,) => load_options(path,)?,
            None => ConvertOptions::default(),
        };

        if let Some(datasource,) = self.datasource.as_ref() {
            options.datasource = datasource.clone();
        }
        if let Some(folder,) = self.folder.as_ref() {
            options.folder = folder.clone();
        }
        if let Some(from,) = self.time_from.as_ref() {
            options.time_from = from.clone();
        }
        if let Some(to,) = self.time_to.as_ref() {
            options.time_to = to.clone();
        }

        validate_options(&options,)?;
        Ok(options,)
    }
}

/// Arguments accepted when the CLI is invoked without a subcommand.
#[derive(Debug, Args, Default,)]
struct LegacyConvertArgs
{
    /// Path to the source dashboard JSON file.
    #[arg(long = "input", value_name = "PATH")]
    input: Option<PathBuf,>,

    /// Destination path for the converted dashboard; stdout when omitted.
    #[arg(long = "output", value_name = "PATH")]
    output: Option<PathBuf,>,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main()
{
    init_tracing();

    if let Err(error,) = run() {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

/// Installs the stderr tracing subscriber honoring `RUST_LOG`.
fn init_tracing()
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env(),)
        .with_writer(io::stderr,)
        .init();
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates errors originating from loading, conversion, and writing.
fn run() -> Result<(), Error,>
{
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Convert(args,),) => run_convert(&args,),
        Some(Command::Batch(args,),) => run_batch(&args,),
        None => run_legacy_convert(&cli.legacy,),
    }
}

fn run_convert(args: &ConvertArgs,) -> Result<(), Error,>
{
    let options = args.overrides.resolve()?;
    convert_file(
        &args.input,
        args.output.as_deref(),
        &options,
        args.pretty,
        args.envelope,
        args.report.as_deref(),
    )
}

fn convert_file(
    input: &Path,
    output: Option<&Path,>,
    options: &ConvertOptions,
    pretty: bool,
    envelope: bool,
    report: Option<&Path,>,
) -> Result<(), Error,>
{
    let source = load_dashboard(input,)?;
    let conversion = convert_dashboard(&source, options,)?;

    match output {
        Some(path,) => {
            if envelope {
                write_envelope(path, &conversion.dashboard, &options.folder, pretty,)?;
            } else {
                write_dashboard(path, &conversion.dashboard, pretty,)?;
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_converted_dashboard(&mut handle, &conversion.dashboard, pretty,)?;
        }
    }

    if let Some(path,) = report {
        write_report(path, &conversion.report,)?;
    }

    eprintln!("{}", conversion.report.summary());
    Ok((),)
}

fn write_converted_dashboard<W: io::Write,>(
    writer: &mut W,
    dashboard: &dagr::TargetDashboard,
    pretty: bool,
) -> Result<(), Error,>
{
    if pretty {
        serde_json::to_writer_pretty(writer, dashboard,)?;
    } else {
        serde_json::to_writer(writer, dashboard,)?;
    }

    Ok((),)
}

fn run_batch(args: &BatchArgs,) -> Result<(), Error,>
{
    let options = args.overrides.resolve()?;
    let summary = convert_files(&args.inputs, &args.output_dir, &options, args.pretty,)?;

    eprintln!(
        "{} of {} dashboards converted into {}",
        summary.converted,
        args.inputs.len(),
        args.output_dir.display()
    );

    if !summary.failures.is_empty() {
        return Err(Error::validation(format!(
            "{} of {} conversions failed",
            summary.failures.len(),
            args.inputs.len()
        ),),);
    }

    Ok((),)
}

fn run_legacy_convert(args: &LegacyConvertArgs,) -> Result<(), Error,>
{
    let input = args
        .input
        .as_deref()
        .ok_or_else(|| Error::validation("missing required --input <PATH> argument",),)?;

    convert_file(
        input,
        args.output.as_deref(),
        &ConvertOptions::default(),
        args.pretty,
        false,
        None,
    )
}
