//! Engine for translating Datadog dashboard exports into Grafana
//! dashboards.
//!
//! The library exposes a typed source document model, a query translator, a
//! layout mapper, and a document assembler that together convert one parsed
//! dashboard into the destination schema plus a per-widget conversion
//! report. All public APIs are documented with invariants, error semantics,
//! and minimal examples to facilitate integration in automation tooling.

mod batch;
mod convert;
mod error;
mod file;
mod layout;
mod options;
mod panel;
mod query;
mod report;
mod source;
mod target;
mod uid;
mod variables;

pub use batch::{BatchFailure, BatchSummary, convert_files};
pub use convert::{Conversion, DASHBOARD_TAG, convert_dashboard};
pub use error::{Error, io_error};
pub use file::{
    ImportEnvelope, MAX_INPUT_BYTES, MAX_JSON_DEPTH, load_dashboard, validate_output_path,
    write_dashboard, write_envelope, write_report,
};
pub use layout::{GRID_COLUMNS, GridFlow, map_free_position, map_position};
pub use options::{
    ConvertOptions, DEFAULT_DATASOURCE, DEFAULT_FOLDER, DEFAULT_TIME_FROM, DEFAULT_TIME_TO,
    load_options, parse_options, validate_options,
};
pub use panel::{MappedPanel, map_widget};
pub use query::{QueryTranslator, TranslatedTarget};
pub use report::{ConversionReport, ReportEntry, WidgetOutcome};
pub use source::{
    KeyedRequest, LayoutMode, Requests, SourceDashboard, SourcePosition, SourceQuery,
    SourceVariable, SourceWidget, SubQuery, WidgetDefinition, WidgetKind,
};
pub use target::{
    Annotations, CurrentSelection, DatasourceRef, GridPos, PanelKind, SCHEMA_VERSION,
    TargetDashboard, TargetPanel, TargetTarget, TargetVariable, Templating, TimeRange,
    VariableOption,
};
pub use uid::UidStrategy;
pub use variables::transform_variables;
