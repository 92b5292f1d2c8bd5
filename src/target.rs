// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Target document types describing the emitted Grafana dashboard.
//!
//! Field names follow the destination platform's JSON schema, so serde
//! renames are applied where the wire spelling is camelCase. The assembler
//! in [`crate::convert`] is the only producer of these values; the I/O shell
//! serializes them without further transformation.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Schema version stamped on every emitted dashboard.
pub const SCHEMA_VERSION: u32 = 36;

/// Complete dashboard document in the target schema.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq,)]
pub struct TargetDashboard
{
    /// Numeric identifier, null until the destination platform assigns one.
    pub id: Option<u64,>,

    /// Stable unique identifier derived from the dashboard title.
    pub uid: String,

    /// Dashboard title, copied verbatim from the source.
    pub title: String,

    /// Organizational tags.
    pub tags: Vec<String,>,

    /// Timezone preference.
    pub timezone: String,

    /// Target schema version.
    #[serde(rename = "schemaVersion")]
    pub schema_version: u32,

    /// Document revision counter.
    pub version: u32,

    /// Auto-refresh interval.
    pub refresh: String,

    /// Default time range.
    pub time: TimeRange,

    /// Ordered panels, one per source widget.
    pub panels: Vec<TargetPanel,>,

    /// Template variable block.
    pub templating: Templating,

    /// Annotation configuration.
    pub annotations: Annotations,
}

/// Time range defaults for the dashboard.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq,)]
pub struct TimeRange
{
    /// Range start expression.
    pub from: String,

    /// Range end expression.
    pub to: String,
}

/// Annotation block wrapping the built-in annotations entry.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq,)]
pub struct Annotations
{
    /// Annotation query list.
    pub list: Vec<Value,>,
}

impl Annotations
{
    /// Returns the default block containing the destination platform's
    /// built-in annotations entry.
    pub fn builtin() -> Self
    {
        Self {
            list: vec![json!({
                "builtIn": 1,
                "datasource": {
                    "type": "grafana",
                    "uid": "-- Grafana --"
                },
                "enable": true,
                "hide": true,
                "iconColor": "rgba(0, 211, 255, 1)",
                "name": "Annotations & Alerts",
                "type": "dashboard"
            })],
        }
    }
}

/// Template variable block.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default,)]
pub struct Templating
{
    /// Ordered template variables.
    pub list: Vec<TargetVariable,>,
}

/// Single template variable entry.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq,)]
pub struct TargetVariable
{
    /// Variable name, preserved verbatim from the source.
    pub name: String,

    /// Variable kind, always `custom` for converted dashboards.
    #[serde(rename = "type")]
    pub kind: String,

    /// Datasource the variable applies to.
    pub datasource: DatasourceRef,

    /// Query string, carrying the source filter prefix.
    pub query: String,

    /// Currently selected value.
    pub current: CurrentSelection,

    /// Selectable options.
    pub options: Vec<VariableOption,>,

    /// Whether the variable is excluded from URL synchronization.
    #[serde(rename = "skipUrlSync")]
    pub skip_url_sync: bool,

    /// Visibility flag (0 = visible).
    pub hide: u8,
}

/// Current selection pair of a template variable.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default,)]
pub struct CurrentSelection
{
    /// Display text.
    pub text: String,

    /// Underlying value.
    pub value: String,
}

/// Selectable option of a template variable.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq,)]
pub struct VariableOption
{
    /// Display text.
    pub text: String,

    /// Underlying value.
    pub value: String,
}

/// Reference to a datasource by type and uid.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq,)]
pub struct DatasourceRef
{
    /// Datasource type tag.
    #[serde(rename = "type")]
    pub kind: String,

    /// Datasource uid.
    pub uid: String,
}

impl DatasourceRef
{
    /// Builds a reference where the type and uid share the configured name.
    pub fn named(name: &str,) -> Self
    {
        Self {
            kind: name.to_owned(),
            uid:  name.to_owned(),
        }
    }
}

/// Panel type tags emitted by the widget mapper.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash,)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind
{
    /// Time-series graph panel.
    Timeseries,
    /// Single-value stat panel.
    Stat,
    /// Horizontal bar gauge panel.
    Bargauge,
    /// Markdown text panel.
    Text,
    /// Heat map panel.
    Heatmap,
}

/// Single dashboard panel.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq,)]
pub struct TargetPanel
{
    /// Sequential 1-based identifier, unique within the dashboard.
    pub id: u32,

    /// Panel title.
    pub title: String,

    /// Panel type tag.
    #[serde(rename = "type")]
    pub kind: PanelKind,

    /// Position on the 24-column grid.
    #[serde(rename = "gridPos")]
    pub grid_pos: GridPos,

    /// Datasource reference, absent on text panels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<DatasourceRef,>,

    /// Query targets, one per translated source query.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<TargetTarget,>,

    /// Type-specific payload flattened into the panel object.
    #[serde(flatten)]
    pub extra: Value,
}

/// Integer position on the 24-column grid.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq,)]
pub struct GridPos
{
    /// Column offset.
    pub x: u32,

    /// Row offset.
    pub y: u32,

    /// Width in columns.
    pub w: u32,

    /// Height in row units.
    pub h: u32,
}

/// Single query target attached to a panel.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq,)]
pub struct TargetTarget
{
    /// Datasource the query runs against.
    pub datasource: DatasourceRef,

    /// Rewritten query expression.
    pub expr: String,

    /// Reference identifier, sequential per panel.
    #[serde(rename = "refId")]
    pub ref_id: String,

    /// Whether the query is an instant query.
    pub instant: bool,

    /// Legend template.
    #[serde(rename = "legendFormat")]
    pub legend_format: String,
}
