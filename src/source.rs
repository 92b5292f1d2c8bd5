//! Source document types describing Datadog dashboard exports.
//!
//! The types in this module mirror the structure of the JSON documents
//! exported by the source platform. They intentionally keep optional values
//! flexible to absorb the format drift between export generations, and
//! provide helper methods for deriving flattened views that satisfy
//! downstream invariants. The conversion engine treats every value here as
//! read-only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root document describing a source dashboard before conversion.
///
/// # Examples
///
/// ```
/// use dagr::SourceDashboard;
///
/// let json = r#"{
///     "title": "Cluster Overview",
///     "widgets": [{"definition": {"type": "timeseries"}}]
/// }"#;
/// let dashboard: SourceDashboard = serde_json::from_str(json,).expect("valid dashboard",);
/// assert_eq!(dashboard.title, "Cluster Overview");
/// assert_eq!(dashboard.widgets.len(), 1);
/// ```
#[derive(Debug, Deserialize, Serialize, Clone,)]
pub struct SourceDashboard
{
    /// Dashboard title displayed in the source platform.
    #[serde(default = "default_title")]
    pub title: String,

    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String,>,

    /// Layout mode controlling how widget positions are interpreted.
    #[serde(default, rename = "layout_type")]
    pub layout: LayoutMode,

    /// Ordered collection of widgets. Legacy exports use the `graphs` key.
    #[serde(default, alias = "graphs")]
    pub widgets: Vec<SourceWidget,>,

    /// Ordered collection of template variables.
    #[serde(default)]
    pub template_variables: Vec<SourceVariable,>,
}

impl SourceDashboard
{
    /// Returns the convertible widgets in conversion order.
    ///
    /// Top-level widgets that are not groups come first, followed by the
    /// widgets nested inside group containers in traversal order. Group
    /// containers themselves never appear in the result; only their children
    /// do.
    pub fn flattened_widgets(&self,) -> Vec<&SourceWidget,>
    {
        let mut flattened: Vec<&SourceWidget,> = self
            .widgets
            .iter()
            .filter(|widget| !matches!(widget.definition.kind, WidgetKind::Group,),)
            .collect();

        for widget in &self.widgets {
            if matches!(widget.definition.kind, WidgetKind::Group,) {
                collect_nested(&widget.definition.widgets, &mut flattened,);
            }
        }

        flattened
    }
}

fn collect_nested<'widget,>(
    widgets: &'widget [SourceWidget],
    flattened: &mut Vec<&'widget SourceWidget,>,
)
{
    for widget in widgets {
        if matches!(widget.definition.kind, WidgetKind::Group,) {
            collect_nested(&widget.definition.widgets, flattened,);
        } else {
            flattened.push(widget,);
        }
    }
}

fn default_title() -> String
{
    "Untitled Dashboard".to_owned()
}

/// Layout interpretation modes supported by source dashboards.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default,)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode
{
    /// Widgets flow in document order without explicit coordinates.
    #[default]
    Ordered,
    /// Widgets carry explicit percentage coordinates on a 100-unit canvas.
    Free,
}

/// Single widget entry consisting of a definition and an optional position.
#[derive(Debug, Deserialize, Serialize, Clone,)]
pub struct SourceWidget
{
    /// Widget definition carrying the type tag, title, and queries.
    pub definition: WidgetDefinition,

    /// Optional percentage position, present only in free layout mode.
    #[serde(default, alias = "layout")]
    pub position: Option<SourcePosition,>,
}

/// Widget definition payload shared by all widget types.
#[derive(Debug, Deserialize, Serialize, Clone,)]
pub struct WidgetDefinition
{
    /// Widget type tag. Unrecognized tags are preserved verbatim.
    #[serde(default, rename = "type")]
    pub kind: WidgetKind,

    /// Optional widget title.
    #[serde(default)]
    pub title: Option<String,>,

    /// Query requests attached to the widget.
    #[serde(default)]
    pub requests: Requests,

    /// Markdown body for note widgets.
    #[serde(default, alias = "content")]
    pub text: Option<String,>,

    /// Nested widgets, populated only for group containers.
    #[serde(default)]
    pub widgets: Vec<SourceWidget,>,
}

impl WidgetDefinition
{
    /// Returns the queries of this widget that carry a usable expression,
    /// preserving request order. Keyed request maps are walked in key order
    /// so repeated conversions stay deterministic.
    pub fn queries(&self,) -> Vec<&SourceQuery,>
    {
        self.requests
            .iter()
            .filter(|query| query.expression().is_some(),)
            .collect()
    }
}

/// Request collection attached to a widget definition.
///
/// Source exports switched between a plain list and a keyed map over the
/// years; both shapes deserialize transparently.
#[derive(Debug, Deserialize, Serialize, Clone,)]
#[serde(untagged)]
pub enum Requests
{
    /// Modern list form.
    List(Vec<SourceQuery,>,),
    /// Legacy keyed form mapping request names to one or many requests.
    Keyed(BTreeMap<String, KeyedRequest,>,),
}

impl Requests
{
    /// Iterates over every request regardless of the storage shape.
    pub fn iter(&self,) -> Box<dyn Iterator<Item = &SourceQuery,> + '_,>
    {
        match self {
            Self::List(requests,) => Box::new(requests.iter(),),
            Self::Keyed(map,) => {
                Box::new(map.values().flat_map(|request| request.iter(),),)
            }
        }
    }
}

impl Default for Requests
{
    fn default() -> Self
    {
        Self::List(Vec::new(),)
    }
}

/// Value side of the legacy keyed request map.
#[derive(Debug, Deserialize, Serialize, Clone,)]
#[serde(untagged)]
pub enum KeyedRequest
{
    /// A single request stored under the key.
    One(SourceQuery,),
    /// Multiple requests stored under the key.
    Many(Vec<SourceQuery,>,),
}

impl KeyedRequest
{
    fn iter(&self,) -> Box<dyn Iterator<Item = &SourceQuery,> + '_,>
    {
        match self {
            Self::One(request,) => Box::new(std::iter::once(request,),),
            Self::Many(requests,) => Box::new(requests.iter(),),
        }
    }
}

/// Single query request in the source query language.
#[derive(Debug, Deserialize, Serialize, Clone, Default,)]
pub struct SourceQuery
{
    /// Raw expression string. Newer exports use the `query` spelling.
    #[serde(default, alias = "query")]
    pub q: Option<String,>,

    /// Subquery array introduced by newer export generations.
    #[serde(default)]
    pub queries: Vec<SubQuery,>,

    /// Optional aggregation hint attached to the request.
    #[serde(default)]
    pub aggregator: Option<String,>,

    /// Optional display-style hint (`line`, `area`, `bars`).
    #[serde(default, alias = "display")]
    pub display_type: Option<String,>,
}

impl SourceQuery
{
    /// Returns the raw expression for this request, if any.
    ///
    /// The short `q` form wins; otherwise the first subquery expression is
    /// used, matching the behavior of the source platform's own tooling.
    pub fn expression(&self,) -> Option<&str,>
    {
        if let Some(raw,) = self.q.as_deref()
            && !raw.trim().is_empty()
        {
            return Some(raw,);
        }

        self.queries
            .first()
            .and_then(|sub| sub.query.as_deref(),)
            .filter(|raw| !raw.trim().is_empty(),)
    }
}

/// Subquery entry inside the newer request format.
#[derive(Debug, Deserialize, Serialize, Clone, Default,)]
pub struct SubQuery
{
    /// Raw expression string.
    #[serde(default)]
    pub query: Option<String,>,

    /// Optional subquery name.
    #[serde(default)]
    pub name: Option<String,>,

    /// Optional data source tag.
    #[serde(default)]
    pub data_source: Option<String,>,
}

/// Percentage position on the source platform's 100-unit canvas.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq,)]
pub struct SourcePosition
{
    /// Horizontal offset in canvas percent.
    #[serde(default)]
    pub x: f64,

    /// Vertical offset in canvas percent.
    #[serde(default)]
    pub y: f64,

    /// Width in canvas percent.
    #[serde(default = "default_width", alias = "w")]
    pub width: f64,

    /// Height in canvas percent.
    #[serde(default = "default_height", alias = "h")]
    pub height: f64,
}

fn default_width() -> f64
{
    50.0
}

fn default_height() -> f64
{
    25.0
}

/// Template variable definition from the source dashboard.
#[derive(Debug, Deserialize, Serialize, Clone, Default,)]
pub struct SourceVariable
{
    /// Variable name, unique within the document.
    pub name: String,

    /// Tag filter prefix applied by the source platform.
    #[serde(default)]
    pub prefix: String,

    /// Optional default value.
    #[serde(default)]
    pub default: Option<String,>,

    /// Optional list of selectable values.
    #[serde(default, alias = "values")]
    pub available_values: Vec<String,>,
}

/// Closed enumeration of widget type tags.
///
/// Unknown tags are carried verbatim in [`WidgetKind::Other`] so the mapper
/// can degrade them to placeholder panels without losing the original name.
#[derive(Debug, Clone, PartialEq, Eq, Hash,)]
pub enum WidgetKind
{
    /// Time-series graph.
    TimeSeries,
    /// Single-value readout.
    QueryValue,
    /// Ranked top list.
    TopList,
    /// Live log stream.
    EventStream,
    /// Markdown note.
    Note,
    /// Heat map.
    HeatMap,
    /// Group container holding nested widgets.
    Group,
    /// Any tag the converter does not recognize.
    Other(String,),
}

impl WidgetKind
{
    /// Parses a raw type tag, accepting the spelling variants seen across
    /// export generations.
    pub fn parse(raw: &str,) -> Self
    {
        match raw {
            "timeseries" | "time-series" | "time_series" => Self::TimeSeries,
            "query_value" | "single-value" | "single_value" => Self::QueryValue,
            "toplist" | "top-list" | "top_list" => Self::TopList,
            "event_stream" | "log_stream" | "log-stream" => Self::EventStream,
            "note" => Self::Note,
            "heatmap" | "heat-map" | "heat_map" => Self::HeatMap,
            "group" => Self::Group,
            other => Self::Other(other.to_owned(),),
        }
    }

    /// Returns the canonical tag for this kind.
    pub fn as_str(&self,) -> &str
    {
        match self {
            Self::TimeSeries => "timeseries",
            Self::QueryValue => "query_value",
            Self::TopList => "toplist",
            Self::EventStream => "event_stream",
            Self::Note => "note",
            Self::HeatMap => "heatmap",
            Self::Group => "group",
            Self::Other(tag,) => tag,
        }
    }
}

impl Default for WidgetKind
{
    fn default() -> Self
    {
        Self::Other("unknown".to_owned(),)
    }
}

impl<'de,> Deserialize<'de,> for WidgetKind
{
    fn deserialize<D,>(deserializer: D,) -> Result<Self, D::Error,>
    where
        D: serde::Deserializer<'de,>,
    {
        let raw = String::deserialize(deserializer,)?;
        Ok(Self::parse(&raw,),)
    }
}

impl Serialize for WidgetKind
{
    fn serialize<S,>(&self, serializer: S,) -> Result<S::Ok, S::Error,>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str(),)
    }
}

#[cfg(test)]
mod tests
{
    use super::{LayoutMode, SourceDashboard, SourceQuery, WidgetKind};

    fn parse(json: &str,) -> SourceDashboard
    {
        serde_json::from_str(json,).expect("expected dashboard to deserialize",)
    }

    #[test]
    fn defaults_title_when_missing()
    {
        let dashboard = parse(r#"{"widgets": []}"#,);
        assert_eq!(dashboard.title, "Untitled Dashboard");
        assert_eq!(dashboard.layout, LayoutMode::Ordered);
    }

    #[test]
    fn accepts_legacy_graphs_key()
    {
        let dashboard = parse(r#"{"graphs": [{"definition": {"type": "timeseries"}}]}"#,);
        assert_eq!(dashboard.widgets.len(), 1);
        assert_eq!(dashboard.widgets[0].definition.kind, WidgetKind::TimeSeries);
    }

    #[test]
    fn parses_free_layout_with_positions()
    {
        let dashboard = parse(
            r#"{
                "layout_type": "free",
                "widgets": [{
                    "definition": {"type": "note", "content": "hello"},
                    "layout": {"x": 0, "y": 0, "width": 47, "height": 15}
                }]
            }"#,
        );
        assert_eq!(dashboard.layout, LayoutMode::Free);
        let position = dashboard.widgets[0].position.expect("expected position",);
        assert_eq!(position.width, 47.0);
        assert_eq!(position.height, 15.0);
    }

    #[test]
    fn widget_kind_parses_spelling_variants()
    {
        assert_eq!(WidgetKind::parse("time-series",), WidgetKind::TimeSeries);
        assert_eq!(WidgetKind::parse("single-value",), WidgetKind::QueryValue);
        assert_eq!(WidgetKind::parse("log-stream",), WidgetKind::EventStream);
        assert_eq!(WidgetKind::parse("heat_map",), WidgetKind::HeatMap);
        assert_eq!(
            WidgetKind::parse("unknown_widget_xyz",),
            WidgetKind::Other("unknown_widget_xyz".to_owned(),)
        );
    }

    #[test]
    fn widget_kind_defaults_to_unknown_when_type_missing()
    {
        let dashboard = parse(r#"{"widgets": [{"definition": {}}]}"#,);
        assert_eq!(
            dashboard.widgets[0].definition.kind,
            WidgetKind::Other("unknown".to_owned(),)
        );
    }

    #[test]
    fn flattened_widgets_lifts_group_children()
    {
        let dashboard = parse(
            r#"{
                "widgets": [
                    {"definition": {"type": "timeseries", "title": "top"}},
                    {"definition": {"type": "group", "widgets": [
                        {"definition": {"type": "note", "title": "nested-a"}},
                        {"definition": {"type": "group", "widgets": [
                            {"definition": {"type": "toplist", "title": "nested-b"}}
                        ]}}
                    ]}}
                ]
            }"#,
        );

        let flattened = dashboard.flattened_widgets();
        let titles: Vec<_,> = flattened
            .iter()
            .map(|widget| widget.definition.title.as_deref().unwrap_or(""),)
            .collect();
        assert_eq!(titles, ["top", "nested-a", "nested-b"]);
    }

    #[test]
    fn requests_accept_list_and_keyed_forms()
    {
        let dashboard = parse(
            r#"{
                "widgets": [
                    {"definition": {"type": "timeseries", "requests": [
                        {"q": "avg:system.cpu.user{*}"}
                    ]}},
                    {"definition": {"type": "timeseries", "requests": {
                        "fill": {"q": "avg:system.mem.used{*}"},
                        "size": [{"q": "avg:system.mem.total{*}"}]
                    }}}
                ]
            }"#,
        );

        assert_eq!(dashboard.widgets[0].definition.queries().len(), 1);
        let keyed = dashboard.widgets[1].definition.queries();
        let expressions: Vec<_,> =
            keyed.iter().map(|query| query.expression().unwrap_or(""),).collect();
        assert_eq!(
            expressions,
            ["avg:system.mem.used{*}", "avg:system.mem.total{*}"]
        );
    }

    #[test]
    fn expression_prefers_short_form_over_subqueries()
    {
        let query: SourceQuery = serde_json::from_str(
            r#"{"q": "sum:a{*}", "queries": [{"query": "sum:b{*}"}]}"#,
        )
        .expect("expected query to deserialize",);
        assert_eq!(query.expression(), Some("sum:a{*}"));
    }

    #[test]
    fn expression_falls_back_to_first_subquery()
    {
        let query: SourceQuery =
            serde_json::from_str(r#"{"queries": [{"query": "sum:b{*}"}]}"#,)
                .expect("expected query to deserialize",);
        assert_eq!(query.expression(), Some("sum:b{*}"));
    }

    #[test]
    fn expression_is_none_for_blank_requests()
    {
        let query: SourceQuery = serde_json::from_str(r#"{"q": "   "}"#,)
            .expect("expected query to deserialize",);
        assert!(query.expression().is_none());
    }

    #[test]
    fn variables_accept_values_alias()
    {
        let dashboard = parse(
            r#"{
                "widgets": [{"definition": {"type": "note"}}],
                "template_variables": [
                    {"name": "env", "prefix": "environment", "default": "prod",
                     "values": ["prod", "staging"]}
                ]
            }"#,
        );

        let variable = &dashboard.template_variables[0];
        assert_eq!(variable.name, "env");
        assert_eq!(variable.prefix, "environment");
        assert_eq!(variable.default.as_deref(), Some("prod"));
        assert_eq!(variable.available_values, ["prod", "staging"]);
    }
}
