// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Per-widget mapping onto target panels.
//!
//! The dispatch table over [`WidgetKind`] is fixed and total: every source
//! widget produces exactly one panel. Supported types translate their
//! queries and carry type-specific option blocks; log streams and
//! unrecognized types degrade to placeholder text panels that keep their
//! grid slot. The mapper never fails.

use serde_json::{Value, json};
use tracing::debug;

use crate::{
    query::QueryTranslator,
    report::WidgetOutcome,
    source::{SourceQuery, SourceWidget, WidgetKind},
    target::{DatasourceRef, GridPos, PanelKind, TargetPanel},
};

/// Title applied when a widget carries none.
const UNTITLED_PANEL: &str = "Untitled Panel";
/// Static body emitted for log stream widgets.
const LOG_STREAM_NOTICE: &str = "Log stream widgets cannot be converted automatically. \
                                 Recreate this panel against a log datasource such as Loki.";

/// Result of mapping a single widget: the panel plus its recorded outcome.
#[derive(Debug, Clone,)]
pub struct MappedPanel
{
    /// Emitted target panel.
    pub panel: TargetPanel,

    /// Outcome recorded in the conversion report.
    pub outcome: WidgetOutcome,

    /// Optional informational note for the report entry.
    pub detail: Option<String,>,
}

/// Maps one source widget onto a target panel.
///
/// `panel_id` is the sequential 1-based identifier assigned by the
/// assembler and `grid_pos` the slot computed by the layout mapper.
/// Supported widget types translate every query in request order with
/// reference ids `A0`, `A1`, ...; placeholder branches copy no queries but
/// keep the grid slot.
pub fn map_widget(
    widget: &SourceWidget,
    panel_id: u32,
    grid_pos: GridPos,
    translator: &QueryTranslator,
    datasource: &DatasourceRef,
) -> MappedPanel
{
    let title = widget
        .definition
        .title
        .as_deref()
        .map(str::trim,)
        .filter(|value| !value.is_empty(),)
        .unwrap_or(UNTITLED_PANEL,)
        .to_owned();

    debug!(
        "mapping widget '{}' of type '{}'",
        title,
        widget.definition.kind.as_str()
    );

    match &widget.definition.kind {
        WidgetKind::TimeSeries => data_panel(
            widget,
            panel_id,
            title,
            grid_pos,
            PanelKind::Timeseries,
            timeseries_options(&widget.definition.queries(),),
            translator,
            datasource,
        ),
        WidgetKind::QueryValue => data_panel(
            widget,
            panel_id,
            title,
            grid_pos,
            PanelKind::Stat,
            stat_options(),
            translator,
            datasource,
        ),
        WidgetKind::TopList => data_panel(
            widget,
            panel_id,
            title,
            grid_pos,
            PanelKind::Bargauge,
            bargauge_options(),
            translator,
            datasource,
        ),
        WidgetKind::HeatMap => data_panel(
            widget,
            panel_id,
            title,
            grid_pos,
            PanelKind::Heatmap,
            heatmap_options(),
            translator,
            datasource,
        ),
        WidgetKind::Note => MappedPanel {
            panel:   text_panel(
                panel_id,
                title,
                grid_pos,
                widget.definition.text.clone().unwrap_or_default(),
            ),
            outcome: WidgetOutcome::Converted,
            detail:  None,
        },
        WidgetKind::EventStream => MappedPanel {
            panel:   text_panel(panel_id, title, grid_pos, LOG_STREAM_NOTICE.to_owned(),),
            outcome: WidgetOutcome::Placeholder,
            detail:  Some("log stream widgets are not supported".to_owned(),),
        },
        WidgetKind::Group | WidgetKind::Other(_,) => {
            let name = widget.definition.kind.as_str();
            MappedPanel {
                panel:   text_panel(
                    panel_id,
                    title,
                    grid_pos,
                    format!("Unsupported Datadog widget type: {name}"),
                ),
                outcome: WidgetOutcome::Placeholder,
                detail:  Some(format!("widget type '{name}' is not supported"),),
            }
        }
    }
}

/// Builds a query-backed panel and translates its requests in order.
#[allow(clippy::too_many_arguments)]
fn data_panel(
    widget: &SourceWidget,
    panel_id: u32,
    title: String,
    grid_pos: GridPos,
    kind: PanelKind,
    extra: Value,
    translator: &QueryTranslator,
    datasource: &DatasourceRef,
) -> MappedPanel
{
    let queries = widget.definition.queries();
    let mut targets = Vec::with_capacity(queries.len(),);
    let mut fallbacks = 0usize;

    for (index, query,) in queries.iter().enumerate() {
        let translated = translator.translate(query, datasource, format!("A{index}"),);
        if !translated.converted {
            fallbacks += 1;
        }
        targets.push(translated.target,);
    }

    let detail = (fallbacks > 0).then(|| {
        format!(
            "{fallbacks} of {} queries passed through unchanged; manual review required",
            targets.len()
        )
    },);

    MappedPanel {
        panel: TargetPanel {
            id: panel_id,
            title,
            kind,
            grid_pos,
            datasource: Some(datasource.clone(),),
            targets,
            extra,
        },
        outcome: WidgetOutcome::Converted,
        detail,
    }
}

/// Builds a text panel carrying a markdown body.
fn text_panel(panel_id: u32, title: String, grid_pos: GridPos, content: String,) -> TargetPanel
{
    TargetPanel {
        id: panel_id,
        title,
        kind: PanelKind::Text,
        grid_pos,
        datasource: None,
        targets: Vec::new(),
        extra: json!({"content": content, "mode": "markdown"}),
    }
}

/// Legend and tooltip defaults for time-series panels, adjusted by the
/// first display-style hint found on the widget's queries.
fn timeseries_options(queries: &[&SourceQuery],) -> Value
{
    let mut options = json!({
        "legend": {"showLegend": true},
        "tooltip": {"mode": "single", "sort": "none"}
    });

    if let Some(style,) = queries.iter().find_map(|query| query.display_type.as_deref(),) {
        match style {
            "line" => {
                options["drawStyle"] = json!("line");
            }
            "area" => {
                options["drawStyle"] = json!("line");
                options["fillOpacity"] = json!(25);
            }
            "bars" => {
                options["drawStyle"] = json!("bars");
            }
            _ => {}
        }
    }

    json!({"options": options})
}

/// Reduce-to-last-value defaults for stat panels.
fn stat_options() -> Value
{
    json!({
        "options": {
            "textMode": "value",
            "colorMode": "value",
            "graphMode": "none",
            "justifyMode": "auto",
            "orientation": "auto",
            "reduceOptions": {
                "values": false,
                "calcs": ["lastNotNull"],
                "fields": ""
            }
        }
    })
}

/// Horizontal orientation defaults for bar gauge panels.
fn bargauge_options() -> Value
{
    json!({
        "options": {
            "orientation": "horizontal",
            "displayMode": "basic",
            "reduceOptions": {
                "values": false,
                "calcs": ["lastNotNull"],
                "fields": ""
            }
        }
    })
}

/// Default color scheme for heat map panels.
fn heatmap_options() -> Value
{
    json!({
        "options": {
            "color": {"mode": "scheme", "scheme": "Spectral"}
        }
    })
}
