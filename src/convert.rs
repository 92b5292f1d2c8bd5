// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Document assembly: the conversion entry point.
//!
//! The assembler walks the flattened widget list once, composing the query
//! translator, layout mapper, and widget mapper, then wraps the resulting
//! panels and templating block into the full target document alongside a
//! per-widget conversion report. The source document is never mutated and
//! repeated conversions of the same document are byte-identical.

use tracing::{debug, info};

use crate::{
    error::Error,
    layout::{GridFlow, map_position},
    options::ConvertOptions,
    panel::map_widget,
    query::QueryTranslator,
    report::{ConversionReport, ReportEntry},
    source::{LayoutMode, SourceDashboard},
    target::{
        Annotations, DatasourceRef, SCHEMA_VERSION, TargetDashboard, TimeRange,
    },
    uid::UidStrategy,
    variables::transform_variables,
};

/// Tag applied to every converted dashboard.
pub const DASHBOARD_TAG: &str = "converted-from-datadog";
/// Uid used when the dashboard title yields no uid-worthy characters.
const FALLBACK_UID: &str = "converted-dashboard";

/// Result of a conversion run: the document plus its report.
#[derive(Debug, Clone,)]
pub struct Conversion
{
    /// Assembled target dashboard, ready for serialization.
    pub dashboard: TargetDashboard,

    /// Immutable per-widget conversion report.
    pub report: ConversionReport,
}

/// Converts a parsed source dashboard into a target dashboard and report.
///
/// Every flattened source widget produces exactly one panel with a
/// sequential 1-based id; unsupported widgets degrade to placeholders
/// instead of being dropped. Template variables map 1:1 in order.
///
/// # Errors
///
/// Returns [`Error::EmptyDashboard`](Error::EmptyDashboard) when the
/// flattened widget list is empty. Every other condition degrades to a
/// placeholder panel and a report entry.
///
/// # Examples
///
/// ```
/// use dagr::{ConvertOptions, convert_dashboard};
///
/// let source = serde_json::from_str(
///     r#"{"title": "Demo", "widgets": [{"definition": {"type": "note", "content": "hi"}}]}"#,
/// )
/// .expect("valid dashboard",);
/// let conversion =
///     convert_dashboard(&source, &ConvertOptions::default(),).expect("conversion succeeds",);
/// assert_eq!(conversion.dashboard.panels.len(), 1);
/// assert_eq!(conversion.report.total, 1);
/// ```
pub fn convert_dashboard(
    source: &SourceDashboard,
    options: &ConvertOptions,
) -> Result<Conversion, Error,>
{
    let widgets = source.flattened_widgets();
    if widgets.is_empty() {
        return Err(Error::EmptyDashboard,);
    }

    info!(
        "converting dashboard '{}' with {} widgets",
        source.title,
        widgets.len()
    );

    let datasource = DatasourceRef::named(&options.datasource,);
    let translator = QueryTranslator::new();
    let mut flow = GridFlow::new();
    let mut panels = Vec::with_capacity(widgets.len(),);
    let mut entries = Vec::with_capacity(widgets.len(),);

    for (index, widget,) in widgets.iter().enumerate() {
        let position = match source.layout {
            LayoutMode::Free => widget.position.as_ref(),
            LayoutMode::Ordered => None,
        };
        let slot = map_position(position, &mut flow,);
        let panel_id = index as u32 + 1;
        let mapped = map_widget(widget, panel_id, slot, &translator, &datasource,);

        debug!(
            "widget {index} became panel {panel_id} with outcome {:?}",
            mapped.outcome
        );

        entries.push(ReportEntry {
            index,
            title: mapped.panel.title.clone(),
            outcome: mapped.outcome,
            detail: mapped.detail,
        },);
        panels.push(mapped.panel,);
    }

    let templating = transform_variables(&source.template_variables, &datasource,);
    let uid = UidStrategy::builder(&source.title,)
        .build()
        .unwrap_or_else(|| FALLBACK_UID.to_owned(),);

    let dashboard = TargetDashboard {
        id: None,
        uid,
        title: source.title.clone(),
        tags: vec![DASHBOARD_TAG.to_owned()],
        timezone: "browser".to_owned(),
        schema_version: SCHEMA_VERSION,
        version: 1,
        refresh: "5s".to_owned(),
        time: TimeRange {
            from: options.time_from.clone(),
            to:   options.time_to.clone(),
        },
        panels,
        templating,
        annotations: Annotations::builtin(),
    };

    let report = ConversionReport::from_entries(entries,);
    info!("{}", report.summary());

    Ok(Conversion {
        dashboard,
        report,
    },)
}
