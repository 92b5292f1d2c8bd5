// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Per-run conversion reporting.
///
/// Every source widget produces exactly one report entry alongside its
/// panel. Outcomes are values riding along with the mapped panels rather
/// than exceptions; the placeholder path is an expected, tested branch.
use serde::{Deserialize, Serialize};

/// Outcome recorded for a single widget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WidgetOutcome {
    /// The widget mapped onto a native panel type.
    Converted,
    /// The widget degraded to a placeholder text panel.
    Placeholder,
    /// Reserved for callers that filter panels; the engine never emits it.
    Rejected
}

/// Report entry for a single widget, in source order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportEntry {
    /// Zero-based index of the widget in the flattened source order.
    pub index:   usize,
    /// Panel title the widget mapped to.
    pub title:   String,
    /// Recorded outcome.
    pub outcome: WidgetOutcome,
    /// Optional informational note, e.g. query-translation fallbacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail:  Option<String>
}

/// Aggregated conversion report returned alongside the target dashboard.
///
/// The report is immutable after assembly; counts are derived once from the
/// entry list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversionReport {
    /// Total number of widgets seen.
    pub total:        usize,
    /// Widgets that mapped onto native panels.
    pub converted:    usize,
    /// Widgets that degraded to placeholder panels.
    pub placeholders: usize,
    /// Widgets rejected outright (always zero for engine-produced reports).
    pub rejected:     usize,
    /// Per-widget entries in source order.
    pub entries:      Vec<ReportEntry>
}

impl ConversionReport {
    /// Builds a report from per-widget entries, deriving the counters.
    pub fn from_entries(entries: Vec<ReportEntry>) -> Self {
        let converted = entries
            .iter()
            .filter(|entry| entry.outcome == WidgetOutcome::Converted)
            .count();
        let placeholders = entries
            .iter()
            .filter(|entry| entry.outcome == WidgetOutcome::Placeholder)
            .count();
        let rejected = entries
            .iter()
            .filter(|entry| entry.outcome == WidgetOutcome::Rejected)
            .count();

        Self {
            total: entries.len(),
            converted,
            placeholders,
            rejected,
            entries
        }
    }

    /// One-line human readable summary for CLI output and logs.
    pub fn summary(&self) -> String {
        format!(
            "converted {} of {} widgets ({} placeholders)",
            self.converted, self.total, self.placeholders
        )
    }
}
