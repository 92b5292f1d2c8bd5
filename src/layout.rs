// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Mapping from source canvas positions onto the target 24-column grid.
//!
//! Two strategies cover the source layout modes: ordered dashboards flow
//! panels two per row at a fixed size, while free-layout dashboards carry
//! percentage coordinates that are rescaled linearly. Both strategies uphold
//! the grid invariant `x + w <= 24` for any input.

use crate::{source::SourcePosition, target::GridPos};

/// Width of the target grid in columns.
pub const GRID_COLUMNS: u32 = 24;
/// Default panel width used by the ordered flow (half the grid).
const DEFAULT_PANEL_WIDTH: u32 = 12;
/// Default panel height used by the ordered flow.
const DEFAULT_PANEL_HEIGHT: u32 = 8;
/// Scale applied to percentage heights and vertical offsets. Calibrated so a
/// 15-20% source height lands near four row units.
const ROW_SCALE: f64 = 24.0;
/// Narrowest panel the grid accepts.
const MIN_PANEL_WIDTH: u32 = 1;
/// Shortest panel emitted for free-layout widgets.
const MIN_PANEL_HEIGHT: u32 = 4;
/// Tallest panel emitted for free-layout widgets.
const MAX_PANEL_HEIGHT: u32 = 36;

/// Deterministic slot allocator for ordered dashboards.
///
/// Panels flow left to right, two per row, in source order. Every widget
/// consumes exactly one slot so placeholders keep their place in the grid.
#[derive(Debug, Default,)]
pub struct GridFlow
{
    placed: u32,
}

impl GridFlow
{
    /// Creates a flow starting at the top-left corner of the grid.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Returns the next slot and advances the flow.
    pub fn next_slot(&mut self,) -> GridPos
    {
        let column = self.placed % 2;
        let row = self.placed / 2;
        self.placed += 1;

        GridPos {
            x: column * DEFAULT_PANEL_WIDTH,
            y: row * DEFAULT_PANEL_HEIGHT,
            w: DEFAULT_PANEL_WIDTH,
            h: DEFAULT_PANEL_HEIGHT,
        }
    }
}

/// Maps an optional source position onto the grid.
///
/// Widgets without an explicit position take the next flow slot; widgets
/// with percentage coordinates are rescaled through
/// [`map_free_position`].
pub fn map_position(position: Option<&SourcePosition,>, flow: &mut GridFlow,) -> GridPos
{
    match position {
        Some(free,) => map_free_position(free,),
        None => flow.next_slot(),
    }
}

/// Rescales percentage coordinates onto the 24-column grid.
///
/// Width maps linearly onto columns and is clamped to `[1, 24]`; height and
/// vertical offset map through [`ROW_SCALE`] with height clamped to
/// `[4, 36]`. When the scaled rectangle would overflow the grid, the width
/// shrinks before the column offset shifts left.
pub fn map_free_position(position: &SourcePosition,) -> GridPos
{
    let mut w = scale(position.width, f64::from(GRID_COLUMNS,),)
        .clamp(MIN_PANEL_WIDTH, GRID_COLUMNS,);
    let h = scale(position.height, ROW_SCALE,).clamp(MIN_PANEL_HEIGHT, MAX_PANEL_HEIGHT,);
    let mut x = scale(position.x, f64::from(GRID_COLUMNS,),).min(GRID_COLUMNS,);
    let y = scale(position.y, ROW_SCALE,);

    if x + w > GRID_COLUMNS {
        w = (GRID_COLUMNS - x).max(MIN_PANEL_WIDTH,);
        if x + w > GRID_COLUMNS {
            x = GRID_COLUMNS - w;
        }
    }

    GridPos {
        x,
        y,
        w,
        h,
    }
}

/// Converts a canvas percentage into grid units, rounding half up.
fn scale(percent: f64, factor: f64,) -> u32
{
    let scaled = (percent.max(0.0,) / 100.0 * factor).round();
    if scaled <= 0.0 { 0 } else { scaled as u32 }
}
