//! Turning a drop target into a placement.
//!
//! Commits only renumber and assign slots; gaps and stale fill or lock flags left behind are
//! cleaned up by the normalization at the start of the next layout pass.

use berth_core::geometry::Size;
use berth_core::math::at_least;

use crate::config::DockConfig;
use crate::drop_zone::{DropTarget, dock_geometry_excluding};
use crate::error::DockResult;
use crate::panel::{DockSlot, PanelId, Placement};
use crate::registry::PanelRegistry;
use crate::types::{DockSide, DropType};

/// Take a panel out of its dock, leaving it floating at its current rect.
///
/// A fill panel's rect shrinks back to its stored height.
///
/// When the panel heads a column that keeps other panels, the column's width ratio and lock
/// move to the next panel. When the column disappears, the row's ratios are cleared since
/// its column count changed. Returns the slot the panel occupied.
pub fn vacate(registry: &mut PanelRegistry, id: &PanelId) -> Option<DockSlot> {
    let slot = *registry.get(id)?.slot()?;

    let siblings: Vec<(PanelId, u32)> = registry
        .iter()
        .filter(|p| &p.id != id)
        .filter_map(|p| p.slot().map(|s| (p.id.clone(), s)))
        .filter(|(_, s)| s.side == slot.side && s.row == slot.row && s.column == slot.column)
        .map(|(pid, s)| (pid, s.sub_row))
        .collect();

    if let Some((heir, _)) = siblings.iter().min_by_key(|(_, sub_row)| *sub_row) {
        let is_head = siblings.iter().all(|(_, sub_row)| *sub_row > slot.sub_row);
        if is_head
            && let Some(heir_slot) = registry.get_mut(heir).and_then(|p| p.placement.slot_mut())
        {
            heir_slot.width_ratio = heir_slot.width_ratio.or(slot.width_ratio);
            heir_slot.width_lock = heir_slot.width_lock.or(slot.width_lock);
        }
    } else {
        clear_row_ratios(registry, slot.side, slot.row);
    }

    if let Some(panel) = registry.get_mut(id) {
        panel.placement = Placement::Floating;
        if slot.fill {
            panel.rect.height = panel.height;
        }
    }
    tracing::debug!(
        "Vacated '{}' from {} row {} column {}",
        id,
        slot.side,
        slot.row,
        slot.column
    );
    Some(slot)
}

/// Place `id` according to `target`, or float it when there is no target.
///
/// The panel is vacated first if it is still docked. A target that references a panel no
/// longer docked on the target side degrades to a new last row. Returns the side the panel
/// landed on.
pub fn commit_placement(
    registry: &mut PanelRegistry,
    config: &DockConfig,
    viewport: Size,
    id: &PanelId,
    target: Option<&DropTarget>,
) -> DockResult<Option<DockSide>> {
    registry.require(id)?;
    if registry.get(id).is_some_and(|p| p.is_docked()) {
        vacate(registry, id);
    }

    let Some(target) = target else {
        tracing::debug!("Panel '{}' floated", id);
        return Ok(None);
    };
    let side = target.side;

    let (slot, height) = match target.drop_type {
        DropType::Above | DropType::Below => (insert_row(registry, id, target), None),
        DropType::Left | DropType::Right | DropType::Between => {
            match reference_slot(registry, id, target) {
                Some((reference, reference_height)) => (
                    insert_column(registry, side, reference, target.drop_type),
                    Some(reference_height),
                ),
                None => (append_row(registry, id, target), None),
            }
        }
        DropType::Subcolumn => match reference_slot(registry, id, target) {
            Some((reference, _)) => {
                let height = subcolumn_height(registry, config, viewport, id, &reference);
                (insert_sub_row(registry, reference), Some(height))
            }
            None => (append_row(registry, id, target), None),
        },
    };

    let panel = registry.require_mut(id)?;
    panel.placement = Placement::Docked(slot);
    if let Some(height) = height {
        panel.height = height;
    }
    tracing::debug!(
        "Committed '{}' {:?} on {} at row {} column {} sub-row {}",
        id,
        target.drop_type,
        side,
        slot.row,
        slot.column,
        slot.sub_row
    );
    Ok(Some(side))
}

/// Slot and stored height of the target's reference panel, if it is still docked on the
/// target side.
fn reference_slot(
    registry: &PanelRegistry,
    id: &PanelId,
    target: &DropTarget,
) -> Option<(DockSlot, f32)> {
    let reference = target.target.as_ref().filter(|r| *r != id)?;
    let panel = registry.get(reference)?;
    let slot = panel.slot().filter(|s| s.side == target.side)?;
    Some((*slot, panel.height))
}

fn append_row(registry: &PanelRegistry, id: &PanelId, target: &DropTarget) -> DockSlot {
    tracing::warn!(
        "Drop target for '{}' references a missing panel; appending as a new row on {}",
        id,
        target.side
    );
    DockSlot::new(target.side, registry.next_row(target.side), 0, 0)
}

fn insert_row(registry: &mut PanelRegistry, id: &PanelId, target: &DropTarget) -> DockSlot {
    let side = target.side;
    let rows: Vec<u32> = {
        let mut rows: Vec<u32> = registry
            .docked_panels(side, Some(id))
            .iter()
            .filter_map(|p| p.slot().map(|s| s.row))
            .collect();
        rows.dedup();
        rows
    };
    let base = match rows.get(target.row_index) {
        Some(&row) => row,
        None if rows.is_empty() => 0,
        None => registry.next_row(side),
    };
    let new_row = match target.drop_type {
        DropType::Below if target.row_index < rows.len() => base + 1,
        _ => base,
    };

    for panel in registry.iter_mut().filter(|p| &p.id != id) {
        if let Some(slot) = panel.placement.slot_mut()
            && slot.side == side
            && slot.row >= new_row
        {
            slot.row += 1;
        }
    }
    DockSlot::new(side, new_row, 0, 0)
}

fn insert_column(
    registry: &mut PanelRegistry,
    side: DockSide,
    reference: DockSlot,
    drop_type: DropType,
) -> DockSlot {
    let new_column = match drop_type {
        DropType::Left => reference.column,
        _ => reference.column + 1,
    };
    for panel in registry.iter_mut() {
        if let Some(slot) = panel.placement.slot_mut()
            && slot.side == side
            && slot.row == reference.row
            && slot.column >= new_column
        {
            slot.column += 1;
        }
    }
    clear_row_ratios(registry, side, reference.row);
    DockSlot::new(side, reference.row, new_column, 0)
}

fn insert_sub_row(registry: &mut PanelRegistry, reference: DockSlot) -> DockSlot {
    let new_sub_row = reference.sub_row + 1;
    let mut column_ratio = None;
    for panel in registry.iter_mut() {
        if let Some(slot) = panel.placement.slot_mut() {
            let same_column = slot.side == reference.side
                && slot.row == reference.row
                && slot.column == reference.column;
            if !same_column {
                continue;
            }
            if slot.sub_row == 0 {
                column_ratio = slot.width_ratio;
            }
            if slot.sub_row >= new_sub_row {
                slot.sub_row += 1;
            }
        }
    }
    let mut slot = DockSlot::new(reference.side, reference.row, reference.column, new_sub_row);
    slot.width_ratio = column_ratio.or(reference.width_ratio);
    slot
}

/// Space left under the reference column, using the same geometry layout will produce.
fn subcolumn_height(
    registry: &PanelRegistry,
    config: &DockConfig,
    viewport: Size,
    id: &PanelId,
    reference: &DockSlot,
) -> f32 {
    let geometry = dock_geometry_excluding(registry, config, viewport, reference.side, Some(id));
    let gap = geometry
        .rows
        .iter()
        .find(|r| r.row == reference.row)
        .and_then(|row| {
            row.columns
                .iter()
                .find(|c| c.column == reference.column)
                .map(|c| row.height - c.stacked_height)
        })
        .unwrap_or(0.0);
    at_least(gap, config.min_panel_height)
}

fn clear_row_ratios(registry: &mut PanelRegistry, side: DockSide, row: u32) {
    for panel in registry.iter_mut() {
        if let Some(slot) = panel.placement.slot_mut()
            && slot.side == side
            && slot.row == row
        {
            slot.width_ratio = None;
        }
    }
}
