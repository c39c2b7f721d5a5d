//! Root to virtual-desktop translation.
//!
//! Virtual desktop coordinates put the primary monitor's top-left at
//! `(0, 0)`. Every record is shifted rigidly by the same offset and the
//! virtual screen is the union of the shifted monitor rectangles.

use crate::registry::{MonitorRecord, Registry};
use vscreen_common::{Point, Rect};

/// A registry whose rectangles are in virtual desktop coordinates.
///
/// This is the only form in which records reach the query interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedRegistry {
    records: Vec<MonitorRecord>,
    primary_index: usize,
    virtual_rect: Rect,
}

impl TranslatedRegistry {
    /// Records in discovery order.
    pub fn records(&self) -> &[MonitorRecord] {
        &self.records
    }

    /// Index of the primary record.
    pub fn primary_index(&self) -> usize {
        self.primary_index
    }

    /// The primary record; its origin is `(0, 0)`.
    pub fn primary(&self) -> &MonitorRecord {
        &self.records[self.primary_index]
    }

    /// Union of all monitor rectangles.
    pub fn virtual_rect(&self) -> Rect {
        self.virtual_rect
    }
}

/// Shift `registry` so the primary monitor sits at the virtual origin.
pub fn translate(registry: Registry) -> TranslatedRegistry {
    let (mut records, primary_index) = registry.into_parts();
    let origin = records[primary_index].bounds.origin();
    let (dx, dy) = (origin.x.wrapping_neg(), origin.y.wrapping_neg());

    let mut virtual_rect = Rect::EMPTY;
    for record in &mut records {
        record.bounds = record.bounds.offset(dx, dy);
        record.work_area = record.work_area.offset(dx, dy);
        virtual_rect = virtual_rect.union(&record.bounds);
    }

    TranslatedRegistry {
        records,
        primary_index,
        virtual_rect,
    }
}

/// Map a root-window point into virtual desktop coordinates.
pub const fn root_to_virtual(virtual_rect: &Rect, p: Point) -> Point {
    p.offset(virtual_rect.left, virtual_rect.top)
}

/// Map a virtual desktop point into root-window coordinates.
pub const fn virtual_to_root(virtual_rect: &Rect, p: Point) -> Point {
    p.offset(
        virtual_rect.left.wrapping_neg(),
        virtual_rect.top.wrapping_neg(),
    )
}
