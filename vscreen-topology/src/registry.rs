//! Monitor registry: records, handles and primary selection.

use crate::discovery::usable_screens;
use crate::host::RawScreen;
use crate::work_area::clip_to_bounds;
use serde::Serialize;
use std::fmt;
use std::num::NonZeroU32;
use tracing::warn;
use vscreen_common::Rect;

/// Prefix of monitor device names; the index is appended.
pub const DEVICE_NAME_PREFIX: &str = r"\\.\DISPLAY";

/// Device index of the primary monitor.
const PRIMARY_DEVICE_INDEX: usize = 1;

/// Opaque monitor identifier.
///
/// Carries the registry generation that issued it and `index + 1`, so the
/// raw value is never zero. A handle is only valid against its own
/// generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonitorHandle {
    generation: u64,
    slot: NonZeroU32,
}

impl MonitorHandle {
    pub(crate) fn new(generation: u64, index: usize) -> Self {
        let slot = u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .and_then(NonZeroU32::new)
            .unwrap_or(NonZeroU32::MAX);
        Self { generation, slot }
    }

    /// The externally visible value, `index + 1`.
    pub fn raw(&self) -> NonZeroU32 {
        self.slot
    }

    /// Generation this handle was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn index(&self) -> usize {
        (self.slot.get() - 1) as usize
    }
}

impl fmt::Display for MonitorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.slot, self.generation)
    }
}

/// One physical or synthetic display output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorRecord {
    /// Monitor rectangle.
    pub bounds: Rect,
    /// Usable part of `bounds`, never empty when `bounds` is not.
    pub work_area: Rect,
    /// Whether this is the primary monitor.
    pub is_primary: bool,
    /// `\\.\DISPLAY<n>` identifier.
    pub device_name: String,
}

/// Device name for a 1-based device index.
pub fn device_name(index: usize) -> String {
    format!("{DEVICE_NAME_PREFIX}{index}")
}

/// The authoritative monitor list of one rebuild.
///
/// Only [`rebuild_registry`] constructs it, which guarantees at least one
/// record and exactly one primary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    records: Vec<MonitorRecord>,
    primary_index: usize,
}

impl Registry {
    /// All records in discovery order.
    pub fn records(&self) -> &[MonitorRecord] {
        &self.records
    }

    /// Index of the primary record.
    pub fn primary_index(&self) -> usize {
        self.primary_index
    }

    /// The primary record.
    pub fn primary(&self) -> &MonitorRecord {
        &self.records[self.primary_index]
    }

    /// Number of monitors, at least one.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry has no monitors.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<MonitorRecord>, usize) {
        (self.records, self.primary_index)
    }
}

/// Resolve the configured primary index against `count` monitors.
pub fn resolve_primary(preference: usize, count: usize) -> usize {
    if preference < count {
        preference
    } else {
        if preference != 0 {
            warn!(
                "Configured primary monitor {} out of range ({} monitors), using 0",
                preference, count
            );
        }
        0
    }
}

/// Build the registry for one generation.
///
/// `work_area` is the host work area in root coordinates, [`Rect::EMPTY`] if
/// unknown. Screens are filtered through [`usable_screens`]; `fallback` is
/// used when none remain, so the registry is never empty.
pub fn rebuild_registry(
    raw_screens: &[RawScreen],
    work_area: Rect,
    primary_index_pref: usize,
    fallback: RawScreen,
) -> Registry {
    let mut bounds: Vec<Rect> = usable_screens(raw_screens)
        .iter()
        .filter_map(RawScreen::rect)
        .collect();
    if bounds.is_empty() {
        bounds.push(Rect::from_origin_size(
            fallback.x,
            fallback.y,
            fallback.width,
            fallback.height,
        ));
    }

    let primary_index = resolve_primary(primary_index_pref, bounds.len());

    let mut next_index = PRIMARY_DEVICE_INDEX + 1;
    let records = bounds
        .into_iter()
        .enumerate()
        .map(|(i, bounds)| {
            let is_primary = i == primary_index;
            let device_index = if is_primary {
                PRIMARY_DEVICE_INDEX
            } else {
                next_index += 1;
                next_index - 1
            };
            MonitorRecord {
                bounds,
                work_area: clip_to_bounds(&work_area, &bounds),
                is_primary,
                device_name: device_name(device_index),
            }
        })
        .collect();

    Registry {
        records,
        primary_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FALLBACK: RawScreen = RawScreen::new(0, 0, 1024, 768);

    fn names(registry: &Registry) -> Vec<&str> {
        registry
            .records()
            .iter()
            .map(|r| r.device_name.as_str())
            .collect()
    }

    fn three_screens() -> Vec<RawScreen> {
        vec![
            RawScreen::new(0, 0, 1920, 1080),
            RawScreen::new(1920, 0, 1920, 1080),
            RawScreen::new(3840, 0, 1280, 1024),
        ]
    }

    #[test]
    fn test_handle_raw_is_index_plus_one() {
        let handle = MonitorHandle::new(4, 0);
        assert_eq!(handle.raw().get(), 1);
        assert_eq!(handle.index(), 0);
        assert_eq!(handle.generation(), 4);
        assert_eq!(MonitorHandle::new(4, 2).to_string(), "#3@4");
    }

    #[test]
    fn test_device_names_primary_first() {
        let registry = rebuild_registry(&three_screens(), Rect::EMPTY, 0, FALLBACK);
        assert_eq!(
            names(&registry),
            vec![r"\\.\DISPLAY1", r"\\.\DISPLAY2", r"\\.\DISPLAY3"]
        );
    }

    #[test]
    fn test_device_names_primary_skipped() {
        let registry = rebuild_registry(&three_screens(), Rect::EMPTY, 1, FALLBACK);
        assert_eq!(
            names(&registry),
            vec![r"\\.\DISPLAY2", r"\\.\DISPLAY1", r"\\.\DISPLAY3"]
        );

        let registry = rebuild_registry(&three_screens(), Rect::EMPTY, 2, FALLBACK);
        assert_eq!(
            names(&registry),
            vec![r"\\.\DISPLAY2", r"\\.\DISPLAY3", r"\\.\DISPLAY1"]
        );
    }

    #[test]
    fn test_exactly_one_primary() {
        for pref in 0..5 {
            let registry = rebuild_registry(&three_screens(), Rect::EMPTY, pref, FALLBACK);
            let primaries = registry.records().iter().filter(|r| r.is_primary).count();
            assert_eq!(primaries, 1);
            assert!(registry.primary().is_primary);
        }
    }

    #[test]
    fn test_out_of_range_primary_falls_back_to_zero() {
        let screens = &three_screens()[..2];
        let registry = rebuild_registry(screens, Rect::EMPTY, 5, FALLBACK);
        assert_eq!(registry.primary_index(), 0);
        assert!(registry.records()[0].is_primary);
        assert!(!registry.records()[1].is_primary);
    }

    #[test]
    fn test_empty_input_uses_fallback() {
        let registry = rebuild_registry(&[], Rect::EMPTY, 3, FALLBACK);
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
        assert_eq!(
            registry.records()[0],
            MonitorRecord {
                bounds: Rect::new(0, 0, 1024, 768),
                work_area: Rect::new(0, 0, 1024, 768),
                is_primary: true,
                device_name: r"\\.\DISPLAY1".to_string(),
            }
        );
    }

    #[test]
    fn test_unusable_screens_skipped() {
        let screens = [
            RawScreen::new(1920, 0, 3_000_000_000, 1080),
            RawScreen::new(0, 0, 1920, 1080),
        ];
        let registry = rebuild_registry(&screens, Rect::EMPTY, 0, FALLBACK);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.primary().bounds, Rect::new(0, 0, 1920, 1080));

        let oversized = [RawScreen::new(i32::MAX - 100, 0, 1920, 1080)];
        let registry = rebuild_registry(&oversized, Rect::EMPTY, 0, FALLBACK);
        assert_eq!(registry.primary().bounds, Rect::new(0, 0, 1024, 768));
    }

    #[test]
    fn test_work_area_intersection_per_monitor() {
        // A panel along the top of the whole desktop.
        let work = Rect::new(0, 32, 5120, 1080);
        let registry = rebuild_registry(&three_screens(), work, 0, FALLBACK);
        let areas: Vec<Rect> = registry.records().iter().map(|r| r.work_area).collect();
        assert_eq!(
            areas,
            vec![
                Rect::new(0, 32, 1920, 1080),
                Rect::new(1920, 32, 3840, 1080),
                Rect::new(3840, 32, 5120, 1024),
            ]
        );
    }

    #[test]
    fn test_work_area_disjoint_falls_back_to_bounds() {
        let work = Rect::new(0, 0, 1920, 1080);
        let registry = rebuild_registry(&three_screens(), work, 0, FALLBACK);
        for record in &registry.records()[1..] {
            assert_eq!(record.work_area, record.bounds);
        }
    }
}
