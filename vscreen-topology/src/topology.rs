//! The query interface and generation publishing.
//!
//! A [`DisplayTopology`] owns the current [`Generation`]. Rebuilds assemble a
//! complete new generation off to the side and publish it with a single
//! `Arc` swap, so readers never see a half-updated registry.

use crate::config::{DesktopMode, TopologyConfig};
use crate::discovery::ScreenDiscovery;
use crate::errors::TopologyError;
use crate::host::HostDisplay;
use crate::registry::{rebuild_registry, MonitorHandle, MonitorRecord};
use crate::translate::{self, translate, TranslatedRegistry};
use crate::work_area::query_work_area;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{debug, info};
use vscreen_common::{Point, Rect};

/// Geometry of one monitor as returned by [`Generation::monitor_info`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorInfo {
    /// Position in enumeration order, starting at 1.
    pub handle: u32,
    /// Monitor rectangle in virtual desktop coordinates.
    pub bounds: Rect,
    /// Usable area in virtual desktop coordinates.
    pub work_area: Rect,
    /// Whether this is the primary monitor.
    pub is_primary: bool,
    /// `\\.\DISPLAY<n>` identifier.
    pub device_name: String,
}

impl MonitorInfo {
    fn from_record(handle: MonitorHandle, record: &MonitorRecord) -> Self {
        Self {
            handle: handle.raw().get(),
            bounds: record.bounds,
            work_area: record.work_area,
            is_primary: record.is_primary,
            device_name: record.device_name.clone(),
        }
    }
}

/// Origin and clip box of a drawing surface, in virtual coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceClip {
    /// Surface origin; monitor rectangles are shifted by its negation.
    pub origin: Point,
    /// Visible part of the surface, in surface coordinates.
    pub clip_box: Rect,
}

/// Monitors whose edges match a fullscreen rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FullscreenMonitors {
    /// Monitor holding the top edge.
    pub top: usize,
    /// Monitor holding the bottom edge.
    pub bottom: usize,
    /// Monitor holding the left edge.
    pub left: usize,
    /// Monitor holding the right edge.
    pub right: usize,
}

/// One complete, immutable set of translated monitors.
#[derive(Debug)]
pub struct Generation {
    id: u64,
    registry: TranslatedRegistry,
}

impl Generation {
    /// Generation counter, incremented on every rebuild.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Number of monitors, at least one.
    pub fn monitor_count(&self) -> usize {
        self.registry.records().len()
    }

    /// Translated records in enumeration order.
    pub fn records(&self) -> &[MonitorRecord] {
        self.registry.records()
    }

    fn handle(&self, index: usize) -> MonitorHandle {
        MonitorHandle::new(self.id, index)
    }

    /// Handles of all monitors in enumeration order.
    pub fn handles(&self) -> impl Iterator<Item = MonitorHandle> + '_ {
        (0..self.monitor_count()).map(|i| self.handle(i))
    }

    /// Handle of the primary monitor.
    pub fn primary_handle(&self) -> MonitorHandle {
        self.handle(self.registry.primary_index())
    }

    /// Resolve a raw `index + 1` value against this generation.
    pub fn handle_from_raw(&self, raw: u32) -> Option<MonitorHandle> {
        let index = usize::try_from(raw).ok()?.checked_sub(1)?;
        (index < self.monitor_count()).then(|| self.handle(index))
    }

    fn record(&self, handle: MonitorHandle) -> Option<&MonitorRecord> {
        if handle.generation() != self.id {
            return None;
        }
        self.registry.records().get(handle.index())
    }

    /// Look up a monitor.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::NotFound`] if the handle was issued by another
    /// generation or its index is out of range.
    pub fn monitor_info(&self, handle: MonitorHandle) -> Result<MonitorInfo, TopologyError> {
        self.record(handle)
            .map(|record| MonitorInfo::from_record(handle, record))
            .ok_or(TopologyError::NotFound(handle))
    }

    /// Visit monitors intersecting `region` (all if `None`) in index order.
    ///
    /// The visitor receives each monitor's full bounds. Returns `false` if the
    /// visitor stopped the enumeration.
    pub fn enumerate_monitors<F>(&self, region: Option<Rect>, mut visitor: F) -> bool
    where
        F: FnMut(MonitorHandle, Rect) -> ControlFlow<()>,
    {
        for (i, record) in self.records().iter().enumerate() {
            if region.is_some_and(|r| !r.intersects(&record.bounds)) {
                continue;
            }
            if visitor(self.handle(i), record.bounds).is_break() {
                return false;
            }
        }
        true
    }

    /// Visit monitors visible through a drawing surface.
    ///
    /// Monitor rectangles are moved into surface coordinates and clipped to
    /// `clip.clip_box ∩ region`; the visitor receives the clipped rectangle.
    /// Nothing is visited when that limit is empty. Returns `false` if the
    /// visitor stopped the enumeration.
    pub fn enumerate_monitors_clipped<F>(
        &self,
        clip: DeviceClip,
        region: Option<Rect>,
        mut visitor: F,
    ) -> bool
    where
        F: FnMut(MonitorHandle, Rect) -> ControlFlow<()>,
    {
        let limit = match region {
            Some(r) => match clip.clip_box.intersect(&r) {
                Some(limit) => limit,
                None => return true,
            },
            None => clip.clip_box,
        };

        for (i, record) in self.records().iter().enumerate() {
            let shifted = record.bounds.relative_to(clip.origin);
            let Some(visible) = shifted.intersect(&limit) else {
                continue;
            };
            if visitor(self.handle(i), visible).is_break() {
                return false;
            }
        }
        true
    }

    /// Bounds of the primary monitor.
    pub fn primary_rect(&self) -> Rect {
        self.registry.primary().bounds
    }

    /// Union of all monitor bounds.
    pub fn virtual_rect(&self) -> Rect {
        self.registry.virtual_rect()
    }

    /// Map a root-window point into virtual desktop coordinates.
    pub fn root_to_virtual(&self, p: Point) -> Point {
        translate::root_to_virtual(&self.registry.virtual_rect(), p)
    }

    /// Map a virtual desktop point into root-window coordinates.
    pub fn virtual_to_root(&self, p: Point) -> Point {
        translate::virtual_to_root(&self.registry.virtual_rect(), p)
    }

    /// Find the monitors spanned by a fullscreen rectangle.
    ///
    /// For each edge of `rect`, picks the first intersecting monitor whose
    /// matching edge coincides. Returns `None` if some edge has no match.
    pub fn fullscreen_monitors(&self, rect: &Rect) -> Option<FullscreenMonitors> {
        let mut top = None;
        let mut bottom = None;
        let mut left = None;
        let mut right = None;

        for (i, record) in self.records().iter().enumerate() {
            let b = &record.bounds;
            if !b.intersects(rect) {
                continue;
            }
            if b.top == rect.top {
                top.get_or_insert(i);
            }
            if b.bottom == rect.bottom {
                bottom.get_or_insert(i);
            }
            if b.left == rect.left {
                left.get_or_insert(i);
            }
            if b.right == rect.right {
                right.get_or_insert(i);
            }
        }

        Some(FullscreenMonitors {
            top: top?,
            bottom: bottom?,
            left: left?,
            right: right?,
        })
    }

    fn log(&self) {
        for (handle, record) in self.handles().zip(self.records()) {
            debug!(
                "monitor {}: {} work {}{}",
                handle,
                record.bounds,
                record.work_area,
                if record.is_primary { " (primary)" } else { "" }
            );
        }
        let primary = self.primary_rect();
        info!(
            "virtual size: {} primary size: {}x{}",
            self.virtual_rect(),
            primary.width(),
            primary.height()
        );
    }
}

struct WriterState {
    config: TopologyConfig,
    discovery: ScreenDiscovery,
    next_id: u64,
}

/// Process-wide display topology with single-writer, many-reader access.
pub struct DisplayTopology {
    current: RwLock<Arc<Generation>>,
    writer: Mutex<WriterState>,
}

impl DisplayTopology {
    /// Validate `config` and build the first generation from `host`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new<H: HostDisplay + ?Sized>(
        config: TopologyConfig,
        host: &H,
    ) -> Result<Self, TopologyError> {
        config.validate()?;
        let mut state = WriterState {
            discovery: ScreenDiscovery::new(config.default_size()),
            config,
            next_id: 1,
        };
        let first = Self::build(&mut state, host);
        Ok(Self {
            current: RwLock::new(first),
            writer: Mutex::new(state),
        })
    }

    /// The current generation.
    ///
    /// Hold on to the returned `Arc` to run several queries against one
    /// consistent generation.
    pub fn snapshot(&self) -> Arc<Generation> {
        Arc::clone(&self.current.read())
    }

    /// Current generation counter.
    pub fn generation(&self) -> u64 {
        self.current.read().id()
    }

    /// The active configuration.
    pub fn config(&self) -> TopologyConfig {
        self.writer.lock().config.clone()
    }

    /// Rebuild from `host`, e.g. after a hotplug notification.
    pub fn rebuild<H: HostDisplay + ?Sized>(&self, host: &H) -> Arc<Generation> {
        let mut state = self.writer.lock();
        let next = Self::build(&mut state, host);
        *self.current.write() = Arc::clone(&next);
        next
    }

    /// Replace the configuration and rebuild.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid; the current generation and
    /// configuration are then left untouched.
    pub fn reconfigure<H: HostDisplay + ?Sized>(
        &self,
        config: TopologyConfig,
        host: &H,
    ) -> Result<Arc<Generation>, TopologyError> {
        config.validate()?;
        let mut state = self.writer.lock();
        state.config = config;
        let next = Self::build(&mut state, host);
        *self.current.write() = Arc::clone(&next);
        Ok(next)
    }

    fn build<H: HostDisplay + ?Sized>(state: &mut WriterState, host: &H) -> Arc<Generation> {
        let default_size = state.config.default_size();
        let (screens, work_area) = match state.config.mode {
            DesktopMode::Native => (
                state.discovery.discover(host, default_size),
                query_work_area(host),
            ),
            DesktopMode::Virtual => (state.discovery.use_default(default_size), Rect::EMPTY),
        };

        let registry = rebuild_registry(
            screens.as_slice(),
            work_area,
            state.config.primary_monitor,
            default_size.screen(),
        );
        let generation = Generation {
            id: state.next_id,
            registry: translate(registry),
        };
        state.next_id += 1;
        generation.log();
        Arc::new(generation)
    }

    /// See [`Generation::monitor_info`].
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::NotFound`] for stale or out-of-range handles.
    pub fn monitor_info(&self, handle: MonitorHandle) -> Result<MonitorInfo, TopologyError> {
        self.snapshot().monitor_info(handle)
    }

    /// See [`Generation::enumerate_monitors`].
    pub fn enumerate_monitors<F>(&self, region: Option<Rect>, visitor: F) -> bool
    where
        F: FnMut(MonitorHandle, Rect) -> ControlFlow<()>,
    {
        self.snapshot().enumerate_monitors(region, visitor)
    }

    /// See [`Generation::enumerate_monitors_clipped`].
    pub fn enumerate_monitors_clipped<F>(
        &self,
        clip: DeviceClip,
        region: Option<Rect>,
        visitor: F,
    ) -> bool
    where
        F: FnMut(MonitorHandle, Rect) -> ControlFlow<()>,
    {
        self.snapshot()
            .enumerate_monitors_clipped(clip, region, visitor)
    }

    /// Bounds of the current primary monitor.
    pub fn primary_rect(&self) -> Rect {
        self.snapshot().primary_rect()
    }

    /// Current virtual screen rectangle.
    pub fn virtual_rect(&self) -> Rect {
        self.snapshot().virtual_rect()
    }

    /// See [`Generation::root_to_virtual`].
    pub fn root_to_virtual(&self, p: Point) -> Point {
        self.snapshot().root_to_virtual(p)
    }

    /// See [`Generation::virtual_to_root`].
    pub fn virtual_to_root(&self, p: Point) -> Point {
        self.snapshot().virtual_to_root(p)
    }

    /// See [`Generation::fullscreen_monitors`].
    pub fn fullscreen_monitors(&self, rect: &Rect) -> Option<FullscreenMonitors> {
        self.snapshot().fullscreen_monitors(rect)
    }
}

impl std::fmt::Debug for DisplayTopology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let current = self.snapshot();
        f.debug_struct("DisplayTopology")
            .field("generation", &current.id())
            .field("monitor_count", &current.monitor_count())
            .field("virtual_rect", &current.virtual_rect())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{RawScreen, StaticHost};
    use pretty_assertions::assert_eq;

    fn side_by_side() -> StaticHost {
        StaticHost::with_screens([
            RawScreen::new(0, 0, 1920, 1080),
            RawScreen::new(1920, 0, 1920, 1080),
            RawScreen::new(3840, 0, 1920, 1080),
        ])
    }

    fn topology(host: &StaticHost) -> DisplayTopology {
        DisplayTopology::new(TopologyConfig::default(), host).unwrap()
    }

    #[test]
    fn test_topology_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DisplayTopology>();
        assert_send_sync::<Arc<Generation>>();
    }

    #[test]
    fn test_monitor_info() {
        let topo = topology(&side_by_side());
        let snap = topo.snapshot();
        let handles: Vec<_> = snap.handles().collect();
        assert_eq!(handles.len(), 3);
        assert_eq!(snap.primary_handle(), handles[0]);

        let info = topo.monitor_info(handles[1]).unwrap();
        assert_eq!(
            info,
            MonitorInfo {
                handle: 2,
                bounds: Rect::new(1920, 0, 3840, 1080),
                work_area: Rect::new(1920, 0, 3840, 1080),
                is_primary: false,
                device_name: r"\\.\DISPLAY2".to_string(),
            }
        );
    }

    #[test]
    fn test_handle_from_raw() {
        let topo = topology(&side_by_side());
        let snap = topo.snapshot();
        assert_eq!(snap.handle_from_raw(0), None);
        assert_eq!(snap.handle_from_raw(4), None);
        let handle = snap.handle_from_raw(3).unwrap();
        assert_eq!(handle.raw().get(), 3);
        assert!(snap.monitor_info(handle).unwrap().device_name.ends_with('3'));
    }

    #[test]
    fn test_enumerate_all_and_stop_early() {
        let topo = topology(&side_by_side());

        let mut seen = Vec::new();
        assert!(topo.enumerate_monitors(None, |h, _| {
            seen.push(h.raw().get());
            ControlFlow::Continue(())
        }));
        assert_eq!(seen, vec![1, 2, 3]);

        let mut calls = 0;
        assert!(!topo.enumerate_monitors(None, |_, _| {
            calls += 1;
            ControlFlow::Break(())
        }));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_enumerate_region() {
        let topo = topology(&side_by_side());
        let mut seen = Vec::new();
        topo.enumerate_monitors(Some(Rect::new(1900, 10, 1950, 20)), |h, r| {
            seen.push((h.raw().get(), r));
            ControlFlow::Continue(())
        });
        assert_eq!(
            seen,
            vec![
                (1, Rect::new(0, 0, 1920, 1080)),
                (2, Rect::new(1920, 0, 3840, 1080)),
            ]
        );

        let mut calls = 0;
        assert!(topo.enumerate_monitors(Some(Rect::new(0, 2000, 10, 2010)), |_, _| {
            calls += 1;
            ControlFlow::Continue(())
        }));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_enumerate_clipped() {
        let topo = topology(&side_by_side());
        // A surface whose origin sits at x=1000 and shows 2000x500 pixels.
        let clip = DeviceClip {
            origin: Point::new(1000, 0),
            clip_box: Rect::new(0, 0, 2000, 500),
        };
        let mut seen = Vec::new();
        assert!(topo.enumerate_monitors_clipped(clip, None, |h, r| {
            seen.push((h.raw().get(), r));
            ControlFlow::Continue(())
        }));
        assert_eq!(
            seen,
            vec![
                (1, Rect::new(0, 0, 920, 500)),
                (2, Rect::new(920, 0, 2000, 500)),
            ]
        );

        seen.clear();
        topo.enumerate_monitors_clipped(clip, Some(Rect::new(1000, 0, 1100, 10)), |h, r| {
            seen.push((h.raw().get(), r));
            ControlFlow::Continue(())
        });
        assert_eq!(seen, vec![(2, Rect::new(1000, 0, 1100, 10))]);

        // Monitors pushed past the end of the range are out of sight.
        seen.clear();
        let far = DeviceClip {
            origin: Point::new(i32::MIN, 0),
            clip_box: Rect::new(i32::MAX - 100, 0, i32::MAX, 10),
        };
        assert!(topo.enumerate_monitors_clipped(far, None, |h, r| {
            seen.push((h.raw().get(), r));
            ControlFlow::Continue(())
        }));
        assert!(seen.is_empty());

        let near = DeviceClip {
            origin: Point::new(i32::MAX, 0),
            clip_box: Rect::new(i32::MIN + 1, 0, i32::MIN + 101, 10),
        };
        topo.enumerate_monitors_clipped(near, None, |h, r| {
            seen.push((h.raw().get(), r));
            ControlFlow::Continue(())
        });
        assert_eq!(seen, vec![(1, Rect::new(i32::MIN + 1, 0, i32::MIN + 101, 10))]);

        let mut calls = 0;
        assert!(topo.enumerate_monitors_clipped(
            clip,
            Some(Rect::new(5000, 0, 5100, 10)),
            |_, _| {
                calls += 1;
                ControlFlow::Continue(())
            }
        ));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_primary_and_virtual_rect() {
        let config = TopologyConfig::builder().primary_monitor(1).build().unwrap();
        let topo = DisplayTopology::new(config, &side_by_side()).unwrap();
        assert_eq!(topo.primary_rect(), Rect::new(0, 0, 1920, 1080));
        assert_eq!(topo.virtual_rect(), Rect::new(-1920, 0, 3840, 1080));

        let root = Point::new(0, 0);
        assert_eq!(topo.root_to_virtual(root), Point::new(-1920, 0));
        assert_eq!(topo.virtual_to_root(topo.root_to_virtual(root)), root);
    }

    #[test]
    fn test_fullscreen_monitors() {
        let topo = topology(&side_by_side());
        let span = Rect::new(0, 0, 3840, 1080);
        assert_eq!(
            topo.fullscreen_monitors(&span),
            Some(FullscreenMonitors {
                top: 0,
                bottom: 0,
                left: 0,
                right: 1,
            })
        );
        assert_eq!(topo.fullscreen_monitors(&Rect::new(0, 0, 3000, 1080)), None);
    }

    #[test]
    fn test_virtual_mode_ignores_host() {
        let config = TopologyConfig::builder()
            .mode(DesktopMode::Virtual)
            .desktop_size(800, 600)
            .build()
            .unwrap();
        let host = side_by_side().work_area(0, 30, 5760, 1050);
        let topo = DisplayTopology::new(config, &host).unwrap();
        let snap = topo.snapshot();
        assert_eq!(snap.monitor_count(), 1);
        assert_eq!(snap.records()[0].bounds, Rect::new(0, 0, 800, 600));
        assert_eq!(snap.records()[0].work_area, Rect::new(0, 0, 800, 600));
    }

    #[test]
    fn test_reconfigure_rejects_invalid() {
        let host = side_by_side();
        let topo = topology(&host);
        let before = topo.generation();
        let bad = TopologyConfig {
            desktop: crate::config::DesktopConfig {
                width: 0,
                height: 0,
            },
            ..TopologyConfig::default()
        };
        assert!(topo.reconfigure(bad, &host).is_err());
        assert_eq!(topo.generation(), before);

        let good = TopologyConfig::builder().primary_monitor(2).build().unwrap();
        let next = topo.reconfigure(good, &host).unwrap();
        assert_eq!(next.id(), before + 1);
        assert_eq!(next.primary_handle().raw().get(), 3);
        assert_eq!(topo.config().primary_monitor, 2);
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut host = side_by_side();
        let topo = topology(&host);
        let old = topo.snapshot().handles().nth(2).unwrap();

        host.set_screens(Some(vec![RawScreen::new(0, 0, 1920, 1080)]));
        let next = topo.rebuild(&host);
        assert_eq!(next.monitor_count(), 1);

        let err = topo.monitor_info(old).unwrap_err();
        assert!(err.is_stale_handle());

        // Same index, older generation.
        let first_old = MonitorHandle::new(old.generation(), 0);
        assert!(topo.monitor_info(first_old).is_err());
    }
}
