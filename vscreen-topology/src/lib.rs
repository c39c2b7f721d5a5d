//! Virtual screen topology for a Windows-style multi-monitor desktop.
//!
//! This crate discovers the physical outputs of the host windowing system,
//! assigns each a logical identity and device name, and maps them into a
//! virtual desktop coordinate space whose origin is the primary monitor's
//! top-left corner. It answers the geometry queries window placement needs:
//! monitor info by handle, enumeration over a region, primary and virtual
//! screen rectangles, and root/virtual point conversion.
//!
//! # Quick Start
//!
//! ```
//! use std::ops::ControlFlow;
//! use vscreen_topology::{DisplayTopology, RawScreen, StaticHost, TopologyConfig};
//!
//! let host = StaticHost::with_screens([
//!     RawScreen::new(0, 0, 1280, 1024),
//!     RawScreen::new(1280, 0, 1920, 1080),
//! ])
//! .work_area(0, 0, 3200, 1040);
//!
//! let config = TopologyConfig::builder().primary_monitor(1).build()?;
//! let topology = DisplayTopology::new(config, &host)?;
//!
//! assert_eq!(topology.virtual_rect().left, -1280);
//! topology.enumerate_monitors(None, |handle, bounds| {
//!     println!("{handle}: {bounds}");
//!     ControlFlow::Continue(())
//! });
//! # Ok::<(), vscreen_topology::TopologyError>(())
//! ```
//!
//! # Architecture
//!
//! A rebuild runs bottom-up through the components:
//!
//! - **Discovery** ([`discovery`]): host screens, or one synthetic screen
//! - **Work area** ([`work_area`]): host reserved-area property, best effort
//! - **Registry** ([`registry`]): records, primary choice, device names
//! - **Translation** ([`translate`]): shift into virtual coordinates
//! - **Queries** ([`topology`]): read-only access to the published generation
//!
//! Host access goes through [`HostDisplay`]; the `x11` feature provides an
//! X server backend.
//!
//! # Error Handling
//!
//! Host failures never reach callers: a missing multi-display extension or a
//! malformed work-area property degrades to a defined fallback. The only
//! query error is [`TopologyError::NotFound`] for handles that do not belong
//! to the current generation.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod discovery;
pub mod errors;
pub mod host;
pub mod registry;
pub mod topology;
pub mod translate;
pub mod work_area;

#[cfg(feature = "x11")]
pub mod x11;

pub use config::{DesktopConfig, DesktopMode, TopologyConfig};
pub use discovery::{discover_screens, DefaultSize, ScreenDiscovery, Screens};
pub use errors::{HostError, TopologyError};
pub use host::{HostDisplay, PropertyReply, PropertyType, RawScreen, StaticHost};
pub use registry::{rebuild_registry, MonitorHandle, MonitorRecord, Registry};
pub use topology::{DeviceClip, DisplayTopology, FullscreenMonitors, Generation, MonitorInfo};
pub use translate::{translate, TranslatedRegistry};
pub use work_area::{query_work_area, work_area_for};

pub use vscreen_common::{Point, Rect};
