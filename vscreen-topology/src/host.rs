//! Host windowing system collaborators.
//!
//! The topology core never talks to the display server directly. Everything
//! it needs from the host goes through [`HostDisplay`], which keeps the
//! geometry logic testable with synthetic screen lists ([`StaticHost`]).

use crate::errors::HostError;
use serde::{Deserialize, Serialize};
use vscreen_common::Rect;

/// A physical output as reported by the host, in root coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawScreen {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl RawScreen {
    /// Create a new raw screen.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The screen as an edge-based rectangle.
    ///
    /// `None` when the far edges do not fit in i32 coordinates.
    pub fn rect(&self) -> Option<Rect> {
        let width = i32::try_from(self.width).ok()?;
        let height = i32::try_from(self.height).ok()?;
        Some(Rect::new(
            self.x,
            self.y,
            self.x.checked_add(width)?,
            self.y.checked_add(height)?,
        ))
    }

    /// Whether the screen has a zero dimension.
    pub const fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Type tag of a window property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    /// 32-bit unsigned integers (`XA_CARDINAL`).
    Cardinal,
    /// Any other atom, identified by its raw value.
    Other(u32),
}

/// Raw reply for a desktop property read from the root window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyReply {
    /// Declared type of the value.
    pub kind: PropertyType,
    /// Item width in bits (8, 16 or 32).
    pub format: u8,
    /// Items, widened to i64.
    pub values: Vec<i64>,
}

impl PropertyReply {
    /// A well-formed `CARDINAL`/32 reply.
    pub fn cardinal(values: impl Into<Vec<i64>>) -> Self {
        Self {
            kind: PropertyType::Cardinal,
            format: 32,
            values: values.into(),
        }
    }
}

/// Queries the topology core needs from the host windowing system.
pub trait HostDisplay {
    /// List the physical outputs of the multi-display extension.
    ///
    /// Returns `Err` when the extension is absent, not linked or inactive.
    /// An empty list is allowed and is handled like unavailability.
    fn query_screen_topology(&self) -> Result<Vec<RawScreen>, HostError>;

    /// Read the desktop work-area property from the root window, if set.
    fn query_desktop_reserved_area(&self) -> Option<PropertyReply>;
}

impl<H: HostDisplay + ?Sized> HostDisplay for &H {
    fn query_screen_topology(&self) -> Result<Vec<RawScreen>, HostError> {
        (**self).query_screen_topology()
    }

    fn query_desktop_reserved_area(&self) -> Option<PropertyReply> {
        (**self).query_desktop_reserved_area()
    }
}

/// A host with a fixed, caller-supplied topology.
///
/// `screens: None` models a missing multi-display extension.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    screens: Option<Vec<RawScreen>>,
    work_area: Option<PropertyReply>,
}

impl StaticHost {
    /// A host without the multi-display extension and no work-area property.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// A host reporting the given screens.
    #[must_use]
    pub fn with_screens(screens: impl Into<Vec<RawScreen>>) -> Self {
        Self {
            screens: Some(screens.into()),
            work_area: None,
        }
    }

    /// Attach a raw work-area property reply.
    #[must_use]
    pub fn work_area_property(mut self, reply: PropertyReply) -> Self {
        self.work_area = Some(reply);
        self
    }

    /// Attach a well-formed work area `(x, y, width, height)`.
    #[must_use]
    pub fn work_area(self, x: i64, y: i64, width: i64, height: i64) -> Self {
        self.work_area_property(PropertyReply::cardinal([x, y, width, height]))
    }

    /// Replace the reported screens, as a hotplug would.
    pub fn set_screens(&mut self, screens: Option<Vec<RawScreen>>) {
        self.screens = screens;
    }
}

impl HostDisplay for StaticHost {
    fn query_screen_topology(&self) -> Result<Vec<RawScreen>, HostError> {
        self.screens
            .clone()
            .ok_or_else(|| HostError::Unavailable("no multi-display extension".to_string()))
    }

    fn query_desktop_reserved_area(&self) -> Option<PropertyReply> {
        self.work_area.clone()
    }
}
