//! Screen discovery with single-screen fallback.

use crate::host::{HostDisplay, RawScreen};
use tracing::debug;
use vscreen_common::Rect;

/// Size of the synthetic desktop used when the host reports no screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl DefaultSize {
    /// Create a new default size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The synthetic screen at the root origin.
    pub const fn screen(&self) -> RawScreen {
        RawScreen::new(0, 0, self.width, self.height)
    }
}

/// Result of the latest discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screens {
    /// Screens reported by the multi-display extension, at least one.
    Discovered(Vec<RawScreen>),
    /// The extension was unusable; one synthetic screen covers the desktop.
    Default(RawScreen),
}

impl Screens {
    /// The screens in discovery order. Never empty.
    pub fn as_slice(&self) -> &[RawScreen] {
        match self {
            Self::Discovered(screens) => screens,
            Self::Default(screen) => std::slice::from_ref(screen),
        }
    }

    /// Whether the fallback path was taken.
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default(_))
    }
}

/// Owns the result of the last host query.
///
/// Each [`discover`](Self::discover) call replaces the previous list; the
/// fallback screen is a separate variant and never aliases discovered data.
#[derive(Debug)]
pub struct ScreenDiscovery {
    current: Screens,
}

impl ScreenDiscovery {
    /// Start with the fallback screen of `default_size`.
    pub fn new(default_size: DefaultSize) -> Self {
        Self {
            current: Screens::Default(default_size.screen()),
        }
    }

    /// Screens from the last discovery.
    pub fn current(&self) -> &Screens {
        &self.current
    }

    /// Query the host and store the result.
    ///
    /// Unavailability and empty replies are not errors; both yield the
    /// synthetic default screen. Screens rejected by [`usable_screens`] are
    /// dropped first.
    pub fn discover<H: HostDisplay + ?Sized>(
        &mut self,
        host: &H,
        default_size: DefaultSize,
    ) -> &Screens {
        self.current = match host.query_screen_topology() {
            Ok(screens) => {
                let reported = screens.len();
                let screens = usable_screens(&screens);
                if reported != screens.len() {
                    debug!(
                        "Dropped {} unusable screen(s) of {}",
                        reported - screens.len(),
                        reported
                    );
                }
                if screens.is_empty() {
                    debug!("Host reported no usable screens, using default desktop");
                    Screens::Default(default_size.screen())
                } else {
                    debug!("Host reported {} screen(s)", screens.len());
                    Screens::Discovered(screens)
                }
            }
            Err(err) => {
                debug!("Screen query unavailable ({err}), using default desktop");
                Screens::Default(default_size.screen())
            }
        };
        &self.current
    }

    /// Reset to the fallback screen without asking the host.
    pub fn use_default(&mut self, default_size: DefaultSize) -> &Screens {
        self.current = Screens::Default(default_size.screen());
        &self.current
    }

    /// Take the current screens out, leaving the fallback in place.
    pub fn take(&mut self, default_size: DefaultSize) -> Screens {
        std::mem::replace(&mut self.current, Screens::Default(default_size.screen()))
    }
}

/// Keep the screens that can take part in a topology, in order.
///
/// A screen is dropped when it has a zero dimension, when its edges do not
/// fit in i32 coordinates, or when adding it would stretch the combined
/// extent of the kept screens past `i32::MAX` on either axis. Within that
/// extent every edge-to-edge distance fits in an i32.
pub fn usable_screens(screens: &[RawScreen]) -> Vec<RawScreen> {
    let mut kept = Vec::with_capacity(screens.len());
    let mut extent: Option<Rect> = None;

    for screen in screens {
        if screen.is_degenerate() {
            debug!("Dropping degenerate screen {:?}", screen);
            continue;
        }
        let Some(rect) = screen.rect() else {
            debug!("Dropping screen {:?}: edges out of range", screen);
            continue;
        };
        let grown = extent.map_or(rect, |e| e.union(&rect));
        if !fits(grown.left, grown.right) || !fits(grown.top, grown.bottom) {
            debug!("Dropping screen {:?}: desktop span out of range", screen);
            continue;
        }
        extent = Some(grown);
        kept.push(*screen);
    }
    kept
}

fn fits(low: i32, high: i32) -> bool {
    i64::from(high) - i64::from(low) <= i64::from(i32::MAX)
}

/// One-shot discovery.
pub fn discover_screens<H: HostDisplay + ?Sized>(host: &H, default_size: DefaultSize) -> Screens {
    let mut discovery = ScreenDiscovery::new(default_size);
    discovery.discover(host, default_size);
    discovery.take(default_size)
}
