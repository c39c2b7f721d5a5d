//! X11 host backend: Xinerama screens and the `_NET_WORKAREA` property.
//!
//! Only available with the `x11` feature.

use crate::discovery::DefaultSize;
use crate::errors::HostError;
use crate::host::{HostDisplay, PropertyReply, PropertyType, RawScreen};
use tracing::{debug, trace};
use x11rb::connection::Connection;
use x11rb::protocol::xinerama::ConnectionExt as _;
use x11rb::protocol::xproto::{Atom, AtomEnum, ConnectionExt as _, Window};
use x11rb::rust_connection::RustConnection;

/// A connection to an X server used as the topology host.
pub struct X11Host {
    conn: RustConnection,
    root: Window,
    root_size: DefaultSize,
    workarea: Atom,
}

impl X11Host {
    /// Connect to `display` (or `$DISPLAY` when `None`).
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be reached or the default screen
    /// is missing from the setup.
    pub fn connect(display: Option<&str>) -> Result<Self, HostError> {
        let (conn, screen_num) =
            x11rb::connect(display).map_err(|e| HostError::Connection(e.to_string()))?;

        let screen = conn
            .setup()
            .roots
            .get(screen_num)
            .ok_or_else(|| HostError::Protocol(format!("No screen {screen_num} in setup")))?;
        let root = screen.root;
        let root_size = DefaultSize::new(
            u32::from(screen.width_in_pixels),
            u32::from(screen.height_in_pixels),
        );

        let workarea = conn
            .intern_atom(false, b"_NET_WORKAREA")
            .map_err(|e| HostError::Connection(e.to_string()))?
            .reply()
            .map_err(|e| HostError::Protocol(e.to_string()))?
            .atom;

        debug!(
            "Connected to X server, root {:#x} {}x{}",
            root, root_size.width, root_size.height
        );

        Ok(Self {
            conn,
            root,
            root_size,
            workarea,
        })
    }

    /// Size of the default root window, the natural default desktop size.
    pub fn root_size(&self) -> DefaultSize {
        self.root_size
    }
}

impl HostDisplay for X11Host {
    fn query_screen_topology(&self) -> Result<Vec<RawScreen>, HostError> {
        let active = self
            .conn
            .xinerama_is_active()
            .map_err(|e| HostError::Unavailable(e.to_string()))?
            .reply()
            .map_err(|e| HostError::Unavailable(e.to_string()))?
            .state;
        if active == 0 {
            return Err(HostError::Unavailable("Xinerama is not active".to_string()));
        }

        let reply = self
            .conn
            .xinerama_query_screens()
            .map_err(|e| HostError::Unavailable(e.to_string()))?
            .reply()
            .map_err(|e| HostError::Protocol(e.to_string()))?;

        Ok(reply
            .screen_info
            .iter()
            .map(|s| {
                RawScreen::new(
                    i32::from(s.x_org),
                    i32::from(s.y_org),
                    u32::from(s.width),
                    u32::from(s.height),
                )
            })
            .collect())
    }

    fn query_desktop_reserved_area(&self) -> Option<PropertyReply> {
        let reply = self
            .conn
            .get_property(false, self.root, self.workarea, AtomEnum::ANY, 0, u32::MAX)
            .ok()?
            .reply()
            .ok()?;
        if reply.type_ == x11rb::NONE {
            trace!("_NET_WORKAREA is not set");
            return None;
        }

        let kind = if reply.type_ == u32::from(AtomEnum::CARDINAL) {
            PropertyType::Cardinal
        } else {
            PropertyType::Other(reply.type_)
        };
        let values: Vec<i64> = match reply.format {
            32 => reply
                .value32()
                .map(|v| v.map(|x| i64::from(x as i32)).collect()),
            16 => reply.value16().map(|v| v.map(i64::from).collect()),
            8 => reply.value8().map(|v| v.map(i64::from).collect()),
            _ => None,
        }
        .unwrap_or_default();

        Some(PropertyReply {
            kind,
            format: reply.format,
            values,
        })
    }
}
