//! Hotplug example - rebuild the topology as monitors come and go.
//!
//! Usage:
//!   cargo run --example hotplug
//!
//! Steps through a scripted sequence of layouts, rebuilding after each
//! change and showing which handles from earlier generations are still
//! accepted.

use std::ops::ControlFlow;
use tracing::info;
use vscreen_topology::{DisplayTopology, RawScreen, StaticHost, TopologyConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut host = StaticHost::with_screens([RawScreen::new(0, 0, 1920, 1080)])
        .work_area(0, 0, 1920, 1050);
    let config = TopologyConfig::builder().primary_monitor(1).build()?;
    let topology = DisplayTopology::new(config, &host)?;
    let first = topology.snapshot();

    let steps = [
        // Laptop panel docked to the left of the external display.
        Some(vec![
            RawScreen::new(0, 0, 1280, 800),
            RawScreen::new(1280, 0, 1920, 1080),
        ]),
        // Third display added above.
        Some(vec![
            RawScreen::new(0, 280, 1280, 800),
            RawScreen::new(1280, 0, 1920, 1080),
            RawScreen::new(1280, -1200, 1920, 1200),
        ]),
        // Extension gone, fall back to the configured desktop.
        None,
    ];

    for screens in steps {
        host.set_screens(screens);
        let snap = topology.rebuild(&host);
        info!(
            "Generation {}: {} monitor(s), virtual screen {}",
            snap.id(),
            snap.monitor_count(),
            snap.virtual_rect()
        );
        snap.enumerate_monitors(None, |handle, bounds| {
            if let Ok(info) = snap.monitor_info(handle) {
                info!(
                    "  {} {} work {}{}",
                    info.device_name,
                    bounds,
                    info.work_area,
                    if info.is_primary { " (primary)" } else { "" }
                );
            }
            ControlFlow::Continue(())
        });
    }

    let stale = first.primary_handle();
    match topology.monitor_info(stale) {
        Ok(info) => info!("Handle {stale} still resolves to {}", info.device_name),
        Err(e) => info!("Handle {stale} from generation {} rejected: {e}", first.id()),
    }

    Ok(())
}
