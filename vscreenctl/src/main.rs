mod args;
mod layout;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::ops::ControlFlow;
use tracing::{debug, info, warn};
use vscreen_topology::{
    DesktopMode, DisplayTopology, Generation, HostDisplay, MonitorInfo, Point, Rect, StaticHost,
    TopologyConfig,
};

use crate::args::{Args, Command, Space};
use crate::layout::Layout;

fn init_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("vscreenctl={log_level},vscreen_topology={log_level}").into()
            }),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// The host plus the root size it reports, if any.
fn open_host(args: &Args) -> Result<(Box<dyn HostDisplay>, Option<(u32, u32)>)> {
    if let Some(path) = &args.layout {
        let layout = Layout::load(path)?;
        info!("Using layout {}", path.display());
        return Ok((Box::new(layout.into_host()), None));
    }

    #[cfg(feature = "x11")]
    {
        match vscreen_topology::x11::X11Host::connect(args.display.as_deref()) {
            Ok(host) => {
                let size = host.root_size();
                return Ok((Box::new(host), Some((size.width, size.height))));
            }
            Err(e) => warn!("X server unavailable ({e}), using default desktop"),
        }
    }
    #[cfg(not(feature = "x11"))]
    if args.display.is_some() {
        warn!("Built without the x11 feature, --display is ignored");
    }

    Ok((Box::new(StaticHost::unavailable()), None))
}

fn load_config(args: &Args, root_size: Option<(u32, u32)>) -> Result<TopologyConfig> {
    let base = match &args.config {
        Some(path) => TopologyConfig::load(path)?,
        None => TopologyConfig::default(),
    };
    let from_file = args.config.is_some();

    let mut builder = vscreen_topology::config::TopologyConfigBuilder::from_config(base);
    if let Some(primary) = args.primary {
        builder = builder.primary_monitor(primary);
    }
    // Explicit size wins, then the config file, then the root window.
    if let Some((w, h)) = args.desktop.or(if from_file { None } else { root_size }) {
        builder = builder.desktop_size(w, h);
    }
    if args.virtual_desktop {
        builder = builder.mode(DesktopMode::Virtual);
    }
    Ok(builder.build()?)
}

#[derive(Serialize)]
struct Listing<'a> {
    generation: u64,
    virtual_rect: Rect,
    primary_rect: Rect,
    monitors: &'a [MonitorInfo],
}

fn monitor_infos(snap: &Generation) -> Result<Vec<MonitorInfo>> {
    snap.handles()
        .map(|h| snap.monitor_info(h).map_err(Into::into))
        .collect()
}

fn print_monitor(info: &MonitorInfo) {
    println!(
        "{:>3}  {:<14} {:<24} work {:<24}{}",
        info.handle,
        info.device_name,
        info.bounds.to_string(),
        info.work_area.to_string(),
        if info.is_primary { "  primary" } else { "" }
    );
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let (host, root_size) = open_host(&args)?;
    let config = load_config(&args, root_size)?;
    debug!("Configuration: {:?}", config);

    let topology = DisplayTopology::new(config, host.as_ref())
        .context("Invalid topology configuration")?;
    let snap = topology.snapshot();

    match args.command {
        Command::List => {
            let monitors = monitor_infos(&snap)?;
            if args.json {
                print_json(&Listing {
                    generation: snap.id(),
                    virtual_rect: snap.virtual_rect(),
                    primary_rect: snap.primary_rect(),
                    monitors: &monitors,
                })?;
            } else {
                for info in &monitors {
                    print_monitor(info);
                }
                println!("virtual screen {}", snap.virtual_rect());
            }
        }
        Command::Info { handle } => {
            let Some(h) = snap.handle_from_raw(handle) else {
                bail!("No monitor with handle {handle}");
            };
            let info = snap.monitor_info(h)?;
            if args.json {
                print_json(&info)?;
            } else {
                print_monitor(&info);
            }
        }
        Command::Enum { region } => {
            let mut visited = Vec::new();
            snap.enumerate_monitors(region, |h, bounds| {
                visited.push((h.raw().get(), bounds));
                ControlFlow::Continue(())
            });
            if args.json {
                print_json(&visited)?;
            } else {
                for (handle, bounds) in &visited {
                    println!("{handle:>3}  {bounds}");
                }
            }
        }
        Command::Map { from, x, y } => {
            let p = Point::new(x, y);
            let mapped = match from {
                Space::Root => snap.root_to_virtual(p),
                Space::Virtual => snap.virtual_to_root(p),
            };
            if args.json {
                print_json(&mapped)?;
            } else {
                println!("{mapped}");
            }
        }
        Command::Fullscreen { rect } => match snap.fullscreen_monitors(&rect) {
            Some(spanned) if args.json => print_json(&spanned)?,
            Some(spanned) => println!(
                "top {} bottom {} left {} right {}",
                spanned.top, spanned.bottom, spanned.left, spanned.right
            ),
            None => bail!("No monitor arrangement matches {rect}"),
        },
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose)?;
    debug!("Starting vscreenctl {}", env!("CARGO_PKG_VERSION"));

    run(args)
}
