use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vscreen_topology::Rect;

#[derive(Parser, Debug)]
#[command(name = "vscreenctl")]
#[command(about = "Inspect the virtual screen topology of the host or a layout file")]
#[command(version)]
pub struct Args {
    /// Layout file describing screens and work area (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub layout: Option<PathBuf>,

    /// Topology configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Preferred primary monitor index (overrides config)
    #[arg(long, value_name = "INDEX", env = "VSCREEN_PRIMARY")]
    pub primary: Option<usize>,

    /// Default desktop size used when no screens are found, e.g. 1024x768
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    pub desktop: Option<(u32, u32)>,

    /// Emulate a desktop window instead of the host root window
    #[arg(long)]
    pub virtual_desktop: bool,

    /// X display to query (requires the x11 feature)
    #[arg(long, value_name = "DISPLAY")]
    pub display: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all monitors
    List,
    /// Show one monitor by handle (1-based)
    Info {
        /// Monitor handle
        handle: u32,
    },
    /// Enumerate monitors intersecting a region
    Enum {
        /// Region as left,top,right,bottom in virtual coordinates
        #[arg(long, value_name = "L,T,R,B", value_parser = parse_rect)]
        region: Option<Rect>,
    },
    /// Convert a point between root and virtual coordinates
    Map {
        /// Coordinate space of the input point
        #[arg(value_enum)]
        from: Space,
        /// X coordinate
        #[arg(allow_negative_numbers = true)]
        x: i32,
        /// Y coordinate
        #[arg(allow_negative_numbers = true)]
        y: i32,
    },
    /// Find the monitors spanned by a fullscreen rectangle
    Fullscreen {
        /// Rectangle as left,top,right,bottom in virtual coordinates
        #[arg(value_parser = parse_rect, allow_hyphen_values = true)]
        rect: Rect,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    Root,
    Virtual,
}

/// Parse "WIDTHxHEIGHT".
pub fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Invalid size '{s}', expected WIDTHxHEIGHT"))?;
    let w = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid width: {w}"))?;
    let h = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid height: {h}"))?;
    Ok((w, h))
}

/// Parse "left,top,right,bottom".
pub fn parse_rect(s: &str) -> Result<Rect, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Invalid rectangle '{s}': {e}"))?;
    match parts.as_slice() {
        &[left, top, right, bottom] => Ok(Rect::new(left, top, right, bottom)),
        _ => Err(format!(
            "Invalid rectangle '{s}', expected left,top,right,bottom"
        )),
    }
}
