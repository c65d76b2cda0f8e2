//! Screen and active-window geometry queries.

use std::env;

use super::{DeviceError, run_tool};

/// The rectangle of screen the capture engine should grab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureGeometry {
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    /// X display plus screen index, e.g. `:0.0`.
    pub display: String,
}

impl CaptureGeometry {
    /// `WxH` form for the grab input's `-video_size`.
    pub fn video_size(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Grab input reference: display plus pixel offset, e.g. `:0.0+64,32`.
    pub fn grab_input(&self) -> String {
        format!("{}+{},{}", self.display, self.offset_x, self.offset_y)
    }
}

/// Full-screen geometry for the given screen index, offset (0,0).
pub fn screen_geometry(screen: &str) -> Result<CaptureGeometry, DeviceError> {
    let display = display_target(screen)?;
    let listing = run_tool("xdpyinfo", &[])?;

    let (width, height) = parse_screen_dimensions(&listing, screen).ok_or_else(|| {
        DeviceError::Parse("xdpyinfo", format!("no dimensions for screen #{screen}"))
    })?;

    Ok(CaptureGeometry {
        width,
        height,
        offset_x: 0,
        offset_y: 0,
        display,
    })
}

/// Bounding box of the currently active window. Overrides screen geometry
/// when window capture is recorded as video.
pub fn active_window_geometry(screen: &str) -> Result<CaptureGeometry, DeviceError> {
    let display = display_target(screen)?;

    let root_props = run_tool("xprop", &["-root", "_NET_ACTIVE_WINDOW"])?;
    let window_id = parse_active_window_id(&root_props)
        .ok_or_else(|| DeviceError::Parse("xprop", "no active window id".to_string()))?;

    let info = run_tool("xwininfo", &["-id", &window_id])?;
    let (width, height, offset_x, offset_y) = parse_window_geometry(&info)
        .ok_or_else(|| DeviceError::Parse("xwininfo", format!("no geometry for {window_id}")))?;

    Ok(CaptureGeometry {
        width,
        height,
        offset_x,
        offset_y,
        display,
    })
}

/// `$DISPLAY` plus the screen index, e.g. `:0` + `0` -> `:0.0`.
fn display_target(screen: &str) -> Result<String, DeviceError> {
    let display = env::var("DISPLAY").map_err(|_| DeviceError::DisplayUnset)?;
    Ok(format!("{display}.{screen}"))
}

/// Pull `dimensions: WxH pixels` out of the `screen #N:` block.
pub(crate) fn parse_screen_dimensions(listing: &str, screen: &str) -> Option<(u32, u32)> {
    let header = format!("screen #{screen}:");
    let mut in_screen = false;

    for line in listing.lines() {
        if line.contains(&header) {
            in_screen = true;
            continue;
        }
        if in_screen && line.trim_start().starts_with("dimensions:") {
            let size = line.split_whitespace().nth(1)?;
            let (w, h) = size.split_once('x')?;
            return Some((w.parse().ok()?, h.parse().ok()?));
        }
    }

    None
}

/// Window id from `_NET_ACTIVE_WINDOW(WINDOW): window id # 0x3400007`.
pub(crate) fn parse_active_window_id(props: &str) -> Option<String> {
    let line = props
        .lines()
        .find(|line| line.contains("_NET_ACTIVE_WINDOW"))?;
    let id = line.split_whitespace().last()?;
    if !id.starts_with("0x") {
        return None;
    }
    Some(id.to_string())
}

/// Width/height plus absolute upper-left position from `xwininfo` output.
pub(crate) fn parse_window_geometry(info: &str) -> Option<(u32, u32, i32, i32)> {
    let mut width = None;
    let mut height = None;
    let mut x = None;
    let mut y = None;

    for line in info.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("Absolute upper-left X:") {
            x = value.trim().parse().ok();
        } else if let Some(value) = line.strip_prefix("Absolute upper-left Y:") {
            y = value.trim().parse().ok();
        } else if let Some(value) = line.strip_prefix("Width:") {
            width = value.trim().parse().ok();
        } else if let Some(value) = line.strip_prefix("Height:") {
            height = value.trim().parse().ok();
        }
    }

    Some((width?, height?, x?, y?))
}
