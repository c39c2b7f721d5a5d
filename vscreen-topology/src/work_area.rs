//! Desktop work-area resolution.
//!
//! The host publishes the usable desktop (minus panels and docks) as a
//! `CARDINAL`/32 property holding one `x, y, width, height` quadruple per
//! virtual desktop. Only the first quadruple is used.

use crate::host::{HostDisplay, PropertyReply, PropertyType};
use tracing::trace;
use vscreen_common::Rect;

/// Number of items describing one work area.
const QUAD: usize = 4;

/// Parse a raw work-area property.
///
/// Wrong type, wrong format and short replies yield [`Rect::EMPTY`].
pub fn parse_work_area(reply: &PropertyReply) -> Rect {
    if reply.kind != PropertyType::Cardinal || reply.format != 32 {
        trace!(
            "Ignoring work area property of type {:?}/{}",
            reply.kind,
            reply.format
        );
        return Rect::EMPTY;
    }
    for (i, quad) in reply.values.chunks_exact(QUAD).enumerate() {
        trace!("work area {}: {:?}", i, quad);
    }
    match reply.values.get(..QUAD) {
        Some(&[x, y, w, h]) => rect_from_quad(x, y, w, h).unwrap_or(Rect::EMPTY),
        _ => Rect::EMPTY,
    }
}

// Out-of-range values are malformed, not wrapped.
fn rect_from_quad(x: i64, y: i64, w: i64, h: i64) -> Option<Rect> {
    let left = i32::try_from(x).ok()?;
    let top = i32::try_from(y).ok()?;
    let right = i32::try_from(x.checked_add(w)?).ok()?;
    let bottom = i32::try_from(y.checked_add(h)?).ok()?;
    Some(Rect::new(left, top, right, bottom))
}

/// Ask the host for its work area, in root coordinates.
///
/// Returns [`Rect::EMPTY`] when the property is absent or malformed, meaning
/// "unknown, use full monitor bounds".
pub fn query_work_area<H: HostDisplay + ?Sized>(host: &H) -> Rect {
    host.query_desktop_reserved_area()
        .map(|reply| parse_work_area(&reply))
        .unwrap_or(Rect::EMPTY)
}

/// Usable part of `bounds` given the global work area.
///
/// Falls back to `bounds` when the two do not overlap.
pub fn clip_to_bounds(work_area: &Rect, bounds: &Rect) -> Rect {
    work_area.intersect(bounds).unwrap_or(*bounds)
}

/// Work area of an arbitrary rectangle, asking the host directly.
pub fn work_area_for<H: HostDisplay + ?Sized>(host: &H, rect: &Rect) -> Rect {
    clip_to_bounds(&query_work_area(host), rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StaticHost;

    #[test]
    fn test_parse_first_desktop() {
        let reply = PropertyReply::cardinal([0, 24, 1920, 1056, 0, 0, 1920, 1080]);
        assert_eq!(parse_work_area(&reply), Rect::new(0, 24, 1920, 1080));
    }

    #[test]
    fn test_parse_malformed() {
        let short = PropertyReply::cardinal([0, 24, 1920]);
        assert_eq!(parse_work_area(&short), Rect::EMPTY);

        let mut wrong_format = PropertyReply::cardinal([0, 24, 1920, 1056]);
        wrong_format.format = 16;
        assert_eq!(parse_work_area(&wrong_format), Rect::EMPTY);

        let mut wrong_type = PropertyReply::cardinal([0, 24, 1920, 1056]);
        wrong_type.kind = PropertyType::Other(31);
        assert_eq!(parse_work_area(&wrong_type), Rect::EMPTY);

        let overflow = PropertyReply::cardinal([i64::from(i32::MAX), 0, 10, 10]);
        assert_eq!(parse_work_area(&overflow), Rect::EMPTY);
    }

    #[test]
    fn test_query_absent() {
        assert_eq!(query_work_area(&StaticHost::unavailable()), Rect::EMPTY);
    }

    #[test]
    fn test_clip_to_bounds() {
        let bounds = Rect::new(1920, 0, 3840, 1080);
        let work = Rect::new(0, 30, 3840, 1080);
        assert_eq!(clip_to_bounds(&work, &bounds), Rect::new(1920, 30, 3840, 1080));
        assert_eq!(clip_to_bounds(&Rect::EMPTY, &bounds), bounds);

        let disjoint = Rect::new(0, 0, 1920, 1080);
        assert_eq!(clip_to_bounds(&disjoint, &bounds), bounds);
    }

    #[test]
    fn test_work_area_for() {
        let host = StaticHost::unavailable().work_area(0, 0, 1920, 1040);
        let rect = Rect::new(100, 1000, 200, 1100);
        assert_eq!(work_area_for(&host, &rect), Rect::new(100, 1000, 200, 1040));
        assert_eq!(work_area_for(&StaticHost::unavailable(), &rect), rect);
    }
}
