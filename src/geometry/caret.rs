//! Caret geometry resolver
//!
//! Popovers and the link dialog are positioned from the caret rect. Hosts
//! often report nothing for a collapsed caret (empty line, line start), so in
//! that case a zero-width marker is inserted, measured and removed again.

use crate::host::{Boundary, EditHost, HostResult};
use crate::models::{CaretRect, ZERO_WIDTH_SPACE};

/// On-screen rect of the live caret or selection, `None` when unavailable
///
/// Leaves the serialized document and the selection as they were.
pub fn resolve_caret_rect<H: EditHost>(host: &mut H) -> Option<CaretRect> {
    let range = host.current_range()?;
    if !host.range_in_surface(&range) {
        return None;
    }

    let native = host.range_rect(&range).filter(|rect| !rect.is_empty());
    if native.is_some() || !range.is_collapsed() {
        return native;
    }

    let measured = match measure_with_marker(host, &range.start) {
        Ok(rect) => rect,
        Err(e) => {
            log::debug!("caret marker measurement failed: {}", e);
            None
        }
    };
    if let Err(e) = host.set_current_range(&range) {
        log::warn!("could not restore selection after caret measurement: {}", e);
    }
    measured
}

fn measure_with_marker<H: EditHost>(
    host: &mut H,
    at: &Boundary<H::Node>,
) -> HostResult<Option<CaretRect>> {
    let marker = host.create_element("span")?;
    let placeholder = host.create_text(ZERO_WIDTH_SPACE)?;
    host.append_child(&marker, &placeholder)?;
    host.insert_at(at, &marker)?;

    let parent = host.parent(&marker);
    let rect = host.node_rect(&marker);

    host.remove_node(&marker)?;
    // Rejoin a text node the marker split in two
    if let Some(parent) = parent {
        host.normalize(&parent)?;
    }
    Ok(rect)
}
