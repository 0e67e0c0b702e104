//! Template zone generation.
//!
//! Template layouts are described by a kind and a zone count; the zone
//! rectangles are derived from those two values whenever either changes.
//! Rectangles live in a square reference space of
//! [`ZONE_REFERENCE_EXTENT`] units per side and are scaled to a monitor's
//! work area by the consumer.

use crate::constants::layout::ZONE_REFERENCE_EXTENT;
use crate::models::LayoutKind;
use serde::{Deserialize, Serialize};

/// One zone rectangle in reference units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl ZoneRect {
    /// Creates a new rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area in square reference units.
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Generates the template zones for `kind` with `count` zones.
///
/// The result is a pure function of its inputs. Blank layouts never have
/// zones; every other kind yields exactly `count` rectangles.
pub fn template_zones(kind: LayoutKind, count: u32) -> Vec<ZoneRect> {
    if count == 0 {
        return Vec::new();
    }

    match kind {
        LayoutKind::Blank => Vec::new(),
        LayoutKind::Columns => columns(0, 0, ZONE_REFERENCE_EXTENT, ZONE_REFERENCE_EXTENT, count),
        LayoutKind::Rows => rows(0, 0, ZONE_REFERENCE_EXTENT, ZONE_REFERENCE_EXTENT, count),
        LayoutKind::Grid | LayoutKind::Custom => grid(count),
        LayoutKind::Focus => focus(count),
        LayoutKind::PriorityGrid => priority_grid(count),
    }
}

/// Splits `total` into `parts` lengths, giving the remainder to the last part.
fn split(total: u32, parts: u32) -> Vec<u32> {
    let base = total / parts;
    let mut lengths = vec![base; parts as usize];
    if let Some(last) = lengths.last_mut() {
        *last += total - base * parts;
    }
    lengths
}

fn columns(x: u32, y: u32, width: u32, height: u32, count: u32) -> Vec<ZoneRect> {
    let mut offset = x;
    split(width, count)
        .into_iter()
        .map(|w| {
            let rect = ZoneRect::new(offset, y, w, height);
            offset += w;
            rect
        })
        .collect()
}

fn rows(x: u32, y: u32, width: u32, height: u32, count: u32) -> Vec<ZoneRect> {
    let mut offset = y;
    split(height, count)
        .into_iter()
        .map(|h| {
            let rect = ZoneRect::new(x, offset, width, h);
            offset += h;
            rect
        })
        .collect()
}

/// Near-square grid; the last row holds the leftover cells stretched to full width.
fn grid(count: u32) -> Vec<ZoneRect> {
    let cols = (1..=count).find(|c| c * c >= count).unwrap_or(count);
    let row_count = count.div_ceil(cols);

    let mut zones = Vec::with_capacity(count as usize);
    let mut remaining = count;
    let mut y = 0;
    for height in split(ZONE_REFERENCE_EXTENT, row_count) {
        let in_row = remaining.min(cols);
        zones.extend(columns(0, y, ZONE_REFERENCE_EXTENT, height, in_row));
        remaining -= in_row;
        y += height;
    }
    zones
}

/// Cascading half-size rectangles stepping toward the bottom-right corner.
fn focus(count: u32) -> Vec<ZoneRect> {
    let size = ZONE_REFERENCE_EXTENT / 2;
    let free = ZONE_REFERENCE_EXTENT - size;
    let step = if count > 1 { free / (count - 1) } else { 0 };
    let step = step.min(ZONE_REFERENCE_EXTENT / 10);
    let start = (free - step * (count - 1)) / 2;

    (0..count)
        .map(|i| ZoneRect::new(start + step * i, start + step * i, size, size))
        .collect()
}

/// Wide centre column flanked by stacked side columns.
fn priority_grid(count: u32) -> Vec<ZoneRect> {
    match count {
        1 => vec![ZoneRect::new(0, 0, ZONE_REFERENCE_EXTENT, ZONE_REFERENCE_EXTENT)],
        2 => columns(0, 0, ZONE_REFERENCE_EXTENT, ZONE_REFERENCE_EXTENT, 2),
        _ => {
            let side = ZONE_REFERENCE_EXTENT / 4;
            let centre = ZONE_REFERENCE_EXTENT - 2 * side;
            let left_count = (count - 1).div_ceil(2);
            let right_count = (count - 1) / 2;

            let mut zones = rows(0, 0, side, ZONE_REFERENCE_EXTENT, left_count);
            zones.push(ZoneRect::new(side, 0, centre, ZONE_REFERENCE_EXTENT));
            // count >= 3 here, so the right column always has at least one zone
            zones.extend(rows(side + centre, 0, side, ZONE_REFERENCE_EXTENT, right_count));
            zones
        }
    }
}
