//! Port geometry: where each port is drawn and where its wires attach.
//!
//! # Layout
//!
//! Absolute ports are placed at their declared coordinate. Side-based ports
//! are grouped per side and then per segment (`"default"` when none is
//! named). Segments on one side are laid end-to-end along a 0–1 axis in
//! `(segment_order, segment key)` order, each taking a share proportional
//! to its span.
//!
//! Inside a segment a port sits at its explicit `align` (clamped to 0–1) or
//! at an even default spacing. Crowded offsets are then pushed apart to a
//! minimum gap and, if that pushes the last port past the upper bound,
//! pulled back with a linear taper by rank: the first port keeps its offset
//! and the last lands on the upper bound.
//!
//! ```text
//! desired   0.50 0.50 0.50 0.50      (four ports aligned at the middle)
//! pushed    0.50 0.63 0.77 0.90
//!
//! desired   0.90 0.90 0.90           (three ports aligned near the end)
//! pushed    0.90 1.04 1.18
//! tapered   0.90 0.925 0.95
//! ```
//!
//! # Anchors
//!
//! The render anchor is the glyph's top-left offset inside the node plus a
//! [`Centering`] hint for the axis the renderer still has to center on.
//! The connection point is always the glyph center in canvas space.

use crate::config::LayoutSettings;
use crate::ports::definition::NodeTypeDefinition;
use crate::ports::placement::{
    get_align, get_inset, get_segment, get_side, AbsolutePlacement, Placement, PlacementUnit, Side,
};
use crate::ports::port::Port;
use crate::types::{Node, Position, Size};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Segment key used for ports that do not name one
pub const DEFAULT_SEGMENT: &str = "default";

/// Axis the renderer centers the glyph on (a `translate(-50%)` hint).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Centering {
    /// Center vertically; used by left/right ports
    Vertical,
    /// Center horizontally; used by top/bottom ports
    Horizontal,
    /// Position is already the glyph's top-left corner
    None,
}

/// Node-relative render position of a port glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderAnchor {
    pub x: f64,
    pub y: f64,
    pub centering: Centering,
}

/// Computed geometry for one port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortGeometry {
    pub render_position: RenderAnchor,
    /// Canvas-space center of the glyph
    pub connection_point: Position,
}

/// Compute geometry for every port of one node.
///
/// Ports are keyed by id; only ports in `ports` appear in the result.
pub fn compute_node_port_positions(
    node_position: Position,
    size: Size,
    ports: &[Port],
    settings: &LayoutSettings,
) -> HashMap<String, PortGeometry> {
    let mut result = HashMap::with_capacity(ports.len());

    for port in ports {
        if let Some(Placement::Absolute(absolute)) = &port.placement {
            let anchor = absolute_anchor(absolute, size, settings);
            result.insert(
                port.id.clone(),
                PortGeometry {
                    render_position: anchor,
                    connection_point: connection_point(node_position, anchor, settings),
                },
            );
        }
    }

    for (side, segments) in group_by_side(ports) {
        for (port, offset) in layout_side(&segments, settings) {
            let anchor = side_anchor(side, offset, get_inset(port.placement.as_ref()), size, settings);
            result.insert(
                port.id.clone(),
                PortGeometry {
                    render_position: anchor,
                    connection_point: connection_point(node_position, anchor, settings),
                },
            );
        }
    }

    result
}

/// [`compute_node_port_positions`] for a node, taking its size from the
/// node, then its type's default, then [`DEFAULT_NODE_SIZE`](crate::types::DEFAULT_NODE_SIZE).
pub fn compute_node_port_positions_for(
    node: &Node,
    node_type: Option<&NodeTypeDefinition>,
    ports: &[Port],
    settings: &LayoutSettings,
) -> HashMap<String, PortGeometry> {
    let size = node
        .size
        .or_else(|| node_type.and_then(|t| t.default_size))
        .unwrap_or_default();
    compute_node_port_positions(node.position, size, ports, settings)
}

// ==================== Grouping ====================

struct Segment<'a> {
    key: String,
    order: Option<i32>,
    span: Option<f64>,
    ports: Vec<&'a Port>,
}

impl Segment<'_> {
    fn order(&self) -> i32 {
        self.order.unwrap_or(0)
    }

    fn span(&self) -> f64 {
        match self.span {
            Some(span) if span.is_finite() && span > 0.0 => span,
            _ => 1.0,
        }
    }
}

fn group_by_side(ports: &[Port]) -> BTreeMap<Side, Vec<Segment<'_>>> {
    let mut sides: BTreeMap<Side, Vec<Segment<'_>>> = BTreeMap::new();

    for port in ports {
        let placement = port.placement.as_ref();
        if matches!(placement, Some(Placement::Absolute(_))) {
            continue;
        }

        let side = get_side(placement, port.position);
        let key = get_segment(placement).unwrap_or(DEFAULT_SEGMENT);
        let (order, span) = match placement {
            Some(Placement::Side(p)) => (p.segment_order, p.segment_span),
            _ => (None, None),
        };

        let segments = sides.entry(side).or_default();
        match segments.iter_mut().find(|s| s.key == key) {
            Some(segment) => {
                // First declaration wins.
                segment.order = segment.order.or(order);
                segment.span = segment.span.or(span);
                segment.ports.push(port);
            }
            None => segments.push(Segment {
                key: key.to_string(),
                order,
                span,
                ports: vec![port],
            }),
        }
    }

    for segments in sides.values_mut() {
        segments.sort_by(|a, b| a.order().cmp(&b.order()).then_with(|| a.key.cmp(&b.key)));
    }
    sides
}

/// Side-axis offset (0–1) for every port on one side
fn layout_side<'a>(segments: &[Segment<'a>], settings: &LayoutSettings) -> Vec<(&'a Port, f64)> {
    let total_span: f64 = segments.iter().map(Segment::span).sum();
    let mut start = 0.0;
    let mut placed = Vec::new();

    for segment in segments {
        let length = segment.span() / total_span;
        let defaults = default_offsets(segment.ports.len(), settings);
        let desired: Vec<f64> = segment
            .ports
            .iter()
            .zip(&defaults)
            .map(|(port, default)| {
                get_align(port.placement.as_ref())
                    .filter(|a| a.is_finite())
                    .map_or(*default, |a| a.clamp(0.0, 1.0))
            })
            .collect();

        for (port, offset) in segment.ports.iter().zip(resolve_crowding(&desired, settings)) {
            placed.push((*port, start + offset * length));
        }
        start += length;
    }
    placed
}

// ==================== Offsets ====================

/// Even spacing for `count` ports within one segment.
///
/// One port sits in the middle, two at the thirds, three or more spread
/// between `edge_padding` and `1 - edge_padding`.
pub fn default_offsets(count: usize, settings: &LayoutSettings) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.5],
        2 => vec![1.0 / 3.0, 2.0 / 3.0],
        n => {
            let pad = settings.edge_padding;
            let step = (1.0 - 2.0 * pad) / (n - 1) as f64;
            (0..n).map(|i| pad + step * i as f64).collect()
        }
    }
}

/// Spread desired offsets so no two ports collapse onto each other.
///
/// Offsets are visited in ascending order and pushed forward to keep
/// [`LayoutSettings::min_gap`] from the previous one. If the last ends up
/// past `upper_bound`, the overflow is taken back in proportion to rank:
/// the k-th of n sorted offsets moves down by `overflow * k / (n - 1)`,
/// kept within `lower_bound..=upper_bound`. A final pass keeps the offsets non-decreasing
/// in rank. Results are returned in input order.
pub fn resolve_crowding(desired: &[f64], settings: &LayoutSettings) -> Vec<f64> {
    let n = desired.len();
    if n < 2 {
        return desired.to_vec();
    }

    let gap = settings.min_gap(n);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| desired[a].partial_cmp(&desired[b]).unwrap_or(Ordering::Equal));

    let mut resolved = vec![0.0; n];
    let mut previous: Option<f64> = None;
    for &idx in &order {
        let value = match previous {
            Some(prev) => desired[idx].max(prev + gap),
            None => desired[idx],
        };
        resolved[idx] = value;
        previous = Some(value);
    }

    let last = resolved[order[n - 1]];
    if last > settings.upper_bound {
        let overflow = last - settings.upper_bound;
        let steps = (n - 1) as f64;
        let mut previous = settings.lower_bound;
        for (rank, &idx) in order.iter().enumerate() {
            let tapered = resolved[idx] - overflow * rank as f64 / steps;
            let value = tapered
                .max(settings.lower_bound)
                .min(settings.upper_bound)
                .max(previous);
            resolved[idx] = value;
            previous = value;
        }
    }
    resolved
}

// ==================== Anchors ====================

fn side_anchor(side: Side, offset: f64, inset: bool, size: Size, settings: &LayoutSettings) -> RenderAnchor {
    let radius = settings.port_radius();
    let near_edge = if inset { settings.inset_margin } else { -radius };
    let far_edge = |extent: f64| {
        if inset {
            extent - settings.port_diameter - settings.inset_margin
        } else {
            extent - radius
        }
    };

    match side {
        Side::Left => RenderAnchor {
            x: near_edge,
            y: size.height * offset,
            centering: Centering::Vertical,
        },
        Side::Right => RenderAnchor {
            x: far_edge(size.width),
            y: size.height * offset,
            centering: Centering::Vertical,
        },
        Side::Top => RenderAnchor {
            x: size.width * offset,
            y: near_edge,
            centering: Centering::Horizontal,
        },
        Side::Bottom => RenderAnchor {
            x: size.width * offset,
            y: far_edge(size.height),
            centering: Centering::Horizontal,
        },
    }
}

fn absolute_anchor(placement: &AbsolutePlacement, size: Size, settings: &LayoutSettings) -> RenderAnchor {
    let (x, y) = match placement.unit {
        PlacementUnit::Px => (placement.x, placement.y),
        PlacementUnit::Percent => (
            size.width * placement.x / 100.0,
            size.height * placement.y / 100.0,
        ),
    };
    let radius = settings.port_radius();
    RenderAnchor {
        x: x - radius,
        y: y - radius,
        centering: Centering::None,
    }
}

/// Canvas-space glyph center for a render anchor
fn connection_point(node_position: Position, anchor: RenderAnchor, settings: &LayoutSettings) -> Position {
    let radius = settings.port_radius();
    let (dx, dy) = match anchor.centering {
        Centering::Vertical => (anchor.x + radius, anchor.y),
        Centering::Horizontal => (anchor.x, anchor.y + radius),
        Centering::None => (anchor.x + radius, anchor.y + radius),
    };
    node_position.offset(dx, dy)
}
