//! Port placement descriptors.
//!
//! A port is placed either relative to one side of its node (optionally
//! inside a named segment of that side) or at an absolute coordinate. The
//! two shapes are distinct variants of [`Placement`]; the absolute one is
//! marked by `"mode": "absolute"` when serialized.
//!
//! The accessors in this module fail closed: asking an absolute placement
//! for its side, alignment, inset or segment yields the fallback, so
//! absolute ports never take part in side packing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a node a port is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    #[default]
    Right,
    Top,
    Bottom,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Top => "top",
            Side::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

/// Unit of an absolute placement's coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementUnit {
    #[default]
    Px,
    /// Percent of the node's width (x) or height (y)
    Percent,
}

/// Marker carried by absolute placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AbsoluteMode {
    #[default]
    #[serde(rename = "absolute")]
    Absolute,
}

/// Side-relative placement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidePlacement {
    pub side: Side,

    /// Named sub-region of the side; ports without one share `"default"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_order: Option<i32>,

    /// Relative length of the segment along its side (default 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_span: Option<f64>,

    /// Preferred 0–1 offset within the segment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<f64>,

    /// Draw the port inside the node body instead of on its edge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inset: Option<bool>,
}

impl SidePlacement {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            ..Default::default()
        }
    }

    pub fn in_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn with_segment_order(mut self, order: i32) -> Self {
        self.segment_order = Some(order);
        self
    }

    pub fn with_segment_span(mut self, span: f64) -> Self {
        self.segment_span = Some(span);
        self
    }

    pub fn with_align(mut self, align: f64) -> Self {
        self.align = Some(align);
        self
    }

    pub fn inset(mut self) -> Self {
        self.inset = Some(true);
        self
    }
}

/// Absolute placement relative to the node's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsolutePlacement {
    pub mode: AbsoluteMode,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub unit: PlacementUnit,
}

impl AbsolutePlacement {
    pub fn px(x: f64, y: f64) -> Self {
        Self {
            mode: AbsoluteMode::Absolute,
            x,
            y,
            unit: PlacementUnit::Px,
        }
    }

    pub fn percent(x: f64, y: f64) -> Self {
        Self {
            mode: AbsoluteMode::Absolute,
            x,
            y,
            unit: PlacementUnit::Percent,
        }
    }
}

/// Canonical placement of a port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Placement {
    // Tried first: only objects carrying the absolute marker match.
    Absolute(AbsolutePlacement),
    Side(SidePlacement),
}

impl From<Side> for Placement {
    fn from(side: Side) -> Self {
        Placement::Side(SidePlacement::new(side))
    }
}

impl From<SidePlacement> for Placement {
    fn from(placement: SidePlacement) -> Self {
        Placement::Side(placement)
    }
}

impl From<AbsolutePlacement> for Placement {
    fn from(placement: AbsolutePlacement) -> Self {
        Placement::Absolute(placement)
    }
}

/// Placement as authored on a port definition: a bare side keyword or a
/// full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlacementInput {
    Keyword(Side),
    Detailed(Placement),
}

impl From<Side> for PlacementInput {
    fn from(side: Side) -> Self {
        PlacementInput::Keyword(side)
    }
}

impl From<SidePlacement> for PlacementInput {
    fn from(placement: SidePlacement) -> Self {
        PlacementInput::Detailed(Placement::Side(placement))
    }
}

impl From<AbsolutePlacement> for PlacementInput {
    fn from(placement: AbsolutePlacement) -> Self {
        PlacementInput::Detailed(Placement::Absolute(placement))
    }
}

impl From<Placement> for PlacementInput {
    fn from(placement: Placement) -> Self {
        PlacementInput::Detailed(placement)
    }
}

/// Turn authored placement input into the canonical form.
///
/// Only `side` gets a default (`right`, when nothing was authored at all);
/// every other field stays unset.
pub fn normalize_placement(input: Option<&PlacementInput>) -> Placement {
    match input {
        None => Placement::Side(SidePlacement::new(Side::Right)),
        Some(PlacementInput::Keyword(side)) => Placement::Side(SidePlacement::new(*side)),
        Some(PlacementInput::Detailed(placement)) => placement.clone(),
    }
}

pub fn is_absolute(placement: &Placement) -> bool {
    matches!(placement, Placement::Absolute(_))
}

fn side_placement(placement: Option<&Placement>) -> Option<&SidePlacement> {
    match placement {
        Some(Placement::Side(side)) => Some(side),
        _ => None,
    }
}

pub fn get_side(placement: Option<&Placement>, fallback: Side) -> Side {
    side_placement(placement).map_or(fallback, |p| p.side)
}

pub fn get_align(placement: Option<&Placement>) -> Option<f64> {
    side_placement(placement).and_then(|p| p.align)
}

pub fn get_inset(placement: Option<&Placement>) -> bool {
    side_placement(placement)
        .and_then(|p| p.inset)
        .unwrap_or(false)
}

pub fn get_segment(placement: Option<&Placement>) -> Option<&str> {
    side_placement(placement).and_then(|p| p.segment.as_deref())
}
