//! Layout settings consumed by the geometry engine
//!
//! These are the constants that shape where ports land on a node. The
//! defaults reproduce the stock layout; hosts with a different port glyph
//! size or tighter packing can tune them through [`EngineConfig`](super::EngineConfig).
//!
//! # Offsets
//!
//! All `*_bound`, `edge_padding` and gap values are fractions of a side's
//! length (0–1). `port_diameter` and `inset_margin` are in pixels.

use serde::{Deserialize, Serialize};

/// Default visual diameter of a port glyph in pixels
pub const DEFAULT_PORT_DIAMETER: f64 = 12.0;

/// Default distance of an inset port from the node edge in pixels
pub const DEFAULT_INSET_MARGIN: f64 = 4.0;

/// Geometry engine constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct LayoutSettings {
    /// Visual diameter of a port glyph
    pub port_diameter: f64,

    /// Gap between an inset port and the node edge
    pub inset_margin: f64,

    /// Padding at both ends of a segment when spreading 3+ ports evenly
    pub edge_padding: f64,

    /// Largest minimum gap enforced between crowded ports
    pub max_min_gap: f64,

    /// Budget divided among `n - 1` gaps; the smaller of this share and
    /// `max_min_gap` is the enforced minimum
    pub gap_budget: f64,

    /// Offset crowded ports are pulled back towards
    pub lower_bound: f64,

    /// Largest offset a crowded port may end up at
    pub upper_bound: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            port_diameter: DEFAULT_PORT_DIAMETER,
            inset_margin: DEFAULT_INSET_MARGIN,
            edge_padding: 0.1,
            max_min_gap: 0.14,
            gap_budget: 0.4,
            lower_bound: 0.05,
            upper_bound: 0.95,
        }
    }
}

impl LayoutSettings {
    /// Half the port diameter: the offset from a glyph's corner to its center
    #[inline]
    pub fn port_radius(&self) -> f64 {
        self.port_diameter / 2.0
    }

    /// Minimum gap between `count` ports sharing one segment
    pub fn min_gap(&self, count: usize) -> f64 {
        if count < 2 {
            return self.max_min_gap;
        }
        self.max_min_gap.min(self.gap_budget / (count - 1) as f64)
    }

    /// Replace values that would break the layout with their defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        let length = |v: f64| v.is_finite() && v >= 0.0;

        let mut out = self;
        if !length(out.port_diameter) {
            tracing::warn!("Invalid port_diameter {}, using default", out.port_diameter);
            out.port_diameter = defaults.port_diameter;
        }
        if !length(out.inset_margin) {
            tracing::warn!("Invalid inset_margin {}, using default", out.inset_margin);
            out.inset_margin = defaults.inset_margin;
        }
        if !unit(out.edge_padding) || out.edge_padding >= 0.5 {
            tracing::warn!("Invalid edge_padding {}, using default", out.edge_padding);
            out.edge_padding = defaults.edge_padding;
        }
        if !unit(out.max_min_gap) {
            out.max_min_gap = defaults.max_min_gap;
        }
        if !length(out.gap_budget) {
            out.gap_budget = defaults.gap_budget;
        }
        if !unit(out.lower_bound) || !unit(out.upper_bound) || out.lower_bound >= out.upper_bound {
            tracing::warn!(
                "Invalid crowding bounds [{}, {}], using defaults",
                out.lower_bound,
                out.upper_bound
            );
            out.lower_bound = defaults.lower_bound;
            out.upper_bound = defaults.upper_bound;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_gap() {
        let settings = LayoutSettings::default();
        assert_eq!(settings.min_gap(2), 0.14);
        assert_eq!(settings.min_gap(3), 0.14);
        assert!((settings.min_gap(4) - 0.4 / 3.0).abs() < 1e-12);
        assert!((settings.min_gap(6) - 0.08).abs() < 1e-12);
        assert!((settings.min_gap(11) - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_port_radius() {
        let settings = LayoutSettings {
            port_diameter: 10.0,
            ..Default::default()
        };
        assert_eq!(settings.port_radius(), 5.0);
    }

    #[test]
    fn test_sanitized_restores_defaults() {
        let broken = LayoutSettings {
            port_diameter: -3.0,
            edge_padding: 0.7,
            lower_bound: 0.9,
            upper_bound: 0.1,
            ..Default::default()
        };
        let fixed = broken.sanitized();
        assert_eq!(fixed, LayoutSettings::default());
    }

    #[test]
    fn test_sanitized_keeps_valid_values() {
        let custom = LayoutSettings {
            port_diameter: 16.0,
            upper_bound: 0.9,
            ..Default::default()
        };
        assert_eq!(custom.clone().sanitized(), custom);
    }
}
