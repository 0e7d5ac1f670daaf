//! Integration tests for port derivation feeding the geometry engine.

mod common;

use common::builders::{NodeBuilder, PortDefBuilder};
use common::{assert_float_eq, GEOMETRY_EPSILON};
use nodeport_rs::config::{EngineConfig, LayoutSettings};
use nodeport_rs::ports::geometry::resolve_crowding;
use nodeport_rs::ports::{
    compute_node_port_positions, compute_node_port_positions_for, derive_ports, Centering, NodeTypeDefinition,
    Port, PortDefinition, Side, SidePlacement,
};
use nodeport_rs::types::{Position, Size};
use proptest::prelude::*;

#[test]
fn test_derived_ports_spread_along_side() {
    let mixer = NodeTypeDefinition::new("mixer")
        .with_port(PortDefBuilder::input("in").instances(3).build())
        .with_port(PortDefBuilder::output("out").build());
    let node = NodeBuilder::new("m", "mixer").at(100.0, 200.0).size(120.0, 100.0).build();
    let ports = derive_ports(&node, Some(&mixer));
    let geometry = compute_node_port_positions_for(&node, Some(&mixer), &ports, &LayoutSettings::default());

    let ys: Vec<f64> = ["in-1", "in-2", "in-3"]
        .iter()
        .map(|id| geometry[*id].connection_point.y)
        .collect();
    assert_float_eq(ys[0], 210.0, GEOMETRY_EPSILON);
    assert_float_eq(ys[1], 250.0, GEOMETRY_EPSILON);
    assert_float_eq(ys[2], 290.0, GEOMETRY_EPSILON);

    let out = geometry["out"];
    assert_eq!(out.render_position.centering, Centering::Vertical);
    assert_float_eq(out.connection_point.x, 220.0, GEOMETRY_EPSILON);
    assert_float_eq(out.connection_point.y, 250.0, GEOMETRY_EPSILON);
}

#[test]
fn test_disabled_port_has_no_geometry() {
    let t = NodeTypeDefinition::new("t").with_port(PortDefBuilder::input("in").instances(2).build());
    let node = NodeBuilder::new("n", "t").disable_port("in-1").build();
    let ports = derive_ports(&node, Some(&t));
    let geometry = compute_node_port_positions_for(&node, Some(&t), &ports, &LayoutSettings::default());
    assert!(!geometry.contains_key("in-1"));
    // The remaining instance is alone on its side.
    assert_float_eq(geometry["in-2"].render_position.y, 40.0, GEOMETRY_EPSILON);
}

#[test]
fn test_connection_point_is_glyph_center_on_every_side() {
    let settings = LayoutSettings::default();
    let r = settings.port_radius();
    let node_pos = Position::new(50.0, 60.0);
    let size = Size::new(200.0, 100.0);

    for side in [Side::Left, Side::Right, Side::Top, Side::Bottom] {
        for inset in [false, true] {
            let mut placement = SidePlacement::new(side);
            if inset {
                placement = placement.inset();
            }
            let ports = vec![Port::input("n", "p").with_placement(placement)];
            let g = compute_node_port_positions(node_pos, size, &ports, &settings)["p"];
            let anchor = g.render_position;

            let (cx, cy) = match anchor.centering {
                Centering::Vertical => (anchor.x + r, anchor.y),
                Centering::Horizontal => (anchor.x, anchor.y + r),
                Centering::None => (anchor.x + r, anchor.y + r),
            };
            assert_float_eq(g.connection_point.x, node_pos.x + cx, GEOMETRY_EPSILON);
            assert_float_eq(g.connection_point.y, node_pos.y + cy, GEOMETRY_EPSILON);
        }
    }
}

#[test]
fn test_absolute_percent_definition() {
    let t: NodeTypeDefinition = serde_json::from_str(
        r#"{"type": "t", "defaultSize": {"width": 80, "height": 40},
            "ports": [{"id": "corner", "direction": "output",
                       "placement": {"mode": "absolute", "x": 100, "y": 0, "unit": "percent"}}]}"#,
    )
    .unwrap();
    let node = NodeBuilder::new("n", "t").build();
    let ports = derive_ports(&node, Some(&t));
    let g = compute_node_port_positions_for(&node, Some(&t), &ports, &LayoutSettings::default())["corner"];
    assert_eq!(g.render_position.centering, Centering::None);
    assert_float_eq(g.connection_point.x, 80.0, GEOMETRY_EPSILON);
    assert_float_eq(g.connection_point.y, 0.0, GEOMETRY_EPSILON);
}

#[test]
fn test_custom_diameter_from_config() {
    let config = EngineConfig::from_toml_str("[layout]\nport_diameter = 20.0\n").unwrap();
    let ports = vec![Port::output("n", "out")];
    let g = compute_node_port_positions(Position::default(), Size::new(100.0, 50.0), &ports, &config.layout)["out"];
    assert_float_eq(g.render_position.x, 90.0, GEOMETRY_EPSILON);
    assert_float_eq(g.connection_point.x, 100.0, GEOMETRY_EPSILON);
}

#[test]
fn test_explicit_align_crowding_stays_ordered() {
    let placement = |align: f64| SidePlacement::new(Side::Top).with_align(align);
    let ports: Vec<Port> = (0..5)
        .map(|i| Port::input("n", format!("p{}", i)).with_placement(placement(0.9)))
        .collect();
    let g = compute_node_port_positions(Position::default(), Size::new(100.0, 100.0), &ports, &LayoutSettings::default());
    let xs: Vec<f64> = (0..5).map(|i| g[&format!("p{}", i)].render_position.x).collect();
    for pair in xs.windows(2) {
        assert!(pair[0] < pair[1], "offsets not increasing: {:?}", xs);
    }
    assert_float_eq(xs[4], 95.0, GEOMETRY_EPSILON);
}

fn side_strategy() -> impl Strategy<Value = Side> {
    prop::sample::select(vec![Side::Left, Side::Right, Side::Top, Side::Bottom])
}

proptest! {
    #[test]
    fn test_geometry_is_deterministic(
        sides in prop::collection::vec(side_strategy(), 0..12),
        width in 20.0f64..400.0,
        height in 20.0f64..400.0,
    ) {
        let ports: Vec<Port> = sides
            .iter()
            .enumerate()
            .map(|(i, side)| Port::input("n", format!("p{}", i)).with_placement(*side))
            .collect();
        let settings = LayoutSettings::default();
        let first = compute_node_port_positions(Position::new(1.0, 2.0), Size::new(width, height), &ports, &settings);
        let second = compute_node_port_positions(Position::new(1.0, 2.0), Size::new(width, height), &ports, &settings);
        prop_assert_eq!(first.len(), ports.len());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_default_spacing_keeps_min_gap(count in 2usize..40) {
        let settings = LayoutSettings::default();
        let desired = nodeport_rs::ports::geometry::default_offsets(count, &settings);
        let resolved = resolve_crowding(&desired, &settings);
        let gap = settings.min_gap(count);
        for pair in resolved.windows(2) {
            prop_assert!(pair[1] - pair[0] >= gap - 1e-12);
        }
    }

    #[test]
    fn test_crowding_never_reorders(desired in prop::collection::vec(0.0f64..1.0, 2..10)) {
        let settings = LayoutSettings::default();
        let resolved = resolve_crowding(&desired, &settings);
        for i in 0..desired.len() {
            for j in 0..desired.len() {
                if desired[i] < desired[j] {
                    prop_assert!(resolved[i] <= resolved[j] + 1e-12);
                }
            }
        }
    }
}

#[test]
fn test_definition_without_placement_uses_direction_side() {
    let t = NodeTypeDefinition::new("t")
        .with_port(PortDefinition::output("a", "A"))
        .with_port(PortDefinition::input("b", "B"));
    let node = NodeBuilder::new("n", "t").size(100.0, 100.0).build();
    let ports = derive_ports(&node, Some(&t));
    let g = compute_node_port_positions_for(&node, Some(&t), &ports, &LayoutSettings::default());
    assert!(g["a"].connection_point.x > g["b"].connection_point.x);
}

#[test]
fn test_crowded_align_stays_near_request() {
    let ports: Vec<Port> = (0..3)
        .map(|i| Port::output("n", format!("p{}", i)).with_placement(SidePlacement::new(Side::Top).with_align(0.9)))
        .collect();
    let g = compute_node_port_positions(Position::default(), Size::new(100.0, 100.0), &ports, &LayoutSettings::default());
    assert_float_eq(g["p0"].render_position.x, 90.0, 1e-6);
    assert_float_eq(g["p1"].render_position.x, 92.5, 1e-6);
    assert_float_eq(g["p2"].render_position.x, 95.0, 1e-6);
}

#[test]
fn test_colliding_port_ids_keep_one_geometry_entry_each() {
    let t = NodeTypeDefinition::new("t")
        .with_port(PortDefBuilder::input("in").instances(2).build())
        .with_port(PortDefinition::output("in-2", "Output"));
    let node = NodeBuilder::new("n", "t").build();
    let ports = derive_ports(&node, Some(&t));
    let geometry = compute_node_port_positions_for(&node, Some(&t), &ports, &LayoutSettings::default());
    assert_eq!(ports.len(), 2);
    assert_eq!(geometry.len(), ports.len());
}
