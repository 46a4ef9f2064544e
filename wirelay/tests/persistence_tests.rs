//! Project document round-trips.

use wirelay::prelude::*;
use wirelay::{Node, NodeKind, Unit};

fn populated_project() -> (ProjectDocument, wirelay::CircuitId) {
    let mut doc = ProjectDocument::new("two rooms");
    let circuit = doc.system.define_circuit("ground floor");
    let dbox = doc
        .system
        .add_node(
            circuit,
            Node::new(NodeKind::DistributionBox, "box").with_position(0.0, 0.0),
        )
        .unwrap();
    let switch = doc
        .system
        .add_node(
            circuit,
            Node::new(NodeKind::Switch, "switch")
                .with_position(2.0, 0.0)
                .with_gangs(1),
        )
        .unwrap();
    let lamp = doc
        .system
        .add_node(
            circuit,
            Node::new(NodeKind::Load, "lamp")
                .with_position(4.0, 0.0)
                .with_rated_current(0.5)
                .with_param("mount", "ceiling"),
        )
        .unwrap();
    doc.system.add_conduit(circuit, dbox, switch).unwrap();
    doc.system.add_conduit(circuit, switch, lamp).unwrap();
    doc.system
        .define_unit(circuit, Unit::controlled([switch], [lamp]))
        .unwrap();
    (doc, circuit)
}

#[test]
fn save_and_load_round_trips_wires_and_phase() {
    let (mut doc, circuit) = populated_project();
    doc.system.compute_wiring(circuit).unwrap();

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("two-rooms.wirelay.json");
    doc.save(&path).unwrap();

    let restored = ProjectDocument::load(&path).unwrap();
    let original = doc.system.circuit(circuit).unwrap();
    let reloaded = restored.system.circuit(circuit).unwrap();

    assert!(reloaded.wiring_current());
    assert_eq!(original.nodes().count(), reloaded.nodes().count());
    for (a, b) in original.conduits().zip(reloaded.conduits()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.wires, b.wires);
    }
    for (a, b) in original.nodes().zip(reloaded.nodes()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.label, b.label);
        assert_eq!(a.params, b.params);
        assert_eq!(a.gangs, b.gangs);
    }
}

#[test]
fn numbering_namespace_survives_reload_and_further_edits() {
    let (mut doc, circuit) = populated_project();
    let socket = doc
        .system
        .add_node(circuit, Node::new(NodeKind::Socket, "socket"))
        .unwrap();
    let u1 = doc
        .system
        .define_unit(circuit, Unit::uncontrolled(socket))
        .unwrap();

    let json = serde_json::to_string(&doc).unwrap();
    let mut restored: ProjectDocument = serde_json::from_str(&json).unwrap();

    assert_eq!(
        restored.system.circuit(circuit).unwrap().unit_label(u1).as_deref(),
        Some("U-UT1")
    );

    // New entities after reload must not collide with saved ones.
    let socket2 = restored
        .system
        .add_node(circuit, Node::new(NodeKind::Socket, "socket 2"))
        .unwrap();
    assert!(restored
        .system
        .circuit(circuit)
        .unwrap()
        .nodes()
        .filter(|n| n.id == socket2)
        .count()
        == 1);
    let u2 = restored
        .system
        .define_unit(circuit, Unit::uncontrolled(socket2))
        .unwrap();
    assert_ne!(u1, u2);
    assert_eq!(
        restored.system.circuit(circuit).unwrap().unit_label(u2).as_deref(),
        Some("U-UT2")
    );
}

#[test]
fn loading_garbage_is_a_parse_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{not json").unwrap();
    let err = ProjectDocument::load(&path).unwrap_err();
    assert!(matches!(err, WirelayError::Parse(_)));
}
