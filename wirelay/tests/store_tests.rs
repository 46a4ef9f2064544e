//! Entity store invariants and cascading behavior.

use wirelay::prelude::*;
use wirelay::validate;
use wirelay::{Node, NodeKind, Unit};

fn system_with_box() -> (CircuitSystem, wirelay::CircuitId, wirelay::NodeId) {
    let mut system = CircuitSystem::new();
    let circuit = system.define_circuit("ground floor");
    let dbox = system
        .add_node(circuit, Node::new(NodeKind::DistributionBox, "box"))
        .expect("box should be accepted");
    (system, circuit, dbox)
}

#[test]
fn unit_deletion_compacts_the_namespace() {
    // C-UT1, C-UT2, C-UT3 exist; deleting C-UT2 leaves C-UT1, C-UT2.
    let (mut system, circuit, _) = system_with_box();
    let mut units = Vec::new();
    for i in 0..3 {
        let switch = system
            .add_node(circuit, Node::new(NodeKind::Switch, format!("sw{i}")))
            .unwrap();
        let lamp = system
            .add_node(circuit, Node::new(NodeKind::Load, format!("lamp{i}")))
            .unwrap();
        units.push(
            system
                .define_unit(circuit, Unit::controlled([switch], [lamp]))
                .unwrap(),
        );
    }
    let c = system.circuit(circuit).unwrap();
    assert_eq!(c.unit_label(units[1]).as_deref(), Some("C-UT2"));

    system.dissolve_unit(circuit, units[1]).unwrap();

    let c = system.circuit(circuit).unwrap();
    assert_eq!(c.unit_label(units[0]).as_deref(), Some("C-UT1"));
    assert_eq!(c.unit_label(units[2]).as_deref(), Some("C-UT2"));
    assert_eq!(c.unit_label(units[1]), None);
}

#[test]
fn namespaces_are_independent_per_variant_and_circuit() {
    let (mut system, circuit, _) = system_with_box();
    let other = system.define_circuit("first floor");

    let socket = system
        .add_node(circuit, Node::new(NodeKind::Socket, "socket"))
        .unwrap();
    let socket_up = system
        .add_node(other, Node::new(NodeKind::Socket, "socket upstairs"))
        .unwrap();
    let switch = system
        .add_node(circuit, Node::new(NodeKind::Switch, "switch"))
        .unwrap();
    let lamp = system
        .add_node(circuit, Node::new(NodeKind::Load, "lamp"))
        .unwrap();

    let u1 = system.define_unit(circuit, Unit::uncontrolled(socket)).unwrap();
    let c1 = system
        .define_unit(circuit, Unit::controlled([switch], [lamp]))
        .unwrap();
    let u_other = system.define_unit(other, Unit::uncontrolled(socket_up)).unwrap();

    let ground = system.circuit(circuit).unwrap();
    let first = system.circuit(other).unwrap();
    assert_eq!(ground.unit_label(u1).as_deref(), Some("U-UT1"));
    assert_eq!(ground.unit_label(c1).as_deref(), Some("C-UT1"));
    assert_eq!(first.unit_label(u_other).as_deref(), Some("U-UT1"));
}

#[test]
fn no_node_joins_two_units() {
    let (mut system, circuit, _) = system_with_box();
    let socket = system
        .add_node(circuit, Node::new(NodeKind::Socket, "socket"))
        .unwrap();
    system.define_unit(circuit, Unit::uncontrolled(socket)).unwrap();

    let err = system
        .define_unit(circuit, Unit::uncontrolled(socket))
        .unwrap_err();
    assert!(matches!(
        err,
        WirelayError::Consistency(ConsistencyError::NodeAlreadyInUnit { .. })
    ));
}

#[test]
fn unit_members_must_have_the_right_kind() {
    let (mut system, circuit, dbox) = system_with_box();
    let lamp = system
        .add_node(circuit, Node::new(NodeKind::Load, "lamp"))
        .unwrap();

    // A load cannot act as a switch, and a box cannot act as a device.
    let err = system
        .define_unit(circuit, Unit::controlled([lamp], [lamp]))
        .unwrap_err();
    assert!(matches!(
        err,
        WirelayError::Consistency(ConsistencyError::UnitMemberKind { .. })
    ));
    let err = system.define_unit(circuit, Unit::uncontrolled(dbox)).unwrap_err();
    assert!(matches!(
        err,
        WirelayError::Consistency(ConsistencyError::UnitMemberKind { .. })
    ));
}

#[test]
fn controlled_units_need_switch_and_load() {
    let (mut system, circuit, _) = system_with_box();
    let switch = system
        .add_node(circuit, Node::new(NodeKind::Switch, "switch"))
        .unwrap();
    let err = system
        .define_unit(circuit, Unit::controlled([switch], []))
        .unwrap_err();
    assert!(matches!(
        err,
        WirelayError::Consistency(ConsistencyError::EmptyUnit)
    ));
}

#[test]
fn duplicate_and_degenerate_conduits_are_rejected() {
    let (mut system, circuit, dbox) = system_with_box();
    let socket = system
        .add_node(circuit, Node::new(NodeKind::Socket, "socket"))
        .unwrap();
    system.add_conduit(circuit, dbox, socket).unwrap();

    let err = system.add_conduit(circuit, socket, dbox).unwrap_err();
    assert!(matches!(
        err,
        WirelayError::Consistency(ConsistencyError::DuplicateConduit { .. })
    ));
    let err = system.add_conduit(circuit, socket, socket).unwrap_err();
    assert!(matches!(
        err,
        WirelayError::Consistency(ConsistencyError::SelfLoop { .. })
    ));
}

#[test]
fn failed_mutations_commit_nothing() {
    let (mut system, circuit, dbox) = system_with_box();
    let socket = system
        .add_node(circuit, Node::new(NodeKind::Socket, "socket"))
        .unwrap();
    system.add_conduit(circuit, dbox, socket).unwrap();

    let conduits_before = system.circuit(circuit).unwrap().conduits().count();
    let units_before = system.circuit(circuit).unwrap().units().count();

    let _ = system.add_conduit(circuit, dbox, socket).unwrap_err();
    let _ = system
        .define_unit(circuit, Unit::uncontrolled(dbox))
        .unwrap_err();

    let c = system.circuit(circuit).unwrap();
    assert_eq!(c.conduits().count(), conduits_before);
    assert_eq!(c.units().count(), units_before);
    assert!(validate::validate_circuit(c)
        .iter()
        .all(|e| matches!(e, WirelayError::UnassignedNode { .. })));
}

#[test]
fn removing_a_switch_keeps_the_unit_until_it_empties() {
    let (mut system, circuit, _) = system_with_box();
    let switch = system
        .add_node(circuit, Node::new(NodeKind::Switch, "switch"))
        .unwrap();
    let lamp = system
        .add_node(circuit, Node::new(NodeKind::Load, "lamp"))
        .unwrap();
    let unit = system
        .define_unit(circuit, Unit::controlled([switch], [lamp]))
        .unwrap();

    system.remove_node(circuit, switch).unwrap();
    let c = system.circuit(circuit).unwrap();
    assert!(c.unit(unit).is_some(), "unit still has its load");

    system.remove_node(circuit, lamp).unwrap();
    let c = system.circuit(circuit).unwrap();
    assert!(c.unit(unit).is_none(), "emptied unit dissolves");
}

#[test]
fn edits_mark_wiring_stale() {
    let (mut system, circuit, dbox) = system_with_box();
    let socket = system
        .add_node(
            circuit,
            Node::new(NodeKind::Socket, "socket").with_position(3.0, 0.0),
        )
        .unwrap();
    system.add_conduit(circuit, dbox, socket).unwrap();
    system.define_unit(circuit, Unit::uncontrolled(socket)).unwrap();

    system.compute_wiring(circuit).unwrap();
    assert!(system.circuit(circuit).unwrap().wiring_current());

    system
        .add_node(circuit, Node::new(NodeKind::Junction, "elbow"))
        .unwrap();
    assert!(!system.circuit(circuit).unwrap().wiring_current());
}

#[test]
fn rename_does_not_invalidate_wiring() {
    let (mut system, circuit, dbox) = system_with_box();
    let socket = system
        .add_node(circuit, Node::new(NodeKind::Socket, "socket"))
        .unwrap();
    system.add_conduit(circuit, dbox, socket).unwrap();
    system.define_unit(circuit, Unit::uncontrolled(socket)).unwrap();
    system.compute_wiring(circuit).unwrap();

    system.rename_node(circuit, socket, "bedside socket").unwrap();
    assert!(system.circuit(circuit).unwrap().wiring_current());
    assert_eq!(
        system.circuit(circuit).unwrap().node(socket).unwrap().label,
        "bedside socket"
    );
}
