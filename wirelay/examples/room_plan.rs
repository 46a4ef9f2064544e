//! Room plan example: lay out a small hallway circuit and print the wires
//! each conduit must carry.

use wirelay::prelude::*;
use wirelay::{Node, NodeKind};

fn main() -> Result<(), WirelayError> {
    let mut system = CircuitSystem::new();
    let circuit = system.define_circuit("hallway");

    system.add_node(
        circuit,
        Node::new(NodeKind::DistributionBox, "meter cupboard").with_position(0.0, 0.0),
    )?;
    let switch = system.add_node(
        circuit,
        Node::new(NodeKind::Switch, "door switch")
            .with_position(1.5, 0.5)
            .with_gangs(1),
    )?;
    let lamp = system.add_node(
        circuit,
        Node::new(NodeKind::Load, "ceiling lamp")
            .with_position(3.0, 2.0)
            .with_rated_current(0.3),
    )?;
    let socket = system.add_node(
        circuit,
        Node::new(NodeKind::Socket, "vacuum socket")
            .with_position(4.0, 0.0)
            .with_rated_current(16.0),
    )?;

    system.define_unit(circuit, Unit::controlled([switch], [lamp]))?;
    system.define_unit(circuit, Unit::uncontrolled(socket))?;

    let conduits = system.request_topology(circuit, TopologyMode::Replace)?;
    println!("Generated {} conduits", conduits.len());

    let report = system.compute_wiring(circuit)?;
    println!(
        "Laid {} wires ({} N, {} PE, {} power, {} control)\n",
        report.stats.total(),
        report.stats.neutral,
        report.stats.protective_earth,
        report.stats.power_line,
        report.stats.control_line,
    );

    for entry in system.wire_report(circuit)? {
        println!(
            "{}  {} - {}  ({:.1} m)",
            entry.conduit, entry.from, entry.to, entry.length
        );
        for wire in &entry.wires {
            let owner = wire.unit.as_deref().unwrap_or("circuit");
            println!(
                "    {:<10} {:<6} {:>5.1} A  [{}]",
                wire.wire_type.to_string(),
                owner,
                wire.current,
                wire.color,
            );
        }
    }
    Ok(())
}
