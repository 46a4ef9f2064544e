//! Wirelay CLI - wiring layout validation and computation from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;
use wirelay::{
    validate, CircuitId, ProjectDocument, TopologyMode, WirelayError,
};

#[derive(Parser)]
#[command(name = "wirelay")]
#[command(about = "Electrical wiring layout tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a project file and report findings
    Check {
        /// Path to a .wirelay.json project file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Generate the conduit topology for one or all circuits
    Topology {
        /// Path to a .wirelay.json project file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Circuit to generate for (all circuits when omitted)
        #[arg(short, long)]
        circuit: Option<u32>,

        /// How generated conduits combine with existing ones
        #[arg(short, long, value_enum, default_value = "replace")]
        mode: ModeArg,

        /// Write the updated project here (in place when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the four-step wiring computation and print the conduit listing
    Wire {
        /// Path to a .wirelay.json project file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Circuit to compute (all circuits when omitted)
        #[arg(short, long)]
        circuit: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Write the updated project (with wires) here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show circuits, nodes and units of a project
    Info {
        /// Path to a .wirelay.json project file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
}

#[derive(Clone, ValueEnum)]
enum ModeArg {
    /// Replace the previous conduit set
    Replace,
    /// Keep existing conduits and add the missing tree edges
    Merge,
}

impl From<ModeArg> for TopologyMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Replace => TopologyMode::Replace,
            ModeArg::Merge => TopologyMode::Merge,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Check { file, format } => handle_check(&file, format),
        Commands::Topology {
            file,
            circuit,
            mode,
            output,
        } => handle_topology(&file, circuit, mode.into(), output.as_deref()),
        Commands::Wire {
            file,
            circuit,
            format,
            output,
        } => handle_wire(&file, circuit, format, output.as_deref()),
        Commands::Info { file, format } => handle_info(&file, format),
    };

    process::exit(exit_code);
}

fn load(file: &Path) -> Result<ProjectDocument, i32> {
    ProjectDocument::load(file).map_err(|e| {
        eprintln!("Error: {}", e);
        2
    })
}

/// Circuits selected by `--circuit`, or every circuit of the project.
fn selected_circuits(doc: &ProjectDocument, circuit: Option<u32>) -> Vec<CircuitId> {
    match circuit {
        Some(n) => vec![CircuitId(n)],
        None => doc.system.circuits().map(|c| c.id).collect(),
    }
}

fn handle_check(file: &Path, format: OutputFormat) -> i32 {
    let doc = match load(file) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let mut findings: Vec<(CircuitId, String, String)> = Vec::new();
    for circuit in doc.system.circuits() {
        for error in validate::validate_circuit(circuit) {
            findings.push((circuit.id, circuit.label.clone(), error.to_string()));
        }
    }

    match format {
        OutputFormat::Human => {
            println!("File: {}", file.display());
            println!("{}", "─".repeat(60));
            if findings.is_empty() {
                println!("  No findings");
            }
            for (id, label, message) in &findings {
                println!("  {} ({}): {}", id, label, message);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "file": file.display().to_string(),
                "findings": findings.iter().map(|(id, label, message)| {
                    serde_json::json!({
                        "circuit": id.to_string(),
                        "label": label,
                        "message": message,
                    })
                }).collect::<Vec<_>>(),
                "total": findings.len(),
            });
            println!("{}", to_pretty(&output));
        }
    }

    if findings.is_empty() {
        0
    } else {
        1
    }
}

fn handle_topology(
    file: &Path,
    circuit: Option<u32>,
    mode: TopologyMode,
    output: Option<&Path>,
) -> i32 {
    let mut doc = match load(file) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    for id in selected_circuits(&doc, circuit) {
        match doc.system.request_topology(id, mode) {
            Ok(conduits) => {
                println!("{}: {} conduits in the spanning set", id, conduits.len());
            }
            Err(WirelayError::EmptyTopology(id)) if circuit.is_none() => {
                eprintln!("Skipping {}: fewer than two nodes", id);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    }

    save(&mut doc, output.unwrap_or(file))
}

fn handle_wire(
    file: &Path,
    circuit: Option<u32>,
    format: OutputFormat,
    output: Option<&Path>,
) -> i32 {
    let mut doc = match load(file) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let selected = selected_circuits(&doc, circuit);
    let mut computed = Vec::new();
    for id in selected {
        match doc.system.compute_wiring(id) {
            Ok(report) => computed.push(report),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    }

    match format {
        OutputFormat::Human => {
            for report in &computed {
                let label = doc
                    .system
                    .circuit(report.circuit)
                    .map(|c| c.label.clone())
                    .unwrap_or_default();
                println!("\nCircuit {} ({})", report.circuit, label);
                println!("{}", "─".repeat(60));
                let listing = match doc.system.wire_report(report.circuit) {
                    Ok(listing) => listing,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        return 1;
                    }
                };
                for entry in listing {
                    println!(
                        "  {}  {} - {}  ({:.1} m)",
                        entry.conduit, entry.from, entry.to, entry.length
                    );
                    for wire in &entry.wires {
                        let owner = wire.unit.as_deref().unwrap_or("circuit");
                        println!(
                            "    {:<10} {:<8} {:>5.1} A  [{}]",
                            wire.wire_type.to_string(),
                            owner,
                            wire.current,
                            wire.color,
                        );
                    }
                }
                println!(
                    "\n  Summary: {} N, {} PE, {} power, {} control",
                    report.stats.neutral,
                    report.stats.protective_earth,
                    report.stats.power_line,
                    report.stats.control_line,
                );
            }
        }
        OutputFormat::Json => {
            let circuits: Vec<_> = computed
                .iter()
                .map(|report| {
                    let listing = doc.system.wire_report(report.circuit).unwrap_or_default();
                    serde_json::json!({
                        "circuit": report.circuit.to_string(),
                        "stats": report.stats,
                        "conduits": listing,
                    })
                })
                .collect();
            println!("{}", to_pretty(&serde_json::json!({ "circuits": circuits })));
        }
    }

    match output {
        Some(path) => save(&mut doc, path),
        None => 0,
    }
}

fn handle_info(file: &Path, format: OutputFormat) -> i32 {
    let doc = match load(file) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    match format {
        OutputFormat::Human => {
            println!("Project: {}", doc.metadata.name);
            for circuit in doc.system.circuits() {
                println!(
                    "\n{} ({}) - wiring {}",
                    circuit.id,
                    circuit.label,
                    circuit.phase(),
                );
                for node in circuit.nodes() {
                    println!(
                        "  {:<6} {:<16} {}",
                        node.id.to_string(),
                        node.kind.to_string(),
                        node.label
                    );
                }
                for unit in circuit.units() {
                    let label = circuit
                        .unit_label(unit.id)
                        .unwrap_or_else(|| unit.id.to_string());
                    let members: Vec<String> =
                        unit.members().iter().map(|n| n.to_string()).collect();
                    println!("  {:<6} unit             [{}]", label, members.join(", "));
                }
            }
        }
        OutputFormat::Json => {
            let circuits: Vec<_> = doc
                .system
                .circuits()
                .map(|circuit| {
                    serde_json::json!({
                        "circuit": circuit.id.to_string(),
                        "label": circuit.label,
                        "phase": circuit.phase().to_string(),
                        "nodes": circuit.nodes().map(|n| serde_json::json!({
                            "id": n.id.to_string(),
                            "kind": n.kind.to_string(),
                            "label": n.label,
                        })).collect::<Vec<_>>(),
                        "units": circuit.units().map(|u| serde_json::json!({
                            "id": circuit.unit_label(u.id),
                            "members": u.members().iter().map(|n| n.to_string()).collect::<Vec<_>>(),
                        })).collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!(
                "{}",
                to_pretty(&serde_json::json!({
                    "project": doc.metadata.name,
                    "circuits": circuits,
                }))
            );
        }
    }
    0
}

fn save(doc: &mut ProjectDocument, path: &Path) -> i32 {
    match doc.save(path) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn to_pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
