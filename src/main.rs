//! Command-line entrypoint: build a topology graph from a JSON inventory export.

// Bin target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use topology_views::topology::DeviceId;
use topology_views::{BuildOptions, Snapshot, TopologyConfig, build_topology, init_logging};

/// Render a device/cable/circuit export as a topology graph payload.
#[derive(Parser, Debug)]
#[command(name = "topology-views")]
#[command(author, version, about, long_about = None)]
struct Cli {
	/// JSON inventory export.
	#[arg(short, long)]
	snapshot: PathBuf,

	/// JSON topology settings. Defaults apply when omitted.
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Device ids to draw. Without any, the configured preselected roles and
	/// tags choose the devices.
	#[arg(short, long = "device")]
	devices: Vec<u64>,

	/// Draw the preselected devices even when the config's
	/// `draw_default_layout` is off, or skip them when it is on. Only applies
	/// without `--device`.
	#[arg(long)]
	draw_init: Option<bool>,

	/// Leave out devices without connections.
	#[arg(long)]
	hide_unconnected: bool,

	/// Termination type to leave out; replaces the configured list.
	#[arg(long = "ignore-cable-type")]
	ignore_cable_types: Vec<String>,

	/// Do not follow cables through circuits.
	#[arg(long)]
	no_circuit_terminations: bool,

	/// Pretty-print the JSON output.
	#[arg(long)]
	pretty: bool,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
	let config = match &cli.config {
		Some(path) => TopologyConfig::from_path(path)?,
		None => TopologyConfig::default(),
	};
	let snapshot = Snapshot::from_path(&cli.snapshot)?;

	let devices = if cli.devices.is_empty() {
		let Some(devices) = snapshot.default_selection(&config, cli.draw_init) else {
			info!("topology-views: default layout not drawn");
			println!("null");
			return Ok(());
		};
		devices
	} else {
		let ids: BTreeSet<DeviceId> = cli.devices.iter().copied().map(DeviceId).collect();
		snapshot.devices_by_id(&ids)
	};
	info!("topology-views: {} devices selected", devices.len());

	let options = BuildOptions {
		hide_unconnected: cli.hide_unconnected,
		ignore_cable_types: (!cli.ignore_cable_types.is_empty()).then_some(cli.ignore_cable_types),
		enable_circuit_terminations: cli.no_circuit_terminations.then_some(false),
		..BuildOptions::default()
	};

	let graph = build_topology(&snapshot, &config, &devices, &options)?;
	let json = if cli.pretty {
		serde_json::to_string_pretty(&graph)?
	} else {
		serde_json::to_string(&graph)?
	};
	println!("{json}");
	Ok(())
}

fn main() -> ExitCode {
	init_logging();

	match run(Cli::parse()) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			error!("topology-views: {e}");
			ExitCode::FAILURE
		}
	}
}
