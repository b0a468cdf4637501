//! Topology graph construction.
//!
//! Turns a device selection into a [`GraphPayload`]:
//! - cables touching the selection are fetched in one query and filtered
//! - cables ending on a circuit are followed through the circuit to the device
//!   behind it, once per circuit
//! - edges are kept only when both resolved devices were selected
//! - every selected device becomes a node, unless it is unconnected and
//!   unconnected devices are hidden

use std::collections::{BTreeSet, HashMap, HashSet};

use log::{debug, info, warn};

use super::description::{Rows, describe, escape_html};
use super::model::{Cable, CircuitId, Device, DeviceId, Termination};
use super::slots::NodeSlots;
use super::source::{CableQuery, TopologySource};
use super::types::{Edge, GraphPayload, NODE_SHAPE, Node};
use crate::config::{BuildOptions, ResolvedOptions, TopologyConfig};
use crate::error::BuildError;

/// A cable with both ends resolved to device terminations.
struct Link {
	a: Termination,
	b: Termination,
	title: String,
	rows: Rows,
	dashed: bool,
}

/// Builds topology graphs from a [`TopologySource`].
pub struct TopologyGraphBuilder<'a, S: TopologySource + ?Sized> {
	source: &'a S,
	config: &'a TopologyConfig,
}

impl<'a, S: TopologySource + ?Sized> TopologyGraphBuilder<'a, S> {
	/// A builder reading from `source`, with `config` supplying defaults.
	pub fn new(source: &'a S, config: &'a TopologyConfig) -> Self {
		Self { source, config }
	}

	/// Build the graph for `devices`.
	///
	/// Returns `Ok(None)` when `devices` is empty, so callers can tell "nothing
	/// was asked for" apart from "nothing matched".
	pub fn build(&self, devices: &[Device], options: &BuildOptions) -> Result<Option<GraphPayload>, BuildError> {
		if devices.is_empty() {
			return Ok(None);
		}

		let options = options.resolve(self.config);
		let device_ids: BTreeSet<DeviceId> = devices.iter().map(|d| d.id).collect();
		let selected: HashMap<DeviceId, &Device> = devices.iter().map(|d| (d.id, d)).collect();

		let query = CableQuery {
			device_ids: &device_ids,
			exclude_circuit_terminations: !options.enable_circuit_terminations,
			exclude_types: &options.ignore_cable_types,
		};
		let cables = self.source.find_cables(&query).inspect_err(|e| {
			warn!("topology: cable lookup failed: {e}");
		})?;

		let mut slots = NodeSlots::default();
		let mut edges: Vec<Edge> = Vec::new();
		let mut processed_circuits: HashSet<CircuitId> = HashSet::new();

		for cable in &cables {
			if cable.touches_type(&options.ignore_cable_types) {
				debug!("topology: cable {cable} has an ignored termination type");
				continue;
			}

			let Some(link) = self.classify(cable, &options, &mut processed_circuits)? else {
				continue;
			};

			let resolve = |t: &Termination| t.device().and_then(|id| selected.get(&id).copied());
			let (Some(device_a), Some(device_b)) = (resolve(&link.a), resolve(&link.b)) else {
				debug!("topology: cable {cable} leaves the selected devices");
				continue;
			};

			let from = slots.reserve(device_a.id);
			let to = slots.reserve(device_b.id);

			let mut rows: Rows = vec![
				("To", format!("{device_b} [{}]", link.b)),
				("From", format!("{device_a} [{}]", link.a)),
			];
			rows.extend(link.rows);

			edges.push(Edge {
				id: edges.len(),
				from,
				to,
				title: describe(&link.title, &rows),
				color: non_empty(&cable.color).map(|c| format!("#{c}")),
				dashes: link.dashed.then_some(true),
				label: non_empty(&cable.label).map(escape_html),
			});
		}

		for device in devices {
			let slot = match slots.get(device.id) {
				Some(slot) => slot,
				None if options.hide_unconnected => continue,
				None => slots.reserve(device.id),
			};
			slots.fill(device_node(slot, device, &options));
		}

		let nodes = slots.finish()?;
		info!("topology: built {} nodes, {} edges", nodes.len(), edges.len());

		Ok(Some(GraphPayload { nodes, edges }))
	}

	/// Resolve `cable` into a device-to-device link, following a circuit when
	/// one end is a circuit termination.
	fn classify(
		&self,
		cable: &Cable,
		options: &ResolvedOptions,
		processed_circuits: &mut HashSet<CircuitId>,
	) -> Result<Option<Link>, BuildError> {
		if options.enable_circuit_terminations {
			let circuit_side = match (cable.a.circuit(), cable.b.circuit()) {
				(Some(circuit), _) => Some((circuit, true)),
				(None, Some(circuit)) => Some((circuit, false)),
				(None, None) => None,
			};

			if let Some((circuit_id, on_a_side)) = circuit_side {
				if processed_circuits.contains(&circuit_id) {
					debug!("topology: circuit {circuit_id} already drawn, skipping cable {cable}");
					return Ok(None);
				}

				let circuit_end = if on_a_side { &cable.a } else { &cable.b };
				let Some((peer, peer_cable)) = self.device_bound_peer(circuit_end)? else {
					debug!("topology: circuit {circuit_id} has no device behind it, skipping cable {cable}");
					return Ok(None);
				};
				let Some(circuit) = self.source.circuit(circuit_id)? else {
					debug!("topology: circuit {circuit_id} not found, skipping cable {cable}");
					return Ok(None);
				};

				let (a, b, cable_from, cable_to) = if on_a_side {
					(peer, cable.b.clone(), &peer_cable, cable)
				} else {
					(cable.a.clone(), peer, cable, &peer_cable)
				};

				let mut rows: Rows = vec![("Cable (From)", cable_from.to_string())];
				if let Some(kind) = non_empty(&cable_from.cable_type) {
					rows.push(("Type (From)", kind.to_string()));
				}
				rows.push(("Cable (To)", cable_to.to_string()));
				if let Some(kind) = non_empty(&cable_to.cable_type) {
					rows.push(("Type (To)", kind.to_string()));
				}
				rows.push(("Circuit", circuit.to_string()));
				rows.push(("Provider", circuit.provider.clone()));

				processed_circuits.insert(circuit_id);

				return Ok(Some(Link {
					a,
					b,
					title: format!("Circuit: {circuit}"),
					rows,
					dashed: true,
				}));
			}
		}

		let mut rows = Rows::new();
		if let Some(kind) = non_empty(&cable.cable_type) {
			rows.push(("Type", kind.to_string()));
		}
		Ok(Some(Link {
			a: cable.a.clone(),
			b: cable.b.clone(),
			title: format!("Cable: {cable}"),
			rows,
			dashed: false,
		}))
	}

	/// The device termination reached by crossing the circuit from
	/// `circuit_end`, with the cable that attaches it.
	fn device_bound_peer(&self, circuit_end: &Termination) -> Result<Option<(Termination, Cable)>, BuildError> {
		let Some(peer) = self.source.peer_termination(circuit_end.id)? else {
			return Ok(None);
		};
		let Some(cable_id) = peer.cable else {
			return Ok(None);
		};
		let Some(cable) = self.source.cable(cable_id)? else {
			return Ok(None);
		};

		let far_end = cable.other_end(peer.id);
		if far_end.device().is_none() {
			return Ok(None);
		}
		Ok(Some((far_end.clone(), cable)))
	}
}

/// Build a topology graph in one call. See [`TopologyGraphBuilder::build`].
pub fn build_topology<S: TopologySource + ?Sized>(
	source: &S,
	config: &TopologyConfig,
	devices: &[Device],
	options: &BuildOptions,
) -> Result<Option<GraphPayload>, BuildError> {
	TopologyGraphBuilder::new(source, config).build(devices, options)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
	value.as_deref().filter(|v| !v.is_empty())
}

fn device_node(slot: usize, device: &Device, options: &ResolvedOptions) -> Node {
	let label = device.to_string();
	let name = match non_empty(&device.name) {
		Some(name) => name.to_string(),
		None => format!("untitled-{}", device.id),
	};

	let mut rows: Rows = vec![("Status", device.status.clone())];
	if let Some(device_type) = &device.device_type {
		rows.push(("Type", device_type.model.clone()));
	}
	if !device.role.name.is_empty() {
		rows.push(("Role", device.role.name.clone()));
	}
	if let Some(serial) = non_empty(&device.serial) {
		rows.push(("Serial", serial.to_string()));
	}
	if let Some(ip) = non_empty(&device.primary_ip) {
		rows.push(("Primary IP", ip.to_string()));
	}

	let (x, y) = options.positions.get(&device.id).copied().unzip();

	Node {
		id: slot,
		name: escape_html(&name),
		label: escape_html(&label),
		shape: NODE_SHAPE.to_string(),
		image: options.role_image(&device.role.slug),
		title: describe(&label, &rows),
		border_color: non_empty(&device.role.color).map(|c| format!("#{c}")),
		x,
		y,
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::error::SourceError;
	use crate::topology::Snapshot;
	use crate::topology::model::{CableId, Circuit, DeviceRole, TerminationId};

	struct UnavailableSource;

	impl TopologySource for UnavailableSource {
		fn find_cables(&self, _query: &CableQuery<'_>) -> Result<Vec<Cable>, SourceError> {
			Err(SourceError::Unavailable("connection refused".into()))
		}

		fn peer_termination(&self, _termination: TerminationId) -> Result<Option<Termination>, SourceError> {
			Ok(None)
		}

		fn cable(&self, _id: CableId) -> Result<Option<Cable>, SourceError> {
			Ok(None)
		}

		fn circuit(&self, _id: CircuitId) -> Result<Option<Circuit>, SourceError> {
			Ok(None)
		}
	}

	fn device(id: u64, name: Option<&str>) -> Device {
		Device {
			id: DeviceId(id),
			name: name.map(str::to_string),
			role: DeviceRole {
				slug: "router".into(),
				name: "Router".into(),
				color: Some("aa1409".into()),
			},
			device_type: None,
			serial: Some("S&N".into()),
			primary_ip: None,
			status: "Active".into(),
			tags: Vec::new(),
		}
	}

	#[test]
	fn empty_selection_skips_the_query() {
		let config = TopologyConfig::default();
		let result = build_topology(&UnavailableSource, &config, &[], &BuildOptions::default()).unwrap();
		assert!(result.is_none());
	}

	#[test]
	fn source_failure_propagates() {
		let config = TopologyConfig::default();
		let err = build_topology(&UnavailableSource, &config, &[device(1, Some("r1"))], &BuildOptions::default())
			.unwrap_err();
		assert!(matches!(err, BuildError::Source(SourceError::Unavailable(_))));
	}

	#[test]
	fn node_fields_follow_the_device() {
		let options = BuildOptions {
			positions: HashMap::from([(DeviceId(9), (10.0, -4.5))]),
			..BuildOptions::default()
		}
		.resolve(&TopologyConfig::default());

		let node = device_node(2, &device(9, Some("<edge>")), &options);
		assert_eq!(node.id, 2);
		assert_eq!(node.name, "&lt;edge&gt;");
		assert_eq!(node.label, "&lt;edge&gt;");
		assert_eq!(node.shape, "image");
		assert_eq!(node.image, "../../static/netbox_topology_views/img/router.png");
		assert_eq!(node.border_color.as_deref(), Some("#aa1409"));
		assert_eq!((node.x, node.y), (Some(10.0), Some(-4.5)));
		assert!(node.title.contains(r#"<th align="right">Status</th><td>Active</td>"#));
		assert!(node.title.contains("<td>S&amp;N</td>"));
		assert!(!node.title.contains("Primary IP"));
	}

	#[test]
	fn unnamed_device_gets_untitled_name() {
		let options = BuildOptions::default().resolve(&TopologyConfig::default());
		let node = device_node(0, &device(12, None), &options);
		assert_eq!(node.name, "untitled-12");
		assert_eq!(node.label, "Device 12");
	}

	/// Circuit CID-5 joins a(1) and b(2). CID-6 from a ends on a power feed;
	/// CID-7 from a has an uncabled Z end.
	fn circuit_inventory() -> Snapshot {
		Snapshot::from_value(json!({
			"devices": [
				{ "id": 1, "name": "a", "role": { "slug": "router" }, "status": "Active" },
				{ "id": 2, "name": "b", "role": { "slug": "router" }, "status": "Active" }
			],
			"terminations": [
				{ "id": 10, "type": "interface", "name": "eth0", "attachment": { "kind": "device", "device": 1 } },
				{ "id": 11, "type": "circuit termination", "name": "A", "attachment": { "kind": "circuit", "circuit": 5 } },
				{ "id": 12, "type": "circuit termination", "name": "Z", "attachment": { "kind": "circuit", "circuit": 5 } },
				{ "id": 13, "type": "interface", "name": "eth0", "attachment": { "kind": "device", "device": 2 } },
				{ "id": 14, "type": "power feed", "name": "Feed 1", "attachment": { "kind": "unbound" } },
				{ "id": 15, "type": "interface", "name": "eth1", "attachment": { "kind": "device", "device": 1 } },
				{ "id": 16, "type": "circuit termination", "name": "A", "attachment": { "kind": "circuit", "circuit": 6 } },
				{ "id": 17, "type": "circuit termination", "name": "Z", "attachment": { "kind": "circuit", "circuit": 6 } },
				{ "id": 18, "type": "interface", "name": "eth2", "attachment": { "kind": "device", "device": 1 } },
				{ "id": 19, "type": "circuit termination", "name": "A", "attachment": { "kind": "circuit", "circuit": 7 } },
				{ "id": 20, "type": "circuit termination", "name": "Z", "attachment": { "kind": "circuit", "circuit": 7 } }
			],
			"cables": [
				{ "id": 100, "termination_a": 10, "termination_b": 11 },
				{ "id": 101, "termination_a": 12, "termination_b": 13 },
				{ "id": 102, "termination_a": 15, "termination_b": 16 },
				{ "id": 103, "termination_a": 17, "termination_b": 14 },
				{ "id": 104, "termination_a": 18, "termination_b": 19 }
			],
			"circuits": [
				{ "id": 5, "cid": "CID-5", "provider": "Acme", "termination_a": 11, "termination_z": 12 },
				{ "id": 6, "cid": "CID-6", "provider": "Acme", "termination_a": 16, "termination_z": 17 },
				{ "id": 7, "cid": "CID-7", "provider": "Acme", "termination_a": 19, "termination_z": 20 }
			]
		}))
		.unwrap()
	}

	#[derive(Clone, Copy, PartialEq)]
	enum Lookup {
		Peer,
		Cable,
		Circuit,
	}

	/// Wraps a snapshot to inject gaps and faults into individual lookups.
	#[derive(Default)]
	struct Patched {
		inner: Snapshot,
		failing: Option<Lookup>,
		uncabled_peer: Option<TerminationId>,
		missing_circuits: bool,
	}

	impl Patched {
		fn check(&self, lookup: Lookup) -> Result<(), SourceError> {
			if self.failing == Some(lookup) {
				return Err(SourceError::Unavailable("store went away".into()));
			}
			Ok(())
		}
	}

	impl TopologySource for Patched {
		fn find_cables(&self, query: &CableQuery<'_>) -> Result<Vec<Cable>, SourceError> {
			self.inner.find_cables(query)
		}

		fn peer_termination(&self, termination: TerminationId) -> Result<Option<Termination>, SourceError> {
			self.check(Lookup::Peer)?;
			let peer = self.inner.peer_termination(termination)?;
			Ok(peer.map(|peer| {
				if self.uncabled_peer == Some(peer.id) {
					Termination { cable: None, ..peer }
				} else {
					peer
				}
			}))
		}

		fn cable(&self, id: CableId) -> Result<Option<Cable>, SourceError> {
			self.check(Lookup::Cable)?;
			self.inner.cable(id)
		}

		fn circuit(&self, id: CircuitId) -> Result<Option<Circuit>, SourceError> {
			self.check(Lookup::Circuit)?;
			if self.missing_circuits {
				return Ok(None);
			}
			self.inner.circuit(id)
		}
	}

	fn build_both<S: TopologySource>(source: &S, snapshot: &Snapshot) -> Result<Option<GraphPayload>, BuildError> {
		build_topology(source, &TopologyConfig::default(), snapshot.devices(), &BuildOptions::default())
	}

	#[test]
	fn unresolvable_circuits_are_skipped() {
		let snapshot = circuit_inventory();
		let graph = build_both(&snapshot, &snapshot).unwrap().unwrap();

		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.edges.len(), 1);
		assert!(graph.edges[0].title.contains("Circuit: CID-5"));
		assert!(graph.edges.iter().all(|e| !e.title.contains("CID-6") && !e.title.contains("CID-7")));
	}

	#[test]
	fn missing_circuit_record_skips_the_cable() {
		let snapshot = circuit_inventory();
		let source = Patched {
			inner: snapshot.clone(),
			missing_circuits: true,
			..Patched::default()
		};
		let graph = build_both(&source, &snapshot).unwrap().unwrap();
		assert!(graph.edges.is_empty());
		assert_eq!(graph.nodes.len(), 2);
	}

	#[test]
	fn lookup_failures_during_traversal_propagate() {
		let snapshot = circuit_inventory();
		for lookup in [Lookup::Peer, Lookup::Cable, Lookup::Circuit] {
			let source = Patched {
				inner: snapshot.clone(),
				failing: Some(lookup),
				..Patched::default()
			};
			let err = build_both(&source, &snapshot).unwrap_err();
			assert!(matches!(err, BuildError::Source(SourceError::Unavailable(_))));
		}
	}

	#[test]
	fn skipped_traversal_leaves_the_circuit_open() {
		let snapshot = circuit_inventory();
		// Seen from cable 100, the Z end has no cable; cable 101 still resolves.
		let source = Patched {
			inner: snapshot.clone(),
			uncabled_peer: Some(TerminationId(12)),
			..Patched::default()
		};
		let graph = build_both(&source, &snapshot).unwrap().unwrap();

		assert_eq!(graph.edges.len(), 1);
		let edge = &graph.edges[0];
		assert_eq!(edge.dashes, Some(true));
		assert!(edge.title.contains("Circuit: CID-5"));
		assert!(edge.title.contains(r#"<th align="right">Cable (From)</th><td>#100</td>"#));
		assert!(edge.title.contains(r#"<th align="right">Cable (To)</th><td>#101</td>"#));
		assert_eq!(graph.nodes[edge.from].name, "a");
		assert_eq!(graph.nodes[edge.to].name, "b");
	}
}
