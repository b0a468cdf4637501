//! In-memory inventory loaded from a JSON export.
//!
//! Expected format:
//!
//! ```json
//! {
//!   "devices": [{ "id": 1, "name": "core-1", "role": { "slug": "router" }, "status": "Active" }],
//!   "terminations": [{ "id": 10, "type": "interface", "name": "eth0",
//!                      "attachment": { "kind": "device", "device": 1 } }],
//!   "cables": [{ "id": 100, "termination_a": 10, "termination_b": 11 }],
//!   "circuits": [{ "id": 5, "cid": "CID-5", "provider": "Acme",
//!                  "termination_a": 20, "termination_z": 21 }]
//! }
//! ```
//!
//! The `cable` field of a termination is derived from the cable records.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use log::info;
use serde::Deserialize;

use super::model::{Cable, CableId, Circuit, CircuitId, Device, DeviceId, Termination, TerminationId};
use super::source::{CableQuery, TopologySource};
use crate::config::TopologyConfig;
use crate::error::SourceError;

#[derive(Debug, Deserialize)]
struct CableRecord {
	id: CableId,
	#[serde(default)]
	label: Option<String>,
	#[serde(rename = "type", default)]
	cable_type: Option<String>,
	#[serde(default)]
	color: Option<String>,
	termination_a: TerminationId,
	termination_b: TerminationId,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SnapshotRecords {
	devices: Vec<Device>,
	terminations: Vec<Termination>,
	cables: Vec<CableRecord>,
	circuits: Vec<Circuit>,
}

/// A resolved, read-only record set implementing [`TopologySource`].
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
	devices: Vec<Device>,
	terminations: HashMap<TerminationId, Termination>,
	cables: Vec<Cable>,
	cable_index: HashMap<CableId, usize>,
	circuits: HashMap<CircuitId, Circuit>,
}

impl Snapshot {
	/// Parse a JSON export.
	pub fn from_json_str(json: &str) -> Result<Self, SourceError> {
		Self::from_records(serde_json::from_str(json)?)
	}

	/// Parse a JSON value, e.g. one built with `serde_json::json!`.
	pub fn from_value(value: serde_json::Value) -> Result<Self, SourceError> {
		Self::from_records(serde_json::from_value(value)?)
	}

	/// Read and parse a JSON export file.
	pub fn from_path(path: &Path) -> Result<Self, SourceError> {
		let json = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_json_str(&json)
	}

	fn from_records(records: SnapshotRecords) -> Result<Self, SourceError> {
		let mut terminations: HashMap<TerminationId, Termination> = records
			.terminations
			.into_iter()
			.map(|t| (t.id, Termination { cable: None, ..t }))
			.collect();

		for record in &records.cables {
			for end in [record.termination_a, record.termination_b] {
				let termination = terminations.get_mut(&end).ok_or(SourceError::DanglingTermination {
					cable: record.id.0,
					termination: end.0,
				})?;
				if termination.cable.is_some() {
					return Err(SourceError::DoubleCabled {
						cable: record.id.0,
						termination: end.0,
					});
				}
				termination.cable = Some(record.id);
			}
		}

		let mut cables = Vec::with_capacity(records.cables.len());
		let mut cable_index = HashMap::with_capacity(records.cables.len());
		for record in records.cables {
			// Both ends were checked above.
			let (Some(a), Some(b)) = (
				terminations.get(&record.termination_a),
				terminations.get(&record.termination_b),
			) else {
				continue;
			};
			cable_index.insert(record.id, cables.len());
			cables.push(Cable {
				id: record.id,
				label: record.label,
				cable_type: record.cable_type,
				color: record.color,
				a: a.clone(),
				b: b.clone(),
			});
		}

		let circuits = records.circuits.into_iter().map(|c| (c.id, c)).collect();

		info!(
			"snapshot: loaded {} devices, {} cables, {} terminations",
			records.devices.len(),
			cables.len(),
			terminations.len()
		);

		Ok(Self {
			devices: records.devices,
			terminations,
			cables,
			cable_index,
			circuits,
		})
	}

	/// All devices, in export order.
	pub fn devices(&self) -> &[Device] {
		&self.devices
	}

	/// Devices whose id is in `ids`, in export order.
	pub fn devices_by_id(&self, ids: &BTreeSet<DeviceId>) -> Vec<Device> {
		self.devices
			.iter()
			.filter(|d| ids.contains(&d.id))
			.cloned()
			.collect()
	}

	/// Devices whose role name is in `roles` and that carry a tag in `tags`.
	/// An empty list does not filter.
	pub fn devices_by_role_and_tag(&self, roles: &[String], tags: &[String]) -> Vec<Device> {
		self.devices
			.iter()
			.filter(|d| roles.is_empty() || roles.contains(&d.role.name))
			.filter(|d| tags.is_empty() || d.tags.iter().any(|t| tags.contains(t)))
			.cloned()
			.collect()
	}

	/// Devices drawn when no explicit selection is given: the configured
	/// preselected roles and tags.
	///
	/// Returns `None` when the initial graph should not be drawn. `draw_init`
	/// decides that, falling back to `draw_default_layout` when unset.
	pub fn default_selection(&self, config: &TopologyConfig, draw_init: Option<bool>) -> Option<Vec<Device>> {
		if !draw_init.unwrap_or(config.draw_default_layout) {
			return None;
		}
		Some(self.devices_by_role_and_tag(&config.preselected_device_roles, &config.preselected_tags))
	}
}

impl TopologySource for Snapshot {
	fn find_cables(&self, query: &CableQuery<'_>) -> Result<Vec<Cable>, SourceError> {
		Ok(self
			.cables
			.iter()
			.filter(|cable| query.matches(cable))
			.cloned()
			.collect())
	}

	fn peer_termination(&self, termination: TerminationId) -> Result<Option<Termination>, SourceError> {
		let peer = self
			.terminations
			.get(&termination)
			.and_then(Termination::circuit)
			.and_then(|circuit| self.circuits.get(&circuit))
			.and_then(|circuit| circuit.peer_of(termination))
			.and_then(|peer| self.terminations.get(&peer));
		Ok(peer.cloned())
	}

	fn cable(&self, id: CableId) -> Result<Option<Cable>, SourceError> {
		Ok(self.cable_index.get(&id).map(|&i| self.cables[i].clone()))
	}

	fn circuit(&self, id: CircuitId) -> Result<Option<Circuit>, SourceError> {
		Ok(self.circuits.get(&id).cloned())
	}
}
