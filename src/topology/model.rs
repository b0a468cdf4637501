//! Input records read from the host inventory.
//!
//! These mirror the device, cable, termination and circuit rows the builder
//! consumes. They are never mutated by a build.

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;

/// Stable device identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub u64);

/// Cable identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct CableId(pub u64);

/// Termination identifier, unique across device and circuit terminations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct TerminationId(pub u64);

/// Circuit identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct CircuitId(pub u64);

impl fmt::Display for DeviceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl fmt::Display for CircuitId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

/// Functional role of a device (router, access switch, ...).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DeviceRole {
	/// URL-safe role key. Selects the node image.
	pub slug: String,
	/// Human readable role name.
	#[serde(default)]
	pub name: String,
	/// Border color as hex without the leading `#`.
	#[serde(default)]
	pub color: Option<String>,
}

/// Hardware model of a device.
#[derive(Clone, Debug, Deserialize)]
pub struct DeviceType {
	/// Model name, e.g. `"MX204"`.
	pub model: String,
}

/// A network device.
#[derive(Clone, Debug, Deserialize)]
pub struct Device {
	/// Stable identifier.
	pub id: DeviceId,
	/// Device name; unnamed devices are displayed by model and id.
	#[serde(default)]
	pub name: Option<String>,
	/// Functional role.
	pub role: DeviceRole,
	/// Hardware model.
	#[serde(default)]
	pub device_type: Option<DeviceType>,
	/// Serial number.
	#[serde(default)]
	pub serial: Option<String>,
	/// Primary address, e.g. `"10.0.0.1/32"`.
	#[serde(default)]
	pub primary_ip: Option<String>,
	/// Operational status, e.g. `"Active"`.
	pub status: String,
	/// Tag names; only used when selecting devices, never rendered.
	#[serde(default)]
	pub tags: Vec<String>,
}

impl fmt::Display for Device {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match (&self.name, &self.device_type) {
			(Some(name), _) if !name.is_empty() => f.write_str(name),
			(_, Some(device_type)) => write!(f, "{} ({})", device_type.model, self.id),
			_ => write!(f, "Device {}", self.id),
		}
	}
}

/// What a termination is attached to.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Attachment {
	/// A component on a device (interface, console port, ...).
	Device { device: DeviceId },
	/// One end of a circuit.
	Circuit { circuit: CircuitId },
	/// Attached to neither, e.g. a power feed.
	Unbound,
}

/// An attachment point for a cable.
#[derive(Clone, Debug, Deserialize)]
pub struct Termination {
	/// Identifier.
	pub id: TerminationId,
	/// Type name the ignore list matches against, e.g. `"power port"`.
	#[serde(rename = "type")]
	pub type_name: String,
	/// Component name, e.g. `"eth0"`.
	pub name: String,
	/// Cable attached here, if any.
	#[serde(default)]
	pub cable: Option<CableId>,
	/// Owner of this termination.
	pub attachment: Attachment,
}

impl Termination {
	/// The device this termination belongs to, if it is device-bound.
	pub fn device(&self) -> Option<DeviceId> {
		match self.attachment {
			Attachment::Device { device } => Some(device),
			_ => None,
		}
	}

	/// The circuit this termination belongs to, if it is a circuit end.
	pub fn circuit(&self) -> Option<CircuitId> {
		match self.attachment {
			Attachment::Circuit { circuit } => Some(circuit),
			_ => None,
		}
	}
}

impl fmt::Display for Termination {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)
	}
}

/// A physical connection joining exactly two terminations.
#[derive(Clone, Debug)]
pub struct Cable {
	/// Identifier.
	pub id: CableId,
	/// Cable label; also the display string when set.
	pub label: Option<String>,
	/// Cabling medium, e.g. `"cat6"`.
	pub cable_type: Option<String>,
	/// Hex color without the leading `#`.
	pub color: Option<String>,
	/// A end.
	pub a: Termination,
	/// B end.
	pub b: Termination,
}

impl Cable {
	/// The end of this cable that is not `termination`.
	pub fn other_end(&self, termination: TerminationId) -> &Termination {
		if self.a.id == termination { &self.b } else { &self.a }
	}

	/// True when either end's type name is in `types`.
	pub fn touches_type(&self, types: &BTreeSet<String>) -> bool {
		types.contains(&self.a.type_name) || types.contains(&self.b.type_name)
	}

	/// True when either end is a circuit termination.
	pub fn touches_circuit(&self) -> bool {
		self.a.circuit().is_some() || self.b.circuit().is_some()
	}
}

impl fmt::Display for Cable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.label {
			Some(label) if !label.is_empty() => f.write_str(label),
			_ => write!(f, "#{}", self.id.0),
		}
	}
}

/// A carrier-provided circuit.
#[derive(Clone, Debug, Deserialize)]
pub struct Circuit {
	/// Identifier.
	pub id: CircuitId,
	/// Carrier circuit ID, used as the display string.
	pub cid: String,
	/// Carrier name.
	pub provider: String,
	/// A end.
	#[serde(default)]
	pub termination_a: Option<TerminationId>,
	/// Z end.
	#[serde(default)]
	pub termination_z: Option<TerminationId>,
}

impl Circuit {
	/// The opposite end of `termination`, if the circuit has one.
	pub fn peer_of(&self, termination: TerminationId) -> Option<TerminationId> {
		if self.termination_a == Some(termination) {
			self.termination_z
		} else if self.termination_z == Some(termination) {
			self.termination_a
		} else {
			None
		}
	}
}

impl fmt::Display for Circuit {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.cid)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn device(name: Option<&str>, model: Option<&str>) -> Device {
		Device {
			id: DeviceId(7),
			name: name.map(str::to_string),
			role: DeviceRole::default(),
			device_type: model.map(|m| DeviceType { model: m.to_string() }),
			serial: None,
			primary_ip: None,
			status: "Active".into(),
			tags: Vec::new(),
		}
	}

	#[test]
	fn device_display_prefers_name() {
		assert_eq!(device(Some("core-1"), Some("MX480")).to_string(), "core-1");
		assert_eq!(device(None, Some("MX480")).to_string(), "MX480 (7)");
		assert_eq!(device(Some(""), None).to_string(), "Device 7");
	}

	#[test]
	fn circuit_peer_is_opposite_end() {
		let circuit = Circuit {
			id: CircuitId(1),
			cid: "CID-1".into(),
			provider: "Acme".into(),
			termination_a: Some(TerminationId(10)),
			termination_z: Some(TerminationId(11)),
		};
		assert_eq!(circuit.peer_of(TerminationId(10)), Some(TerminationId(11)));
		assert_eq!(circuit.peer_of(TerminationId(11)), Some(TerminationId(10)));
		assert_eq!(circuit.peer_of(TerminationId(12)), None);
	}
}
