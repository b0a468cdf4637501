//! Data access seam between the builder and the host inventory.

use std::collections::BTreeSet;

use super::model::{Cable, CableId, Circuit, CircuitId, DeviceId, Termination, TerminationId};
use crate::error::SourceError;

/// Filter for the bulk cable lookup.
#[derive(Clone, Copy, Debug)]
pub struct CableQuery<'a> {
	/// Cables with at least one end on one of these devices.
	pub device_ids: &'a BTreeSet<DeviceId>,
	/// Leave out cables with a circuit termination on either end.
	pub exclude_circuit_terminations: bool,
	/// Leave out cables with either end's type name in this set.
	pub exclude_types: &'a BTreeSet<String>,
}

impl CableQuery<'_> {
	/// Whether `cable` satisfies this query.
	pub fn matches(&self, cable: &Cable) -> bool {
		let touches_device = [cable.a.device(), cable.b.device()]
			.into_iter()
			.flatten()
			.any(|device| self.device_ids.contains(&device));

		touches_device
			&& !(self.exclude_circuit_terminations && cable.touches_circuit())
			&& !cable.touches_type(self.exclude_types)
	}
}

/// Read-only access to cables, terminations and circuits.
///
/// Implementations return `Ok(None)` for records that do not exist; `Err` is
/// reserved for the store itself failing.
pub trait TopologySource {
	/// All cables matching `query`, in a stable order.
	fn find_cables(&self, query: &CableQuery<'_>) -> Result<Vec<Cable>, SourceError>;

	/// The termination on the far side of a circuit termination's circuit.
	fn peer_termination(&self, termination: TerminationId) -> Result<Option<Termination>, SourceError>;

	/// A cable by id, with both terminations attached.
	fn cable(&self, id: CableId) -> Result<Option<Cable>, SourceError>;

	/// A circuit by id.
	fn circuit(&self, id: CircuitId) -> Result<Option<Circuit>, SourceError>;
}
