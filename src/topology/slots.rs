//! Dense node id assignment for one build.

use std::collections::HashMap;

use super::model::DeviceId;
use super::types::Node;
use crate::error::BuildError;

/// Arena of node slots keyed by device.
///
/// Edges reserve slots for their endpoints before the node pass knows what to
/// put in them; the node pass fills them afterwards. Slots are handed out in
/// first-use order starting at 0.
#[derive(Debug, Default)]
pub struct NodeSlots {
	by_device: HashMap<DeviceId, usize>,
	nodes: Vec<Option<Node>>,
}

impl NodeSlots {
	/// The slot of `device`, reserving the next free one on first use.
	pub fn reserve(&mut self, device: DeviceId) -> usize {
		*self.by_device.entry(device).or_insert_with(|| {
			self.nodes.push(None);
			self.nodes.len() - 1
		})
	}

	/// The slot of `device` if one was reserved.
	pub fn get(&self, device: DeviceId) -> Option<usize> {
		self.by_device.get(&device).copied()
	}

	/// Store `node` in its slot, replacing whatever was there.
	pub fn fill(&mut self, node: Node) {
		let slot = node.id;
		self.nodes[slot] = Some(node);
	}

	/// The node list, failing if any reserved slot was left empty.
	pub fn finish(self) -> Result<Vec<Node>, BuildError> {
		self.nodes
			.into_iter()
			.enumerate()
			.map(|(slot, node)| node.ok_or(BuildError::UnfilledSlot { slot }))
			.collect()
	}
}
