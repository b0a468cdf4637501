//! Graph payload handed to the rendering client.

use serde::{Deserialize, Serialize};

/// Node shape understood by the client. Device nodes are always drawn as images.
pub const NODE_SHAPE: &str = "image";

/// A device node in the graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Slot index assigned during the build. Referenced by edges.
	pub id: usize,
	/// Escaped device name, or `untitled-<device id>`.
	pub name: String,
	/// Escaped device display string.
	pub label: String,
	/// Always [`NODE_SHAPE`].
	pub shape: String,
	/// Path to the role image.
	pub image: String,
	/// Tooltip markup.
	pub title: String,
	/// Border color (e.g. `"#ff0000"`) taken from the device role.
	#[serde(rename = "color.border", default, skip_serializing_if = "Option::is_none")]
	pub border_color: Option<String>,
	/// Fixed x coordinate. The client lays the node out freely when unset.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub x: Option<f64>,
	/// Fixed y coordinate.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub y: Option<f64>,
}

/// A connection between two device nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
	/// Position of this edge in the edge list.
	pub id: usize,
	/// Node id of the A side.
	pub from: usize,
	/// Node id of the B side.
	pub to: usize,
	/// Tooltip markup.
	pub title: String,
	/// CSS color (e.g. `"#00ff00"`) taken from the cable.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	/// Set for edges that pass through a circuit.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub dashes: Option<bool>,
	/// Escaped cable label.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
}

/// Complete graph payload: nodes and edges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
	/// Nodes, indexed by their id.
	pub nodes: Vec<Node>,
	/// Edges, indexed by their id.
	pub edges: Vec<Edge>,
}
