//! Topology graph construction from device, cable and circuit records.
//!
//! The builder reads through a [`TopologySource`] and produces a
//! [`GraphPayload`] ready to serialize for the rendering client:
//! - devices become image nodes with dense ids
//! - cables become edges, circuits become dashed edges between the devices
//!   on either side
//! - tooltips are escaped HTML tables
//!
//! # Example
//!
//! ```
//! use topology_views::{BuildOptions, Snapshot, TopologyConfig, build_topology};
//!
//! let snapshot = Snapshot::from_json_str(r#"{
//!     "devices": [
//!         { "id": 1, "name": "r1", "role": { "slug": "router" }, "status": "Active" },
//!         { "id": 2, "name": "r2", "role": { "slug": "router" }, "status": "Active" }
//!     ],
//!     "terminations": [
//!         { "id": 10, "type": "interface", "name": "eth0", "attachment": { "kind": "device", "device": 1 } },
//!         { "id": 20, "type": "interface", "name": "eth0", "attachment": { "kind": "device", "device": 2 } }
//!     ],
//!     "cables": [{ "id": 1, "termination_a": 10, "termination_b": 20 }]
//! }"#).unwrap();
//!
//! let config = TopologyConfig::default();
//! let graph = build_topology(&snapshot, &config, snapshot.devices(), &BuildOptions::default())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(graph.nodes.len(), 2);
//! assert_eq!(graph.edges.len(), 1);
//! ```

mod builder;
mod description;
mod model;
mod slots;
mod snapshot;
mod source;
mod types;

pub use builder::{TopologyGraphBuilder, build_topology};
pub use description::{describe, escape_html};
pub use model::{
	Attachment, Cable, CableId, Circuit, CircuitId, Device, DeviceId, DeviceRole, DeviceType, Termination,
	TerminationId,
};
pub use snapshot::Snapshot;
pub use source::{CableQuery, TopologySource};
pub use types::{Edge, GraphPayload, NODE_SHAPE, Node};
