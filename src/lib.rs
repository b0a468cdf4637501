//! topology-views: network topology graphs for a visualization widget.
//!
//! This crate turns a selection of devices, plus the cables and circuits
//! around them, into a node/edge payload that a force-directed graph client
//! can render directly.

// Only the binary target parses arguments.
use clap as _;
use log::info;
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod error;
pub mod topology;

pub use config::{BuildOptions, ResolvedOptions, TopologyConfig};
pub use error::{BuildError, ConfigError, SourceError};
pub use topology::{GraphPayload, Snapshot, TopologyGraphBuilder, TopologySource, build_topology};

/// Install the log subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.try_init();
	info!("topology-views: logging initialized");
}
