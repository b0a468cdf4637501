//! Error types for data sources, builds and configuration.

use std::path::PathBuf;

use thiserror::Error as ThisError;

///
/// SourceError
/// Fault raised by a topology data source. Topology gaps are not errors.
///

#[derive(Debug, ThisError)]
pub enum SourceError {
	/// The backing store could not be reached.
	#[error("data source unavailable: {0}")]
	Unavailable(String),

	/// A snapshot file could not be read.
	#[error("failed to read snapshot {path}: {source}")]
	Io {
		/// File that was being read.
		path: PathBuf,
		/// Underlying I/O error.
		source: std::io::Error,
	},

	/// A snapshot was not valid JSON or did not match the record layout.
	#[error("invalid snapshot: {0}")]
	Parse(#[from] serde_json::Error),

	/// A cable record names a termination that does not exist.
	#[error("cable {cable} references unknown termination {termination}")]
	DanglingTermination {
		/// Offending cable id.
		cable: u64,
		/// Missing termination id.
		termination: u64,
	},

	/// A cable record reuses a termination another cable already holds.
	#[error("cable {cable} attaches to termination {termination}, which already has a cable")]
	DoubleCabled {
		/// The later cable id.
		cable: u64,
		/// Shared termination id.
		termination: u64,
	},
}

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
	/// The data source failed; no partial graph is returned.
	#[error(transparent)]
	Source(#[from] SourceError),

	/// A node slot was handed out but no node was written to it.
	#[error("node slot {slot} was reserved but never filled")]
	UnfilledSlot {
		/// Index of the empty slot.
		slot: usize,
	},
}

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// The config file could not be read.
	#[error("failed to read config {path}: {source}")]
	Io {
		/// File that was being read.
		path: PathBuf,
		/// Underlying I/O error.
		source: std::io::Error,
	},

	/// The config was not valid JSON or had a mistyped key.
	#[error("invalid config: {0}")]
	Parse(#[from] serde_json::Error),
}
