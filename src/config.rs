//! Topology settings and per-build overrides.
//!
//! [`TopologyConfig`] holds the process-wide defaults. [`BuildOptions`] carries
//! what a single request asked for. Anything a request leaves unset falls back
//! to the config when the options are resolved.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::topology::DeviceId;

/// Default URL prefix for role images.
pub const DEFAULT_IMAGE_BASE: &str = "../../static/netbox_topology_views/img/";

/// Image used when a role has no bundled image.
pub const UNKNOWN_ROLE_IMAGE: &str = "role-unknown";

/// Role slugs that ship with an image.
pub fn default_device_images() -> Vec<String> {
	[
		"access-switch",
		"core-switch",
		"firewall",
		"router",
		"distribution-switch",
		"backup",
		"storage",
		"wan-network",
		"wireless-ap",
		"server",
		"internal-switch",
		"isp-cloud",
		"power-units",
		"power-panel",
		"pdu",
	]
	.into_iter()
	.map(str::to_string)
	.collect()
}

fn default_preselected_device_roles() -> Vec<String> {
	[
		"Router",
		"Firewall",
		"Distribution Switch",
		"Core Switch",
		"Internal Switch",
		"Access Switch",
		"Server",
		"Storage",
		"Backup",
		"Wireless AP",
	]
	.into_iter()
	.map(str::to_string)
	.collect()
}

/// Process-wide topology settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
	/// Role slugs with a bundled image.
	pub device_img: Vec<String>,
	/// Role names selected when no device filter is given.
	pub preselected_device_roles: Vec<String>,
	/// Tag names selected when no device filter is given.
	pub preselected_tags: Vec<String>,
	/// Termination type names whose cables are left out of the graph.
	pub ignore_cable_type: Vec<String>,
	/// Follow circuits to the device behind them.
	pub enable_circuit_terminations: bool,
	/// Draw the preselected graph on first load.
	pub draw_default_layout: bool,
	/// Prefix joined with `<slug>.png` to form node image paths.
	pub image_base: String,
}

impl Default for TopologyConfig {
	fn default() -> Self {
		Self {
			device_img: default_device_images(),
			preselected_device_roles: default_preselected_device_roles(),
			preselected_tags: Vec::new(),
			ignore_cable_type: Vec::new(),
			enable_circuit_terminations: true,
			draw_default_layout: false,
			image_base: DEFAULT_IMAGE_BASE.to_string(),
		}
	}
}

impl TopologyConfig {
	/// Parse a JSON config. Missing keys take their defaults.
	pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
		Ok(serde_json::from_str(json)?)
	}

	/// Read and parse a JSON config file.
	pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
		let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_json_str(&json)
	}
}

/// Per-build overrides. `None` means "use the config value".
#[derive(Clone, Debug, Default)]
pub struct BuildOptions {
	/// Leave out devices that no edge touches.
	pub hide_unconnected: bool,
	/// Termination type names to leave out.
	pub ignore_cable_types: Option<Vec<String>>,
	/// Follow circuits to the device behind them.
	pub enable_circuit_terminations: Option<bool>,
	/// Role slugs with a bundled image.
	pub enabled_device_images: Option<Vec<String>>,
	/// Fixed node coordinates keyed by device.
	pub positions: HashMap<DeviceId, (f64, f64)>,
}

impl BuildOptions {
	/// Merge these overrides with `config` into the parameters of one build.
	pub fn resolve(&self, config: &TopologyConfig) -> ResolvedOptions {
		let ignore_cable_types = self
			.ignore_cable_types
			.as_ref()
			.unwrap_or(&config.ignore_cable_type)
			.iter()
			.cloned()
			.collect();
		let enabled_device_images = self
			.enabled_device_images
			.as_ref()
			.unwrap_or(&config.device_img)
			.iter()
			.cloned()
			.collect();

		ResolvedOptions {
			hide_unconnected: self.hide_unconnected,
			ignore_cable_types,
			enable_circuit_terminations: self
				.enable_circuit_terminations
				.unwrap_or(config.enable_circuit_terminations),
			enabled_device_images,
			image_base: config.image_base.clone(),
			positions: self.positions.clone(),
		}
	}
}

/// Fully resolved parameters of one build.
#[derive(Clone, Debug)]
pub struct ResolvedOptions {
	/// Leave out devices that no edge touches.
	pub hide_unconnected: bool,
	/// Termination type names to leave out.
	pub ignore_cable_types: BTreeSet<String>,
	/// Follow circuits to the device behind them.
	pub enable_circuit_terminations: bool,
	/// Role slugs with a bundled image.
	pub enabled_device_images: BTreeSet<String>,
	/// Prefix for role image paths.
	pub image_base: String,
	/// Fixed node coordinates keyed by device.
	pub positions: HashMap<DeviceId, (f64, f64)>,
}

impl ResolvedOptions {
	/// Image path for a role slug, falling back to the unknown-role image.
	pub fn role_image(&self, slug: &str) -> String {
		let slug = if self.enabled_device_images.contains(slug) {
			slug
		} else {
			UNKNOWN_ROLE_IMAGE
		};
		format!("{}{}.png", self.image_base, slug)
	}
}
