use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::palette::TierColorMap;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid network config: {0}")]
	Json(#[from] serde_json::Error),
}

/// Physics constants for the force simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceParams {
	/// Spring rest length. Edge strength does not change it.
	pub link_distance: f64,
	/// Many-body strength, negative repels.
	pub charge_strength: f64,
	pub center_strength: f64,
	pub collision_strength: f64,
	pub collision_padding: f64,
	pub alpha_decay: f64,
	pub alpha_min: f64,
	/// Alpha the simulation is held at while a node is dragged.
	pub drag_alpha_target: f64,
	/// Alpha used when a refreshed graph keeps every known position.
	pub reheat_alpha: f64,
	pub velocity_decay: f64,
	/// Distance floor for the repulsion term.
	pub min_distance: f64,
	/// Radius of the ring new nodes are seeded on.
	pub seed_radius: f64,
}

impl Default for ForceParams {
	fn default() -> Self {
		Self {
			link_distance: 90.0,
			charge_strength: -30.0,
			center_strength: 0.02,
			collision_strength: 0.7,
			collision_padding: 4.0,
			// 1 -> 0.001 in 300 ticks
			alpha_decay: 1.0 - 0.001f64.powf(1.0 / 300.0),
			alpha_min: 0.001,
			drag_alpha_target: 0.3,
			reheat_alpha: 0.3,
			velocity_decay: 0.4,
			min_distance: 1.0,
			seed_radius: 100.0,
		}
	}
}

/// Capability set for one network view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkConfig {
	pub show_trust_badge: bool,
	/// Labels longer than this many characters are ellipsis-truncated.
	pub label_max_length: usize,
	pub show_legend: bool,
	pub palette: TierColorMap,
	pub physics: ForceParams,
	pub min_zoom: f64,
	pub max_zoom: f64,
	/// Pointer travel in screen pixels beyond which a press becomes a drag.
	pub click_threshold: f64,
}

impl Default for NetworkConfig {
	fn default() -> Self {
		Self {
			show_trust_badge: true,
			label_max_length: 15,
			show_legend: true,
			palette: TierColorMap::default(),
			physics: ForceParams::default(),
			min_zoom: 0.1,
			max_zoom: 4.0,
			click_threshold: 4.0,
		}
	}
}

impl NetworkConfig {
	/// Full dashboard view: trust badges and a roomier layout.
	pub fn detailed() -> Self {
		Self {
			physics: ForceParams {
				link_distance: 100.0,
				..ForceParams::default()
			},
			..Self::default()
		}
	}

	/// Sidebar-sized view without badges.
	pub fn compact() -> Self {
		Self {
			show_trust_badge: false,
			label_max_length: 12,
			show_legend: false,
			physics: ForceParams {
				link_distance: 80.0,
				..ForceParams::default()
			},
			..Self::default()
		}
	}

	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		Ok(serde_json::from_str(json)?)
	}

	/// Zoom range with the bounds in order. A bound that is not a positive number
	/// falls back to its default.
	pub fn zoom_bounds(&self) -> (f64, f64) {
		let defaults = Self::default();
		let usable = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
		let a = usable(self.min_zoom, defaults.min_zoom);
		let b = usable(self.max_zoom, defaults.max_zoom);
		(a.min(b), a.max(b))
	}
}
