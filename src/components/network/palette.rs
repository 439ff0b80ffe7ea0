use serde::{Deserialize, Serialize};

use super::types::{NodeKind, TrustTier};

/// Fill colors per trust tier plus the fixed accents for the user and goal nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierColorMap {
	pub rooted: String,
	pub growing: String,
	pub dormant: String,
	pub frayed: String,
	pub unknown: String,
	pub me: String,
	pub goal: String,
}

impl Default for TierColorMap {
	fn default() -> Self {
		Self {
			rooted: "#22c55e".into(),
			growing: "#3b82f6".into(),
			dormant: "#f59e0b".into(),
			frayed: "#ef4444".into(),
			unknown: "#9ca3af".into(),
			me: "#a855f7".into(),
			goal: "#ec4899".into(),
		}
	}
}

impl TierColorMap {
	pub fn tier(&self, tier: TrustTier) -> &str {
		match tier {
			TrustTier::Rooted => &self.rooted,
			TrustTier::Growing => &self.growing,
			TrustTier::Dormant => &self.dormant,
			TrustTier::Frayed => &self.frayed,
			TrustTier::Unknown => &self.unknown,
		}
	}

	/// Total over every kind/tier combination; a missing tier falls back to the neutral gray.
	pub fn color_for(&self, kind: NodeKind, tier: Option<TrustTier>) -> &str {
		match kind {
			NodeKind::Me => &self.me,
			NodeKind::Goal => &self.goal,
			NodeKind::Contact => self.tier(tier.unwrap_or_default()),
		}
	}

	/// Swatches shown in the legend overlay, in display order.
	pub fn legend(&self) -> Vec<(&'static str, &str)> {
		vec![
			("You", self.me.as_str()),
			("Goal", self.goal.as_str()),
			(TrustTier::Rooted.label(), self.rooted.as_str()),
			(TrustTier::Growing.label(), self.growing.as_str()),
			(TrustTier::Dormant.label(), self.dormant.as_str()),
			(TrustTier::Frayed.label(), self.frayed.as_str()),
		]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn contacts_follow_tier_and_accents_ignore_it() {
		let palette = TierColorMap::default();
		assert_eq!(
			palette.color_for(NodeKind::Contact, Some(TrustTier::Rooted)),
			palette.rooted
		);
		assert_eq!(
			palette.color_for(NodeKind::Contact, Some(TrustTier::Frayed)),
			palette.frayed
		);
		assert_eq!(
			palette.color_for(NodeKind::Goal, Some(TrustTier::Rooted)),
			palette.goal
		);
		assert_eq!(palette.color_for(NodeKind::Me, None), palette.me);
	}

	#[test]
	fn missing_tier_is_neutral_gray() {
		let palette = TierColorMap::default();
		assert_eq!(palette.color_for(NodeKind::Contact, None), "#9ca3af");
		assert_eq!(
			palette.color_for(NodeKind::Contact, Some(TrustTier::Unknown)),
			"#9ca3af"
		);
	}
}
