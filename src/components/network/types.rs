use serde::{Deserialize, Serialize};

/// Which part of the network a node represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// The signed-in user, drawn at the hub of the network.
	#[serde(rename = "self")]
	Me,
	Contact,
	Goal,
}

/// Coarse relationship-health bucket, computed upstream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustTier {
	Rooted,
	Growing,
	Dormant,
	Frayed,
	#[default]
	#[serde(other)]
	Unknown,
}

impl TrustTier {
	pub fn label(&self) -> &'static str {
		match self {
			TrustTier::Rooted => "Rooted",
			TrustTier::Growing => "Growing",
			TrustTier::Dormant => "Dormant",
			TrustTier::Frayed => "Frayed",
			TrustTier::Unknown => "Unknown",
		}
	}
}

/// A node as handed over by the host page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkNode {
	pub id: String,
	pub kind: NodeKind,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub company: Option<String>,
	/// 0-100, meaningful for contacts only.
	#[serde(default)]
	pub trust_score: Option<f64>,
	#[serde(default)]
	pub trust_tier: Option<TrustTier>,
}

impl NetworkNode {
	pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
		Self {
			id: id.into(),
			kind,
			name: None,
			title: None,
			email: None,
			company: None,
			trust_score: None,
			trust_tier: None,
		}
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());
		self
	}

	pub fn with_trust(mut self, score: f64, tier: TrustTier) -> Self {
		self.trust_score = Some(score);
		self.trust_tier = Some(tier);
		self
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkEdge {
	pub source_id: String,
	pub target_id: String,
	#[serde(default = "default_strength")]
	pub strength: f64,
}

fn default_strength() -> f64 {
	1.0
}

impl NetworkEdge {
	pub fn new(source: impl Into<String>, target: impl Into<String>, strength: f64) -> Self {
		Self {
			source_id: source.into(),
			target_id: target.into(),
			strength,
		}
	}
}

/// One complete graph snapshot. Replaced wholesale when upstream data changes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkData {
	#[serde(default)]
	pub nodes: Vec<NetworkNode>,
	#[serde(default)]
	pub edges: Vec<NetworkEdge>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(&self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}

	pub fn midpoint(&self, other: Point) -> Point {
		Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
	}
}
