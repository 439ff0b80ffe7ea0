use std::collections::HashMap;

use log::{info, warn};
use thiserror::Error;

use super::types::{NetworkData, NetworkNode, NodeKind, TrustTier};

pub const ME_RADIUS: f64 = 24.0;
pub const GOAL_RADIUS: f64 = 16.0;
pub const CONTACT_RADIUS: f64 = 8.0;
/// Extra radius a contact gains at a trust score of 100.
pub const TRUST_RADIUS_BONUS: f64 = 6.0;
pub const MIN_RADIUS: f64 = 6.0;

/// Input problems recovered from while loading a graph.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LoadIssue {
	#[error("duplicate node id `{0}`, keeping the first occurrence")]
	DuplicateNode(String),
	#[error("edge {source_id} -> {target_id} references unknown node `{missing}`")]
	UnknownEndpoint {
		source_id: String,
		target_id: String,
		missing: String,
	},
	#[error("self-referential edge on `{0}`")]
	SelfLoop(String),
	#[error("edge {source_id} -> {target_id} has invalid strength {strength}, using 1")]
	InvalidStrength {
		source_id: String,
		target_id: String,
		strength: f64,
	},
}

#[derive(Clone, Debug)]
pub struct GraphNode {
	pub data: NetworkNode,
	pub label: String,
	pub radius: f64,
	/// Sanitized score, `None` for non-contacts.
	pub trust_score: Option<f64>,
	pub tier: Option<TrustTier>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphEdge {
	pub source: usize,
	pub target: usize,
	pub strength: f64,
}

/// Validated, index-addressed view of one [`NetworkData`] snapshot.
#[derive(Clone, Debug, Default)]
pub struct NetworkGraph {
	nodes: Vec<GraphNode>,
	edges: Vec<GraphEdge>,
	index: HashMap<String, usize>,
	adjacency: Vec<Vec<usize>>,
	degrees: Vec<usize>,
	issues: Vec<LoadIssue>,
}

/// Label fallback order: name, title, email, then "Unknown".
pub fn display_name(node: &NetworkNode) -> String {
	[&node.name, &node.title, &node.email]
		.into_iter()
		.flatten()
		.map(|s| s.trim())
		.find(|s| !s.is_empty())
		.unwrap_or("Unknown")
		.to_string()
}

fn sanitize_score(score: Option<f64>) -> Option<f64> {
	score.filter(|s| s.is_finite()).map(|s| s.clamp(0.0, 100.0))
}

/// Deterministic size by kind. Contacts grow monotonically with trust.
pub fn node_radius(kind: NodeKind, trust_score: Option<f64>) -> f64 {
	let radius = match kind {
		NodeKind::Me => ME_RADIUS,
		NodeKind::Goal => GOAL_RADIUS,
		NodeKind::Contact => {
			let trust = sanitize_score(trust_score).unwrap_or(0.0);
			CONTACT_RADIUS + TRUST_RADIUS_BONUS * trust / 100.0
		}
	};
	radius.max(MIN_RADIUS)
}

impl NetworkGraph {
	pub fn load(data: &NetworkData) -> Self {
		let mut graph = NetworkGraph::default();

		for node in &data.nodes {
			if graph.index.contains_key(&node.id) {
				graph.report(LoadIssue::DuplicateNode(node.id.clone()));
				continue;
			}
			let trust_score = match node.kind {
				NodeKind::Contact => sanitize_score(node.trust_score),
				_ => None,
			};
			graph.index.insert(node.id.clone(), graph.nodes.len());
			graph.nodes.push(GraphNode {
				data: node.clone(),
				label: display_name(node),
				radius: node_radius(node.kind, trust_score),
				trust_score,
				tier: node.trust_tier,
			});
		}
		graph.adjacency = vec![Vec::new(); graph.nodes.len()];
		graph.degrees = vec![0; graph.nodes.len()];

		for edge in &data.edges {
			if edge.source_id == edge.target_id {
				graph.report(LoadIssue::SelfLoop(edge.source_id.clone()));
				continue;
			}
			let (source, target) = match (
				graph.index_of(&edge.source_id),
				graph.index_of(&edge.target_id),
			) {
				(Some(s), Some(t)) => (s, t),
				(s, _) => {
					let missing = if s.is_none() {
						&edge.source_id
					} else {
						&edge.target_id
					};
					graph.report(LoadIssue::UnknownEndpoint {
						source_id: edge.source_id.clone(),
						target_id: edge.target_id.clone(),
						missing: missing.clone(),
					});
					continue;
				}
			};
			let strength = if edge.strength.is_finite() && edge.strength > 0.0 {
				edge.strength
			} else {
				graph.report(LoadIssue::InvalidStrength {
					source_id: edge.source_id.clone(),
					target_id: edge.target_id.clone(),
					strength: edge.strength,
				});
				1.0
			};
			graph.edges.push(GraphEdge {
				source,
				target,
				strength,
			});
			graph.degrees[source] += 1;
			graph.degrees[target] += 1;
			if !graph.adjacency[source].contains(&target) {
				graph.adjacency[source].push(target);
				graph.adjacency[target].push(source);
			}
		}

		info!(
			"Loaded network: {} nodes, {} edges, {} dropped or fixed",
			graph.nodes.len(),
			graph.edges.len(),
			graph.issues.len()
		);
		graph
	}

	fn report(&mut self, issue: LoadIssue) {
		warn!("{issue}");
		self.issues.push(issue);
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}

	pub fn node(&self, idx: usize) -> Option<&GraphNode> {
		self.nodes.get(idx)
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Undirected 1-hop neighbors.
	pub fn neighbors(&self, idx: usize) -> &[usize] {
		self.adjacency.get(idx).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Number of edges touching `idx`, counting parallel edges.
	pub fn degree(&self, idx: usize) -> usize {
		self.degrees.get(idx).copied().unwrap_or(0)
	}

	pub fn issues(&self) -> &[LoadIssue] {
		&self.issues
	}

	pub fn count_kind(&self, kind: NodeKind) -> usize {
		self.nodes.iter().filter(|n| n.data.kind == kind).count()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network::types::NetworkEdge;

	fn data(nodes: Vec<NetworkNode>, edges: Vec<NetworkEdge>) -> NetworkData {
		NetworkData { nodes, edges }
	}

	#[test]
	fn drops_bad_edges_but_keeps_nodes() {
		let graph = NetworkGraph::load(&data(
			vec![
				NetworkNode::new("me", NodeKind::Me),
				NetworkNode::new("a", NodeKind::Contact),
			],
			vec![
				NetworkEdge::new("me", "a", 1.0),
				NetworkEdge::new("me", "ghost", 1.0),
				NetworkEdge::new("a", "a", 1.0),
			],
		));

		assert_eq!(graph.len(), 2);
		assert_eq!(graph.edges().len(), 1);
		assert_eq!(
			graph.issues(),
			&[
				LoadIssue::UnknownEndpoint {
					source_id: "me".into(),
					target_id: "ghost".into(),
					missing: "ghost".into(),
				},
				LoadIssue::SelfLoop("a".into()),
			]
		);
	}

	#[test]
	fn duplicate_ids_keep_first() {
		let graph = NetworkGraph::load(&data(
			vec![
				NetworkNode::new("a", NodeKind::Contact).with_name("First"),
				NetworkNode::new("a", NodeKind::Contact).with_name("Second"),
			],
			vec![],
		));
		assert_eq!(graph.len(), 1);
		assert_eq!(graph.nodes()[0].label, "First");
		assert_eq!(graph.issues(), &[LoadIssue::DuplicateNode("a".into())]);
	}

	#[test]
	fn invalid_strength_is_normalized() {
		let graph = NetworkGraph::load(&data(
			vec![
				NetworkNode::new("a", NodeKind::Contact),
				NetworkNode::new("b", NodeKind::Contact),
			],
			vec![
				NetworkEdge::new("a", "b", -2.0),
				NetworkEdge::new("b", "a", f64::NAN),
			],
		));
		assert!(graph.edges().iter().all(|e| e.strength == 1.0));
		assert_eq!(graph.issues().len(), 2);
		// parallel edges share one adjacency entry
		assert_eq!(graph.neighbors(0), &[1]);
		assert_eq!(graph.degree(0), 2);
		assert_eq!(graph.degree(1), 2);
		assert_eq!(graph.degree(7), 0);
	}

	#[test]
	fn adjacency_is_undirected() {
		let graph = NetworkGraph::load(&data(
			vec![
				NetworkNode::new("me", NodeKind::Me),
				NetworkNode::new("a", NodeKind::Contact),
				NetworkNode::new("g", NodeKind::Goal),
				NetworkNode::new("loner", NodeKind::Contact),
			],
			vec![NetworkEdge::new("me", "a", 1.0), NetworkEdge::new("g", "me", 1.0)],
		));
		let me = graph.index_of("me").unwrap();
		let goal = graph.index_of("g").unwrap();
		assert_eq!(graph.neighbors(me), &[1, 2]);
		assert_eq!(graph.neighbors(goal), &[me]);
		assert!(graph.neighbors(3).is_empty());
		assert!(graph.neighbors(99).is_empty());
		assert_eq!(graph.degree(me), 2);
		assert_eq!(graph.degree(3), 0);
	}

	#[test]
	fn radius_orders_kinds_and_grows_with_trust() {
		let low = node_radius(NodeKind::Contact, Some(10.0));
		let high = node_radius(NodeKind::Contact, Some(90.0));
		assert!(high > low);
		assert!(node_radius(NodeKind::Me, None) > node_radius(NodeKind::Goal, None));
		assert!(node_radius(NodeKind::Goal, None) > node_radius(NodeKind::Contact, Some(100.0)));
		for score in [None, Some(-50.0), Some(f64::NAN), Some(0.0), Some(1e9)] {
			assert!(node_radius(NodeKind::Contact, score) >= MIN_RADIUS);
		}
	}

	#[test]
	fn trust_is_ignored_off_contacts() {
		let graph = NetworkGraph::load(&data(
			vec![NetworkNode::new("g", NodeKind::Goal).with_trust(80.0, TrustTier::Rooted)],
			vec![],
		));
		assert_eq!(graph.nodes()[0].trust_score, None);
		assert_eq!(graph.nodes()[0].radius, GOAL_RADIUS);
	}

	#[test]
	fn display_name_falls_back() {
		assert_eq!(display_name(&NetworkNode::new("x", NodeKind::Contact)), "Unknown");
		let mut node = NetworkNode::new("x", NodeKind::Contact).with_email("sam@example.com");
		assert_eq!(display_name(&node), "sam@example.com");
		node.title = Some("  ".into());
		assert_eq!(display_name(&node), "sam@example.com");
		node.title = Some("CTO".into());
		assert_eq!(display_name(&node), "CTO");
		node.name = Some("Sam Lee".into());
		assert_eq!(display_name(&node), "Sam Lee");
	}
}
