//! Force simulation over an index-addressed node arena.
//!
//! Each tick sums link, charge, centering and collision contributions into
//! per-node velocities, scaled by a cooling `alpha`, then integrates.
//! Positions are owned here; everything else reads them through
//! [`Simulation::positions`].

use std::collections::HashMap;
use std::f64::consts::PI;

use log::debug;

use super::config::ForceParams;
use super::model::NetworkGraph;
use super::types::{NodeKind, Point};

/// Position and velocity carried across a data refresh, keyed by node id.
pub type Carry = HashMap<String, (Point, Point)>;

#[derive(Clone, Copy, Debug)]
struct Link {
	source: usize,
	target: usize,
	strength: f64,
	/// Share of the correction applied to the target.
	bias: f64,
}

#[derive(Clone, Debug)]
pub struct Simulation {
	positions: Vec<Point>,
	velocities: Vec<Point>,
	radii: Vec<f64>,
	links: Vec<Link>,
	pinned: Option<(usize, Point)>,
	alpha: f64,
	params: ForceParams,
	ticks: u64,
}

/// Stable nonzero direction for coincident pairs.
fn jiggle(i: usize, j: usize) -> (f64, f64) {
	let angle = ((i * 7 + j * 13) as f64) * 0.7;
	(angle.cos() * 1e-6, angle.sin() * 1e-6)
}

impl Simulation {
	pub fn new(graph: &NetworkGraph, params: ForceParams) -> Self {
		Self::with_carry(graph, params, &Carry::new())
	}

	/// Seeds nodes found in `carry` at their previous position and the rest on a ring.
	pub fn with_carry(graph: &NetworkGraph, params: ForceParams, carry: &Carry) -> Self {
		let n = graph.len();
		let hub = graph.nodes().iter().position(|n| n.data.kind == NodeKind::Me);
		let ring = n - usize::from(hub.is_some());

		let mut positions = Vec::with_capacity(n);
		let mut velocities = Vec::with_capacity(n);
		let mut ring_idx = 0;
		let mut reused = 0;
		for (i, node) in graph.nodes().iter().enumerate() {
			if let Some(&(pos, vel)) = carry.get(&node.data.id) {
				positions.push(pos);
				velocities.push(vel);
				reused += 1;
				continue;
			}
			if hub == Some(i) {
				positions.push(Point::ORIGIN);
			} else {
				let angle = (ring_idx as f64) * 2.0 * PI / ring.max(1) as f64;
				positions.push(Point::new(
					params.seed_radius * angle.cos(),
					params.seed_radius * angle.sin(),
				));
				ring_idx += 1;
			}
			velocities.push(Point::ORIGIN);
		}

		let degree: Vec<usize> = (0..n).map(|i| graph.degree(i)).collect();
		let links = graph
			.edges()
			.iter()
			.map(|e| {
				let (ds, dt) = (degree[e.source] as f64, degree[e.target] as f64);
				Link {
					source: e.source,
					target: e.target,
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		let alpha = if n > 0 && reused == n {
			params.reheat_alpha
		} else {
			1.0
		};
		if reused > 0 {
			debug!("Reseeded simulation keeping {reused} of {n} positions");
		}

		Self {
			positions,
			velocities,
			radii: graph.nodes().iter().map(|n| n.radius).collect(),
			links,
			pinned: None,
			alpha,
			params,
			ticks: 0,
		}
	}

	/// Snapshot for [`Simulation::with_carry`] on the next graph.
	pub fn carry(&self, graph: &NetworkGraph) -> Carry {
		graph
			.nodes()
			.iter()
			.zip(self.positions.iter().zip(&self.velocities))
			.map(|(node, (&p, &v))| (node.data.id.clone(), (p, v)))
			.collect()
	}

	pub fn positions(&self) -> &[Point] {
		&self.positions
	}

	pub fn position(&self, idx: usize) -> Option<Point> {
		self.positions.get(idx).copied()
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	pub fn pinned(&self) -> Option<usize> {
		self.pinned.map(|(idx, _)| idx)
	}

	/// True while the layout is still cooling or a node is held by the pointer.
	pub fn is_active(&self) -> bool {
		!self.positions.is_empty() && (self.pinned.is_some() || self.alpha >= self.params.alpha_min)
	}

	/// Holds `idx` at `at`, releasing any previously pinned node.
	pub fn pin(&mut self, idx: usize, at: Point) {
		if idx >= self.positions.len() {
			return;
		}
		self.pinned = Some((idx, at));
		self.positions[idx] = at;
		self.velocities[idx] = Point::ORIGIN;
	}

	pub fn unpin(&mut self) {
		self.pinned = None;
	}

	pub fn kinetic_energy(&self) -> f64 {
		self.velocities
			.iter()
			.enumerate()
			.filter(|(i, _)| self.pinned() != Some(*i))
			.map(|(_, v)| v.x * v.x + v.y * v.y)
			.sum()
	}

	/// Advances one step. Returns false without doing anything once cooled.
	pub fn tick(&mut self) -> bool {
		if !self.is_active() {
			return false;
		}
		let target = if self.pinned.is_some() {
			self.params.drag_alpha_target
		} else {
			0.0
		};
		self.alpha += (target - self.alpha) * self.params.alpha_decay;

		self.apply_links();
		self.apply_charge();
		self.apply_center();
		self.apply_collision();

		let keep = 1.0 - self.params.velocity_decay;
		for (i, (pos, vel)) in self
			.positions
			.iter_mut()
			.zip(self.velocities.iter_mut())
			.enumerate()
		{
			match self.pinned {
				Some((idx, at)) if idx == i => {
					*pos = at;
					*vel = Point::ORIGIN;
				}
				_ => {
					vel.x *= keep;
					vel.y *= keep;
					pos.x += vel.x;
					pos.y += vel.y;
				}
			}
		}

		self.ticks += 1;
		if !self.is_active() {
			debug!("Simulation settled after {} ticks", self.ticks);
		}
		true
	}

	fn apply_links(&mut self) {
		let (p, v) = (&self.positions, &mut self.velocities);
		for link in &self.links {
			let (s, t) = (link.source, link.target);
			let (mut dx, mut dy) = (
				p[t].x + v[t].x - p[s].x - v[s].x,
				p[t].y + v[t].y - p[s].y - v[s].y,
			);
			if dx == 0.0 && dy == 0.0 {
				(dx, dy) = jiggle(s, t);
			}
			let l = (dx * dx + dy * dy).sqrt();
			let k = (l - self.params.link_distance) / l * self.alpha * link.strength;
			(dx, dy) = (dx * k, dy * k);
			v[t].x -= dx * link.bias;
			v[t].y -= dy * link.bias;
			v[s].x += dx * (1.0 - link.bias);
			v[s].y += dy * (1.0 - link.bias);
		}
	}

	fn apply_charge(&mut self) {
		let strength = self.params.charge_strength * self.alpha;
		if strength == 0.0 {
			return;
		}
		let floor = self.params.min_distance * self.params.min_distance;
		let n = self.positions.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let (mut dx, mut dy) = (
					self.positions[j].x - self.positions[i].x,
					self.positions[j].y - self.positions[i].y,
				);
				if dx == 0.0 && dy == 0.0 {
					(dx, dy) = jiggle(i, j);
				}
				let w = strength / (dx * dx + dy * dy).max(floor);
				self.velocities[i].x += dx * w;
				self.velocities[i].y += dy * w;
				self.velocities[j].x -= dx * w;
				self.velocities[j].y -= dy * w;
			}
		}
	}

	fn apply_center(&mut self) {
		let k = self.params.center_strength * self.alpha;
		for (pos, vel) in self.positions.iter().zip(self.velocities.iter_mut()) {
			vel.x -= pos.x * k;
			vel.y -= pos.y * k;
		}
	}

	fn apply_collision(&mut self) {
		let strength = self.params.collision_strength;
		if strength == 0.0 {
			return;
		}
		let n = self.positions.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let r = self.radii[i] + self.radii[j] + self.params.collision_padding;
				let (pi, pj) = (self.positions[i], self.positions[j]);
				let (vi, vj) = (self.velocities[i], self.velocities[j]);
				let (mut dx, mut dy) = (pi.x + vi.x - pj.x - vj.x, pi.y + vi.y - pj.y - vj.y);
				let mut l2 = dx * dx + dy * dy;
				if l2 >= r * r {
					continue;
				}
				if l2 == 0.0 {
					(dx, dy) = jiggle(i, j);
					l2 = dx * dx + dy * dy;
				}
				let l = l2.sqrt();
				let k = (r - l) / l * strength;
				(dx, dy) = (dx * k, dy * k);
				let (ri2, rj2) = (self.radii[i].powi(2), self.radii[j].powi(2));
				let share = rj2 / (ri2 + rj2);
				self.velocities[i].x += dx * share;
				self.velocities[i].y += dy * share;
				self.velocities[j].x -= dx * (1.0 - share);
				self.velocities[j].y -= dy * (1.0 - share);
			}
		}
	}
}
