use std::collections::HashSet;

use super::config::NetworkConfig;
use super::model::NetworkGraph;
use super::simulation::Simulation;
use super::types::Point;
use super::viewport::{ViewTransform, Viewport};

/// Extra pick distance around a node's circle, in graph units.
pub const HIT_SLOP: f64 = 4.0;

/// What the host should hear about. Indices address the current graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionEvent {
	Clicked(usize),
	Hovered(Option<usize>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	Idle,
	Hovering,
	Dragging,
	Panning,
	Pinching,
}

#[derive(Clone, Copy, Debug)]
struct DragState {
	node: usize,
	press: Point,
	/// Latest pointer position in screen space.
	last: Point,
	moved: bool,
}

#[derive(Clone, Copy, Debug)]
struct PanState {
	press: Point,
	origin: ViewTransform,
	moved: bool,
}

#[derive(Clone, Copy, Debug)]
struct PinchState {
	distance: f64,
	midpoint: Point,
}

/// Borrowed pieces of the network a pointer event may touch.
pub struct Scene<'a> {
	pub graph: &'a NetworkGraph,
	pub simulation: &'a mut Simulation,
	pub viewport: &'a mut Viewport,
}

/// Nearest node whose circle (plus slop) contains the graph-space point.
pub fn hit_test(graph: &NetworkGraph, positions: &[Point], at: Point) -> Option<usize> {
	graph
		.nodes()
		.iter()
		.zip(positions)
		.enumerate()
		.map(|(i, (node, pos))| (i, pos.distance(at), node.radius + HIT_SLOP))
		.filter(|&(_, d, reach)| d <= reach)
		.min_by(|a, b| a.1.total_cmp(&b.1))
		.map(|(i, _, _)| i)
}

#[derive(Clone, Debug)]
pub struct InteractionState {
	drag: Option<DragState>,
	pan: Option<PanState>,
	pinch: Option<PinchState>,
	hovered: Option<usize>,
	selected: Option<usize>,
	highlighted: HashSet<usize>,
	click_threshold: f64,
	min_zoom: f64,
	max_zoom: f64,
}

impl InteractionState {
	pub fn new(config: &NetworkConfig) -> Self {
		let (min_zoom, max_zoom) = config.zoom_bounds();
		Self {
			drag: None,
			pan: None,
			pinch: None,
			hovered: None,
			selected: None,
			highlighted: HashSet::new(),
			click_threshold: config.click_threshold,
			min_zoom,
			max_zoom,
		}
	}

	pub fn phase(&self) -> Phase {
		if self.drag.is_some() {
			Phase::Dragging
		} else if self.pan.is_some() {
			Phase::Panning
		} else if self.pinch.is_some() {
			Phase::Pinching
		} else if self.hovered.is_some() {
			Phase::Hovering
		} else {
			Phase::Idle
		}
	}

	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	pub fn selected(&self) -> Option<usize> {
		self.selected
	}

	pub fn dragged(&self) -> Option<usize> {
		self.drag.map(|d| d.node)
	}

	/// Hovered (or else selected) node plus its 1-hop neighbors.
	pub fn highlighted(&self) -> &HashSet<usize> {
		&self.highlighted
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.highlighted.contains(&idx)
	}

	fn refresh_highlight(&mut self, graph: &NetworkGraph) {
		self.highlighted.clear();
		if let Some(focus) = self.hovered.or(self.selected) {
			self.highlighted.insert(focus);
			self.highlighted.extend(graph.neighbors(focus).iter().copied());
		}
	}

	fn set_hover(&mut self, graph: &NetworkGraph, node: Option<usize>) -> Option<InteractionEvent> {
		if self.hovered == node {
			return None;
		}
		self.hovered = node;
		self.refresh_highlight(graph);
		Some(InteractionEvent::Hovered(node))
	}

	/// Re-pins the dragged node under the pointer after the transform changed.
	fn follow_pointer(&self, scene: &mut Scene<'_>) {
		if let Some(drag) = self.drag {
			let at = scene.viewport.transform.screen_to_graph(drag.last);
			scene.simulation.pin(drag.node, at);
		}
	}

	fn cancel_drag(&mut self, simulation: &mut Simulation) {
		if self.drag.take().is_some() {
			simulation.unpin();
		}
	}

	pub fn pointer_down(&mut self, scene: &mut Scene<'_>, screen: Point) {
		self.cancel_drag(scene.simulation);
		self.pinch = None;
		let at = scene.viewport.transform.screen_to_graph(screen);
		match hit_test(scene.graph, scene.simulation.positions(), at) {
			Some(node) => {
				let pos = scene.simulation.position(node).unwrap_or(at);
				scene.simulation.pin(node, pos);
				self.drag = Some(DragState {
					node,
					press: screen,
					last: screen,
					moved: false,
				});
			}
			None => {
				self.pan = Some(PanState {
					press: screen,
					origin: scene.viewport.transform,
					moved: false,
				});
			}
		}
	}

	pub fn pointer_move(&mut self, scene: &mut Scene<'_>, screen: Point) -> Option<InteractionEvent> {
		if let Some(drag) = self.drag.as_mut() {
			drag.moved |= screen.distance(drag.press) > self.click_threshold;
			drag.last = screen;
			let at = scene.viewport.transform.screen_to_graph(screen);
			scene.simulation.pin(drag.node, at);
			return None;
		}
		if let Some(pan) = self.pan.as_mut() {
			pan.moved |= screen.distance(pan.press) > self.click_threshold;
			let t = &mut scene.viewport.transform;
			t.x = pan.origin.x + (screen.x - pan.press.x);
			t.y = pan.origin.y + (screen.y - pan.press.y);
			return None;
		}
		if self.pinch.is_some() {
			return None;
		}
		let at = scene.viewport.transform.screen_to_graph(screen);
		let hit = hit_test(scene.graph, scene.simulation.positions(), at);
		self.set_hover(scene.graph, hit)
	}

	pub fn pointer_up(&mut self, scene: &mut Scene<'_>) -> Option<InteractionEvent> {
		if let Some(drag) = self.drag.take() {
			scene.simulation.unpin();
			if drag.moved {
				return None;
			}
			self.selected = if self.selected == Some(drag.node) {
				None
			} else {
				Some(drag.node)
			};
			self.refresh_highlight(scene.graph);
			return Some(InteractionEvent::Clicked(drag.node));
		}
		if let Some(pan) = self.pan.take() {
			if !pan.moved && self.selected.take().is_some() {
				self.refresh_highlight(scene.graph);
			}
		}
		None
	}

	/// Pointer left the surface: drop any gesture and the hover.
	pub fn pointer_leave(&mut self, scene: &mut Scene<'_>) -> Option<InteractionEvent> {
		self.cancel_drag(scene.simulation);
		self.pan = None;
		self.pinch = None;
		self.set_hover(scene.graph, None)
	}

	pub fn wheel(&mut self, scene: &mut Scene<'_>, screen: Point, delta_y: f64) {
		if delta_y == 0.0 {
			return;
		}
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		scene
			.viewport
			.transform
			.zoom_at(screen, factor, self.min_zoom, self.max_zoom);
		self.follow_pointer(scene);
	}

	pub fn pinch_start(&mut self, scene: &mut Scene<'_>, a: Point, b: Point) {
		self.cancel_drag(scene.simulation);
		self.pan = None;
		self.pinch = Some(PinchState {
			distance: a.distance(b),
			midpoint: a.midpoint(b),
		});
	}

	/// Zooms by the change in finger spread and pans with the midpoint.
	pub fn pinch_move(&mut self, scene: &mut Scene<'_>, a: Point, b: Point) {
		let Some(pinch) = self.pinch.as_mut() else {
			return;
		};
		let viewport = &mut *scene.viewport;
		let (distance, midpoint) = (a.distance(b), a.midpoint(b));
		viewport.transform.x += midpoint.x - pinch.midpoint.x;
		viewport.transform.y += midpoint.y - pinch.midpoint.y;
		if pinch.distance > 0.0 && distance > 0.0 {
			viewport.transform.zoom_at(
				midpoint,
				distance / pinch.distance,
				self.min_zoom,
				self.max_zoom,
			);
		}
		*pinch = PinchState { distance, midpoint };
		self.follow_pointer(scene);
	}

	pub fn pinch_end(&mut self) {
		self.pinch = None;
	}

	/// Carries hover, selection and an active drag over to a freshly loaded graph.
	/// Reports a cleared hover when the hovered node is gone.
	pub fn remap(
		&mut self,
		old: &NetworkGraph,
		new: &NetworkGraph,
		simulation: &mut Simulation,
	) -> Option<InteractionEvent> {
		let carry = |idx: Option<usize>| {
			idx.and_then(|i| old.node(i))
				.and_then(|n| new.index_of(&n.data.id))
		};
		let was_hovering = self.hovered.is_some();
		self.hovered = carry(self.hovered);
		self.selected = carry(self.selected);
		if let Some(drag) = self.drag {
			self.drag = carry(Some(drag.node)).map(|node| DragState { node, ..drag });
		}
		if let Some(drag) = self.drag {
			if let Some(pos) = simulation.position(drag.node) {
				simulation.pin(drag.node, pos);
			}
		}
		self.refresh_highlight(new);
		(was_hovering && self.hovered.is_none()).then_some(InteractionEvent::Hovered(None))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network::config::ForceParams;
	use crate::components::network::simulation::Carry;
	use crate::components::network::types::{NetworkData, NetworkEdge, NetworkNode, NodeKind};

	struct Fixture {
		graph: NetworkGraph,
		simulation: Simulation,
		viewport: Viewport,
		state: InteractionState,
	}

	impl Fixture {
		/// me(0) at origin, a(1) and b(2) linked to me, loner(3) unlinked.
		fn new() -> Self {
			let graph = NetworkGraph::load(&NetworkData {
				nodes: vec![
					NetworkNode::new("me", NodeKind::Me),
					NetworkNode::new("a", NodeKind::Contact),
					NetworkNode::new("b", NodeKind::Contact),
					NetworkNode::new("loner", NodeKind::Contact),
				],
				edges: vec![NetworkEdge::new("me", "a", 1.0), NetworkEdge::new("b", "me", 2.0)],
			});
			let mut carry = Carry::new();
			for (id, x, y) in [("me", 0.0, 0.0), ("a", 100.0, 0.0), ("b", -100.0, 0.0), ("loner", 0.0, 150.0)] {
				carry.insert(id.into(), (Point::new(x, y), Point::ORIGIN));
			}
			Self {
				simulation: Simulation::with_carry(&graph, ForceParams::default(), &carry),
				graph,
				viewport: Viewport::new(800.0, 600.0),
				state: InteractionState::new(&NetworkConfig::default()),
			}
		}

		fn scene(&mut self) -> (Scene<'_>, &mut InteractionState) {
			(
				Scene {
					graph: &self.graph,
					simulation: &mut self.simulation,
					viewport: &mut self.viewport,
				},
				&mut self.state,
			)
		}

		fn screen_of(&self, idx: usize) -> Point {
			self.viewport
				.transform
				.graph_to_screen(self.simulation.positions()[idx])
		}

		fn down(&mut self, p: Point) {
			let (mut scene, state) = self.scene();
			state.pointer_down(&mut scene, p);
		}

		fn move_to(&mut self, p: Point) -> Option<InteractionEvent> {
			let (mut scene, state) = self.scene();
			state.pointer_move(&mut scene, p)
		}

		fn up(&mut self) -> Option<InteractionEvent> {
			let (mut scene, state) = self.scene();
			state.pointer_up(&mut scene)
		}

		fn click(&mut self, p: Point) -> Option<InteractionEvent> {
			self.down(p);
			self.up()
		}

		fn wheel(&mut self, p: Point, delta_y: f64) {
			let (mut scene, state) = self.scene();
			state.wheel(&mut scene, p, delta_y);
		}
	}

	fn set(ids: &[usize]) -> HashSet<usize> {
		ids.iter().copied().collect()
	}

	#[test]
	fn hover_highlights_node_and_neighbors() {
		let mut f = Fixture::new();
		let me = f.screen_of(0);
		assert_eq!(f.move_to(me), Some(InteractionEvent::Hovered(Some(0))));
		assert_eq!(f.state.highlighted(), &set(&[0, 1, 2]));
		assert_eq!(f.state.phase(), Phase::Hovering);

		let a = f.screen_of(1);
		assert_eq!(f.move_to(a), Some(InteractionEvent::Hovered(Some(1))));
		assert_eq!(f.state.highlighted(), &set(&[1, 0]));
		// staying on the node is not a new hover
		assert_eq!(f.move_to(Point::new(a.x + 1.0, a.y)), None);
	}

	#[test]
	fn hovering_isolated_node_highlights_only_itself() {
		let mut f = Fixture::new();
		let loner = f.screen_of(3);
		f.move_to(loner);
		assert_eq!(f.state.highlighted(), &set(&[3]));
	}

	#[test]
	fn leaving_node_clears_hover() {
		let mut f = Fixture::new();
		let a = f.screen_of(1);
		f.move_to(a);
		assert_eq!(
			f.move_to(Point::new(5.0, 5.0)),
			Some(InteractionEvent::Hovered(None))
		);
		assert!(f.state.highlighted().is_empty());
		assert_eq!(f.state.phase(), Phase::Idle);
	}

	#[test]
	fn drag_follows_pointer_every_tick() {
		let mut f = Fixture::new();
		f.viewport.transform.zoom_at(Point::new(200.0, 100.0), 1.7, 0.1, 4.0);
		let a = f.screen_of(1);
		f.down(a);
		assert_eq!(f.state.phase(), Phase::Dragging);
		assert_eq!(f.simulation.pinned(), Some(1));

		let target = Point::new(650.0, 480.0);
		f.move_to(target);
		let expected = f.viewport.transform.screen_to_graph(target);
		for _ in 0..50 {
			f.simulation.tick();
			assert_eq!(f.simulation.position(1), Some(expected));
		}

		assert_eq!(f.up(), None);
		assert_eq!(f.simulation.pinned(), None);
		assert_eq!(f.state.selected(), None);
	}

	#[test]
	fn hover_is_frozen_while_dragging() {
		let mut f = Fixture::new();
		let (a, b) = (f.screen_of(1), f.screen_of(2));
		f.move_to(a);
		f.down(a);
		assert_eq!(f.move_to(b), None);
		assert_eq!(f.state.hovered(), Some(1));
	}

	#[test]
	fn click_toggles_selection() {
		let mut f = Fixture::new();
		let b = f.screen_of(2);
		assert_eq!(f.click(b), Some(InteractionEvent::Clicked(2)));
		assert_eq!(f.state.selected(), Some(2));
		// selection drives highlight when nothing is hovered
		assert_eq!(f.state.highlighted(), &set(&[2, 0]));

		assert_eq!(f.click(b), Some(InteractionEvent::Clicked(2)));
		assert_eq!(f.state.selected(), None);
		assert!(f.state.highlighted().is_empty());
	}

	#[test]
	fn small_jitter_is_still_a_click() {
		let mut f = Fixture::new();
		let a = f.screen_of(1);
		f.down(a);
		f.move_to(Point::new(a.x + 2.0, a.y - 1.0));
		assert_eq!(f.up(), Some(InteractionEvent::Clicked(1)));
	}

	#[test]
	fn background_click_clears_selection() {
		let mut f = Fixture::new();
		let a = f.screen_of(1);
		f.click(a);
		assert_eq!(f.click(Point::new(10.0, 10.0)), None);
		assert_eq!(f.state.selected(), None);
	}

	#[test]
	fn background_drag_pans_without_moving_nodes() {
		let mut f = Fixture::new();
		let before = f.simulation.positions().to_vec();
		f.click(f.screen_of(1));
		f.down(Point::new(10.0, 10.0));
		assert_eq!(f.state.phase(), Phase::Panning);
		f.move_to(Point::new(60.0, -20.0));
		assert_eq!(f.viewport.transform.x, 400.0 + 50.0);
		assert_eq!(f.viewport.transform.y, 300.0 - 30.0);
		f.up();
		assert_eq!(f.simulation.positions(), before.as_slice());
		// a real pan keeps the selection
		assert_eq!(f.state.selected(), Some(1));
	}

	#[test]
	fn pointer_leave_releases_drag_and_hover() {
		let mut f = Fixture::new();
		let a = f.screen_of(1);
		f.move_to(a);
		f.down(a);
		let (mut scene, state) = f.scene();
		assert_eq!(
			state.pointer_leave(&mut scene),
			Some(InteractionEvent::Hovered(None))
		);
		assert_eq!(f.simulation.pinned(), None);
		assert_eq!(f.state.phase(), Phase::Idle);
	}

	#[test]
	fn wheel_zoom_keeps_point_under_cursor() {
		let mut f = Fixture::new();
		let cursor = Point::new(520.0, 210.0);
		let before = f.viewport.transform.screen_to_graph(cursor);
		f.wheel(cursor, -120.0);
		assert!(f.viewport.transform.k > 1.0);
		let after = f.viewport.transform.screen_to_graph(cursor);
		assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);

		for _ in 0..100 {
			f.wheel(cursor, 120.0);
		}
		assert_eq!(f.viewport.transform.k, 0.1);
	}

	#[test]
	fn dragged_node_stays_under_pointer_through_zoom() {
		let mut f = Fixture::new();
		let a = f.screen_of(1);
		f.down(a);
		let pointer = Point::new(550.0, 300.0);
		f.move_to(pointer);
		f.wheel(Point::new(100.0, 100.0), -120.0);
		assert!(f.viewport.transform.k > 1.0);
		for _ in 0..20 {
			f.simulation.tick();
			assert!(f.screen_of(1).distance(pointer) < 1e-9, "{:?}", f.screen_of(1));
		}
	}

	#[test]
	fn inverted_zoom_bounds_do_not_panic() {
		let config = NetworkConfig {
			min_zoom: 4.0,
			max_zoom: 0.1,
			..NetworkConfig::default()
		};
		let mut f = Fixture::new();
		f.state = InteractionState::new(&config);
		for _ in 0..50 {
			f.wheel(Point::new(400.0, 300.0), -120.0);
		}
		assert_eq!(f.viewport.transform.k, 4.0);
	}

	#[test]
	fn pinch_zooms_around_midpoint() {
		let mut f = Fixture::new();
		let (a, b) = (Point::new(300.0, 300.0), Point::new(500.0, 300.0));
		{
			let (mut scene, state) = f.scene();
			state.pinch_start(&mut scene, a, b);
		}
		assert_eq!(f.state.phase(), Phase::Pinching);
		let mid = a.midpoint(b);
		let before = f.viewport.transform.screen_to_graph(mid);
		{
			let (mut scene, state) = f.scene();
			state.pinch_move(&mut scene, Point::new(200.0, 300.0), Point::new(600.0, 300.0));
		}
		assert!((f.viewport.transform.k - 2.0).abs() < 1e-9);
		let after = f.viewport.transform.screen_to_graph(mid);
		assert!((before.x - after.x).abs() < 1e-9);
		f.state.pinch_end();
		assert_eq!(f.state.phase(), Phase::Idle);
	}

	#[test]
	fn remap_follows_ids() {
		let mut f = Fixture::new();
		f.click(f.screen_of(2));
		let next = NetworkGraph::load(&NetworkData {
			nodes: vec![
				NetworkNode::new("b", NodeKind::Contact),
				NetworkNode::new("me", NodeKind::Me),
			],
			edges: vec![NetworkEdge::new("b", "me", 1.0)],
		});
		let mut sim = Simulation::new(&next, ForceParams::default());
		assert_eq!(f.state.remap(&f.graph, &next, &mut sim), None);
		assert_eq!(f.state.selected(), Some(0));
		assert_eq!(f.state.highlighted(), &set(&[0, 1]));
	}

	#[test]
	fn remap_reports_vanished_hover() {
		let mut f = Fixture::new();
		let a = f.screen_of(1);
		f.move_to(a);
		let next = NetworkGraph::load(&NetworkData {
			nodes: vec![NetworkNode::new("me", NodeKind::Me)],
			edges: vec![],
		});
		let mut sim = Simulation::new(&next, ForceParams::default());
		assert_eq!(
			f.state.remap(&f.graph, &next, &mut sim),
			Some(InteractionEvent::Hovered(None))
		);
		assert_eq!(f.state.hovered(), None);
		assert!(f.state.highlighted().is_empty());
	}
}
