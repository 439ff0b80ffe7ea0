use log::debug;

use super::config::NetworkConfig;
use super::interaction::{InteractionEvent, InteractionState, Scene};
use super::model::NetworkGraph;
use super::render::{self, Frame, HighlightFade, RenderInput};
use super::simulation::Simulation;
use super::types::{NetworkData, NetworkNode, Point};
use super::viewport::Viewport;

/// Callback payloads, carrying the host's own node records.
#[derive(Clone, Debug, PartialEq)]
pub enum NetworkEvent {
	NodeClicked(NetworkNode),
	NodeHovered(Option<NetworkNode>),
}

/// Everything one canvas needs between frames.
pub struct NetworkState {
	graph: NetworkGraph,
	simulation: Simulation,
	interaction: InteractionState,
	fade: HighlightFade,
	viewport: Viewport,
	config: NetworkConfig,
}

impl NetworkState {
	pub fn new(data: &NetworkData, config: NetworkConfig, width: f64, height: f64) -> Self {
		let graph = NetworkGraph::load(data);
		Self {
			simulation: Simulation::new(&graph, config.physics.clone()),
			interaction: InteractionState::new(&config),
			fade: HighlightFade::default(),
			viewport: Viewport::new(width, height),
			graph,
			config,
		}
	}

	/// Swaps in a new snapshot, keeping positions, hover and selection of surviving ids.
	/// Returns a cleared hover when the hovered node did not survive.
	pub fn replace_data(&mut self, data: &NetworkData) -> Option<NetworkEvent> {
		let graph = NetworkGraph::load(data);
		let carry = self.simulation.carry(&self.graph);
		let mut simulation = Simulation::with_carry(&graph, self.config.physics.clone(), &carry);
		let event = self.interaction.remap(&self.graph, &graph, &mut simulation);
		debug!(
			"Replaced network data: {} -> {} nodes",
			self.graph.len(),
			graph.len()
		);
		self.graph = graph;
		self.simulation = simulation;
		self.resolve(event)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport.resize(width, height);
	}

	pub fn graph(&self) -> &NetworkGraph {
		&self.graph
	}

	pub fn simulation(&self) -> &Simulation {
		&self.simulation
	}

	pub fn interaction(&self) -> &InteractionState {
		&self.interaction
	}

	pub fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	/// Screen coordinates of a node by id.
	pub fn screen_position(&self, id: &str) -> Option<Point> {
		let idx = self.graph.index_of(id)?;
		let pos = self.simulation.position(idx)?;
		Some(self.viewport.transform.graph_to_screen(pos))
	}

	/// Whether another animation frame is worth scheduling.
	pub fn needs_frame(&self) -> bool {
		self.simulation.is_active() || self.fade.is_animating(&self.interaction)
	}

	pub fn tick(&mut self, dt: f64) {
		self.simulation.tick();
		self.fade.update(&self.interaction, dt);
	}

	pub fn frame(&self) -> Frame {
		render::build_frame(&RenderInput {
			graph: &self.graph,
			positions: self.simulation.positions(),
			interaction: &self.interaction,
			fade: &self.fade,
			viewport: &self.viewport,
			config: &self.config,
		})
	}

	fn split(&mut self) -> (Scene<'_>, &mut InteractionState) {
		(
			Scene {
				graph: &self.graph,
				simulation: &mut self.simulation,
				viewport: &mut self.viewport,
			},
			&mut self.interaction,
		)
	}

	fn resolve(&self, event: Option<InteractionEvent>) -> Option<NetworkEvent> {
		let node = |idx: usize| self.graph.node(idx).map(|n| n.data.clone());
		match event? {
			InteractionEvent::Clicked(idx) => node(idx).map(NetworkEvent::NodeClicked),
			InteractionEvent::Hovered(idx) => Some(NetworkEvent::NodeHovered(idx.and_then(node))),
		}
	}

	pub fn pointer_down(&mut self, screen: Point) {
		let (mut scene, interaction) = self.split();
		interaction.pointer_down(&mut scene, screen);
	}

	pub fn pointer_move(&mut self, screen: Point) -> Option<NetworkEvent> {
		let (mut scene, interaction) = self.split();
		let event = interaction.pointer_move(&mut scene, screen);
		self.resolve(event)
	}

	pub fn pointer_up(&mut self) -> Option<NetworkEvent> {
		let (mut scene, interaction) = self.split();
		let event = interaction.pointer_up(&mut scene);
		self.resolve(event)
	}

	pub fn pointer_leave(&mut self) -> Option<NetworkEvent> {
		let (mut scene, interaction) = self.split();
		let event = interaction.pointer_leave(&mut scene);
		self.resolve(event)
	}

	pub fn wheel(&mut self, screen: Point, delta_y: f64) {
		let (mut scene, interaction) = self.split();
		interaction.wheel(&mut scene, screen, delta_y);
	}

	pub fn pinch_start(&mut self, a: Point, b: Point) {
		let (mut scene, interaction) = self.split();
		interaction.pinch_start(&mut scene, a, b);
	}

	pub fn pinch_move(&mut self, a: Point, b: Point) {
		let (mut scene, interaction) = self.split();
		interaction.pinch_move(&mut scene, a, b);
	}

	pub fn pinch_end(&mut self) {
		self.interaction.pinch_end();
	}
}
