//! Builds the per-frame list of screen-space drawing primitives.
//!
//! Nothing here touches the DOM; [`super::canvas`] paints the result.

use std::collections::HashSet;

use super::config::NetworkConfig;
use super::interaction::InteractionState;
use super::model::NetworkGraph;
use super::types::{NodeKind, Point};
use super::viewport::Viewport;

pub const BACKGROUND: &str = "#1a1a2e";
pub const EDGE_COLOR: &str = "rgb(100, 180, 255)";
pub const TEXT_COLOR: &str = "white";
pub const EMPTY_MESSAGE: &str = "No network data";
pub const LABEL_FONT_PX: f64 = 11.0;

const ELLIPSIS: char = '…';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
	Left,
	Center,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
	Clear {
		width: f64,
		height: f64,
		color: &'static str,
	},
	Edge {
		from: Point,
		to: Point,
		width: f64,
		alpha: f64,
		dashed: bool,
	},
	Glow {
		center: Point,
		inner: f64,
		outer: f64,
		alpha: f64,
	},
	Node {
		id: String,
		center: Point,
		radius: f64,
		fill: String,
		alpha: f64,
		/// Outline width in pixels, if any.
		ring: Option<f64>,
	},
	Text {
		text: String,
		at: Point,
		size: f64,
		alpha: f64,
		align: TextAlign,
	},
	Swatch {
		center: Point,
		radius: f64,
		fill: String,
	},
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
	pub primitives: Vec<Primitive>,
	/// True when the graph had no nodes and only the empty state was drawn.
	pub empty: bool,
}

impl Frame {
	pub fn nodes(&self) -> impl Iterator<Item = (&str, f64, f64)> {
		self.primitives.iter().filter_map(|p| match p {
			Primitive::Node {
				id, radius, alpha, ..
			} => Some((id.as_str(), *radius, *alpha)),
			_ => None,
		})
	}

	pub fn edge_count(&self) -> usize {
		self.primitives
			.iter()
			.filter(|p| matches!(p, Primitive::Edge { .. }))
			.count()
	}

	pub fn texts(&self) -> impl Iterator<Item = &str> {
		self.primitives.iter().filter_map(|p| match p {
			Primitive::Text { text, .. } => Some(text.as_str()),
			_ => None,
		})
	}
}

/// Cuts labels longer than `max` characters to `max` characters ending in an ellipsis.
pub fn truncate_label(label: &str, max: usize) -> String {
	let max = max.max(1);
	if label.chars().count() <= max {
		return label.to_string();
	}
	let mut out: String = label.chars().take(max - 1).collect();
	out.truncate(out.trim_end().len());
	out.push(ELLIPSIS);
	out
}

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Eased dimming of everything outside the highlight, with a short linger after it clears.
#[derive(Clone, Debug, Default)]
pub struct HighlightFade {
	t: f64,
	delay_t: f64,
	active: bool,
	ids: HashSet<usize>,
}

impl HighlightFade {
	const DELAY: f64 = 0.08;
	const SPEED_IN: f64 = 1.8;
	const SPEED_OUT: f64 = 1.26;

	/// Fully faded in (or out) to the current highlight, skipping the animation.
	pub fn settled(interaction: &InteractionState) -> Self {
		let ids = interaction.highlighted().clone();
		let active = !ids.is_empty();
		Self {
			t: if active { 1.0 } else { 0.0 },
			delay_t: Self::DELAY,
			active,
			ids,
		}
	}

	pub fn update(&mut self, interaction: &InteractionState, dt: f64) {
		let highlighted = interaction.highlighted();
		if !highlighted.is_empty() {
			if !self.active {
				self.delay_t = 0.0;
			}
			self.active = true;
			if &self.ids != highlighted {
				self.ids = highlighted.clone();
			}
			self.delay_t = (self.delay_t + dt).min(Self::DELAY);
			if self.delay_t >= Self::DELAY {
				self.t += (1.0 - self.t) * (Self::SPEED_IN * dt).min(1.0);
				if self.t > 0.995 {
					self.t = 1.0;
				}
			}
		} else {
			self.active = false;
			self.t -= self.t * (Self::SPEED_OUT * dt).min(1.0);
			if self.t < 0.01 {
				self.t = 0.0;
				self.ids.clear();
			}
		}
	}

	/// Whether the fade still has to move towards the interaction's current highlight.
	pub fn is_animating(&self, interaction: &InteractionState) -> bool {
		let highlighted = interaction.highlighted();
		if highlighted.is_empty() {
			self.t > 0.0
		} else {
			self.t < 1.0 || &self.ids != highlighted
		}
	}

	pub fn intensity(&self) -> f64 {
		ease_out_cubic(self.t)
	}

	fn contains(&self, idx: usize) -> bool {
		self.ids.contains(&idx)
	}

	fn any(&self) -> bool {
		!self.ids.is_empty() && self.t > 0.0
	}
}

pub struct RenderInput<'a> {
	pub graph: &'a NetworkGraph,
	pub positions: &'a [Point],
	pub interaction: &'a InteractionState,
	pub fade: &'a HighlightFade,
	pub viewport: &'a Viewport,
	pub config: &'a NetworkConfig,
}

pub fn build_frame(input: &RenderInput<'_>) -> Frame {
	let viewport = input.viewport;
	let mut frame = Frame {
		primitives: vec![Primitive::Clear {
			width: viewport.width,
			height: viewport.height,
			color: BACKGROUND,
		}],
		empty: input.graph.is_empty(),
	};

	if frame.empty {
		frame.primitives.push(Primitive::Text {
			text: EMPTY_MESSAGE.to_string(),
			at: viewport.center(),
			size: 14.0,
			alpha: 0.6,
			align: TextAlign::Center,
		});
		return frame;
	}

	draw_edges(input, &mut frame.primitives);
	draw_nodes(input, &mut frame.primitives);
	draw_overlays(input, &mut frame.primitives);
	frame
}

fn draw_edges(input: &RenderInput<'_>, out: &mut Vec<Primitive>) {
	let t = input.fade.intensity();
	let dim = input.fade.any();
	let transform = input.viewport.transform;

	for edge in input.graph.edges() {
		let (Some(&ps), Some(&pt)) = (
			input.positions.get(edge.source),
			input.positions.get(edge.target),
		) else {
			continue;
		};
		let (a, b) = (transform.graph_to_screen(ps), transform.graph_to_screen(pt));
		let dist = a.distance(b);
		let nodes = input.graph.nodes();
		let (ra, rb) = (
			nodes[edge.source].radius * transform.k,
			nodes[edge.target].radius * transform.k,
		);
		if dist < 0.001 || dist <= ra + rb {
			continue;
		}

		let base = 0.75 + 0.75 * edge.strength.clamp(0.5, 4.0);
		let lit = input.fade.contains(edge.source) && input.fade.contains(edge.target);
		let (alpha, width) = match (dim, lit) {
			(false, _) => (0.6, base),
			(true, true) => (0.6 + 0.3 * t, base * (1.0 + 0.3 * t)),
			(true, false) => (0.6 - 0.45 * t, base * (1.0 - 0.3 * t)),
		};

		let (ux, uy) = ((b.x - a.x) / dist, (b.y - a.y) / dist);
		out.push(Primitive::Edge {
			from: Point::new(a.x + ux * ra, a.y + uy * ra),
			to: Point::new(b.x - ux * rb, b.y - uy * rb),
			width,
			alpha,
			dashed: nodes[edge.source].data.kind == NodeKind::Goal
				|| nodes[edge.target].data.kind == NodeKind::Goal,
		});
	}
}

fn draw_nodes(input: &RenderInput<'_>, out: &mut Vec<Primitive>) {
	let t = input.fade.intensity();
	let dim = input.fade.any();
	let transform = input.viewport.transform;
	let focus = input
		.interaction
		.hovered()
		.or(input.interaction.selected());

	let node_indices = 0..input.graph.len().min(input.positions.len());
	// dimmed nodes first so highlighted ones land on top
	let (lit, rest): (Vec<usize>, Vec<usize>) =
		node_indices.partition(|&i| dim && input.fade.contains(i));

	for idx in rest.into_iter().chain(lit) {
		let node = &input.graph.nodes()[idx];
		let center = transform.graph_to_screen(input.positions[idx]);
		let base = node.radius * transform.k;
		let highlighted = dim && input.fade.contains(idx);

		let (alpha, radius, glow) = if !dim {
			(1.0, base, None)
		} else if !highlighted {
			(1.0 - 0.7 * t, base * (1.0 - 0.15 * t), None)
		} else if focus == Some(idx) {
			(1.0, base * (1.0 + 0.35 * t), Some((base * (1.8 + 1.2 * t), 0.35 * t)))
		} else {
			(1.0, base * (1.0 + 0.2 * t), Some((base * (1.4 + 0.6 * t), 0.2 * t)))
		};

		if let Some((outer, glow_alpha)) = glow.filter(|_| t > 0.01) {
			out.push(Primitive::Glow {
				center,
				inner: radius * 0.3,
				outer,
				alpha: glow_alpha,
			});
		}

		let ring = if input.interaction.selected() == Some(idx) {
			Some(2.5)
		} else if highlighted && focus == Some(idx) && t > 0.01 {
			Some(1.5)
		} else {
			None
		};
		out.push(Primitive::Node {
			id: node.data.id.clone(),
			center,
			radius,
			fill: input
				.config
				.palette
				.color_for(node.data.kind, node.tier)
				.to_string(),
			alpha,
			ring,
		});

		if input.config.show_trust_badge {
			if let Some(score) = node.trust_score {
				out.push(Primitive::Text {
					text: format!("{score:.0}%"),
					at: Point::new(center.x, center.y + radius * 0.3),
					size: (radius * 0.8).clamp(7.0, 12.0),
					alpha,
					align: TextAlign::Center,
				});
			}
		}

		let text = truncate_label(&node.label, input.config.label_max_length);
		let (at, align) = match node.data.kind {
			NodeKind::Contact => (Point::new(center.x + radius + 4.0, center.y + 4.0), TextAlign::Left),
			NodeKind::Me | NodeKind::Goal => (
				Point::new(center.x, center.y + radius + LABEL_FONT_PX + 3.0),
				TextAlign::Center,
			),
		};
		out.push(Primitive::Text {
			text,
			at,
			size: LABEL_FONT_PX,
			alpha: if highlighted { 1.0 } else { alpha * 0.85 },
			align,
		});
	}
}

fn draw_overlays(input: &RenderInput<'_>, out: &mut Vec<Primitive>) {
	let graph = input.graph;
	out.push(Primitive::Text {
		text: format!(
			"{} people · {} goals · {} links",
			graph.count_kind(NodeKind::Contact),
			graph.count_kind(NodeKind::Goal),
			graph.edges().len()
		),
		at: input.viewport.stats_anchor(),
		size: 12.0,
		alpha: 0.7,
		align: TextAlign::Left,
	});

	if !input.config.show_legend {
		return;
	}
	let entries = input.config.palette.legend();
	for ((label, color), row) in entries.iter().zip(input.viewport.legend_rows(entries.len())) {
		out.push(Primitive::Swatch {
			center: Point::new(row.x + 5.0, row.y - 4.0),
			radius: 5.0,
			fill: color.to_string(),
		});
		out.push(Primitive::Text {
			text: label.to_string(),
			at: Point::new(row.x + 16.0, row.y),
			size: 11.0,
			alpha: 0.8,
			align: TextAlign::Left,
		});
	}
}
