use leptos::prelude::*;
use log::info;

use crate::components::network::{
	NetworkData, NetworkEdge, NetworkNode, NodeKind, RelationshipNetwork, TrustTier,
};

const NAMES: &[&str] = &[
	"Ana", "Bruno", "Chen", "Dana", "Eli", "Farah", "Goran", "Hana", "Ivo", "Jun", "Kemi",
	"Lars", "Mira", "Nils", "Oona", "Priya", "Quinn", "Rosa",
];

const GOALS: &[&str] = &["Raise seed round", "Hire a designer", "Move to Lisbon"];

/// Sample network: the user in the middle, contacts across every tier and a few goals.
fn generate_sample_data() -> NetworkData {
	let mut nodes = vec![NetworkNode::new("me", NodeKind::Me).with_name("You")];
	let mut edges = Vec::new();

	for (i, name) in NAMES.iter().enumerate() {
		let id = format!("contact-{i}");
		let score = (rand_simple(i) * 100.0).round();
		let tier = match score as u32 {
			75.. => TrustTier::Rooted,
			50..=74 => TrustTier::Growing,
			25..=49 => TrustTier::Dormant,
			_ => TrustTier::Frayed,
		};
		nodes.push(
			NetworkNode::new(&id, NodeKind::Contact)
				.with_name(*name)
				.with_trust(score, tier),
		);
		edges.push(NetworkEdge::new("me", &id, 0.5 + score / 50.0));
		if i > 2 && i % 3 == 0 {
			let other = (rand_simple(i + 100) * i as f64) as usize;
			edges.push(NetworkEdge::new(&id, format!("contact-{other}"), 1.0));
		}
	}

	for (i, title) in GOALS.iter().enumerate() {
		let id = format!("goal-{i}");
		nodes.push(NetworkNode::new(&id, NodeKind::Goal).with_title(*title));
		edges.push(NetworkEdge::new("me", &id, 1.0));
		edges.push(NetworkEdge::new(&id, format!("contact-{}", i * 5), 0.5));
	}

	NetworkData { nodes, edges }
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let network = Signal::derive(generate_sample_data);
	let hovered = RwSignal::new(None::<NetworkNode>);
	let selected = RwSignal::new(None::<NetworkNode>);

	let on_node_click = Callback::new(move |node: NetworkNode| {
		info!("Clicked {}", node.id);
		selected.update(|current| {
			*current = match current.take() {
				Some(prev) if prev.id == node.id => None,
				_ => Some(node),
			}
		});
	});
	let on_node_hover = Callback::new(move |node: Option<NetworkNode>| hovered.set(node));

	let caption = move || {
		hovered
			.get()
			.or_else(|| selected.get())
			.map(|node| {
				let name = node
					.name
					.or(node.title)
					.unwrap_or_else(|| node.id.clone());
				match node.trust_tier {
					Some(tier) => format!("{name} ({})", tier.label()),
					None => name,
				}
			})
			.unwrap_or_else(|| "Hover or click a person".to_string())
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<RelationshipNetwork
					data=network
					on_node_click=on_node_click
					on_node_hover=on_node_hover
					fullscreen=true
				/>
				<div class="graph-overlay">
					<h1>"Relationship Network"</h1>
					<p class="subtitle">{caption}</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
