use leptos::prelude::*;

use crate::components::knowledge_graph::{
	GraphData, GraphLink, GraphNode, KnowledgeGraphCanvas, LinkKind, NodeKind,
};

/// Sample snapshot in the shape the analytics service produces, standing in
/// for the analysis panel's fetch.
fn sample_graph() -> GraphData {
	let nodes = vec![
		GraphNode::new("p-maria", NodeKind::Persona)
			.with_name("Maria")
			.with_sentiment(0.8),
		GraphNode::new("p-devon", NodeKind::Persona)
			.with_name("Devon")
			.with_sentiment(-0.5),
		GraphNode::new("p-sam", NodeKind::Persona)
			.with_name("Sam")
			.with_sentiment(0.1),
		GraphNode::new("p-lee", NodeKind::Persona).with_name("Lee"),
		GraphNode::new("c-pricing", NodeKind::Concept)
			.with_name("Pricing")
			.with_size(11.0),
		GraphNode::new("c-onboarding", NodeKind::Concept)
			.with_name("Onboarding")
			.with_size(9.5),
		GraphNode::new("c-support", NodeKind::Concept).with_name("Support"),
		GraphNode::new("e-trust", NodeKind::Emotion).with_name("Trust"),
		GraphNode::new("e-frustration", NodeKind::Emotion).with_name("Frustration"),
	];
	let links = vec![
		GraphLink::new("p-maria", "c-pricing")
			.with_kind(LinkKind::Agrees)
			.with_strength(2.5),
		GraphLink::new("p-devon", "c-pricing")
			.with_kind(LinkKind::Disagrees)
			.with_strength(2.0),
		GraphLink::new("p-sam", "c-onboarding").with_strength(1.5),
		GraphLink::new("p-lee", "c-onboarding")
			.with_kind(LinkKind::Agrees)
			.with_value(1.0),
		GraphLink::new("p-maria", "e-trust").with_sentiment(0.9),
		GraphLink::new("p-devon", "e-frustration").with_sentiment(-0.7),
		GraphLink::new("c-support", "e-frustration").with_sentiment(-0.4),
		GraphLink::new("p-sam", "c-support").with_strength(0.8),
		GraphLink::new("c-pricing", "e-trust").with_value(0.5),
	];
	GraphData::new(nodes, links)
}

/// Analysis view: the knowledge graph with a detail sidebar for whichever
/// node was clicked last.
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = RwSignal::new(sample_graph());
	let selected = RwSignal::new(None::<GraphNode>);

	view! {
		<div class="fullscreen-graph">
			<KnowledgeGraphCanvas
				data=graph_data
				fullscreen=true
				on_node_click=Callback::new(move |node: GraphNode| selected.set(Some(node)))
			/>
			<div class="graph-overlay">
				<h1>"Focus Group Knowledge Graph"</h1>
				<p class="subtitle">"Drag to orbit. Scroll to zoom. Click a node for details."</p>
			</div>
			{move || {
				selected
					.get()
					.map(|node| {
						view! {
							<div class="detail-sidebar">
								<h2>{node.display_label()}</h2>
								<p class="node-kind">{node.kind.label()}</p>
								<p class="node-sentiment">
									{node
										.sentiment
										.map(|s| format!("Sentiment {s:+.2}"))
										.unwrap_or_else(|| "No sentiment score".into())}
								</p>
							</div>
						}
					})
			}}
		</div>
	}
}
