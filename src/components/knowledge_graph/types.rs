use std::collections::HashMap;
use std::sync::Arc;

/// Kind of entity extracted from a focus-group discussion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
	Persona,
	Concept,
	Emotion,
}

impl NodeKind {
	pub fn label(self) -> &'static str {
		match self {
			NodeKind::Persona => "persona",
			NodeKind::Concept => "concept",
			NodeKind::Emotion => "emotion",
		}
	}
}

/// A graph vertex as delivered by the analytics service.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub kind: NodeKind,
	pub name: Option<String>,
	/// Sentiment score in [-1, 1]; only personas carry one today.
	pub sentiment: Option<f64>,
	/// Rendered radius override; also gates the always-visible label.
	pub size: Option<f64>,
}

const LABEL_ID_CHARS: usize = 8;

impl GraphNode {
	pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
		Self {
			id: id.into(),
			kind,
			name: None,
			sentiment: None,
			size: None,
		}
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn with_sentiment(mut self, sentiment: f64) -> Self {
		self.sentiment = Some(sentiment);
		self
	}

	pub fn with_size(mut self, size: f64) -> Self {
		self.size = Some(size);
		self
	}

	/// Display text, falling back to a truncated id when no name is set.
	pub fn display_label(&self) -> String {
		if let Some(name) = &self.name {
			if !name.is_empty() {
				return name.clone();
			}
		}
		let mut label: String = self.id.chars().take(LABEL_ID_CHARS).collect();
		if self.id.chars().count() > LABEL_ID_CHARS {
			label.push('…');
		}
		label
	}
}

/// Link endpoint: the service sends either a bare id or an embedded node.
#[derive(Clone, Debug, PartialEq)]
pub enum LinkEnd {
	Id(String),
	Node(Box<GraphNode>),
}

impl LinkEnd {
	pub fn id(&self) -> &str {
		match self {
			LinkEnd::Id(id) => id,
			LinkEnd::Node(node) => &node.id,
		}
	}
}

/// Qualitative relation between two nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
	Agrees,
	Disagrees,
}

/// A weighted, optionally typed and sentiment-scored relationship.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub source: LinkEnd,
	pub target: LinkEnd,
	pub kind: Option<LinkKind>,
	pub sentiment: Option<f64>,
	pub strength: Option<f64>,
	pub value: Option<f64>,
}

impl GraphLink {
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: LinkEnd::Id(source.into()),
			target: LinkEnd::Id(target.into()),
			kind: None,
			sentiment: None,
			strength: None,
			value: None,
		}
	}

	pub fn with_kind(mut self, kind: LinkKind) -> Self {
		self.kind = Some(kind);
		self
	}

	pub fn with_sentiment(mut self, sentiment: f64) -> Self {
		self.sentiment = Some(sentiment);
		self
	}

	pub fn with_strength(mut self, strength: f64) -> Self {
		self.strength = Some(strength);
		self
	}

	pub fn with_value(mut self, value: f64) -> Self {
		self.value = Some(value);
		self
	}

	/// Ranking weight for link pruning: `strength`, then `value`, then zero.
	/// Selection only; never fed into the physics.
	pub fn weight(&self) -> f64 {
		self.strength.or(self.value).unwrap_or(0.0)
	}
}

/// One immutable graph snapshot. The collections are shared slices so that
/// cloning a snapshot preserves their identity; swapping either collection
/// out is what triggers a full relayout.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Arc<[GraphNode]>,
	pub links: Arc<[GraphLink]>,
}

impl GraphData {
	pub fn new(nodes: Vec<GraphNode>, links: Vec<GraphLink>) -> Self {
		Self {
			nodes: nodes.into(),
			links: links.into(),
		}
	}
}

/// Maps node ids to their position in the snapshot's node slice.
pub fn node_index(nodes: &[GraphNode]) -> HashMap<&str, usize> {
	nodes
		.iter()
		.enumerate()
		.map(|(i, node)| (node.id.as_str(), i))
		.collect()
}

/// Resolves a link's endpoints against the snapshot. `None` means the link
/// dangles and should be skipped.
pub fn resolve_link(index: &HashMap<&str, usize>, link: &GraphLink) -> Option<(usize, usize)> {
	let source = *index.get(link.source.id())?;
	let target = *index.get(link.target.id())?;
	Some((source, target))
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn display_label_prefers_name() {
		let node = GraphNode::new("p-1", NodeKind::Persona).with_name("Maria");
		assert_eq!(node.display_label(), "Maria");
	}

	#[test]
	fn display_label_truncates_long_ids() {
		let node = GraphNode::new("persona-0042-focus-group-7", NodeKind::Persona);
		assert_eq!(node.display_label(), "persona-…");
		let short = GraphNode::new("p-1", NodeKind::Concept);
		assert_eq!(short.display_label(), "p-1");
	}

	#[test]
	fn weight_falls_back_from_strength_to_value_to_zero() {
		let both = GraphLink::new("a", "b").with_strength(2.0).with_value(9.0);
		assert_eq!(both.weight(), 2.0);
		let value_only = GraphLink::new("a", "b").with_value(3.5);
		assert_eq!(value_only.weight(), 3.5);
		assert_eq!(GraphLink::new("a", "b").weight(), 0.0);
	}

	#[test]
	fn link_end_id_handles_embedded_nodes() {
		let embedded = LinkEnd::Node(Box::new(GraphNode::new("c-9", NodeKind::Concept)));
		assert_eq!(embedded.id(), "c-9");
		assert_eq!(LinkEnd::Id("c-9".into()).id(), "c-9");
	}

	#[test]
	fn resolve_link_drops_dangling_endpoints() {
		let nodes = vec![
			GraphNode::new("a", NodeKind::Persona),
			GraphNode::new("b", NodeKind::Concept),
		];
		let index = node_index(&nodes);
		assert_eq!(resolve_link(&index, &GraphLink::new("a", "b")), Some((0, 1)));
		assert_eq!(resolve_link(&index, &GraphLink::new("a", "ghost")), None);
		assert_eq!(resolve_link(&index, &GraphLink::new("ghost", "b")), None);
	}

	#[test]
	fn resolve_link_accepts_embedded_endpoints() {
		let nodes = vec![GraphNode::new("a", NodeKind::Persona)];
		let index = node_index(&nodes);
		let link = GraphLink {
			source: LinkEnd::Node(Box::new(GraphNode::new("a", NodeKind::Persona))),
			target: LinkEnd::Id("a".into()),
			kind: None,
			sentiment: None,
			strength: None,
			value: None,
		};
		assert_eq!(resolve_link(&index, &link), Some((0, 0)));
	}
}
