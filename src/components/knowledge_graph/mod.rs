mod color;
mod component;
mod layout;
mod render;
mod select;
mod state;
mod types;

pub use component::KnowledgeGraphCanvas;
pub use types::{GraphData, GraphLink, GraphNode, LinkEnd, LinkKind, NodeKind};
