use std::sync::Arc;

use log::debug;

use super::color;
use super::layout::{LayoutMemo, PlacedNode};
use super::select;
use super::types::{GraphData, LinkKind, node_index, resolve_link};

pub const NODE_RADIUS: f64 = 5.0;
/// Nodes bigger than this keep their label visible without hover.
pub const ALWAYS_LABEL_SIZE: f64 = 9.0;
const HIT_SLOP: f64 = 6.0;

pub const MIN_ZOOM: f64 = 150.0;
pub const MAX_ZOOM: f64 = 1200.0;
const START_ZOOM: f64 = 520.0;
const FOCAL_LENGTH: f64 = 600.0;
const NEAR_PLANE: f64 = 12.0;
const ORBIT_SPEED: f64 = 0.006;
const ORBIT_DAMPING: f64 = 0.9;
const MAX_PITCH: f64 = 1.45;
const HIGHLIGHT_EASE: f64 = 8.0;

/// Free-orbit camera around the origin with damped follow-through.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
	pub yaw: f64,
	pub pitch: f64,
	pub distance: f64,
	yaw_velocity: f64,
	pitch_velocity: f64,
}

impl Default for OrbitCamera {
	fn default() -> Self {
		Self {
			yaw: 0.0,
			pitch: 0.35,
			distance: START_ZOOM,
			yaw_velocity: 0.0,
			pitch_velocity: 0.0,
		}
	}
}

/// A world point mapped to the canvas, with its distance from the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	pub x: f64,
	pub y: f64,
	pub depth: f64,
	pub scale: f64,
}

impl OrbitCamera {
	/// Applies a drag delta: orbits immediately and leaves residual
	/// velocity for the damped follow-through.
	pub fn orbit_by(&mut self, dx: f64, dy: f64) {
		self.yaw += dx * ORBIT_SPEED;
		self.pitch = (self.pitch + dy * ORBIT_SPEED).clamp(-MAX_PITCH, MAX_PITCH);
		self.yaw_velocity = dx * ORBIT_SPEED;
		self.pitch_velocity = dy * ORBIT_SPEED;
	}

	/// Wheel zoom, clamped to the scene's distance limits.
	pub fn zoom_by(&mut self, factor: f64) {
		self.distance = (self.distance * factor).clamp(MIN_ZOOM, MAX_ZOOM);
	}

	/// Per-frame damping once the pointer has let go.
	pub fn tick(&mut self) {
		self.yaw += self.yaw_velocity;
		self.pitch = (self.pitch + self.pitch_velocity).clamp(-MAX_PITCH, MAX_PITCH);
		self.yaw_velocity *= ORBIT_DAMPING;
		self.pitch_velocity *= ORBIT_DAMPING;
		if self.yaw_velocity.abs() < 1e-5 {
			self.yaw_velocity = 0.0;
		}
		if self.pitch_velocity.abs() < 1e-5 {
			self.pitch_velocity = 0.0;
		}
	}

	/// Perspective projection onto a canvas of the given dimensions.
	/// `None` means the point sits behind the near plane.
	pub fn project(&self, x: f64, y: f64, z: f64, width: f64, height: f64) -> Option<Projected> {
		let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
		let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
		let rx = x * cos_yaw + z * sin_yaw;
		let rz = z * cos_yaw - x * sin_yaw;
		let ry = y * cos_pitch - rz * sin_pitch;
		let rz = y * sin_pitch + rz * cos_pitch;
		let depth = self.distance - rz;
		if depth <= NEAR_PLANE {
			return None;
		}
		let scale = FOCAL_LENGTH / depth;
		Some(Projected {
			x: width / 2.0 + rx * scale,
			y: height / 2.0 - ry * scale,
			depth,
			scale,
		})
	}
}

/// Pointer-drag bookkeeping for the orbit gesture and click detection.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub last_x: f64,
	pub last_y: f64,
	pub travel: f64,
	pub pressed_node: Option<usize>,
}

/// A link that survived selection and endpoint resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderLink {
	pub source: usize,
	pub target: usize,
	pub color: &'static str,
	pub dashed: bool,
}

pub struct SceneState {
	pub nodes: Arc<[PlacedNode]>,
	pub links: Vec<RenderLink>,
	pub camera: OrbitCamera,
	pub drag: DragState,
	pub hover: Option<usize>,
	pub highlight_t: f64,
	pub width: f64,
	pub height: f64,
}

impl SceneState {
	/// Builds the scene for one snapshot. Layout goes through `memo`, so a
	/// snapshot whose collections are unchanged reuses its positions.
	pub fn new(data: &GraphData, memo: &mut LayoutMemo, width: f64, height: f64) -> Self {
		let nodes = memo.layout(data);
		let index = node_index(&data.nodes);
		let mut links = Vec::new();
		let mut dropped = 0usize;
		for i in select::rendered_links(&data.links) {
			let link = &data.links[i];
			let Some((source, target)) = resolve_link(&index, link) else {
				dropped += 1;
				continue;
			};
			links.push(RenderLink {
				source,
				target,
				color: color::link_color(link),
				dashed: link.kind == Some(LinkKind::Disagrees),
			});
		}
		if dropped > 0 {
			debug!("scene: skipped {dropped} dangling links");
		}
		Self {
			nodes,
			links,
			camera: OrbitCamera::default(),
			drag: DragState::default(),
			hover: None,
			highlight_t: 0.0,
			width,
			height,
		}
	}

	/// Swaps in a new snapshot while keeping the camera where the user
	/// left it.
	pub fn replace_data(&mut self, data: &GraphData, memo: &mut LayoutMemo) {
		let camera = self.camera.clone();
		*self = Self::new(data, memo, self.width, self.height);
		self.camera = camera;
	}

	/// World-space radius of a node before projection.
	pub fn node_radius(placed: &PlacedNode) -> f64 {
		placed.node.size.unwrap_or(NODE_RADIUS)
	}

	/// Front-most node under the pointer, if any.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let mut best: Option<(usize, f64)> = None;
		for (i, placed) in self.nodes.iter().enumerate() {
			let Some(p) = self
				.camera
				.project(placed.x, placed.y, placed.z, self.width, self.height)
			else {
				continue;
			};
			let radius = Self::node_radius(placed) * p.scale + HIT_SLOP;
			let (dx, dy) = (p.x - sx, p.y - sy);
			if (dx * dx + dy * dy).sqrt() > radius {
				continue;
			}
			if best.is_none_or(|(_, depth)| p.depth < depth) {
				best = Some((i, p.depth));
			}
		}
		best.map(|(i, _)| i)
	}

	/// Whether a node's label should be drawn: hovered, or big enough to
	/// stay labelled permanently.
	pub fn label_visible(&self, idx: usize) -> bool {
		self.hover == Some(idx)
			|| self.nodes[idx]
				.node
				.size
				.is_some_and(|s| s > ALWAYS_LABEL_SIZE)
	}

	/// Per-frame camera damping and hover-highlight easing.
	pub fn tick(&mut self, dt: f64) {
		self.camera.tick();
		let target = if self.hover.is_some() { 1.0 } else { 0.0 };
		self.highlight_t += (target - self.highlight_t) * (HIGHLIGHT_EASE * dt).min(1.0);
		if self.highlight_t < 0.005 {
			self.highlight_t = 0.0;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::knowledge_graph::select::MAX_RENDERED_LINKS;
	use crate::components::knowledge_graph::types::{GraphLink, GraphNode, NodeKind};

	fn scene(data: &GraphData) -> SceneState {
		SceneState::new(data, &mut LayoutMemo::default(), 800.0, 600.0)
	}

	#[test]
	fn dangling_links_are_excluded_from_the_scene() {
		let data = GraphData::new(
			vec![
				GraphNode::new("a", NodeKind::Persona),
				GraphNode::new("b", NodeKind::Concept),
			],
			vec![GraphLink::new("a", "b"), GraphLink::new("a", "ghost")],
		);
		let scene = scene(&data);
		assert_eq!(scene.links.len(), 1);
		assert_eq!((scene.links[0].source, scene.links[0].target), (0, 1));
	}

	#[test]
	fn rendered_links_never_exceed_the_cap() {
		let links: Vec<GraphLink> = (0..150)
			.map(|i| GraphLink::new("a", "b").with_strength(i as f64))
			.collect();
		let data = GraphData::new(
			vec![
				GraphNode::new("a", NodeKind::Persona),
				GraphNode::new("b", NodeKind::Concept),
			],
			links,
		);
		assert_eq!(scene(&data).links.len(), MAX_RENDERED_LINKS);
	}

	#[test]
	fn disagreement_links_render_dashed() {
		let data = GraphData::new(
			vec![
				GraphNode::new("a", NodeKind::Persona),
				GraphNode::new("b", NodeKind::Persona),
			],
			vec![GraphLink::new("a", "b").with_kind(LinkKind::Disagrees)],
		);
		let scene = scene(&data);
		assert!(scene.links[0].dashed);
		assert_eq!(scene.links[0].color, color::NEGATIVE);
	}

	#[test]
	fn zoom_is_clamped_to_the_distance_limits() {
		let mut camera = OrbitCamera::default();
		for _ in 0..50 {
			camera.zoom_by(1.1);
		}
		assert_eq!(camera.distance, MAX_ZOOM);
		for _ in 0..100 {
			camera.zoom_by(0.9);
		}
		assert_eq!(camera.distance, MIN_ZOOM);
	}

	#[test]
	fn origin_projects_to_the_canvas_center() {
		let camera = OrbitCamera::default();
		let p = camera.project(0.0, 0.0, 0.0, 800.0, 600.0).unwrap();
		assert_eq!((p.x, p.y), (400.0, 300.0));
		assert_eq!(p.depth, camera.distance);
	}

	#[test]
	fn picking_finds_the_node_under_the_pointer() {
		let data = GraphData::new(vec![GraphNode::new("a", NodeKind::Persona)], vec![]);
		let scene = scene(&data);
		// A single node ends up at the origin after recentering.
		assert_eq!(scene.node_at_position(400.0, 300.0), Some(0));
		assert_eq!(scene.node_at_position(0.0, 0.0), None);
	}

	#[test]
	fn labels_show_on_hover_or_for_large_nodes() {
		let data = GraphData::new(
			vec![
				GraphNode::new("a", NodeKind::Persona),
				GraphNode::new("b", NodeKind::Concept).with_size(12.0),
			],
			vec![],
		);
		let mut scene = scene(&data);
		assert!(!scene.label_visible(0));
		assert!(scene.label_visible(1));
		scene.hover = Some(0);
		assert!(scene.label_visible(0));
	}

	#[test]
	fn highlight_eases_toward_hover_state() {
		let data = GraphData::new(vec![GraphNode::new("a", NodeKind::Persona)], vec![]);
		let mut scene = scene(&data);
		scene.hover = Some(0);
		for _ in 0..60 {
			scene.tick(0.016);
		}
		assert!(scene.highlight_t > 0.9);
		scene.hover = None;
		for _ in 0..120 {
			scene.tick(0.016);
		}
		assert_eq!(scene.highlight_t, 0.0);
	}

	#[test]
	fn replace_data_keeps_the_camera() {
		let data = GraphData::new(vec![GraphNode::new("a", NodeKind::Persona)], vec![]);
		let mut memo = LayoutMemo::default();
		let mut scene = SceneState::new(&data, &mut memo, 800.0, 600.0);
		scene.camera.zoom_by(0.9);
		let zoomed = scene.camera.distance;

		let next = GraphData::new(vec![GraphNode::new("b", NodeKind::Concept)], vec![]);
		scene.replace_data(&next, &mut memo);
		assert_eq!(scene.camera.distance, zoomed);
		assert_eq!(scene.nodes[0].node.id, "b");
	}
}
