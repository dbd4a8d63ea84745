//! Force-directed layout. Spring and charge forces come from the
//! `force_graph` solver; a centering pass and a collision pass run after
//! every step. The simulation runs a fixed number of steps and the result
//! is a static layout, re-used until the input snapshot changes.

use std::f64::consts::PI;
use std::sync::Arc;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::types::{GraphData, GraphLink, GraphNode, node_index, resolve_link};

/// A node with its simulation-assigned position. The layout is planar:
/// `z` stays zero and exists for the 3D scene's benefit.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedNode {
	pub node: GraphNode,
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

const SIMULATION_STEPS: usize = 300;
const STEP_DT: f32 = 0.016;
const SEED_RADIUS: f64 = 100.0;
/// Minimum center-to-center separation enforced by the collision pass.
pub const COLLISION_RADIUS: f32 = 14.0;

fn simulation_parameters() -> SimulationParameters {
	SimulationParameters {
		force_charge: 90.0,
		force_spring: 0.02,
		force_max: 100.0,
		node_speed: 2000.0,
		damping_factor: 0.9,
	}
}

/// Runs the simulation to a stable layout.
///
/// Pure with respect to its input: the caller's snapshot is never touched,
/// and positions are seeded deterministically on a circle around the
/// origin, so the same snapshot always produces the same layout. Links
/// with unresolvable endpoints contribute no spring and are skipped.
pub fn run_layout(data: &GraphData) -> Vec<PlacedNode> {
	if data.nodes.is_empty() {
		return Vec::new();
	}
	let n = data.nodes.len();
	let mut graph: ForceGraph<usize, ()> = ForceGraph::new(simulation_parameters());
	let mut handles = Vec::with_capacity(n);
	for i in 0..n {
		let angle = (i as f64) * 2.0 * PI / n as f64;
		handles.push(graph.add_node(NodeData {
			x: (SEED_RADIUS * angle.cos()) as f32,
			y: (SEED_RADIUS * angle.sin()) as f32,
			mass: 10.0,
			is_anchor: false,
			user_data: i,
		}));
	}

	let index = node_index(&data.nodes);
	let mut dropped = 0usize;
	for link in data.links.iter() {
		match resolve_link(&index, link) {
			Some((source, target)) if source != target => {
				graph.add_edge(handles[source], handles[target], EdgeData::default());
			}
			Some(_) => {}
			None => dropped += 1,
		}
	}
	if dropped > 0 {
		debug!("layout: skipped {dropped} dangling links");
	}

	let mut positions = vec![(0.0f32, 0.0f32); n];
	for _ in 0..SIMULATION_STEPS {
		graph.update(STEP_DT);
		graph.visit_nodes(|node| positions[node.data.user_data] = (node.x(), node.y()));
		separate(&mut positions);
		recenter(&mut positions);
		graph.visit_nodes_mut(|node| {
			let (x, y) = positions[node.data.user_data];
			node.data.x = x;
			node.data.y = y;
		});
	}

	data.nodes
		.iter()
		.zip(&positions)
		.map(|(node, &(x, y))| PlacedNode {
			node: node.clone(),
			x: x as f64,
			y: y as f64,
			z: 0.0,
		})
		.collect()
}

/// Pushes overlapping pairs apart until they sit at least
/// [`COLLISION_RADIUS`] from each other, independent of link topology.
fn separate(positions: &mut [(f32, f32)]) {
	let n = positions.len();
	for i in 0..n {
		for j in (i + 1)..n {
			let (xi, yi) = positions[i];
			let (xj, yj) = positions[j];
			let (dx, dy) = (xj - xi, yj - yi);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist >= COLLISION_RADIUS {
				continue;
			}
			// Coincident points get a deterministic push direction.
			let (ux, uy) = if dist > f32::EPSILON {
				(dx / dist, dy / dist)
			} else {
				let angle = (i * n + j) as f32;
				(angle.cos(), angle.sin())
			};
			let shift = (COLLISION_RADIUS - dist) / 2.0;
			positions[i].0 -= ux * shift;
			positions[i].1 -= uy * shift;
			positions[j].0 += ux * shift;
			positions[j].1 += uy * shift;
		}
	}
}

/// Translates the whole layout so its centroid sits at the origin.
fn recenter(positions: &mut [(f32, f32)]) {
	let n = positions.len() as f32;
	let (sx, sy) = positions
		.iter()
		.fold((0.0f32, 0.0f32), |(ax, ay), &(x, y)| (ax + x, ay + y));
	let (cx, cy) = (sx / n, sy / n);
	for p in positions.iter_mut() {
		p.0 -= cx;
		p.1 -= cy;
	}
}

/// Memoizes the most recent layout, keyed on the identity of the input
/// collections. Layout dominates the cost of a graph change, so it reruns
/// only when the node or link slice is actually replaced.
#[derive(Default)]
pub struct LayoutMemo {
	cached: Option<Cached>,
}

struct Cached {
	nodes: Arc<[GraphNode]>,
	links: Arc<[GraphLink]>,
	placed: Arc<[PlacedNode]>,
}

impl LayoutMemo {
	/// Positions for the snapshot, recomputed only when either collection
	/// has been swapped out since the last call.
	pub fn layout(&mut self, data: &GraphData) -> Arc<[PlacedNode]> {
		if let Some(cached) = &self.cached {
			if Arc::ptr_eq(&cached.nodes, &data.nodes) && Arc::ptr_eq(&cached.links, &data.links)
			{
				return Arc::clone(&cached.placed);
			}
		}
		debug!(
			"layout: simulating {} nodes / {} links",
			data.nodes.len(),
			data.links.len()
		);
		let placed: Arc<[PlacedNode]> = run_layout(data).into();
		self.cached = Some(Cached {
			nodes: Arc::clone(&data.nodes),
			links: Arc::clone(&data.links),
			placed: Arc::clone(&placed),
		});
		placed
	}
}
