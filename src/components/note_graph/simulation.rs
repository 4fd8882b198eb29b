//! Iterative force-directed layout over the node arena.
//!
//! Three forces run each tick, in order: pairwise repulsion, spring
//! attraction along edges toward a zoom-scaled rest length, and a
//! centering pull moving the layout centroid toward the viewport center.
//! An `alpha` energy value decays geometrically; once it drops below the
//! floor the simulation is settled and ticks are no-ops until something
//! reheats it (drag, selection, zoom).
//!
//! The engine is the sole writer of node positions and velocities. Pinned
//! nodes (`fx`/`fy` set) snap to their pin and ignore forces while still
//! exerting repulsion and spring pull on everyone else.

use super::types::{GraphData, GraphNode};

/// How long a selection keeps its node pinned at the viewport center,
/// in seconds of simulated time.
pub const CENTER_PIN_SECS: f64 = 1.0;

/// Spring rest length at zoom 1.0; scales linearly with the zoom factor.
pub const BASE_REST_LENGTH: f64 = 100.0;

/// Tuning knobs for the layout.
#[derive(Clone, Copy, Debug)]
pub struct SimulationParams {
	/// Pairwise repulsion strength (applied as charge / distance).
	pub repulsion: f64,
	/// Spring stiffness along edges.
	pub spring: f64,
	/// Pull of the layout centroid toward the viewport center.
	pub centering: f64,
	/// Per-tick velocity damping, in (0, 1).
	pub damping: f64,
	/// Velocity clamp, px per tick.
	pub max_velocity: f64,
	/// Distance floor guarding the force math against coincident nodes.
	pub min_distance: f64,
	/// Geometric alpha decay per tick.
	pub alpha_decay: f64,
	/// Alpha below this counts as settled.
	pub alpha_min: f64,
}

impl Default for SimulationParams {
	fn default() -> Self {
		Self {
			repulsion: 40.0,
			spring: 0.05,
			centering: 0.05,
			damping: 0.85,
			max_velocity: 50.0,
			min_distance: 1.0,
			alpha_decay: 0.02,
			alpha_min: 0.005,
		}
	}
}

// A one-shot pin placed by selection, released when the countdown runs
// out. Owned by the engine so teardown can never leave a stale callback.
#[derive(Clone, Copy, Debug)]
struct CenterPin {
	node: usize,
	remaining: f64,
}

/// One simulation run over a fixed node/edge working set.
pub struct Simulation {
	data: GraphData,
	params: SimulationParams,
	width: f64,
	height: f64,
	alpha: f64,
	rest_length: f64,
	center_pin: Option<CenterPin>,
}

impl Simulation {
	pub fn new(data: GraphData, width: f64, height: f64) -> Self {
		Self::with_params(data, width, height, SimulationParams::default())
	}

	pub fn with_params(
		data: GraphData,
		width: f64,
		height: f64,
		params: SimulationParams,
	) -> Self {
		Self {
			data,
			params,
			width,
			height,
			alpha: 1.0,
			rest_length: BASE_REST_LENGTH,
			center_pin: None,
		}
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.data.nodes
	}

	pub fn edges(&self) -> impl Iterator<Item = (&GraphNode, &GraphNode)> {
		self.data
			.edges
			.iter()
			.map(|e| (&self.data.nodes[e.source], &self.data.nodes[e.target]))
	}

	pub fn find_node(&self, id: &str) -> Option<usize> {
		self.data.nodes.iter().position(|n| n.id == id)
	}

	pub fn is_settled(&self) -> bool {
		self.alpha < self.params.alpha_min
	}

	/// Re-inject energy; never cools a hotter simulation down.
	pub fn reheat(&mut self, alpha: f64) {
		self.alpha = self.alpha.max(alpha.clamp(0.0, 1.0));
	}

	/// Pin a node to a position (drag start) and re-energize.
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.data.nodes.get_mut(idx) {
			node.fx = Some(x);
			node.fy = Some(y);
			node.vx = 0.0;
			node.vy = 0.0;
		}
		// Dragging supersedes a pending selection pin on the same node.
		if self.center_pin.is_some_and(|p| p.node == idx) {
			self.center_pin = None;
		}
		self.reheat(1.0);
	}

	/// Move an existing pin (drag in progress). Every move re-energizes,
	/// so a held node keeps tracking the pointer no matter how long the
	/// drag lasts.
	pub fn move_pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.data.nodes.get_mut(idx) {
			if node.pinned() {
				node.fx = Some(x);
				node.fy = Some(y);
				self.reheat(1.0);
			}
		}
	}

	/// Release a pin (drag end) and re-energize so the freed node settles
	/// under forces rather than staying wherever it was dropped.
	pub fn release(&mut self, idx: usize) {
		if let Some(node) = self.data.nodes.get_mut(idx) {
			if node.pinned() {
				node.fx = None;
				node.fy = None;
				self.reheat(1.0);
			}
		}
		if self.center_pin.is_some_and(|p| p.node == idx) {
			self.center_pin = None;
		}
	}

	/// Pin a node at the viewport center for [`CENTER_PIN_SECS`], then let
	/// go automatically. A new selection supersedes the previous pin.
	pub fn center_on(&mut self, idx: usize) {
		if idx >= self.data.nodes.len() {
			return;
		}
		if let Some(previous) = self.center_pin.take() {
			if previous.node != idx {
				self.release(previous.node);
			}
		}
		self.pin(idx, self.width / 2.0, self.height / 2.0);
		self.center_pin = Some(CenterPin {
			node: idx,
			remaining: CENTER_PIN_SECS,
		});
	}

	/// Rescale the spring rest length (zoom change) with a gentle reheat,
	/// keeping the current layout instead of rebuilding.
	pub fn set_rest_length_scale(&mut self, zoom: f64) {
		self.rest_length = BASE_REST_LENGTH * zoom;
		self.reheat(0.3);
	}

	/// Advance one tick. `dt` is wall-clock seconds since the last tick
	/// and drives the center-pin countdown; force integration is
	/// per-tick. Returns whether any node moved.
	pub fn tick(&mut self, dt: f64) -> bool {
		// The countdown runs even when settled; a selection pin must let
		// go on schedule regardless of layout motion.
		if let Some(pin) = &mut self.center_pin {
			pin.remaining -= dt;
			if pin.remaining <= 0.0 {
				let node = pin.node;
				self.center_pin = None;
				if let Some(n) = self.data.nodes.get_mut(node) {
					n.fx = None;
					n.fy = None;
				}
			}
		}

		if self.is_settled() || self.data.nodes.is_empty() {
			return false;
		}

		let n = self.data.nodes.len();
		let mut forces = vec![(0.0f64, 0.0f64); n];

		// Repulsion between all pairs.
		for i in 0..n {
			for j in (i + 1)..n {
				let dx = self.data.nodes[j].x - self.data.nodes[i].x;
				let dy = self.data.nodes[j].y - self.data.nodes[i].y;
				let dist = (dx * dx + dy * dy).sqrt().max(self.params.min_distance);
				let f = self.params.repulsion / dist;
				let (ux, uy) = (dx / dist, dy / dist);
				forces[i].0 -= ux * f;
				forces[i].1 -= uy * f;
				forces[j].0 += ux * f;
				forces[j].1 += uy * f;
			}
		}

		// Spring attraction along edges toward the rest length.
		for edge in &self.data.edges {
			let (s, t) = (edge.source, edge.target);
			let dx = self.data.nodes[t].x - self.data.nodes[s].x;
			let dy = self.data.nodes[t].y - self.data.nodes[s].y;
			let dist = (dx * dx + dy * dy).sqrt().max(self.params.min_distance);
			let displacement = dist - self.rest_length;
			let f = self.params.spring * displacement;
			let (ux, uy) = (dx / dist, dy / dist);
			forces[s].0 += ux * f;
			forces[s].1 += uy * f;
			forces[t].0 -= ux * f;
			forces[t].1 -= uy * f;
		}

		// Centering: pull the centroid toward the viewport center.
		let (cx, cy) = self.centroid();
		let pull_x = (self.width / 2.0 - cx) * self.params.centering;
		let pull_y = (self.height / 2.0 - cy) * self.params.centering;
		for force in &mut forces {
			force.0 += pull_x;
			force.1 += pull_y;
		}

		// Integrate. Pinned nodes snap to their pin and hold still.
		let mut moved = false;
		for (node, force) in self.data.nodes.iter_mut().zip(&forces) {
			if let (Some(fx), Some(fy)) = (node.fx, node.fy) {
				moved |= node.x != fx || node.y != fy;
				node.x = fx;
				node.y = fy;
				node.vx = 0.0;
				node.vy = 0.0;
				continue;
			}
			node.vx = (node.vx + force.0 * self.alpha) * self.params.damping;
			node.vy = (node.vy + force.1 * self.alpha) * self.params.damping;
			let speed = (node.vx * node.vx + node.vy * node.vy).sqrt();
			if speed > self.params.max_velocity {
				let scale = self.params.max_velocity / speed;
				node.vx *= scale;
				node.vy *= scale;
			}
			node.x += node.vx;
			node.y += node.vy;
			moved |= node.vx != 0.0 || node.vy != 0.0;
		}

		self.alpha *= 1.0 - self.params.alpha_decay;
		moved
	}

	fn centroid(&self) -> (f64, f64) {
		let n = self.data.nodes.len().max(1) as f64;
		let (sx, sy) = self
			.data
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		(sx / n, sy / n)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::note_graph::types::{GraphEdge, GraphNode};

	fn node(id: &str, x: f64, y: f64) -> GraphNode {
		GraphNode {
			id: id.into(),
			title: id.into(),
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
			link_count: 0,
		}
	}

	fn pair() -> GraphData {
		GraphData {
			nodes: vec![node("1", 300.0, 300.0), node("2", 500.0, 300.0)],
			edges: vec![GraphEdge { source: 0, target: 1 }],
		}
	}

	#[test]
	fn fresh_simulation_is_running_and_moves_nodes() {
		let mut sim = Simulation::new(pair(), 800.0, 600.0);
		assert!(!sim.is_settled());
		assert!(sim.tick(0.016));
	}

	#[test]
	fn alpha_decay_reaches_settled_and_ticks_become_noops() {
		let mut sim = Simulation::new(pair(), 800.0, 600.0);
		for _ in 0..600 {
			sim.tick(0.016);
		}
		assert!(sim.is_settled());
		let before: Vec<(f64, f64)> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();
		assert!(!sim.tick(0.016));
		let after: Vec<(f64, f64)> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn reheat_restarts_a_settled_simulation() {
		let mut sim = Simulation::new(pair(), 800.0, 600.0);
		for _ in 0..600 {
			sim.tick(0.016);
		}
		assert!(sim.is_settled());
		sim.reheat(1.0);
		assert!(!sim.is_settled());
		assert!(sim.tick(0.016));
	}

	#[test]
	fn pinned_node_holds_position_while_others_move() {
		let mut sim = Simulation::new(pair(), 800.0, 600.0);
		sim.pin(0, 100.0, 100.0);
		sim.tick(0.016);
		let pinned = &sim.nodes()[0];
		assert_eq!((pinned.x, pinned.y), (100.0, 100.0));
		assert!(pinned.pinned());
	}

	#[test]
	fn drag_release_unpins_and_forces_resume() {
		let mut sim = Simulation::new(pair(), 800.0, 600.0);
		sim.pin(0, 100.0, 100.0);
		sim.move_pin(0, 100.0, 100.0);
		sim.tick(0.016);
		sim.release(0);
		assert!(!sim.nodes()[0].pinned());
		sim.tick(0.016);
		let n0 = &sim.nodes()[0];
		assert!((n0.x, n0.y) != (100.0, 100.0), "node should move after release");
	}

	#[test]
	fn long_drag_keeps_tracking_the_pointer_after_settling() {
		let mut sim = Simulation::new(pair(), 800.0, 600.0);
		sim.pin(0, 100.0, 100.0);
		// Hold still long enough for alpha to decay all the way down.
		for _ in 0..600 {
			sim.tick(0.016);
		}
		assert!(sim.is_settled());
		sim.move_pin(0, 300.0, 300.0);
		sim.tick(0.016);
		let n0 = &sim.nodes()[0];
		assert_eq!((n0.x, n0.y), (300.0, 300.0));
	}

	#[test]
	fn release_after_a_long_drag_lets_forces_resume() {
		let mut sim = Simulation::new(pair(), 800.0, 600.0);
		sim.pin(0, 100.0, 100.0);
		for _ in 0..600 {
			sim.tick(0.016);
		}
		assert!(sim.is_settled());
		sim.release(0);
		assert!(!sim.nodes()[0].pinned());
		let before: Vec<(f64, f64)> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();
		for _ in 0..10 {
			sim.tick(0.016);
		}
		let after: Vec<(f64, f64)> = sim.nodes().iter().map(|n| (n.x, n.y)).collect();
		assert_ne!(before, after, "graph should keep settling after release");
	}

	#[test]
	fn move_pin_without_pin_is_a_noop() {
		let mut sim = Simulation::new(pair(), 800.0, 600.0);
		sim.move_pin(0, 50.0, 50.0);
		assert!(!sim.nodes()[0].pinned());
	}

	#[test]
	fn center_pin_expires_after_the_delay_without_interaction() {
		let mut sim = Simulation::new(pair(), 800.0, 600.0);
		sim.center_on(1);
		let n1 = &sim.nodes()[1];
		assert_eq!((n1.fx, n1.fy), (Some(400.0), Some(300.0)));

		// 0.9 s of ticks: still pinned.
		for _ in 0..9 {
			sim.tick(0.1);
		}
		assert!(sim.nodes()[1].pinned());

		// Past the 1 s mark: released automatically.
		sim.tick(0.2);
		assert!(!sim.nodes()[1].pinned());
	}

	#[test]
	fn center_pin_expires_even_when_settled() {
		let mut sim = Simulation::new(pair(), 800.0, 600.0);
		for _ in 0..600 {
			sim.tick(0.016);
		}
		assert!(sim.is_settled());
		sim.center_on(0);
		// center_on reheats; burn the energy back down, then let the
		// countdown finish while checking the pin outlives settling.
		for _ in 0..5 {
			sim.tick(0.1);
		}
		assert!(sim.nodes()[0].pinned());
		for _ in 0..6 {
			sim.tick(0.1);
		}
		assert!(!sim.nodes()[0].pinned());
	}

	#[test]
	fn new_selection_supersedes_previous_center_pin() {
		let mut sim = Simulation::new(pair(), 800.0, 600.0);
		sim.center_on(0);
		sim.center_on(1);
		assert!(!sim.nodes()[0].pinned());
		assert!(sim.nodes()[1].pinned());
	}

	#[test]
	fn rest_length_rescale_reheats_gently() {
		let mut sim = Simulation::new(pair(), 800.0, 600.0);
		for _ in 0..600 {
			sim.tick(0.016);
		}
		assert!(sim.is_settled());
		sim.set_rest_length_scale(2.0);
		assert!(!sim.is_settled());
	}

	#[test]
	fn empty_graph_never_moves() {
		let mut sim = Simulation::new(GraphData::default(), 800.0, 600.0);
		assert!(!sim.tick(0.016));
	}
}
