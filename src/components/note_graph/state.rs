//! Per-run interactive state: one simulation plus the zoom, drag,
//! selection and gesture bookkeeping layered on top of it.
//!
//! The hosting component feeds pointer and wheel events in (with
//! timestamps, so the logic stays host-testable) and reads positions back
//! out each tick through the renderer.

use log::info;

use super::render::node_radius;
use super::simulation::Simulation;
use super::theme::Theme;
use super::types::GraphData;

pub const ZOOM_MIN: f64 = 0.3;
pub const ZOOM_MAX: f64 = 3.0;
const ZOOM_STEP_IN: f64 = 1.1;
const ZOOM_STEP_OUT: f64 = 0.9;

// Wheel events are applied at most once per frame (~60/s).
const WHEEL_THROTTLE_MS: f64 = 16.0;

// A down/up pair is a click only when it is both quick and still.
const CLICK_MAX_MS: f64 = 200.0;
const CLICK_MAX_DIST: f64 = 5.0;

// Small nodes stay clickable at low zoom.
const MIN_HIT_RADIUS: f64 = 6.0;

#[derive(Clone, Copy, Debug, Default)]
struct DragState {
	node: Option<usize>,
	started_ms: f64,
	start_x: f64,
	start_y: f64,
}

/// Everything owned for the lifetime of one graph run.
pub struct NoteGraphState {
	pub sim: Simulation,
	pub width: f64,
	pub height: f64,
	pub zoom: f64,
	pub theme: Theme,
	pub selected_id: Option<String>,
	drag: DragState,
	last_wheel_ms: f64,
}

impl NoteGraphState {
	pub fn new(data: GraphData, width: f64, height: f64, theme: Theme, zoom: f64) -> Self {
		info!(
			"graph run initialized: {} nodes, {} edges, {}x{}",
			data.nodes.len(),
			data.edges.len(),
			width,
			height
		);
		let zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
		let mut sim = Simulation::new(data, width, height);
		sim.set_rest_length_scale(zoom);
		Self {
			sim,
			width,
			height,
			zoom,
			theme,
			selected_id: None,
			drag: DragState::default(),
			last_wheel_ms: f64::MIN,
		}
	}

	/// Advance the simulation by one frame.
	pub fn tick(&mut self, dt: f64) {
		self.sim.tick(dt);
	}

	/// Topmost node under a surface-space point, if any.
	pub fn node_at(&self, x: f64, y: f64) -> Option<usize> {
		let mut hit = None;
		for (idx, node) in self.sim.nodes().iter().enumerate() {
			let radius = node_radius(node.link_count, self.zoom).max(MIN_HIT_RADIUS);
			let (dx, dy) = (node.x - x, node.y - y);
			if dx * dx + dy * dy <= radius * radius {
				// Later nodes draw on top, so the last hit wins.
				hit = Some(idx);
			}
		}
		hit
	}

	/// Pointer down: grab and pin the node under the pointer, remember
	/// the gesture for click/drag disambiguation.
	pub fn pointer_down(&mut self, x: f64, y: f64, now_ms: f64) -> bool {
		let Some(idx) = self.node_at(x, y) else {
			return false;
		};
		self.drag = DragState {
			node: Some(idx),
			started_ms: now_ms,
			start_x: x,
			start_y: y,
		};
		self.sim.pin(idx, x, y);
		true
	}

	/// Pointer move: drag the pinned node along.
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if let Some(idx) = self.drag.node {
			self.sim.move_pin(idx, x, y);
		}
	}

	/// Pointer up: release the pin. Returns the node id when the gesture
	/// classifies as a click (quick and nearly motionless); a completed
	/// drag returns `None` and has no selection side effect.
	pub fn pointer_up(&mut self, x: f64, y: f64, now_ms: f64) -> Option<String> {
		let idx = self.drag.node.take()?;
		self.sim.release(idx);

		let elapsed = now_ms - self.drag.started_ms;
		let (dx, dy) = (x - self.drag.start_x, y - self.drag.start_y);
		let distance = (dx * dx + dy * dy).sqrt();
		if elapsed < CLICK_MAX_MS && distance < CLICK_MAX_DIST {
			self.sim.nodes().get(idx).map(|n| n.id.clone())
		} else {
			None
		}
	}

	/// Abandon an in-flight drag (pointer left the surface).
	pub fn pointer_cancel(&mut self) {
		if let Some(idx) = self.drag.node.take() {
			self.sim.release(idx);
		}
	}

	/// Host-driven selection: mark the node and center-pin it for the
	/// one-shot delay.
	pub fn select(&mut self, id: Option<String>) {
		if let Some(id) = &id {
			if let Some(idx) = self.sim.find_node(id) {
				self.sim.center_on(idx);
			}
		}
		self.selected_id = id;
	}

	/// Apply a wheel tick. Throttled to one application per
	/// [`WHEEL_THROTTLE_MS`]; returns the new zoom when it changed.
	pub fn apply_wheel(&mut self, delta_y: f64, now_ms: f64) -> Option<f64> {
		if now_ms - self.last_wheel_ms < WHEEL_THROTTLE_MS {
			return None;
		}
		self.last_wheel_ms = now_ms;

		let factor = if delta_y > 0.0 { ZOOM_STEP_OUT } else { ZOOM_STEP_IN };
		let new_zoom = (self.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
		if new_zoom == self.zoom {
			return None;
		}
		self.set_zoom(new_zoom);
		Some(new_zoom)
	}

	/// Set the zoom factor directly, rescaling spring rest lengths
	/// without tearing the run down.
	pub fn set_zoom(&mut self, zoom: f64) {
		self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
		self.sim.set_rest_length_scale(self.zoom);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::note_graph::builder::build_graph;
	use crate::components::note_graph::types::{Connection, Note};

	fn two_note_state() -> NoteGraphState {
		let notes = vec![Note::new("1", "Alpha", ""), Note::new("2", "Beta", "")];
		let connections = vec![Connection::new("1", "2")];
		// Distinct positions: node 0 at (220, 180), node 1 at (580, 420).
		let seq = [0.2, 0.2, 0.8, 0.8];
		let mut i = 0;
		let mut rng = move || {
			let v = seq[i % seq.len()];
			i += 1;
			v
		};
		let data = build_graph(&notes, &connections, 800.0, 600.0, &mut rng);
		NoteGraphState::new(data, 800.0, 600.0, Theme::Dark, 1.0)
	}

	#[test]
	fn wheel_zoom_scales_and_clamps() {
		let mut state = two_note_state();
		let mut now = 0.0;
		// Zoom out to the floor.
		for _ in 0..30 {
			now += 20.0;
			state.apply_wheel(1.0, now);
		}
		assert_eq!(state.zoom, ZOOM_MIN);
		// One tick back in.
		now += 20.0;
		let z = state.apply_wheel(-1.0, now);
		assert_eq!(z, Some(ZOOM_MIN * 1.1));
	}

	#[test]
	fn wheel_events_are_throttled() {
		let mut state = two_note_state();
		assert!(state.apply_wheel(-1.0, 1000.0).is_some());
		// 10 ms later: swallowed.
		assert!(state.apply_wheel(-1.0, 1010.0).is_none());
		// 20 ms later: applied.
		assert!(state.apply_wheel(-1.0, 1020.0).is_some());
	}

	#[test]
	fn wheel_at_the_clamp_reports_no_change() {
		let mut state = two_note_state();
		state.set_zoom(ZOOM_MAX);
		assert!(state.apply_wheel(-1.0, 1000.0).is_none());
	}

	#[test]
	fn quick_still_gesture_is_a_click() {
		let mut state = two_note_state();
		let (x, y) = {
			let n = &state.sim.nodes()[0];
			(n.x, n.y)
		};
		assert!(state.pointer_down(x, y, 1000.0));
		let clicked = state.pointer_up(x + 1.0, y + 1.0, 1100.0);
		assert_eq!(clicked.as_deref(), Some("1"));
		assert!(!state.sim.nodes()[0].pinned());
	}

	#[test]
	fn slow_or_travelled_gesture_is_a_drag_not_a_click() {
		let mut state = two_note_state();
		let (x, y) = {
			let n = &state.sim.nodes()[0];
			(n.x, n.y)
		};

		// Too slow.
		state.pointer_down(x, y, 1000.0);
		assert_eq!(state.pointer_up(x, y, 1300.0), None);

		// Too far.
		let (x, y) = {
			let n = &state.sim.nodes()[0];
			(n.x, n.y)
		};
		state.pointer_down(x, y, 2000.0);
		state.pointer_move(x + 40.0, y);
		assert_eq!(state.pointer_up(x + 40.0, y, 2050.0), None);
		assert!(!state.sim.nodes()[0].pinned());
	}

	#[test]
	fn dragging_pins_to_the_pointer() {
		let mut state = two_note_state();
		let (x, y) = {
			let n = &state.sim.nodes()[0];
			(n.x, n.y)
		};
		state.pointer_down(x, y, 0.0);
		state.pointer_move(100.0, 100.0);
		state.tick(0.016);
		let n = &state.sim.nodes()[0];
		assert_eq!((n.x, n.y), (100.0, 100.0));
	}

	#[test]
	fn drag_release_lets_forces_move_the_node_again() {
		let mut state = two_note_state();
		let (x, y) = {
			let n = &state.sim.nodes()[0];
			(n.x, n.y)
		};
		state.pointer_down(x, y, 0.0);
		state.pointer_move(100.0, 100.0);
		state.tick(0.016);
		state.pointer_up(100.0, 100.0, 500.0);

		let n = &state.sim.nodes()[0];
		assert!(!n.pinned());
		state.tick(0.016);
		let n = &state.sim.nodes()[0];
		assert!((n.x, n.y) != (100.0, 100.0));
	}

	#[test]
	fn empty_space_pointer_down_grabs_nothing() {
		let mut state = two_note_state();
		assert!(!state.pointer_down(-50.0, -50.0, 0.0));
		assert_eq!(state.pointer_up(-50.0, -50.0, 10.0), None);
	}

	#[test]
	fn selection_centers_and_releases_after_the_delay() {
		let mut state = two_note_state();
		state.select(Some("2".into()));
		assert_eq!(state.selected_id.as_deref(), Some("2"));
		let n = &state.sim.nodes()[1];
		assert_eq!((n.fx, n.fy), (Some(400.0), Some(300.0)));

		for _ in 0..11 {
			state.tick(0.1);
		}
		assert!(!state.sim.nodes()[1].pinned());
		// Selection marker outlives the pin.
		assert_eq!(state.selected_id.as_deref(), Some("2"));
	}

	#[test]
	fn selecting_an_unknown_id_only_updates_the_marker() {
		let mut state = two_note_state();
		state.select(Some("missing".into()));
		assert_eq!(state.selected_id.as_deref(), Some("missing"));
		assert!(state.sim.nodes().iter().all(|n| !n.pinned()));
	}

	#[test]
	fn hit_testing_respects_zoom_scaled_radius() {
		let mut state = two_note_state();
		let (x, y) = {
			let n = &state.sim.nodes()[0];
			(n.x, n.y)
		};
		// Degree 1 at zoom 1.0 -> radius 6.
		assert!(state.node_at(x + 5.0, y).is_some());
		assert!(state.node_at(x + 30.0, y + 30.0).is_none());

		state.set_zoom(3.0);
		assert!(state.node_at(x + 15.0, y).is_some());
	}
}
