//! Building the positioned node/edge working set for one simulation run.

use std::collections::HashMap;

use super::types::{Connection, GraphData, GraphEdge, GraphNode, Note};

/// Smallest viewport the layout will accept; anything narrower is clamped
/// so positions never degenerate to NaN or a zero-area scatter.
pub const MIN_WIDTH: f64 = 400.0;
pub const MIN_HEIGHT: f64 = 300.0;

// Keeps initial positions away from the viewport edges.
const POSITION_MARGIN: f64 = 100.0;

/// Clamp viewport dimensions to the supported minimum.
pub fn clamp_dimensions(width: f64, height: f64) -> (f64, f64) {
	(width.max(MIN_WIDTH), height.max(MIN_HEIGHT))
}

/// Convert notes and resolved connections into a fresh [`GraphData`].
///
/// Nodes start at uniformly random margin-inset positions, unpinned and at
/// rest. Connection endpoints are resolved from string ids to arena
/// indices once, here; connections naming a missing note are dropped.
/// `link_count` is recomputed from zero on every build.
pub fn build_graph(
	notes: &[Note],
	connections: &[Connection],
	width: f64,
	height: f64,
	rng: &mut dyn FnMut() -> f64,
) -> GraphData {
	let (width, height) = clamp_dimensions(width, height);
	let margin_x = POSITION_MARGIN.min(width / 4.0);
	let margin_y = POSITION_MARGIN.min(height / 4.0);

	let mut nodes: Vec<GraphNode> = Vec::with_capacity(notes.len());
	let mut index: HashMap<&str, usize> = HashMap::new();

	for note in notes {
		// First occurrence wins for a duplicated id.
		if index.contains_key(note.id.as_str()) {
			continue;
		}
		index.insert(note.id.as_str(), nodes.len());
		nodes.push(GraphNode {
			id: note.id.clone(),
			title: note.title.clone(),
			x: margin_x + rng() * (width - 2.0 * margin_x),
			y: margin_y + rng() * (height - 2.0 * margin_y),
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
			link_count: 0,
		});
	}

	let mut edges = Vec::with_capacity(connections.len());
	for connection in connections {
		let (Some(&source), Some(&target)) = (
			index.get(connection.source_id.as_str()),
			index.get(connection.target_id.as_str()),
		) else {
			continue;
		};
		if source == target {
			continue;
		}
		nodes[source].link_count += 1;
		nodes[target].link_count += 1;
		edges.push(GraphEdge { source, target });
	}

	GraphData { nodes, edges }
}
