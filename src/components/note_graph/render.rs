//! Canvas drawing for the note graph.
//!
//! Edges are painted before nodes within a tick so node bodies occlude
//! the segment endpoints. Everything size-related scales with the zoom
//! factor; labels appear only past the zoom threshold.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::NoteGraphState;
use super::types::GraphNode;

/// Zoom factor above which node labels are drawn at all.
pub const LABEL_ZOOM_THRESHOLD: f64 = 1.5;

// Title truncation: anything longer than MAX chars shows the first KEEP
// chars plus an ellipsis.
const LABEL_MAX_CHARS: usize = 15;
const LABEL_KEEP_CHARS: usize = 12;

/// Node radius from degree and zoom.
pub fn node_radius(link_count: u32, zoom: f64) -> f64 {
	(4.0 + 2.0 * link_count as f64) * zoom
}

/// Whether labels are visible at this zoom. Below the threshold they are
/// hidden entirely, not faded.
pub fn labels_visible(zoom: f64) -> bool {
	zoom > LABEL_ZOOM_THRESHOLD
}

/// Label font size in px, capped so deep zoom stays readable.
pub fn label_font_size(zoom: f64) -> f64 {
	(12.0 * zoom).min(24.0)
}

/// Edge stroke width for this zoom.
pub fn edge_stroke_width(zoom: f64) -> f64 {
	(2.0 * zoom).max(1.0)
}

/// Truncate long titles for label display.
pub fn truncate_title(title: &str) -> String {
	if title.chars().count() > LABEL_MAX_CHARS {
		let kept: String = title.chars().take(LABEL_KEEP_CHARS).collect();
		format!("{kept}...")
	} else {
		title.to_string()
	}
}

/// Paint one frame from the current simulation snapshot.
pub fn render(state: &NoteGraphState, ctx: &CanvasRenderingContext2d) {
	let colors = state.theme.colors();
	ctx.set_fill_style_str(colors.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	draw_edges(state, ctx);
	draw_nodes(state, ctx);
}

fn draw_edges(state: &NoteGraphState, ctx: &CanvasRenderingContext2d) {
	let colors = state.theme.colors();
	ctx.set_stroke_style_str(colors.link);
	ctx.set_line_width(edge_stroke_width(state.zoom));
	ctx.set_global_alpha(0.6);

	for (source, target) in state.sim.edges() {
		// Endpoints still at the origin have not been positioned yet.
		if (source.x == 0.0 && source.y == 0.0) || (target.x == 0.0 && target.y == 0.0) {
			continue;
		}
		ctx.begin_path();
		ctx.move_to(source.x, source.y);
		ctx.line_to(target.x, target.y);
		ctx.stroke();
	}

	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &NoteGraphState, ctx: &CanvasRenderingContext2d) {
	let colors = state.theme.colors();
	let zoom = state.zoom;
	let show_labels = labels_visible(zoom);

	for node in state.sim.nodes() {
		let radius = node_radius(node.link_count, zoom);
		let selected = state.selected_id.as_deref() == Some(node.id.as_str());

		if selected {
			// Outer glow, body, inner highlight.
			ctx.set_global_alpha(0.3);
			ctx.set_fill_style_str(colors.node_selected_glow);
			fill_circle(ctx, node.x, node.y, radius + 4.0 * zoom);

			ctx.set_global_alpha(1.0);
			ctx.set_fill_style_str(colors.node_selected);
			fill_circle(ctx, node.x, node.y, radius);

			ctx.set_global_alpha(0.6);
			ctx.set_fill_style_str(colors.node_highlight);
			fill_circle(ctx, node.x, node.y, (radius - 2.0).max(1.0));
			ctx.set_global_alpha(1.0);
		} else {
			ctx.set_fill_style_str(colors.node_default);
			fill_circle(ctx, node.x, node.y, radius);
		}

		if show_labels && !node.title.is_empty() {
			draw_label(ctx, state, node, radius);
		}
	}
}

fn draw_label(
	ctx: &CanvasRenderingContext2d,
	state: &NoteGraphState,
	node: &GraphNode,
	radius: f64,
) {
	let colors = state.theme.colors();
	let zoom = state.zoom;
	let label = truncate_title(&node.title);
	let y = node.y + radius + 5.0 * zoom + label_font_size(zoom);

	ctx.set_font(&format!(
		"{}px Arial, sans-serif",
		label_font_size(zoom)
	));
	ctx.set_text_align("center");
	ctx.set_line_width((zoom / 2.0).max(0.5));
	ctx.set_stroke_style_str(colors.text_halo);
	let _ = ctx.stroke_text(&label, node.x, y);
	ctx.set_fill_style_str(colors.text);
	let _ = ctx.fill_text(&label, node.x, y);
}

fn fill_circle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.fill();
}
