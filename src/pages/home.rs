use leptos::prelude::*;

use crate::components::note_graph::{Note, NoteGraphCanvas};

/// Seed notes demonstrating `[[...]]` cross-references.
fn seed_notes() -> Vec<Note> {
	vec![
		Note::new(
			"1",
			"Force layouts",
			"Physics-based graph drawing. Compare with [[Graph theory]] and \
			 the rendering notes in [[Canvas rendering|canvas]].",
		),
		Note::new(
			"2",
			"Graph theory",
			"Nodes and edges. Degree drives node size in [[Force layouts]].",
		),
		Note::new(
			"3",
			"Canvas rendering",
			"Immediate-mode drawing each animation frame; see [[Force layouts]].",
		),
		Note::new(
			"4",
			"Zettelkasten",
			"A note-taking method built on dense cross-references between \
			 small atomic notes, effectively applied graph theory.",
		),
		Note::new(
			"5",
			"Spaced repetition",
			"Review scheduling. Pairs well with [[Zettelkasten]] workflows.",
		),
		Note::new("6", "Reading list", "Unsorted clippings, no references yet."),
	]
}

/// Default Home Page: the interactive note graph with its controls.
#[component]
pub fn Home() -> impl IntoView {
	let notes = RwSignal::new(seed_notes());
	let use_real_connections = RwSignal::new(true);
	let reset_epoch = RwSignal::new(0u32);
	let selected_id = RwSignal::new(None::<String>);
	let dark = RwSignal::new(true);
	let zoom = RwSignal::new(1.0f64);

	let on_node_select = Callback::new(move |id: String| selected_id.set(Some(id)));
	let on_zoom_change = Callback::new(move |z: f64| zoom.set(z));

	let selected_title = move || {
		selected_id.get().and_then(|id| {
			notes
				.get()
				.iter()
				.find(|n| n.id == id)
				.map(|n| n.title.clone())
		})
	};

	view! {
		<div class="graph-page">
			<NoteGraphCanvas
				notes=notes
				use_real_connections=use_real_connections
				reset_epoch=reset_epoch
				selected_id=selected_id
				dark=dark
				on_node_select=on_node_select
				on_zoom_change=on_zoom_change
			/>
			<div class="graph-controls">
				<button on:click=move |_| {
					use_real_connections.update(|v| *v = !*v);
					reset_epoch.update(|e| *e += 1);
				}>
					{move || {
						if use_real_connections.get() {
							"Connections: real"
						} else {
							"Connections: random"
						}
					}}
				</button>
				<button on:click=move |_| reset_epoch.update(|e| *e += 1)>"Reset layout"</button>
				<button on:click=move |_| dark.update(|v| *v = !*v)>
					{move || if dark.get() { "Theme: dark" } else { "Theme: light" }}
				</button>
				<span class="zoom-level">{move || format!("zoom {:.1}x", zoom.get())}</span>
				<span class="selection">
					{move || selected_title().map(|t| format!("selected: {t}")).unwrap_or_default()}
				</span>
			</div>
		</div>
	}
}
