use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::builder::{build_graph, clamp_dimensions};
use super::connections::resolve_connections;
use super::render;
use super::state::NoteGraphState;
use super::theme::Theme;
use super::types::Note;

/// Interactive force-directed view of a note collection.
///
/// A full run (fresh positions, fresh edges) starts whenever the note
/// set, the connection mode, or the reset epoch changes. Selection and
/// theme changes mutate the running state in place; they never rebuild.
/// With fewer than two notes an explanatory empty state replaces the
/// canvas and no simulation runs.
#[component]
pub fn NoteGraphCanvas(
	#[prop(into)] notes: Signal<Vec<Note>>,
	#[prop(into)] use_real_connections: Signal<bool>,
	/// Bump to drop cached connections and rebuild from scratch.
	#[prop(into)] reset_epoch: Signal<u32>,
	#[prop(into)] selected_id: Signal<Option<String>>,
	#[prop(into)] dark: Signal<bool>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional, into)] on_node_select: Option<Callback<String>>,
	#[prop(optional, into)] on_zoom_change: Option<Callback<f64>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<NoteGraphState>>> = Rc::new(RefCell::new(None));
	let ctx_slot: Rc<RefCell<Option<CanvasRenderingContext2d>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let (state_init, ctx_init, animate_init) =
		(state.clone(), ctx_slot.clone(), animate.clone());
	Effect::new(move |_| {
		let notes_now = notes.get();
		let use_real = use_real_connections.get();
		reset_epoch.track();

		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if notes_now.len() < 2 {
			// Degenerate graph: the empty state renders instead and no
			// simulation is started.
			*state_init.borrow_mut() = None;
			return;
		}

		let (w, h) = clamp_dimensions(
			width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0)
			}),
			height.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_height() as f64)
					.unwrap_or(600.0)
			}),
		);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|obj| obj.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				error!("could not acquire a 2d canvas context; leaving the graph view empty");
				*state_init.borrow_mut() = None;
				return;
			}
		};

		// Zoom survives a rebuild; theme and selection are read untracked
		// here because they have their own in-place effects below.
		let zoom = state_init.borrow().as_ref().map(|s| s.zoom).unwrap_or(1.0);
		let theme = Theme::from_dark_flag(dark.get_untracked());

		let mut rng = || js_sys::Math::random();
		let connections = resolve_connections(&notes_now, use_real, &mut rng);
		let data = build_graph(&notes_now, &connections, w, h, &mut rng);

		let mut run = NoteGraphState::new(data, w, h, theme, zoom);
		run.select(selected_id.get_untracked());
		*state_init.borrow_mut() = Some(run);
		*ctx_init.borrow_mut() = Some(ctx);

		// One shared tick loop per component instance, started on the
		// first successful build and reused across rebuilds.
		if animate_init.borrow().is_none() {
			let (state_anim, ctx_anim, canvas_anim) =
				(state_init.clone(), ctx_init.clone(), canvas.clone());
			let animate_inner = animate_init.clone();
			*animate_init.borrow_mut() = Some(Closure::new(move || {
				if !canvas_anim.is_connected() {
					// The view is gone: drop the per-run working set and
					// end the loop here by not rescheduling. A stale
					// frame after teardown is a no-op.
					state_anim.borrow_mut().take();
					ctx_anim.borrow_mut().take();
					return;
				}
				if let Some(ref mut s) = *state_anim.borrow_mut() {
					s.tick(0.016);
					if let Some(ref ctx) = *ctx_anim.borrow() {
						render::render(s, ctx);
					}
				}
				if let Some(ref cb) = *animate_inner.borrow() {
					let _ = web_sys::window()
						.unwrap()
						.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}));
			if let Some(ref cb) = *animate_init.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}
	});

	// Selection pins the node at the viewport center; the engine lets go
	// on its own after the one-shot delay.
	let state_sel = state.clone();
	Effect::new(move |_| {
		let selection = selected_id.get();
		if let Some(ref mut s) = *state_sel.borrow_mut() {
			s.select(selection);
		}
	});

	// Theme changes only recolor; positions and pins are untouched.
	let state_theme = state.clone();
	Effect::new(move |_| {
		let theme = Theme::from_dark_flag(dark.get());
		if let Some(ref mut s) = *state_theme.borrow_mut() {
			s.theme = theme;
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y, js_sys::Date::now());
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		let clicked = match *state_mu.borrow_mut() {
			Some(ref mut s) => s.pointer_up(x, y, js_sys::Date::now()),
			None => None,
		};
		// Run the host callback outside the state borrow.
		if let (Some(cb), Some(id)) = (on_node_select, clicked) {
			cb.run(id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_cancel();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let changed = match *state_wh.borrow_mut() {
			Some(ref mut s) => s.apply_wheel(ev.delta_y(), js_sys::Date::now()),
			None => None,
		};
		if let (Some(cb), Some(zoom)) = (on_zoom_change, changed) {
			cb.run(zoom);
		}
	};

	view! {
		<div class="note-graph">
			<canvas
				node_ref=canvas_ref
				class="note-graph-canvas"
				style:display=move || { if notes.get().len() >= 2 { "block" } else { "none" } }
				style:cursor="grab"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
			/>
			{move || {
				(notes.get().len() < 2).then(|| {
					view! {
						<div class="note-graph-empty">
							<h2>"Graph view"</h2>
							<p>"Create at least two notes to see their connections visualized here."</p>
						</div>
					}
				})
			}}
		</div>
	}
}
