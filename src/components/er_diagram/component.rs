use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use crate::layout::{LayoutKind, LayoutManager};

use super::export::{self, ImageFormat, PNG_FAILURE_MESSAGE, Snapshot};
use super::render;
use super::state::DiagramState;
use super::types::Relationship;

const FRAME_SECS: f64 = 1.0 / 60.0;
const DEFAULT_WIDTH: f64 = 800.0;
const MIN_HEIGHT: f64 = 600.0;

type SharedState = Rc<RefCell<Option<DiagramState>>>;

/// Width follows the container; height is 60% of the window, at least 600.
fn canvas_size(canvas: &HtmlCanvasElement, window: &Window) -> (f64, f64) {
	let width = canvas
		.parent_element()
		.map(|p| p.client_width() as f64)
		.filter(|w| *w > 0.0)
		.unwrap_or(DEFAULT_WIDTH);
	let inner = window
		.inner_height()
		.ok()
		.and_then(|h| h.as_f64())
		.unwrap_or(0.0);
	(width, (inner * 0.6).max(MIN_HEIGHT))
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn download(state: &SharedState, format: ImageFormat) {
	let Some(snapshot) = state.borrow().as_ref().map(Snapshot::of) else {
		return;
	};
	spawn_local(async move {
		if let Err(err) = export::download(snapshot, format).await {
			log::error!("{err}");
			let message = match format {
				ImageFormat::Png => PNG_FAILURE_MESSAGE.to_string(),
				ImageFormat::Svg => err.to_string(),
			};
			if let Some(window) = web_sys::window() {
				let _ = window.alert_with_message(&message);
			}
		}
	});
}

/// Canvas view of an ER diagram with zoom, layout and export controls.
#[component]
pub fn ErDiagramCanvas(#[prop(into)] relationships: Signal<Vec<Relationship>>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (selected, set_selected) = signal(LayoutKind::default());
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}

		let (w, h) = canvas_size(&canvas, &window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::error!("2d canvas context unavailable");
			return;
		};
		let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
		let mut diagram = DiagramState::with_manager(w, h, LayoutManager::new(seed));
		diagram.render_relationships(&relationships.get_untracked());
		*state_init.borrow_mut() = Some(diagram);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = canvas_size(&canvas_resize, &win);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(FRAME_SECS);
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// The first set of relationships is rendered when the canvas is set up.
	let state_data = state.clone();
	Effect::new(move |prev: Option<()>| {
		let rels = relationships.get();
		if prev.is_none() {
			return;
		}
		if let Some(ref mut s) = *state_data.borrow_mut() {
			s.render_relationships(&rels);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	let state_zi = state.clone();
	let zoom_in = move |_| {
		if let Some(ref mut s) = *state_zi.borrow_mut() {
			s.zoom_in();
		}
	};
	let state_zo = state.clone();
	let zoom_out = move |_| {
		if let Some(ref mut s) = *state_zo.borrow_mut() {
			s.zoom_out();
		}
	};
	let state_fit = state.clone();
	let fit = move |_| {
		if let Some(ref mut s) = *state_fit.borrow_mut() {
			s.fit_to_content();
		}
	};
	let state_layout = state.clone();
	let apply_layout = move |_| {
		if let Some(ref mut s) = *state_layout.borrow_mut() {
			s.set_layout(selected.get_untracked().name());
		}
	};
	let state_svg = state.clone();
	let download_svg = move |_| download(&state_svg, ImageFormat::Svg);
	let state_png = state.clone();
	let download_png = move |_| download(&state_png, ImageFormat::Png);

	view! {
		<div class="er-diagram">
			<div class="er-diagram-toolbar">
				<button on:click=zoom_in title="Zoom in">"+"</button>
				<button on:click=zoom_out title="Zoom out">"-"</button>
				<button on:click=fit>"Fit"</button>
				<select on:change=move |ev| {
					set_selected.set(LayoutKind::from_name_or_grid(&event_target_value(&ev)))
				}>
					{LayoutKind::ALL
						.into_iter()
						.map(|kind| {
							view! {
								<option value=kind.name() selected=move || selected.get() == kind>
									{kind.label()}
								</option>
							}
						})
						.collect_view()}
				</select>
				<button on:click=apply_layout>"Apply Layout"</button>
				<button on:click=download_svg>"Download SVG"</button>
				<button on:click=download_png>"Download PNG"</button>
			</div>
			<canvas
				node_ref=canvas_ref
				class="er-diagram-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab; border: 1px solid #ddd;"
			/>
		</div>
	}
}
