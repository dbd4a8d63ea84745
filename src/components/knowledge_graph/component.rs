use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::layout::LayoutMemo;
use super::render;
use super::state::SceneState;
use super::types::{GraphData, GraphNode};

/// Cumulative pointer travel under which a press/release pair still counts
/// as a click rather than an orbit gesture.
const CLICK_SLOP: f64 = 4.0;

#[component]
pub fn KnowledgeGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into, optional)] on_node_click: Option<Callback<GraphNode>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<SceneState>>> = Rc::new(RefCell::new(None));
	let memo: Rc<RefCell<LayoutMemo>> = Rc::new(RefCell::new(LayoutMemo::default()));
	let ctx_cell: Rc<RefCell<Option<CanvasRenderingContext2d>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let render_error = RwSignal::new(None::<String>);
	let has_data = Memo::new(move |_| !data.get().nodes.is_empty());

	let (state_init, memo_init, ctx_init, animate_init, resize_cb_init) = (
		state.clone(),
		memo.clone(),
		ctx_cell.clone(),
		animate.clone(),
		resize_cb.clone(),
	);
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
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
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx = match render::acquire_context(&canvas) {
			Ok(ctx) => ctx,
			Err(err) => {
				warn!("knowledge graph renderer unavailable: {err}");
				render_error.set(Some(err.to_string()));
				return;
			}
		};
		*ctx_init.borrow_mut() = Some(ctx);
		*state_init.borrow_mut() = Some(SceneState::new(
			&data.get_untracked(),
			&mut *memo_init.borrow_mut(),
			w,
			h,
		));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		// One animation loop per component.
		if animate_init.borrow().is_none() {
			let (state_anim, ctx_anim, animate_inner) =
				(state_init.clone(), ctx_init.clone(), animate_init.clone());
			*animate_init.borrow_mut() = Some(Closure::new(move || {
				if let Some(ref mut s) = *state_anim.borrow_mut() {
					if let Some(ref ctx) = *ctx_anim.borrow() {
						s.tick(0.016);
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
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}
	});

	// A new snapshot relayouts (through the memo) without restarting the
	// render loop or the camera.
	let (state_data, memo_data) = (state.clone(), memo.clone());
	Effect::new(move |_| {
		let data = data.get();
		if let Some(ref mut s) = *state_data.borrow_mut() {
			s.replace_data(&data, &mut *memo_data.borrow_mut());
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
			s.drag.active = true;
			s.drag.last_x = x;
			s.drag.last_y = y;
			s.drag.travel = 0.0;
			s.drag.pressed_node = s.node_at_position(x, y);
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
			if s.drag.active {
				let (dx, dy) = (x - s.drag.last_x, y - s.drag.last_y);
				s.drag.travel += dx.abs() + dy.abs();
				s.camera.orbit_by(dx, dy);
				s.drag.last_x = x;
				s.drag.last_y = y;
			} else {
				s.hover = s.node_at_position(x, y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = {
			let mut state = state_mu.borrow_mut();
			match *state {
				Some(ref mut s) => {
					let pressed = s.drag.pressed_node.take();
					let was_click = s.drag.travel <= CLICK_SLOP;
					s.drag.active = false;
					pressed
						.filter(|_| was_click)
						.map(|i| s.nodes[i].node.clone())
				}
				None => None,
			}
		};
		if let (Some(node), Some(cb)) = (clicked, on_node_click) {
			cb.run(node);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag.active = false;
			s.drag.pressed_node = None;
			s.hover = None;
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 1.1 } else { 0.9 };
			s.camera.zoom_by(factor);
		}
	};

	// The canvas stays mounted; the empty and fallback states replace it
	// visually, driven by signals alone.
	let canvas_visible = move || {
		if has_data.get() && render_error.get().is_none() {
			"block"
		} else {
			"none"
		}
	};

	view! {
		<div class="knowledge-graph">
			<canvas
				node_ref=canvas_ref
				class="knowledge-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="cursor: grab;"
				style:display=canvas_visible
			/>
			{move || {
				(!has_data.get())
					.then(|| {
						view! {
							<div class="graph-empty">
								"No knowledge graph yet. Run an analysis to see it here."
							</div>
						}
					})
			}}
			{move || {
				render_error
					.get()
					.filter(|_| has_data.get())
					.map(|message| view! { <div class="graph-fallback">{message}</div> })
			}}
		</div>
	}
}
