use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::config::Scene;
use super::render::{self, CanvasRenderer, FrameRenderer};
use super::state::PathfinderState;

/// Lays out a fresh run, or paints the reason it could not start.
fn launch(
	scene: &Scene,
	width: f64,
	height: f64,
	ctx: &CanvasRenderingContext2d,
) -> Option<PathfinderState> {
	match PathfinderState::new(scene, width, height, &mut rand::thread_rng()) {
		Ok(state) => Some(state),
		Err(err) => {
			error!("cannot start: {err}");
			let mut renderer = CanvasRenderer::new(ctx, "", "");
			renderer.clear(width, height);
			renderer.draw_status(&format!("error: {err}"));
			None
		}
	}
}

fn context_of(canvas: &HtmlCanvasElement) -> CanvasRenderingContext2d {
	canvas
		.get_context("2d")
		.unwrap()
		.unwrap()
		.dyn_into()
		.unwrap()
}

#[component]
pub fn PathfinderCanvas(
	#[prop(into)] scene: Signal<Scene>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<PathfinderState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

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

		let ctx = context_of(&canvas);
		*state_init.borrow_mut() = launch(&scene.get(), w, h, &ctx);

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

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running && s.clock.is_due(now) {
					// a failure stays on the state and shows up in the status line
					let _ = s.advance_one_tick();
				}
				let mut renderer =
					CanvasRenderer::new(&ctx, &s.config.source_label, &s.config.target_label);
				render::render(&s.frame(), &mut renderer);
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
	});

	// Every click re-randomizes the layout and replays the search.
	let state_click = state.clone();
	let on_click = move |_: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = (canvas.width() as f64, canvas.height() as f64);
		let ctx = context_of(&canvas);
		*state_click.borrow_mut() = launch(&scene.get_untracked(), w, h, &ctx);
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="pathfinder-canvas"
			on:click=on_click
			style="display: block; cursor: pointer;"
		/>
	}
}
