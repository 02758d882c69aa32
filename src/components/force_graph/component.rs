//! Leptos component wrapping the collaboration graph canvas.
//!
//! The component creates an HTML canvas element, wires mouse handlers to the
//! interaction controller and drives the layout from `requestAnimationFrame`:
//! one simulation frame per display frame, redrawing only when something
//! changed. Force-strength sliders and the click tooltip live next to the
//! canvas.
//!
//! Moves and releases are taken from the window so a drag survives the pointer
//! leaving the canvas.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, MouseEvent, Window};

use super::render;
use super::state::ForceGraphState;
use super::theme::Theme;
use crate::config::SimulationConfig;
use crate::data::GraphData;
use crate::simulation::forces::{CHARGE, LINK};
use crate::simulation::{LinkForce, ManyBodyForce, Selection, Slider, UiEvent};

/// Tooltip distance from the pointer, in pixels.
const TOOLTIP_OFFSET: f64 = 10.0;

/// Bundles graph simulation state with visual configuration.
struct GraphContext {
	state: ForceGraphState,
	theme: Theme,
}

#[derive(Clone, Debug, PartialEq)]
struct Tooltip {
	selection: Selection,
	left: f64,
	top: f64,
}

type MouseCallback = Rc<RefCell<Option<Closure<dyn FnMut(MouseEvent)>>>>;

/// Pointer position relative to the canvas' top-left corner.
fn client_to_canvas(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	Some(client_to_canvas(&canvas, ev))
}

/// Renders an interactive collaboration graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal and optionally a
/// [`SimulationConfig`]. The canvas sizes itself to its parent container by
/// default; set `fullscreen = true` to fill the viewport and re-centre the
/// layout when the window is resized. Explicit `width`/`height` override
/// automatic sizing.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] config: SimulationConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let blur_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let move_cb: MouseCallback = Rc::new(RefCell::new(None));
	let up_cb: MouseCallback = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());
	let (blur_cb_init, move_cb_init, up_cb_init) =
		(blur_cb.clone(), move_cb.clone(), up_cb.clone());

	let build_error = RwSignal::new(None::<String>);
	let tooltip = RwSignal::new(None::<Tooltip>);
	let hovering = RwSignal::new(false);
	let charge = RwSignal::new(config.charge.strength);
	let link = RwSignal::new(config.link.strength);

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
						.filter(|w| *w > 0.0)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.filter(|h| *h > 0.0)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let state = match ForceGraphState::new(&data.get(), &config, w, h) {
			Ok(state) => state,
			Err(e) => {
				error!("collab-graph: cannot build layout: {e}");
				build_error.set(Some(e.to_string()));
				*context_init.borrow_mut() = None;
				return;
			}
		};
		build_error.set(None);
		tooltip.set(None);
		*context_init.borrow_mut() = Some(GraphContext {
			state,
			theme: Theme::default(),
		});

		// A new dataset only swaps the state; the loop and listeners stay.
		if animate_init.borrow().is_some() {
			return;
		}

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("collab-graph: canvas has no 2d context");
			return;
		};

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_mm, canvas_mm) = (context_init.clone(), canvas.clone());
		*move_cb_init.borrow_mut() = Some(Closure::<dyn FnMut(MouseEvent)>::new(
			move |ev: MouseEvent| {
				let (x, y) = client_to_canvas(&canvas_mm, &ev);
				let event = context_mm
					.borrow_mut()
					.as_mut()
					.and_then(|c| c.state.pointer_move(x, y));
				if let Some(UiEvent::NodeHovered(affiliation)) = event {
					debug!("hover: {affiliation:?}");
					hovering.set(affiliation.is_some());
				}
			},
		));
		if let Some(ref cb) = *move_cb_init.borrow() {
			let _ =
				window.add_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
		}

		let context_mu = context_init.clone();
		*up_cb_init.borrow_mut() = Some(Closure::<dyn FnMut(MouseEvent)>::new(
			move |_: MouseEvent| {
				if let Some(ref mut c) = *context_mu.borrow_mut() {
					c.state.pointer_up();
				}
			},
		));
		if let Some(ref cb) = *up_cb_init.borrow() {
			let _ =
				window.add_event_listener_with_callback("mouseup", cb.as_ref().unchecked_ref());
		}

		let context_blur = context_init.clone();
		*blur_cb_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_blur.borrow_mut() {
				c.state.pointer_cancel();
			}
			hovering.set(false);
		}));
		if let Some(ref cb) = *blur_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("blur", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.frame();
				if c.state.take_dirty() {
					render::render(&c.state, &ctx, &c.theme);
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
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.pointer_down(x, y);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.pointer_leave();
		}
		hovering.set(false);
	};

	let context_ck = context.clone();
	let on_click = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let event = context_ck
			.borrow_mut()
			.as_mut()
			.and_then(|c| c.state.click(x, y));
		match event {
			Some(UiEvent::NodeClicked { selection, .. }) => tooltip.set(Some(Tooltip {
				selection,
				left: ev.page_x() as f64 + TOOLTIP_OFFSET,
				top: ev.page_y() as f64 + TOOLTIP_OFFSET,
			})),
			Some(UiEvent::BackgroundClicked) => tooltip.set(None),
			_ => {}
		}
	};

	let context_cs = context.clone();
	let on_charge = move |ev: Event| {
		let raw = event_target_value(&ev);
		if let Some(ref mut c) = *context_cs.borrow_mut() {
			if c.state.slider_input(Slider::Charge, &raw) {
				if let Some(force) = c.state.sim.force::<ManyBodyForce>(CHARGE) {
					charge.set(force.strength());
				}
			}
		}
	};

	let context_ls = context.clone();
	let on_link = move |ev: Event| {
		let raw = event_target_value(&ev);
		if let Some(ref mut c) = *context_ls.borrow_mut() {
			if c.state.slider_input(Slider::Link, &raw) {
				if let Some(force) = c.state.sim.force::<LinkForce>(LINK) {
					link.set(force.strength());
				}
			}
		}
	};

	view! {
		<div class="force-graph">
			{move || build_error.get().map(|message| view! {
				<p class="graph-error">{message}</p>
			})}
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mouseleave=on_mouseleave
				on:click=on_click
				style=move || format!(
					"display: block; cursor: {};",
					if hovering.get() { "pointer" } else { "grab" },
				)
			/>
			<div class="graph-controls">
				<label>
					"Charge strength "
					<input
						type="range"
						min="-1000"
						max="0"
						step="10"
						prop:value=move || charge.get().to_string()
						on:input=on_charge
					/>
					<span class="graph-control-value">{move || charge.get()}</span>
				</label>
				<label>
					"Link strength "
					<input
						type="range"
						min="0"
						max="1"
						step="0.05"
						prop:value=move || link.get().to_string()
						on:input=on_link
					/>
					<span class="graph-control-value">{move || link.get()}</span>
				</label>
			</div>
			{move || tooltip.get().map(|tip| view! {
				<div
					class="graph-tooltip"
					style=format!("position: absolute; left: {}px; top: {}px;", tip.left, tip.top)
				>
					<strong>{tip.selection.id}</strong>
					<br />
					{format!("Affiliation: {}", tip.selection.affiliation)}
					<br />
					{format!("Country: {}", tip.selection.country)}
				</div>
			})}
		</div>
	}
}
