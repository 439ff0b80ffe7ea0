use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent, Window,
};

use super::canvas;
use super::config::NetworkConfig;
use super::state::{NetworkEvent, NetworkState};
use super::types::{NetworkData, NetworkNode, Point};

const FRAME_DT: f64 = 0.016;

type SharedState = Rc<RefCell<Option<NetworkState>>>;

/// requestAnimationFrame driver. Frames are requested only while the state asks for them.
struct FrameLoop {
	state: SharedState,
	ctx: CanvasRenderingContext2d,
	pending: Cell<Option<i32>>,
	callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl FrameLoop {
	fn start(state: SharedState, ctx: CanvasRenderingContext2d) -> Rc<Self> {
		let frame_loop = Rc::new(Self {
			state,
			ctx,
			pending: Cell::new(None),
			callback: RefCell::new(None),
		});
		let weak = Rc::downgrade(&frame_loop);
		*frame_loop.callback.borrow_mut() = Some(Closure::new(move || {
			if let Some(frame_loop) = weak.upgrade() {
				frame_loop.run();
			}
		}));
		frame_loop.request();
		frame_loop
	}

	fn run(&self) {
		self.pending.set(None);
		let again = match self.state.borrow_mut().as_mut() {
			Some(s) => {
				if s.needs_frame() {
					s.tick(FRAME_DT);
				}
				canvas::paint(&s.frame(), &self.ctx);
				s.needs_frame()
			}
			None => false,
		};
		if again {
			self.request();
		}
	}

	/// Schedules one frame unless one is already pending.
	fn request(&self) {
		if self.pending.get().is_some() {
			return;
		}
		let callback = self.callback.borrow();
		let (Some(window), Some(cb)) = (web_sys::window(), callback.as_ref()) else {
			return;
		};
		match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			Ok(id) => self.pending.set(Some(id)),
			Err(err) => error!("requestAnimationFrame failed: {:?}", err),
		}
	}

	fn stop(&self) {
		if let (Some(id), Some(window)) = (self.pending.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		self.callback.borrow_mut().take();
	}
}

#[derive(Default)]
struct Mounted {
	frame_loop: Option<Rc<FrameLoop>>,
	resize: Option<Closure<dyn FnMut()>>,
}

impl Mounted {
	fn teardown(&mut self) {
		if let Some(frame_loop) = self.frame_loop.take() {
			frame_loop.stop();
		}
		if let (Some(cb), Some(window)) = (self.resize.take(), web_sys::window()) {
			let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		debug!("Relationship network torn down");
	}
}

/// Shared handle the DOM listeners go through.
#[derive(Clone)]
struct Handle {
	state: SharedState,
	mounted: Rc<RefCell<Mounted>>,
}

impl Handle {
	/// Runs `f` against the state, then wakes the frame loop so the change gets painted.
	fn update<R>(&self, f: impl FnOnce(&mut NetworkState) -> R) -> Option<R> {
		let out = self.state.borrow_mut().as_mut().map(f);
		if let Some(frame_loop) = self.mounted.borrow().frame_loop.as_ref() {
			frame_loop.request();
		}
		out
	}
}

fn window_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(800.0),
		window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(600.0),
	)
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, client_x: i32, client_y: i32) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(
		client_x as f64 - rect.left(),
		client_y as f64 - rect.top(),
	))
}

fn touch_points(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &TouchEvent) -> Vec<Point> {
	let touches = ev.touches();
	(0..touches.length())
		.filter_map(|i| touches.get(i))
		.filter_map(|t| local_point(canvas_ref, t.client_x(), t.client_y()))
		.collect()
}

/// Interactive relationship network drawn on a canvas.
///
/// The graph is laid out by a force simulation and redrawn each animation
/// frame while it is still moving. Hover, drag, click, pan, wheel and pinch
/// are handled here; `on_node_click` / `on_node_hover` receive the host's own
/// node records.
#[component]
pub fn RelationshipNetwork(
	#[prop(into)] data: Signal<NetworkData>,
	#[prop(optional, into)] on_node_click: Option<Callback<NetworkNode>>,
	#[prop(optional, into)] on_node_hover: Option<Callback<Option<NetworkNode>>>,
	#[prop(optional)] config: NetworkConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let handle = Handle {
		state: Rc::new(RefCell::new(None)),
		mounted: Rc::new(RefCell::new(Mounted::default())),
	};

	let dispatch = move |event: Option<NetworkEvent>| match event {
		Some(NetworkEvent::NodeClicked(node)) => {
			if let Some(cb) = on_node_click {
				cb.run(node);
			}
		}
		Some(NetworkEvent::NodeHovered(node)) => {
			if let Some(cb) = on_node_hover {
				cb.run(node);
			}
		}
		None => {}
	};

	let handle_init = handle.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if handle_init.mounted.borrow().frame_loop.is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("No window, relationship network stays blank");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
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

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("Canvas 2d context unavailable");
			return;
		};
		*handle_init.state.borrow_mut() = Some(NetworkState::new(
			&data.get_untracked(),
			config.clone(),
			w,
			h,
		));

		if fullscreen {
			let (handle_resize, canvas_resize) = (handle_init.clone(), canvas.clone());
			let on_resize: Closure<dyn FnMut()> = Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				handle_resize.update(|s| s.resize(nw, nh));
			});
			let _ =
				window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
			handle_init.mounted.borrow_mut().resize = Some(on_resize);
		}

		let frame_loop = FrameLoop::start(handle_init.state.clone(), ctx);
		handle_init.mounted.borrow_mut().frame_loop = Some(frame_loop);
		debug!("Relationship network mounted at {w}x{h}");
	});

	let handle_data = handle.clone();
	Effect::new(move |prev: Option<()>| {
		let next = data.get();
		if prev.is_some() {
			dispatch(handle_data.update(|s| s.replace_data(&next)).flatten());
		}
	});

	let mounted = StoredValue::new_local(handle.mounted.clone());
	on_cleanup(move || {
		mounted.try_with_value(|m| m.borrow_mut().teardown());
	});

	let h = handle.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some(p) = local_point(canvas_ref, ev.client_x(), ev.client_y()) {
			h.update(|s| s.pointer_down(p));
		}
	};

	let h = handle.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(p) = local_point(canvas_ref, ev.client_x(), ev.client_y()) {
			dispatch(h.update(|s| s.pointer_move(p)).flatten());
		}
	};

	let h = handle.clone();
	let on_mouseup = move |_: MouseEvent| {
		dispatch(h.update(|s| s.pointer_up()).flatten());
	};

	let h = handle.clone();
	let on_mouseleave = move |_: MouseEvent| {
		dispatch(h.update(|s| s.pointer_leave()).flatten());
	};

	let h = handle.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(p) = local_point(canvas_ref, ev.client_x(), ev.client_y()) {
			h.update(|s| s.wheel(p, ev.delta_y()));
		}
	};

	let h = handle.clone();
	let on_touchstart = move |ev: TouchEvent| {
		ev.prevent_default();
		match touch_points(canvas_ref, &ev).as_slice() {
			[p] => {
				h.update(|s| s.pointer_down(*p));
			}
			[a, b, ..] => {
				h.update(|s| s.pinch_start(*a, *b));
			}
			[] => {}
		}
	};

	let h = handle.clone();
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		match touch_points(canvas_ref, &ev).as_slice() {
			[p] => dispatch(h.update(|s| s.pointer_move(*p)).flatten()),
			[a, b, ..] => {
				h.update(|s| s.pinch_move(*a, *b));
			}
			[] => {}
		}
	};

	let touch_end = {
		let h = handle.clone();
		move |ev: TouchEvent| {
			if ev.touches().length() > 0 {
				h.update(|s| s.pinch_end());
				return;
			}
			dispatch(
				h.update(|s| {
					s.pinch_end();
					s.pointer_up()
				})
				.flatten(),
			);
		}
	};
	let on_touchend = touch_end.clone();
	let on_touchcancel = touch_end;

	view! {
		<canvas
			node_ref=canvas_ref
			class="relationship-network-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			on:touchcancel=on_touchcancel
			style="display: block; cursor: grab; touch-action: none;"
		/>
	}
}
