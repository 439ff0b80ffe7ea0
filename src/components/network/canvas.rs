use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::render::{EDGE_COLOR, Frame, Primitive, TEXT_COLOR, TextAlign};

const DASH: f64 = 6.0;
const GAP: f64 = 4.0;

pub fn paint(frame: &Frame, ctx: &CanvasRenderingContext2d) {
	for primitive in &frame.primitives {
		match primitive {
			Primitive::Clear {
				width,
				height,
				color,
			} => {
				ctx.set_global_alpha(1.0);
				ctx.set_fill_style_str(color);
				ctx.fill_rect(0.0, 0.0, *width, *height);
			}
			Primitive::Edge {
				from,
				to,
				width,
				alpha,
				dashed,
			} => {
				ctx.set_global_alpha(*alpha);
				ctx.set_stroke_style_str(EDGE_COLOR);
				ctx.set_line_width(*width);
				if *dashed {
					let _ = ctx.set_line_dash(&js_sys::Array::of2(
						&JsValue::from_f64(DASH),
						&JsValue::from_f64(GAP),
					));
				}
				ctx.begin_path();
				ctx.move_to(from.x, from.y);
				ctx.line_to(to.x, to.y);
				ctx.stroke();
				if *dashed {
					let _ = ctx.set_line_dash(&js_sys::Array::new());
				}
			}
			Primitive::Glow {
				center,
				inner,
				outer,
				alpha,
			} => {
				let Ok(gradient) =
					ctx.create_radial_gradient(center.x, center.y, *inner, center.x, center.y, *outer)
				else {
					continue;
				};
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha));
				let _ = gradient.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", alpha * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.set_global_alpha(1.0);
				ctx.begin_path();
				let _ = ctx.arc(center.x, center.y, *outer, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
			Primitive::Node {
				center,
				radius,
				fill,
				alpha,
				ring,
				..
			} => {
				ctx.set_global_alpha(*alpha);
				ctx.begin_path();
				let _ = ctx.arc(center.x, center.y, *radius, 0.0, 2.0 * PI);
				ctx.set_fill_style_str(fill);
				ctx.fill();
				if let Some(width) = ring {
					ctx.begin_path();
					let _ = ctx.arc(center.x, center.y, radius + 2.0, 0.0, 2.0 * PI);
					ctx.set_stroke_style_str(TEXT_COLOR);
					ctx.set_line_width(*width);
					ctx.stroke();
				}
			}
			Primitive::Text {
				text,
				at,
				size,
				alpha,
				align,
			} => {
				ctx.set_global_alpha(*alpha);
				ctx.set_fill_style_str(TEXT_COLOR);
				ctx.set_font(&format!("{}px sans-serif", size));
				ctx.set_text_align(match align {
					TextAlign::Left => "left",
					TextAlign::Center => "center",
				});
				let _ = ctx.fill_text(text, at.x, at.y);
			}
			Primitive::Swatch {
				center,
				radius,
				fill,
			} => {
				ctx.set_global_alpha(1.0);
				ctx.begin_path();
				let _ = ctx.arc(center.x, center.y, *radius, 0.0, 2.0 * PI);
				ctx.set_fill_style_str(fill);
				ctx.fill();
			}
		}
	}
	ctx.set_global_alpha(1.0);
	ctx.set_text_align("left");
}
