//! Canvas drawing for the laid-out scene: depth-sorted shaded spheres,
//! straight link segments, and on-demand labels.

use std::f64::consts::PI;

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::color;
use super::state::{Projected, SceneState};

/// Scene construction failures the component degrades on instead of
/// letting them escape into the host page.
#[derive(Clone, Debug, Error)]
pub enum RenderError {
	#[error("graph rendering is not supported in this browser")]
	ContextUnavailable,
	#[error("graph rendering context could not be created")]
	ContextFailed,
}

/// Fallible context acquisition; the component maps an `Err` to the
/// textual fallback view.
pub fn acquire_context(
	canvas: &HtmlCanvasElement,
) -> Result<CanvasRenderingContext2d, RenderError> {
	let ctx = canvas
		.get_context("2d")
		.map_err(|_| RenderError::ContextFailed)?
		.ok_or(RenderError::ContextUnavailable)?;
	ctx.dyn_into::<CanvasRenderingContext2d>()
		.map_err(|_| RenderError::ContextUnavailable)
}

pub fn render(state: &SceneState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(color::BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let projected: Vec<Option<Projected>> = state
		.nodes
		.iter()
		.map(|p| state.camera.project(p.x, p.y, p.z, state.width, state.height))
		.collect();

	draw_links(state, ctx, &projected);
	draw_nodes(state, ctx, &projected);
}

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn draw_links(state: &SceneState, ctx: &CanvasRenderingContext2d, projected: &[Option<Projected>]) {
	for link in &state.links {
		let (Some(a), Some(b)) = (projected[link.source], projected[link.target]) else {
			continue;
		};
		let (r, g, bl) = color::rgb(link.color);
		let scale = (a.scale + b.scale) / 2.0;
		ctx.set_stroke_style_str(&format!("rgba({r}, {g}, {bl}, 0.55)"));
		ctx.set_line_width((1.5 * scale).max(0.4));
		if link.dashed {
			let dash = 6.0 * scale;
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(dash * 0.6),
			));
		}
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
		if link.dashed {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
	}
}

fn draw_nodes(state: &SceneState, ctx: &CanvasRenderingContext2d, projected: &[Option<Projected>]) {
	let t = ease_out_cubic(state.highlight_t);

	// Painter's order: far nodes first so near ones overdraw them.
	let mut order: Vec<(usize, f64)> = projected
		.iter()
		.enumerate()
		.filter_map(|(i, p)| p.map(|p| (i, p.depth)))
		.collect();
	order.sort_by(|a, b| b.1.total_cmp(&a.1));

	for &(i, _) in &order {
		let Some(p) = projected[i] else {
			continue;
		};
		let placed = &state.nodes[i];
		let hovered = state.hover == Some(i);
		let mut radius = (SceneState::node_radius(placed) * p.scale).max(1.0);
		if hovered {
			radius *= 1.0 + 0.25 * t;
		}
		let emissive = if hovered { 0.35 * t } else { 0.0 };
		sphere(ctx, p.x, p.y, radius, color::node_color(&placed.node), emissive);

		if hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, radius + 2.5, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5);
			ctx.stroke();
		}

		if state.label_visible(i) {
			ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
			ctx.set_font(&format!(
				"{}px sans-serif",
				(11.0 * p.scale).clamp(9.0, 16.0)
			));
			ctx.set_text_align("center");
			let _ = ctx.fill_text(&placed.node.display_label(), p.x, p.y - radius - 6.0);
		}
	}
}

/// Shaded disc standing in for a lit sphere: an ambient base with a
/// point-light falloff from the upper left toward a darkened rim.
fn sphere(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, hex: &str, emissive: f64) {
	match ctx.create_radial_gradient(
		x - radius * 0.35,
		y - radius * 0.35,
		radius * 0.1,
		x,
		y,
		radius,
	) {
		Ok(gradient) => {
			let _ = gradient.add_color_stop(0.0, &color::shade(hex, 1.45 + emissive));
			let _ = gradient.add_color_stop(0.55, &color::shade(hex, 1.0 + emissive));
			let _ = gradient.add_color_stop(1.0, &color::shade(hex, 0.55 + emissive));
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		Err(_) => ctx.set_fill_style_str(hex),
	}
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.fill();
}

#[cfg(test)]
mod tests {
	use super::RenderError;

	#[test]
	fn render_errors_read_as_user_facing_copy() {
		assert_eq!(
			RenderError::ContextUnavailable.to_string(),
			"graph rendering is not supported in this browser"
		);
		assert_eq!(
			RenderError::ContextFailed.to_string(),
			"graph rendering context could not be created"
		);
	}
}
