use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::layout::routing::point_along;
use crate::layout::{Connector, Edge, LevelGuide, Node, Point};

use super::state::DiagramState;

pub const BACKGROUND: &str = "#ffffff";
pub const ENTITY_FILL: &str = "#ffffff";
pub const ENTITY_HOVER_FILL: &str = "#f3f8fe";
pub const ENTITY_RADIUS: f64 = 5.0;
pub const LABEL_COLOR: &str = "#222222";
pub const FIELD_LABEL_COLOR: &str = "#555555";
pub const ARROW_SIZE: f64 = 10.0;

fn set_dash(ctx: &CanvasRenderingContext2d, dash: Option<(f64, f64)>) {
	let pattern = match dash {
		Some((on, off)) => js_sys::Array::of2(&JsValue::from_f64(on), &JsValue::from_f64(off)),
		None => js_sys::Array::new(),
	};
	let _ = ctx.set_line_dash(&pattern);
}

pub fn render(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.canvas.width, state.canvas.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_guides(&state.guides, ctx);
	for edge in &state.edges {
		draw_edge(edge, ctx);
	}
	for (i, node) in state.nodes.iter().enumerate() {
		draw_node(node, state.hover == Some(i), ctx);
	}
	ctx.restore();
}

fn draw_guides(guides: &[LevelGuide], ctx: &CanvasRenderingContext2d) {
	ctx.set_line_width(1.0);
	for guide in guides {
		ctx.set_stroke_style_str(&guide.stroke);
		set_dash(ctx, Some(guide.dash));
		ctx.begin_path();
		let _ = ctx.arc(guide.center.x, guide.center.y, guide.radius, 0.0, 2.0 * PI);
		ctx.stroke();
	}
	set_dash(ctx, None);
}

/// Strokes `route` with rounded corners.
fn trace_route(route: &[Point], connector: Connector, ctx: &CanvasRenderingContext2d) {
	let Connector::Rounded { radius } = connector;
	let Some(first) = route.first() else {
		return;
	};
	ctx.begin_path();
	ctx.move_to(first.x, first.y);
	for w in route.windows(3) {
		let _ = ctx.arc_to(w[1].x, w[1].y, w[2].x, w[2].y, radius);
	}
	if let Some(last) = route.last() {
		ctx.line_to(last.x, last.y);
	}
	ctx.stroke();
}

fn draw_edge(edge: &Edge, ctx: &CanvasRenderingContext2d) {
	let route = &edge.route;
	if route.len() < 2 {
		return;
	}
	let style = &edge.style;
	ctx.set_stroke_style_str(&style.stroke);
	ctx.set_line_width(style.stroke_width);
	set_dash(ctx, style.dashed.then_some((5.0, 5.0)));
	trace_route(route, style.connector, ctx);
	set_dash(ctx, None);

	let (tip, back) = (route[route.len() - 1], route[route.len() - 2]);
	let (dx, dy) = (tip.x - back.x, tip.y - back.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist > 0.001 {
		let (ux, uy) = (dx / dist, dy / dist);
		let (bx, by) = (tip.x - ux * ARROW_SIZE, tip.y - uy * ARROW_SIZE);
		let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
		ctx.set_fill_style_str(&style.stroke);
		ctx.begin_path();
		ctx.move_to(tip.x, tip.y);
		ctx.line_to(bx + px, by + py);
		ctx.line_to(bx - px, by - py);
		ctx.close_path();
		ctx.fill();
	}

	ctx.set_font("12px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(FIELD_LABEL_COLOR);
	for (label, t) in [(&edge.source_label, 0.3), (&edge.target_label, 0.7)] {
		if label.is_empty() {
			continue;
		}
		if let Some(p) = point_along(route, t) {
			let _ = ctx.fill_text(label, p.x, p.y - 8.0);
		}
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_node(node: &Node, hovered: bool, ctx: &CanvasRenderingContext2d) {
	rounded_rect(ctx, node.x, node.y, node.width, node.height, ENTITY_RADIUS);
	ctx.set_fill_style_str(if hovered { ENTITY_HOVER_FILL } else { ENTITY_FILL });
	ctx.fill();
	ctx.set_stroke_style_str(&node.style.stroke);
	ctx.set_line_width(node.style.stroke_width);
	ctx.stroke();

	let c = node.center();
	ctx.set_font("bold 14px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(LABEL_COLOR);
	let _ = ctx.fill_text(&node.label, c.x, c.y);
}
