//! Canvas rendering for the collaboration graph.
//!
//! Two passes for z-ordering: links first, then nodes in arena order so the
//! last node drawn is also the one hit-testing picks.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scale::{country_color, node_radius};
use super::state::ForceGraphState;
use super::theme::Theme;

/// Renders the complete graph to the canvas.
pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_global_alpha(1.0);
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	draw_links(state, ctx, theme);
	draw_nodes(state, ctx, theme);

	ctx.set_global_alpha(1.0);
}

fn draw_links(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let graph = state.sim.graph();
	let highlight = state.ui.highlight();

	ctx.set_stroke_style_str(&theme.link.to_css());
	ctx.set_line_width(theme.link_width);

	for link in graph.links() {
		let (source, target) = graph.endpoints(link);
		ctx.set_global_alpha(highlight.link_opacity(graph, link));
		ctx.begin_path();
		ctx.move_to(source.x, source.y);
		ctx.line_to(target.x, target.y);
		ctx.stroke();
	}
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let highlight = state.ui.highlight();

	ctx.set_stroke_style_str(&theme.node_border.to_css());
	ctx.set_line_width(theme.node_border_width);

	for node in state.sim.graph().nodes() {
		ctx.set_global_alpha(highlight.node_opacity(node));
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node_radius(node), 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&country_color(theme, &node.country).to_css());
		ctx.fill();
		ctx.stroke();
	}
}
