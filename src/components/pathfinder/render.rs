use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::graph::{Edge, Node};
use super::state::Frame;

const BACKGROUND: &str = "#0a0a0a";
const NODE_FILL: &str = "#3ae374";
const ENDPOINT_FILL: &str = "#7d5fff";
const ACTIVE_FILL: &str = "#ffb142";
const NODE_STROKE: &str = "#535c68";
const LABEL_FILL: &str = "#0a0a0a";
const EDGE_STROKE: &str = "#7d7d7d";
const SEARCH_STROKE: &str = "#778beb";
const PATH_STROKE: &str = "#ffa801";
const WEIGHT_FILL: &str = "#969696";
const STATUS_FILL: &str = "#dcdde1";

/// Receives draw requests for one frame.
pub trait FrameRenderer {
	fn clear(&mut self, width: f64, height: f64);
	fn draw_edge(&mut self, edge: &Edge, search_highlights: &[usize], path_highlights: &[usize]);
	/// `active` names the node to emphasize, if any.
	fn draw_node(&mut self, node: &Node, active: Option<&str>);
	fn draw_status(&mut self, text: &str);
}

/// Edges first so nodes cover their endpoints.
pub fn render<R: FrameRenderer + ?Sized>(frame: &Frame<'_>, renderer: &mut R) {
	renderer.clear(frame.width, frame.height);
	for edge in frame.edges {
		renderer.draw_edge(edge, frame.search_highlights, frame.path_highlights);
	}
	for node in frame.nodes {
		renderer.draw_node(node, frame.active);
	}
	renderer.draw_status(&frame.status);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeEmphasis {
	Plain,
	Searched,
	Path,
}

impl EdgeEmphasis {
	/// Path highlighting wins over search highlighting.
	pub fn of(edge: &Edge, search_highlights: &[usize], path_highlights: &[usize]) -> Self {
		if path_highlights.contains(&edge.id) {
			Self::Path
		} else if search_highlights.contains(&edge.id) {
			Self::Searched
		} else {
			Self::Plain
		}
	}

	fn stroke(self) -> (&'static str, f64) {
		match self {
			Self::Plain => (EDGE_STROKE, 1.0),
			Self::Searched => (SEARCH_STROKE, 2.0),
			Self::Path => (PATH_STROKE, 2.0),
		}
	}
}

fn node_fill(label: &str, active: Option<&str>, endpoints: [&str; 2]) -> &'static str {
	if active == Some(label) {
		ACTIVE_FILL
	} else if endpoints.contains(&label) {
		ENDPOINT_FILL
	} else {
		NODE_FILL
	}
}

pub struct CanvasRenderer<'a> {
	ctx: &'a CanvasRenderingContext2d,
	endpoints: [&'a str; 2],
}

impl<'a> CanvasRenderer<'a> {
	pub fn new(ctx: &'a CanvasRenderingContext2d, source: &'a str, target: &'a str) -> Self {
		Self {
			ctx,
			endpoints: [source, target],
		}
	}
}

impl FrameRenderer for CanvasRenderer<'_> {
	fn clear(&mut self, width: f64, height: f64) {
		self.ctx.set_fill_style_str(BACKGROUND);
		self.ctx.fill_rect(0.0, 0.0, width, height);
	}

	fn draw_edge(&mut self, edge: &Edge, search_highlights: &[usize], path_highlights: &[usize]) {
		let ctx = self.ctx;
		let (stroke, width) = EdgeEmphasis::of(edge, search_highlights, path_highlights).stroke();

		ctx.set_stroke_style_str(stroke);
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(edge.start.x, edge.start.y);
		ctx.line_to(edge.end.x, edge.end.y);
		ctx.stroke();

		let (xm, ym) = (edge.midpoint.x, edge.midpoint.y);
		ctx.set_fill_style_str(stroke);
		ctx.begin_path();
		let _ = ctx.arc(xm, ym, 3.0, 0.0, 2.0 * PI);
		ctx.fill();

		ctx.set_fill_style_str(WEIGHT_FILL);
		ctx.set_font("10px sans-serif");
		ctx.set_text_align("left");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&edge.weight.to_string(), xm + 8.0, ym);
	}

	fn draw_node(&mut self, node: &Node, active: Option<&str>) {
		let ctx = self.ctx;
		let (x, y) = (node.position.x, node.position.y);

		ctx.begin_path();
		let _ = ctx.arc(x, y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node_fill(&node.label, active, self.endpoints));
		ctx.fill();
		ctx.set_stroke_style_str(NODE_STROKE);
		ctx.set_line_width(1.0);
		ctx.stroke();

		ctx.set_fill_style_str(LABEL_FILL);
		// nodes shrink on small canvases, labels follow
		ctx.set_font(&format!("{}px sans-serif", (node.radius * 0.75).round().max(8.0)));
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&node.label, x, y);
	}

	fn draw_status(&mut self, text: &str) {
		let ctx = self.ctx;
		let height = ctx.canvas().map_or(0.0, |c| c.height() as f64);
		ctx.set_fill_style_str(STATUS_FILL);
		ctx.set_font("13px sans-serif");
		ctx.set_text_align("left");
		ctx.set_text_baseline("bottom");
		let _ = ctx.fill_text(text, 20.0, height - 16.0);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::pathfinder::geometry::Point;
	use crate::components::pathfinder::graph::test_support::node;

	#[derive(Debug, PartialEq)]
	enum Call {
		Clear,
		Edge(usize, EdgeEmphasis),
		Node(String, bool),
		Status(String),
	}

	#[derive(Default)]
	struct Recorder(Vec<Call>);

	impl FrameRenderer for Recorder {
		fn clear(&mut self, _: f64, _: f64) {
			self.0.push(Call::Clear);
		}

		fn draw_edge(&mut self, edge: &Edge, search: &[usize], path: &[usize]) {
			self.0.push(Call::Edge(edge.id, EdgeEmphasis::of(edge, search, path)));
		}

		fn draw_node(&mut self, node: &Node, active: Option<&str>) {
			self.0.push(Call::Node(node.label.clone(), active == Some(node.label.as_str())));
		}

		fn draw_status(&mut self, text: &str) {
			self.0.push(Call::Status(text.to_owned()));
		}
	}

	fn edge(id: usize) -> Edge {
		Edge {
			id,
			from: format!("N{id}"),
			to: format!("N{}", id + 1),
			start: Point::default(),
			end: Point::new(10.0, 0.0),
			weight: 10,
			midpoint: Point::new(5.0, 0.0),
		}
	}

	#[test]
	fn frame_is_drawn_edges_then_nodes() {
		let edges = [edge(0), edge(1), edge(2)];
		let nodes = [node("S", 0.0, 0.0), node("A", 9.0, 9.0)];
		let frame = Frame {
			width: 100.0,
			height: 100.0,
			nodes: &nodes,
			edges: &edges,
			active: Some("A"),
			search_highlights: &[1, 2],
			path_highlights: &[2],
			status: "searching".into(),
		};
		let mut recorder = Recorder::default();
		render(&frame, &mut recorder);

		assert_eq!(
			recorder.0,
			[
				Call::Clear,
				Call::Edge(0, EdgeEmphasis::Plain),
				Call::Edge(1, EdgeEmphasis::Searched),
				Call::Edge(2, EdgeEmphasis::Path),
				Call::Node("S".into(), false),
				Call::Node("A".into(), true),
				Call::Status("searching".into()),
			]
		);
	}

	#[test]
	fn active_color_beats_endpoint_color() {
		let endpoints = ["S", "E"];
		assert_eq!(node_fill("S", Some("S"), endpoints), ACTIVE_FILL);
		assert_eq!(node_fill("E", Some("S"), endpoints), ENDPOINT_FILL);
		assert_eq!(node_fill("B", None, endpoints), NODE_FILL);
	}
}
