use log::{debug, info, warn};
use rand::Rng;

use super::config::VisualizerConfig;
use super::error::GraphError;
use super::geometry::{Point, distance_to_segment};
use super::graph::Node;
use super::types::GraphDefinition;

/// Largest radius, relative to the side of the square each node would get if
/// the placement area were split evenly, that still lays out reliably.
const FIT_FACTOR: f64 = 0.05;

/// Randomized rejection-sampling placement.
///
/// Nodes are placed in definition order. A candidate is rejected while it
/// sits within `2 * radius` of a segment joining two placed nodes, or while
/// one of its own segments to a placed node passes that close to another.
/// Running out of attempts for one node discards the whole layout and starts
/// over. Coordinates are random on every run.
///
/// The configured radius is an upper bound: on small canvases nodes shrink
/// so that the whole graph still fits around its segments.
#[derive(Clone, Debug)]
pub struct LayoutGenerator {
	width: f64,
	height: f64,
	margin: f64,
	radius: f64,
	max_attempts: usize,
	max_restarts: usize,
}

impl LayoutGenerator {
	pub fn new(config: &VisualizerConfig, width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			margin: config.layout_margin,
			radius: config.node_radius,
			max_attempts: config.max_layout_attempts,
			max_restarts: config.max_layout_restarts,
		}
	}

	/// Radius used for a layout of `count` nodes.
	pub fn radius_for(&self, count: usize) -> f64 {
		let area = (self.width - 2.0 * self.margin).max(0.0)
			* (self.height - 2.0 * self.margin).max(0.0);
		let fitted = FIT_FACTOR * (area / count.max(1) as f64).sqrt();
		self.radius.min(fitted)
	}

	pub fn clearance_for(&self, count: usize) -> f64 {
		self.radius_for(count) * 2.0
	}

	pub fn generate<R: Rng + ?Sized>(
		&self,
		graph: &GraphDefinition,
		rng: &mut R,
	) -> Result<Vec<Node>, GraphError> {
		let (x_max, y_max) = (self.width - self.margin, self.height - self.margin);
		if !(x_max > self.margin && y_max > self.margin) {
			return Err(GraphError::InvalidConfig(format!(
				"a {}x{} area leaves no room inside a {} margin",
				self.width, self.height, self.margin
			)));
		}

		let radius = self.radius_for(graph.len());
		info!("generating vertices with radius {radius:.1}...");
		for restart in 0..=self.max_restarts {
			if let Some(nodes) = self.try_place_all(graph, rng, radius, x_max, y_max) {
				debug_assert!(satisfies_clearance(&nodes, radius * 2.0));
				debug!("layout placed {} nodes after {restart} restarts", nodes.len());
				return Ok(nodes);
			}
			warn!("layout attempt {} exhausted, restarting from scratch", restart + 1);
		}
		Err(GraphError::LayoutExhausted {
			attempts: self.max_attempts,
			restarts: self.max_restarts,
		})
	}

	fn try_place_all<R: Rng + ?Sized>(
		&self,
		graph: &GraphDefinition,
		rng: &mut R,
		radius: f64,
		x_max: f64,
		y_max: f64,
	) -> Option<Vec<Node>> {
		let mut placed: Vec<Point> = Vec::with_capacity(graph.len());
		for _ in graph.labels() {
			let candidate = (0..self.max_attempts)
				.map(|_| {
					Point::new(
						rng.gen_range(self.margin..x_max).floor(),
						rng.gen_range(self.margin..y_max).floor(),
					)
				})
				.find(|&c| is_clear(c, &placed, radius * 2.0))?;
			placed.push(candidate);
		}
		Some(
			graph
				.labels()
				.zip(placed)
				.map(|(label, position)| Node {
					label: label.to_owned(),
					position,
					radius,
				})
				.collect(),
		)
	}

}

fn is_clear(candidate: Point, placed: &[Point], clearance: f64) -> bool {
	for (i, &a) in placed.iter().enumerate() {
		if placed.len() == 1 && candidate.distance(a) < clearance {
			return false;
		}
		for (j, &b) in placed.iter().enumerate() {
			if i == j {
				continue;
			}
			if i < j && distance_to_segment(candidate, a, b) < clearance {
				return false;
			}
			// `b` against the segment the candidate would form with `a`.
			if distance_to_segment(b, candidate, a) < clearance {
				return false;
			}
		}
	}
	true
}

/// Whether every node keeps `clearance` from every segment joining two
/// other nodes.
pub fn satisfies_clearance(nodes: &[Node], clearance: f64) -> bool {
	nodes.iter().enumerate().all(|(k, node)| {
		nodes.iter().enumerate().all(|(i, a)| {
			nodes.iter().enumerate().skip(i + 1).all(|(j, b)| {
				k == i
					|| k == j || distance_to_segment(node.position, a.position, b.position) >= clearance
			})
		})
	})
}
