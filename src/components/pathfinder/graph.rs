use std::collections::{HashMap, HashSet};

use log::info;

use super::error::GraphError;
use super::geometry::Point;
use super::types::GraphDefinition;

/// A placed, labeled node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub label: String,
	pub position: Point,
	pub radius: f64,
}

/// An undirected edge with its layout-time geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	/// Position in the edge list; highlight sequences refer to edges by id.
	pub id: usize,
	pub from: String,
	pub to: String,
	pub start: Point,
	pub end: Point,
	/// Euclidean length truncated to whole pixels.
	pub weight: u64,
	pub midpoint: Point,
}

fn pair_key(a: &str, b: &str) -> (String, String) {
	if a <= b {
		(a.to_owned(), b.to_owned())
	} else {
		(b.to_owned(), a.to_owned())
	}
}

/// Materializes one edge per unordered adjacency pair.
///
/// Labels are walked in definition order; a pair is emitted by whichever of
/// its endpoints is reached first.
pub fn build_edges(graph: &GraphDefinition, nodes: &[Node]) -> Result<Vec<Edge>, GraphError> {
	let positions: HashMap<&str, Point> = nodes
		.iter()
		.map(|node| (node.label.as_str(), node.position))
		.collect();
	let locate = |label: &str| {
		positions.get(label).copied().ok_or_else(|| {
			GraphError::MalformedGraph(format!("node `{label}` has no position"))
		})
	};

	let mut linked = HashSet::new();
	let mut edges = Vec::new();
	for (label, neighbors) in graph.iter() {
		let start = locate(label)?;
		for neighbor in neighbors {
			let key = pair_key(label, neighbor);
			if !linked.insert(key) {
				continue;
			}
			let end = locate(neighbor)?;
			edges.push(Edge {
				id: edges.len(),
				from: label.to_owned(),
				to: neighbor.clone(),
				start,
				end,
				weight: start.distance(end).floor() as u64,
				midpoint: start.midpoint(end),
			});
		}
	}
	Ok(edges)
}

/// A validated graph with its layout and edge list.
#[derive(Clone, Debug)]
pub struct Network {
	graph: GraphDefinition,
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	edge_index: HashMap<(String, String), usize>,
}

impl Network {
	pub fn new(graph: GraphDefinition, nodes: Vec<Node>) -> Result<Self, GraphError> {
		graph.validate()?;
		info!("linking network..");
		let edges = build_edges(&graph, &nodes)?;
		let edge_index = edges
			.iter()
			.map(|edge| (pair_key(&edge.from, &edge.to), edge.id))
			.collect();
		info!("linked {} nodes with {} edges", nodes.len(), edges.len());
		Ok(Self {
			graph,
			nodes,
			edges,
			edge_index,
		})
	}

	pub fn graph(&self) -> &GraphDefinition {
		&self.graph
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn neighbors(&self, label: &str) -> Result<&[String], GraphError> {
		self.graph
			.neighbors(label)
			.ok_or_else(|| GraphError::UnknownLabel(label.to_owned()))
	}

	/// The edge joining `a` and `b` in either orientation.
	pub fn edge_between(&self, a: &str, b: &str) -> Result<&Edge, GraphError> {
		self.edge_index
			.get(&pair_key(a, b))
			.map(|&id| &self.edges[id])
			.ok_or_else(|| GraphError::MissingEdge {
				from: a.to_owned(),
				to: b.to_owned(),
			})
	}
}
