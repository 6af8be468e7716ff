use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

use super::error::GraphError;

/// Adjacency definition: node label to ordered neighbor labels.
///
/// Iteration follows definition order, which decides node placement order
/// and the orientation of each materialized edge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphDefinition {
	entries: Vec<(String, Vec<String>)>,
	index: HashMap<String, usize>,
}

impl GraphDefinition {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a node and its neighbor list.
	pub fn with_node<L, N>(mut self, label: L, neighbors: N) -> Self
	where
		L: Into<String>,
		N: IntoIterator,
		N::Item: Into<String>,
	{
		self.push(label.into(), neighbors.into_iter().map(Into::into).collect());
		self
	}

	fn push(&mut self, label: String, neighbors: Vec<String>) {
		self.index.entry(label.clone()).or_insert(self.entries.len());
		self.entries.push((label, neighbors));
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn contains(&self, label: &str) -> bool {
		self.index.contains_key(label)
	}

	pub fn labels(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(label, _)| label.as_str())
	}

	pub fn neighbors(&self, label: &str) -> Option<&[String]> {
		self.index
			.get(label)
			.map(|&i| self.entries[i].1.as_slice())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.entries
			.iter()
			.map(|(label, neighbors)| (label.as_str(), neighbors.as_slice()))
	}

	/// Rejects definitions that would leave geometry undefined or produce
	/// more than one edge for a pair.
	pub fn validate(&self) -> Result<(), GraphError> {
		if self.index.len() != self.entries.len() {
			let mut seen = HashSet::new();
			if let Some((label, _)) = self.entries.iter().find(|(l, _)| !seen.insert(l)) {
				return Err(GraphError::MalformedGraph(format!(
					"node `{label}` is defined more than once"
				)));
			}
		}

		for (label, neighbors) in &self.entries {
			let mut listed = HashSet::new();
			for neighbor in neighbors {
				if neighbor == label {
					return Err(GraphError::MalformedGraph(format!(
						"node `{label}` lists itself as a neighbor"
					)));
				}
				if !self.contains(neighbor) {
					return Err(GraphError::MalformedGraph(format!(
						"node `{label}` references undefined node `{neighbor}`"
					)));
				}
				if !listed.insert(neighbor) {
					return Err(GraphError::MalformedGraph(format!(
						"node `{label}` lists `{neighbor}` more than once"
					)));
				}
			}
		}
		Ok(())
	}
}

// A derived impl would go through HashMap and lose document order.
impl<'de> Deserialize<'de> for GraphDefinition {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		struct AdjacencyVisitor;

		impl<'de> Visitor<'de> for AdjacencyVisitor {
			type Value = GraphDefinition;

			fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
				f.write_str("a map from node label to a list of neighbor labels")
			}

			fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
			where
				A: MapAccess<'de>,
			{
				let mut graph = GraphDefinition::new();
				while let Some((label, neighbors)) = map.next_entry::<String, Vec<String>>()? {
					graph = graph.with_node(label, neighbors);
				}
				Ok(graph)
			}
		}

		deserializer.deserialize_map(AdjacencyVisitor)
	}
}
