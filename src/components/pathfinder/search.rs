use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info};

use super::error::GraphError;
use super::graph::Network;

/// Best known distance to a node and the node it was reached from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceEntry {
	pub distance: u64,
	/// `None` only for the source.
	pub previous: Option<String>,
}

pub type DistanceRecord = BTreeMap<String, DistanceEntry>;

/// The action the next [`SearchMachine::step`] performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
	SelectSource,
	ExploreNeighbor,
	FinalizeNode,
	SelectNext,
	Complete,
}

/// What a single step did. Choosing the next node to evaluate is not a step
/// of its own: it happens at the start of the step that relaxes its first
/// neighbor, or finalizes it when nothing is left to relax.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchStep {
	Relaxed {
		from: String,
		to: String,
		distance: u64,
		improved: bool,
	},
	Finalized {
		label: String,
	},
	Idle,
}

#[derive(Clone, Debug, Default)]
struct Cursor {
	target: String,
	distance: u64,
	branch: Vec<String>,
	index: usize,
}

/// Dijkstra's algorithm advanced one micro-step at a time.
///
/// Each call to [`step`](Self::step) performs exactly one neighbor
/// relaxation or one finalization so every comparison can be animated on its
/// own frame.
#[derive(Clone, Debug)]
pub struct SearchMachine {
	source: String,
	state: SearchState,
	record: DistanceRecord,
	visited: Vec<String>,
	unvisited: BTreeSet<String>,
	cursor: Cursor,
	highlights: Vec<usize>,
}

impl SearchMachine {
	pub fn new(network: &Network, source: &str) -> Result<Self, GraphError> {
		if !network.graph().contains(source) {
			return Err(GraphError::UnknownLabel(source.to_owned()));
		}
		Ok(Self {
			source: source.to_owned(),
			state: SearchState::SelectSource,
			record: DistanceRecord::new(),
			visited: Vec::new(),
			unvisited: network.graph().labels().map(str::to_owned).collect(),
			cursor: Cursor::default(),
			highlights: Vec::new(),
		})
	}

	pub fn is_complete(&self) -> bool {
		self.state == SearchState::Complete
	}

	pub fn record(&self) -> &DistanceRecord {
		&self.record
	}

	pub fn visited(&self) -> &[String] {
		&self.visited
	}

	/// Node whose branch is being evaluated, if any.
	pub fn current_target(&self) -> Option<&str> {
		match self.state {
			SearchState::SelectSource | SearchState::Complete => None,
			_ => Some(self.cursor.target.as_str()),
		}
	}

	/// Edges traversed so far; emptied once the search completes.
	pub fn highlights(&self) -> &[usize] {
		&self.highlights
	}

	pub fn step(&mut self, network: &Network) -> Result<SearchStep, GraphError> {
		match self.state {
			SearchState::SelectSource => self.select_source(network)?,
			SearchState::SelectNext => self.select_next(network)?,
			_ => {}
		}
		let step = match self.state {
			SearchState::ExploreNeighbor => self.explore_neighbor(network)?,
			SearchState::FinalizeNode => self.finalize_node(),
			SearchState::SelectSource | SearchState::SelectNext | SearchState::Complete => {
				SearchStep::Idle
			}
		};
		debug!("{step:?}");
		Ok(step)
	}

	fn select_source(&mut self, network: &Network) -> Result<(), GraphError> {
		let branch = network.neighbors(&self.source)?.to_vec();
		self.record.insert(
			self.source.clone(),
			DistanceEntry {
				distance: 0,
				previous: None,
			},
		);
		self.select(self.source.clone(), 0, branch);
		Ok(())
	}

	fn select_next(&mut self, network: &Network) -> Result<(), GraphError> {
		// BTreeMap order makes ties resolve to the smallest label.
		let next = self
			.record
			.iter()
			.filter(|(label, _)| self.unvisited.contains(*label))
			.min_by_key(|(_, entry)| entry.distance)
			.map(|(label, entry)| (label.clone(), entry.distance));
		let Some((target, distance)) = next else {
			return Err(GraphError::GraphDisconnected {
				unreachable: self.unvisited.iter().cloned().collect(),
			});
		};

		let branch = network
			.neighbors(&target)?
			.iter()
			.filter(|n| self.unvisited.contains(*n))
			.cloned()
			.collect();
		self.select(target, distance, branch);
		Ok(())
	}

	fn select(&mut self, target: String, distance: u64, branch: Vec<String>) {
		debug!("evaluating {target} at {distance}");
		self.state = if branch.is_empty() {
			SearchState::FinalizeNode
		} else {
			SearchState::ExploreNeighbor
		};
		self.cursor = Cursor {
			target,
			distance,
			branch,
			index: 0,
		};
	}

	fn explore_neighbor(&mut self, network: &Network) -> Result<SearchStep, GraphError> {
		let from = self.cursor.target.clone();
		let to = self.cursor.branch[self.cursor.index].clone();
		self.cursor.index += 1;

		let edge = network.edge_between(&from, &to)?;
		let distance = self.cursor.distance + edge.weight;
		let improved = self
			.record
			.get(&to)
			.is_none_or(|entry| distance < entry.distance);
		if improved {
			self.record.insert(
				to.clone(),
				DistanceEntry {
					distance,
					previous: Some(from.clone()),
				},
			);
		}
		self.highlights.push(edge.id);

		if self.cursor.index >= self.cursor.branch.len() {
			self.state = SearchState::FinalizeNode;
		}
		Ok(SearchStep::Relaxed {
			from,
			to,
			distance,
			improved,
		})
	}

	fn finalize_node(&mut self) -> SearchStep {
		self.cursor.index = 0;
		let label = self.cursor.target.clone();
		self.unvisited.remove(&label);
		self.visited.push(label.clone());

		if self.unvisited.is_empty() {
			self.highlights.clear();
			self.state = SearchState::Complete;
			info!("search complete: {:?}", self.record);
		} else {
			self.state = SearchState::SelectNext;
		}
		SearchStep::Finalized { label }
	}
}

#[cfg(test)]
mod tests {
	use std::cmp::Reverse;
	use std::collections::{BinaryHeap, HashMap};

	use proptest::prelude::*;

	use super::*;
	use crate::components::pathfinder::graph::test_support::{arb_network, network};
	use crate::components::pathfinder::types::GraphDefinition;

	fn run(machine: &mut SearchMachine, net: &Network) -> Result<Vec<SearchStep>, GraphError> {
		let mut steps = Vec::new();
		while !machine.is_complete() {
			steps.push(machine.step(net)?);
		}
		Ok(steps)
	}

	fn triangle(coords: &[(&str, f64, f64)]) -> Network {
		let graph = GraphDefinition::new()
			.with_node("S", ["A", "B"])
			.with_node("A", ["S", "B"])
			.with_node("B", ["A", "S"]);
		network(graph, coords)
	}

	fn finalized(label: &str) -> SearchStep {
		SearchStep::Finalized {
			label: label.into(),
		}
	}

	fn relaxed(from: &str, to: &str, distance: u64, improved: bool) -> SearchStep {
		SearchStep::Relaxed {
			from: from.into(),
			to: to.into(),
			distance,
			improved,
		}
	}

	/// Batch Dijkstra over the same edges.
	fn reference_distances(net: &Network, source: &str) -> HashMap<String, u64> {
		let mut dist = HashMap::from([(source.to_owned(), 0)]);
		let mut heap = BinaryHeap::from([Reverse((0u64, source.to_owned()))]);
		while let Some(Reverse((d, label))) = heap.pop() {
			if dist.get(&label).is_some_and(|&best| d > best) {
				continue;
			}
			for neighbor in net.neighbors(&label).unwrap() {
				let nd = d + net.edge_between(&label, neighbor).unwrap().weight;
				if dist.get(neighbor).is_none_or(|&best| nd < best) {
					dist.insert(neighbor.clone(), nd);
					heap.push(Reverse((nd, neighbor.clone())));
				}
			}
		}
		dist
	}

	#[test]
	fn triangle_prefers_the_direct_edge() {
		let net = triangle(&[("S", 0.0, 0.0), ("A", 10.0, 0.0), ("B", 0.0, 10.0)]);
		let mut machine = SearchMachine::new(&net, "S").unwrap();
		let steps = run(&mut machine, &net).unwrap();

		assert_eq!(
			steps,
			[
				relaxed("S", "A", 10, true),
				relaxed("S", "B", 10, true),
				finalized("S"),
				// A and B tie at 10; the smaller label wins
				relaxed("A", "B", 24, false),
				finalized("A"),
				finalized("B"),
			]
		);
		let b = &machine.record()["B"];
		assert_eq!(b.distance, 10);
		assert_eq!(b.previous.as_deref(), Some("S"));
		assert_eq!(machine.visited(), ["S", "A", "B"]);
	}

	#[test]
	fn truncated_weights_can_favor_the_detour() {
		// |SA| = |AB| = 10.77 -> 10, |SB| = 21.54 -> 21
		let net = triangle(&[("S", 0.0, 0.0), ("A", 10.0, 4.0), ("B", 20.0, 8.0)]);
		let mut machine = SearchMachine::new(&net, "S").unwrap();
		run(&mut machine, &net).unwrap();

		let b = &machine.record()["B"];
		assert_eq!(b.distance, 20);
		assert_eq!(b.previous.as_deref(), Some("A"));
	}

	#[test]
	fn disconnected_graph_fails_on_selection() {
		let graph = GraphDefinition::new()
			.with_node("S", ["A"])
			.with_node("A", ["S"])
			.with_node("X", ["Y"])
			.with_node("Y", ["X"]);
		let net = network(
			graph,
			&[("S", 0.0, 0.0), ("A", 10.0, 0.0), ("X", 0.0, 50.0), ("Y", 10.0, 50.0)],
		);
		let mut machine = SearchMachine::new(&net, "S").unwrap();
		assert_eq!(
			run(&mut machine, &net),
			Err(GraphError::GraphDisconnected {
				unreachable: vec!["X".into(), "Y".into()]
			})
		);
		assert_eq!(machine.state, SearchState::SelectNext);
		assert_eq!(machine.visited(), ["S", "A"]);
	}

	#[test]
	fn lone_source_finalizes_without_relaxing() {
		let net = network(GraphDefinition::new().with_node("S", Vec::<String>::new()), &[("S", 5.0, 5.0)]);
		let mut machine = SearchMachine::new(&net, "S").unwrap();
		assert_eq!(machine.current_target(), None);
		assert_eq!(machine.step(&net), Ok(finalized("S")));
		assert!(machine.is_complete());
		assert_eq!(machine.step(&net), Ok(SearchStep::Idle));
		assert_eq!(machine.current_target(), None);
	}

	#[test]
	fn selection_shares_a_step_with_the_first_relaxation() {
		let net = triangle(&[("S", 0.0, 0.0), ("A", 10.0, 0.0), ("B", 0.0, 10.0)]);
		let mut machine = SearchMachine::new(&net, "S").unwrap();
		assert_eq!(machine.step(&net), Ok(relaxed("S", "A", 10, true)));
		assert_eq!(machine.current_target(), Some("S"));
		assert_eq!(machine.highlights(), [0]);

		machine.step(&net).unwrap();
		machine.step(&net).unwrap();
		assert_eq!(machine.state, SearchState::SelectNext);
		assert_eq!(machine.step(&net), Ok(relaxed("A", "B", 24, false)));
		assert_eq!(machine.current_target(), Some("A"));
	}

	#[test]
	fn unknown_source_is_rejected() {
		let net = triangle(&[("S", 0.0, 0.0), ("A", 10.0, 0.0), ("B", 0.0, 10.0)]);
		assert!(matches!(
			SearchMachine::new(&net, "Q"),
			Err(GraphError::UnknownLabel(label)) if label == "Q"
		));
	}

	#[test]
	fn highlights_track_relaxations_and_clear_on_completion() {
		let net = triangle(&[("S", 0.0, 0.0), ("A", 10.0, 0.0), ("B", 0.0, 10.0)]);
		let mut machine = SearchMachine::new(&net, "S").unwrap();
		for _ in 0..3 {
			machine.step(&net).unwrap();
		}
		assert_eq!(machine.highlights(), [0, 1]);
		run(&mut machine, &net).unwrap();
		assert!(machine.highlights().is_empty());
	}

	proptest! {
		#[test]
		fn matches_batch_dijkstra(net in arb_network()) {
			let mut machine = SearchMachine::new(&net, "N0").unwrap();
			run(&mut machine, &net).unwrap();

			let expected = reference_distances(&net, "N0");
			prop_assert_eq!(machine.record().len(), expected.len());
			for (label, entry) in machine.record() {
				prop_assert_eq!(Some(&entry.distance), expected.get(label));
			}
		}

		#[test]
		fn records_only_improve_and_partition_holds(net in arb_network()) {
			let total = net.nodes().len();
			let mut machine = SearchMachine::new(&net, "N0").unwrap();
			let mut before = machine.record().clone();
			while !machine.is_complete() {
				machine.step(&net).unwrap();
				for (label, old) in &before {
					prop_assert!(machine.record()[label].distance <= old.distance);
				}
				prop_assert_eq!(machine.visited.len() + machine.unvisited.len(), total);
				prop_assert!(machine.visited.iter().all(|v| !machine.unvisited.contains(v)));
				before = machine.record().clone();
			}
		}
	}
}
