use log::info;

use super::error::GraphError;
use super::graph::Network;
use super::search::DistanceRecord;

/// One edge walked back along the predecessor chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathHop {
	pub from: String,
	pub to: String,
	pub edge: usize,
}

/// Walks predecessors from the target back to the source, one hop per step.
#[derive(Clone, Debug)]
pub struct PathReconstructor {
	source: String,
	current: String,
	previous: Option<String>,
	hops: usize,
	max_hops: usize,
	highlights: Vec<usize>,
}

impl PathReconstructor {
	pub fn new(record: &DistanceRecord, source: &str, target: &str) -> Result<Self, GraphError> {
		if !record.contains_key(target) {
			return Err(GraphError::UnreachableTarget(target.to_owned()));
		}
		Ok(Self {
			source: source.to_owned(),
			current: target.to_owned(),
			previous: None,
			hops: 0,
			// a chain through every recorded node
			max_hops: record.len().saturating_sub(1),
			highlights: Vec::new(),
		})
	}

	pub fn is_complete(&self) -> bool {
		self.current == self.source
	}

	pub fn current(&self) -> &str {
		&self.current
	}

	pub fn previous(&self) -> Option<&str> {
		self.previous.as_deref()
	}

	/// Path edges walked so far, target end first.
	pub fn highlights(&self) -> &[usize] {
		&self.highlights
	}

	/// Moves one node closer to the source; `None` once it is reached.
	pub fn step(
		&mut self,
		network: &Network,
		record: &DistanceRecord,
	) -> Result<Option<PathHop>, GraphError> {
		if self.is_complete() {
			return Ok(None);
		}
		let broken = || GraphError::BrokenPath(self.current.clone());
		let next = record
			.get(&self.current)
			.and_then(|entry| entry.previous.clone())
			.ok_or_else(broken)?;
		if self.hops >= self.max_hops {
			return Err(broken());
		}

		let edge = network.edge_between(&self.current, &next)?.id;
		let from = std::mem::replace(&mut self.current, next);
		self.previous = Some(from.clone());
		self.hops += 1;
		self.highlights.push(edge);

		if self.is_complete() {
			info!("path complete after {} hops", self.hops);
		}
		Ok(Some(PathHop {
			from,
			to: self.current.clone(),
			edge,
		}))
	}
}
