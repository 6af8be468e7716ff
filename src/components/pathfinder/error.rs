use thiserror::Error;

/// Failures of the graph model, layout, search and path reconstruction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
	/// The adjacency definition references an undefined node or would
	/// produce a duplicate pair.
	#[error("malformed graph: {0}")]
	MalformedGraph(String),

	/// Every restart of the layout ran out of placement attempts.
	#[error("layout exhausted: {restarts} restarts of {attempts} placement attempts each")]
	LayoutExhausted { attempts: usize, restarts: usize },

	/// No unvisited node carries a recorded distance while some remain.
	#[error("graph is disconnected from the source: {unreachable:?} cannot be reached")]
	GraphDisconnected { unreachable: Vec<String> },

	/// Path reconstruction requested for a target without a record.
	#[error("target `{0}` was never reached from the source")]
	UnreachableTarget(String),

	#[error("no edge connects `{from}` and `{to}`")]
	MissingEdge { from: String, to: String },

	#[error("unknown node label `{0}`")]
	UnknownLabel(String),

	/// The predecessor chain does not lead back to the source.
	#[error("predecessor chain breaks at `{0}`")]
	BrokenPath(String),

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}
