use log::{debug, error, info};
use rand::Rng;

use super::config::{Scene, VisualizerConfig};
use super::error::GraphError;
use super::graph::{Edge, Network, Node};
use super::layout::LayoutGenerator;
use super::path::PathReconstructor;
use super::search::{SearchMachine, SearchStep};

/// Where the animation currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// One more node and one more edge become visible per tick.
	Reveal,
	Search,
	Reconstruct,
	Finished,
	Failed,
}

/// What the renderer needs to draw one frame.
#[derive(Clone, Debug)]
pub struct Frame<'a> {
	pub width: f64,
	pub height: f64,
	pub nodes: &'a [Node],
	pub edges: &'a [Edge],
	/// Node whose neighbors the search is evaluating.
	pub active: Option<&'a str>,
	pub search_highlights: &'a [usize],
	pub path_highlights: &'a [usize],
	pub status: String,
}

/// Paces simulation ticks against animation frame timestamps.
#[derive(Clone, Debug)]
pub struct TickClock {
	interval_ms: f64,
	last: Option<f64>,
}

impl TickClock {
	pub fn new(tick_rate: f64) -> Self {
		Self {
			interval_ms: 1000.0 / tick_rate,
			last: None,
		}
	}

	/// Whether a tick is due at `now_ms`. At most one tick per frame; a late
	/// frame does not queue up missed ticks.
	pub fn is_due(&mut self, now_ms: f64) -> bool {
		match self.last {
			Some(last) if now_ms - last < self.interval_ms => false,
			_ => {
				self.last = Some(now_ms);
				true
			}
		}
	}
}

/// Everything one run of the visualization owns.
pub struct PathfinderState {
	pub config: VisualizerConfig,
	pub network: Network,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub clock: TickClock,
	revealed_nodes: usize,
	revealed_edges: usize,
	search: SearchMachine,
	last_step: Option<SearchStep>,
	path: Option<PathReconstructor>,
	failure: Option<GraphError>,
}

impl PathfinderState {
	/// Lays the scene out on a `width` x `height` canvas.
	pub fn new<R: Rng + ?Sized>(
		scene: &Scene,
		width: f64,
		height: f64,
		rng: &mut R,
	) -> Result<Self, GraphError> {
		scene.config.validate(&scene.graph)?;
		let nodes = LayoutGenerator::new(&scene.config, width, height).generate(&scene.graph, rng)?;
		let network = Network::new(scene.graph.clone(), nodes)?;
		Self::from_network(scene.config.clone(), network, width, height)
	}

	pub fn from_network(
		config: VisualizerConfig,
		network: Network,
		width: f64,
		height: f64,
	) -> Result<Self, GraphError> {
		let search = SearchMachine::new(&network, &config.source_label)?;
		if !network.graph().contains(&config.target_label) {
			return Err(GraphError::UnknownLabel(config.target_label));
		}
		info!("rendering..");
		Ok(Self {
			clock: TickClock::new(config.tick_rate),
			config,
			network,
			width,
			height,
			animation_running: true,
			revealed_nodes: 0,
			revealed_edges: 0,
			search,
			last_step: None,
			path: None,
			failure: None,
		})
	}

	pub fn phase(&self) -> Phase {
		if self.failure.is_some() {
			Phase::Failed
		} else if self.revealed_nodes < self.network.nodes().len()
			|| self.revealed_edges < self.network.edges().len()
		{
			Phase::Reveal
		} else if !self.search.is_complete() {
			Phase::Search
		} else if self.path.as_ref().is_none_or(|p| !p.is_complete()) {
			Phase::Reconstruct
		} else {
			Phase::Finished
		}
	}

	/// Runs one tick and returns the frame to draw. A failure is kept, stops
	/// the animation and is returned again on every later tick.
	pub fn advance_one_tick(&mut self) -> Result<Frame<'_>, GraphError> {
		if let Some(err) = &self.failure {
			return Err(err.clone());
		}
		if let Err(err) = self.tick() {
			error!("{err}");
			self.animation_running = false;
			self.failure = Some(err.clone());
			return Err(err);
		}
		Ok(self.frame())
	}

	fn tick(&mut self) -> Result<(), GraphError> {
		match self.phase() {
			Phase::Reveal => {
				self.revealed_nodes = (self.revealed_nodes + 1).min(self.network.nodes().len());
				self.revealed_edges = (self.revealed_edges + 1).min(self.network.edges().len());
			}
			Phase::Search => {
				self.last_step = Some(self.search.step(&self.network)?);
			}
			Phase::Reconstruct => {
				if self.path.is_none() {
					self.path = Some(PathReconstructor::new(
						self.search.record(),
						&self.config.source_label,
						&self.config.target_label,
					)?);
				}
				if let Some(path) = &mut self.path {
					if let Some(hop) = path.step(&self.network, self.search.record())? {
						debug!("path {} -> {} via edge {}", hop.from, hop.to, hop.edge);
					}
				}
			}
			Phase::Finished | Phase::Failed => {}
		}
		Ok(())
	}

	/// Snapshot of the current state without advancing it.
	pub fn frame(&self) -> Frame<'_> {
		let phase = self.phase();
		// only the search marks a node; the path walk is shown by its edges
		let active = match phase {
			Phase::Search => self.search.current_target(),
			_ => None,
		};
		Frame {
			width: self.width,
			height: self.height,
			nodes: &self.network.nodes()[..self.revealed_nodes],
			edges: &self.network.edges()[..self.revealed_edges],
			active,
			search_highlights: self.search.highlights(),
			path_highlights: self.path.as_ref().map_or(&[][..], |p| p.highlights()),
			status: self.status(phase),
		}
	}

	fn status(&self, phase: Phase) -> String {
		let (source, target) = (&self.config.source_label, &self.config.target_label);
		match phase {
			Phase::Reveal => "drawing graph".to_owned(),
			Phase::Search => {
				let visited = self.search.visited().len();
				let total = self.network.nodes().len();
				match &self.last_step {
					Some(SearchStep::Relaxed {
						from,
						to,
						distance,
						improved,
					}) => {
						let verdict = if *improved { "recorded" } else { "not shorter" };
						format!("{from} → {to}: {distance} {verdict}")
					}
					Some(SearchStep::Finalized { label }) => {
						format!("{label} visited ({visited} of {total})")
					}
					Some(SearchStep::Idle) | None => format!("searching from {source}"),
				}
			}
			Phase::Reconstruct => match &self.path {
				Some(path) => match path.previous() {
					Some(previous) => format!(
						"tracing path {target} → {source}: {previous} → {}",
						path.current()
					),
					None => format!("tracing path {target} → {source}: at {}", path.current()),
				},
				None => format!("tracing path {target} → {source}"),
			},
			Phase::Finished => match self.search.record().get(target) {
				Some(entry) => format!("shortest path {source} → {target}: {}", entry.distance),
				None => format!("{target} was not reached"),
			},
			Phase::Failed => match &self.failure {
				Some(err) => format!("error: {err}"),
				None => String::new(),
			},
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
