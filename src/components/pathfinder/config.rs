use serde::Deserialize;

use super::error::GraphError;
use super::types::GraphDefinition;

/// Placement attempts for a single node before the layout restarts.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1000;
pub const MAX_LAYOUT_RESTARTS: usize = 100;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisualizerConfig {
	/// Node the search starts from.
	pub source_label: String,
	/// Node the shortest path is reconstructed to.
	pub target_label: String,
	/// Largest node radius; small canvases draw smaller nodes.
	pub node_radius: f64,
	/// Inset of the placement rectangle from every canvas border.
	pub layout_margin: f64,
	/// Simulation ticks per second.
	pub tick_rate: f64,
	pub max_layout_attempts: usize,
	pub max_layout_restarts: usize,
}

impl Default for VisualizerConfig {
	fn default() -> Self {
		Self {
			source_label: "S".into(),
			target_label: "E".into(),
			node_radius: 15.0,
			layout_margin: 50.0,
			tick_rate: 12.0,
			max_layout_attempts: MAX_PLACEMENT_ATTEMPTS,
			max_layout_restarts: MAX_LAYOUT_RESTARTS,
		}
	}
}

impl VisualizerConfig {
	pub fn validate(&self, graph: &GraphDefinition) -> Result<(), GraphError> {
		let invalid = |msg: String| Err(GraphError::InvalidConfig(msg));
		if !(self.node_radius > 0.0) {
			return invalid(format!("node radius must be positive, got {}", self.node_radius));
		}
		if !(self.layout_margin >= 0.0) {
			return invalid(format!("layout margin must not be negative, got {}", self.layout_margin));
		}
		if !(self.tick_rate > 0.0) {
			return invalid(format!("tick rate must be positive, got {}", self.tick_rate));
		}
		if self.max_layout_attempts == 0 {
			return invalid("at least one placement attempt is required".into());
		}
		for label in [&self.source_label, &self.target_label] {
			if !graph.contains(label) {
				return invalid(format!("`{label}` is not a node of the graph"));
			}
		}
		Ok(())
	}
}

/// A graph definition together with how to animate it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Scene {
	#[serde(default)]
	pub config: VisualizerConfig,
	pub graph: GraphDefinition,
}

impl Scene {
	/// Parses and validates a scene.
	pub fn from_json(json: &str) -> Result<Self, GraphError> {
		let scene: Scene = serde_json::from_str(json)
			.map_err(|e| GraphError::InvalidConfig(format!("scene: {e}")))?;
		scene.graph.validate()?;
		scene.config.validate(&scene.graph)?;
		Ok(scene)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bundled_scene_parses() {
		let scene = Scene::from_json(include_str!("../../../assets/scene.json")).unwrap();
		assert_eq!(scene.graph.len(), 11);
		assert_eq!(scene.graph.labels().next(), Some("S"));
		assert_eq!(scene.config.target_label, "E");
		assert_eq!(scene.config.max_layout_attempts, MAX_PLACEMENT_ATTEMPTS);
	}

	#[test]
	fn missing_config_uses_defaults() {
		let scene = Scene::from_json(r#"{"graph": {"S": ["E"], "E": ["S"]}}"#).unwrap();
		assert_eq!(scene.config, VisualizerConfig::default());
	}

	#[test]
	fn rejects_unknown_endpoints_and_bad_numbers() {
		let graph = GraphDefinition::new().with_node("S", ["E"]).with_node("E", ["S"]);
		let config = VisualizerConfig {
			target_label: "Q".into(),
			..Default::default()
		};
		assert!(matches!(config.validate(&graph), Err(GraphError::InvalidConfig(_))));

		let config = VisualizerConfig {
			tick_rate: 0.0,
			..Default::default()
		};
		assert!(matches!(config.validate(&graph), Err(GraphError::InvalidConfig(_))));
	}

	#[test]
	fn malformed_json_is_reported() {
		assert!(matches!(
			Scene::from_json(r#"{"graph": ["S"]}"#),
			Err(GraphError::InvalidConfig(_))
		));
		assert!(matches!(
			Scene::from_json(r#"{"config": {"sourceLabel": "S", "targetLabel": "A"}, "graph": {"S": ["A"], "A": ["B"]}}"#),
			Err(GraphError::MalformedGraph(_))
		));
	}
}
