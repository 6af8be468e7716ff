//! Dijkstra's shortest path, animated on a canvas.
//!
//! Everything except `component` and the canvas half of `render` is plain
//! data and logic that runs and tests without a browser.

mod component;
mod config;
mod error;
mod geometry;
mod graph;
mod layout;
mod path;
mod render;
mod search;
mod state;
mod types;

pub use component::PathfinderCanvas;
pub use config::Scene;
