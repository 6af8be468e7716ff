use leptos::prelude::*;

use crate::components::pathfinder::{PathfinderCanvas, Scene};

/// Graph and settings shown on the home page.
const DEFAULT_SCENE: &str = include_str!("../../assets/scene.json");

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let scene = Scene::from_json(DEFAULT_SCENE);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			{scene
				.map(|scene| {
					let subtitle = format!(
						"From {} to {}. Click to lay out a new graph.",
						scene.config.source_label,
						scene.config.target_label,
					);
					let scene = Signal::derive(move || scene.clone());

					view! {
						<div class="fullscreen-graph">
							<PathfinderCanvas scene=scene fullscreen=true />
							<div class="graph-overlay">
								<h1>"Dijkstra's Shortest Path"</h1>
								<p class="subtitle">{subtitle}</p>
							</div>
						</div>
					}
				})}
		</ErrorBoundary>
	}
}
