//! Simplified spring embedder with a fixed iteration budget.

use super::geometry::{self, Vec2};
use super::types::{Canvas, Edge, Node, Point, resolve_edges};
use super::{Result, apply_positions, circular};

/// Tuning of the spring embedder.
#[derive(Clone, Debug)]
pub struct ForceParameters {
	/// Simulation steps.
	pub iterations: usize,
	/// Ideal link length.
	pub ideal_length: f64,
	/// Spring stiffness.
	pub spring: f64,
	/// Pairwise charge; negative values repel.
	pub charge: f64,
	/// Pull toward the canvas center.
	pub gravity: f64,
	/// Per-axis displacement cap per iteration.
	pub max_step: f64,
}

impl Default for ForceParameters {
	fn default() -> Self {
		Self {
			iterations: 50,
			ideal_length: 300.0,
			spring: 0.1,
			charge: -3000.0,
			gravity: 0.1,
			max_step: 10.0,
		}
	}
}

/// Runs one simulation step over node centers.
fn step(centers: &mut [Vec2], links: &[(usize, usize)], center: Vec2, params: &ForceParameters) {
	let mut forces = vec![Vec2::ZERO; centers.len()];

	for &(s, t) in links {
		let f = geometry::spring(centers[t] - centers[s], params.ideal_length, params.spring);
		forces[s] += f;
		forces[t] -= f;
	}

	for i in 0..centers.len() {
		for j in (i + 1)..centers.len() {
			let f = geometry::charge(centers[j] - centers[i], params.charge);
			forces[i] -= f;
			forces[j] += f;
		}
	}

	for (pos, force) in centers.iter_mut().zip(forces.iter_mut()) {
		*force += geometry::gravity(*pos, center, params.gravity);
		*pos += force.clamp_axes(params.max_step);
	}
}

/// Top-left positions after the fixed number of steps, starting from the
/// circular layout.
pub fn positions(
	nodes: &[Node],
	edges: &[Edge],
	canvas: Canvas,
	params: &ForceParameters,
) -> Vec<Point> {
	let start = circular::positions(nodes, canvas);
	let mut centers: Vec<Vec2> = start
		.iter()
		.zip(nodes)
		.map(|(p, n)| Vec2::new(p.x + n.width / 2.0, p.y + n.height / 2.0))
		.collect();
	let links = resolve_edges(nodes, edges);
	let center = Vec2::from(canvas.center());

	for _ in 0..params.iterations {
		step(&mut centers, &links, center, params);
	}

	centers
		.iter()
		.zip(nodes)
		.map(|(c, n)| Point::new(c.x - n.width / 2.0, c.y - n.height / 2.0))
		.collect()
}

/// Moves the nodes to [`positions`].
pub fn arrange(
	nodes: &mut [Node],
	edges: &[Edge],
	canvas: Canvas,
	params: &ForceParameters,
) -> Result<()> {
	let targets = positions(nodes, edges, canvas, params);
	apply_positions(nodes, &targets);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> (Vec<Node>, Vec<Edge>) {
		let nodes = ["orders", "users", "items", "addresses"]
			.iter()
			.map(|n| Node::entity(n))
			.collect();
		let edges = vec![
			Edge::new("orders", "users"),
			Edge::new("items", "orders"),
			Edge::new("addresses", "users"),
			Edge::new("addresses", "nowhere"),
		];
		(nodes, edges)
	}

	#[test]
	fn displacement_per_iteration_is_bounded() {
		let (nodes, edges) = sample();
		let canvas = Canvas::new(1000.0, 700.0);
		let start = circular::positions(&nodes, canvas);
		let params = ForceParameters::default();
		let end = positions(&nodes, &edges, canvas, &params);
		let bound = params.max_step * params.iterations as f64;
		for (a, b) in start.iter().zip(&end) {
			assert!((a.x - b.x).abs() <= bound + 1e-9);
			assert!((a.y - b.y).abs() <= bound + 1e-9);
		}
	}

	#[test]
	fn deterministic_for_same_input() {
		let (nodes, edges) = sample();
		let canvas = Canvas::new(1000.0, 700.0);
		let params = ForceParameters::default();
		assert_eq!(
			positions(&nodes, &edges, canvas, &params),
			positions(&nodes, &edges, canvas, &params)
		);
	}

	#[test]
	fn unlinked_nodes_drift_apart_without_gravity() {
		let nodes = vec![
			Node::with_size("a", 10.0, 10.0),
			Node::with_size("b", 10.0, 10.0),
		];
		let canvas = Canvas::new(1000.0, 1000.0);
		let params = ForceParameters {
			gravity: 0.0,
			..Default::default()
		};
		let distance = |ps: &[Point]| (Vec2::from(ps[1]) - Vec2::from(ps[0])).length();
		let before = distance(&circular::positions(&nodes, canvas));
		let after = distance(&positions(&nodes, &[], canvas, &params));
		assert!(after > before, "distance before {before} after {after}");
	}

	#[test]
	fn zero_iterations_keeps_circular_start() {
		let (nodes, edges) = sample();
		let canvas = Canvas::new(800.0, 800.0);
		let params = ForceParameters {
			iterations: 0,
			..Default::default()
		};
		let end = positions(&nodes, &edges, canvas, &params);
		for (a, b) in end.iter().zip(circular::positions(&nodes, canvas)) {
			assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);
		}
	}
}
