//! Fruchterman–Reingold force layout with geometric cooling.

use rand::Rng;

use super::geometry::{self, Temperature, Vec2, clamp_soft};
use super::types::{Canvas, Edge, Node, Point, resolve_edges};
use super::{Result, apply_positions};

/// Tuning of [`positions`].
#[derive(Clone, Debug)]
pub struct FruchtermanParameters {
	/// Number of cooling steps.
	pub iterations: usize,
	/// Multiplier on `sqrt(area / n)` for the ideal distance.
	pub spread: f64,
	/// Initial temperature is `canvas.width / temperature_divisor`.
	pub temperature_divisor: f64,
	/// Temperature factor per iteration.
	pub cooling: f64,
}

impl Default for FruchtermanParameters {
	fn default() -> Self {
		Self {
			iterations: 50,
			spread: 1.5,
			temperature_divisor: 10.0,
			cooling: 0.95,
		}
	}
}

/// Random top-left positions within 10–90% of each canvas dimension.
fn scatter<R: Rng + ?Sized>(nodes: &[Node], canvas: Canvas, rng: &mut R) -> Vec<Vec2> {
	nodes
		.iter()
		.map(|n| {
			let x = rng.random::<f64>() * canvas.width * 0.8 + canvas.width * 0.1;
			let y = rng.random::<f64>() * canvas.height * 0.8 + canvas.height * 0.1;
			Vec2::new(x + n.width / 2.0, y + n.height / 2.0)
		})
		.collect()
}

/// Top-left positions after the simulation, kept inside the canvas.
pub fn positions<R: Rng + ?Sized>(
	nodes: &[Node],
	edges: &[Edge],
	canvas: Canvas,
	params: &FruchtermanParameters,
	rng: &mut R,
) -> Vec<Point> {
	if nodes.is_empty() {
		return Vec::new();
	}
	let k = (canvas.width * canvas.height / nodes.len() as f64).sqrt() * params.spread;
	let links = resolve_edges(nodes, edges);
	let mut centers = scatter(nodes, canvas, rng);
	let mut temperature = Temperature::new(canvas.width / params.temperature_divisor, params.cooling);

	for _ in 0..params.iterations {
		let mut disp = vec![Vec2::ZERO; centers.len()];

		for i in 0..centers.len() {
			for j in (i + 1)..centers.len() {
				let f = geometry::fr_repulsion(centers[j] - centers[i], k);
				disp[i] -= f;
				disp[j] += f;
			}
		}

		for &(s, t) in &links {
			let f = geometry::fr_attraction(centers[t] - centers[s], k);
			disp[s] += f;
			disp[t] -= f;
		}

		for ((pos, d), node) in centers.iter_mut().zip(&disp).zip(nodes) {
			*pos += d.limit(temperature.value);
			let (hw, hh) = (node.width / 2.0, node.height / 2.0);
			pos.x = clamp_soft(pos.x, hw, canvas.width - hw);
			pos.y = clamp_soft(pos.y, hh, canvas.height - hh);
		}

		temperature.cool();
	}

	centers
		.iter()
		.zip(nodes)
		.map(|(c, n)| Point::new(c.x - n.width / 2.0, c.y - n.height / 2.0))
		.collect()
}

/// Moves the nodes to [`positions`].
pub fn arrange<R: Rng + ?Sized>(
	nodes: &mut [Node],
	edges: &[Edge],
	canvas: Canvas,
	params: &FruchtermanParameters,
	rng: &mut R,
) -> Result<()> {
	let targets = positions(nodes, edges, canvas, params, rng);
	apply_positions(nodes, &targets);
	Ok(())
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	fn chain(n: usize) -> (Vec<Node>, Vec<Edge>) {
		let nodes: Vec<Node> = (0..n).map(|i| Node::entity(&format!("t{i}"))).collect();
		let edges = (1..n)
			.map(|i| Edge::new(&format!("t{}", i - 1), &format!("t{i}")))
			.collect();
		(nodes, edges)
	}

	#[test]
	fn centers_stay_inside_the_canvas() {
		let (mut nodes, edges) = chain(12);
		let canvas = Canvas::new(800.0, 600.0);
		let mut rng = SmallRng::seed_from_u64(7);
		arrange(&mut nodes, &edges, canvas, &FruchtermanParameters::default(), &mut rng).unwrap();
		for n in &nodes {
			let c = n.center();
			assert!(c.x >= n.width / 2.0 - 1e-9 && c.x <= canvas.width - n.width / 2.0 + 1e-9);
			assert!(c.y >= n.height / 2.0 - 1e-9 && c.y <= canvas.height - n.height / 2.0 + 1e-9);
		}
	}

	#[test]
	fn single_isolated_node_is_clamped() {
		let (mut nodes, edges) = chain(1);
		// narrow canvas: a scattered top-left near 90% would overflow without clamping
		let canvas = Canvas::new(400.0, 200.0);
		let mut rng = SmallRng::seed_from_u64(1);
		arrange(&mut nodes, &edges, canvas, &FruchtermanParameters::default(), &mut rng).unwrap();
		let c = nodes[0].center();
		assert!(c.x <= canvas.width - nodes[0].width / 2.0 + 1e-9);
		assert!(c.y <= canvas.height - nodes[0].height / 2.0 + 1e-9);
	}

	#[test]
	fn same_seed_same_layout() {
		let (nodes, edges) = chain(6);
		let canvas = Canvas::new(800.0, 600.0);
		let params = FruchtermanParameters::default();
		let a = positions(&nodes, &edges, canvas, &params, &mut SmallRng::seed_from_u64(3));
		let b = positions(&nodes, &edges, canvas, &params, &mut SmallRng::seed_from_u64(3));
		assert_eq!(a, b);
	}
}
