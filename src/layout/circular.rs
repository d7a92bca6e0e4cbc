//! All nodes on one ring around the canvas center.

use std::f64::consts::PI;

use super::types::{Canvas, Node, Point};
use super::{Result, apply_positions};

/// Top-left positions that put each node's center on a ring of radius
/// `min(width, height) / 3` around the canvas center.
pub fn positions(nodes: &[Node], canvas: Canvas) -> Vec<Point> {
	let center = canvas.center();
	let radius = canvas.width.min(canvas.height) / 3.0;
	let n = nodes.len() as f64;

	nodes
		.iter()
		.enumerate()
		.map(|(i, node)| {
			let angle = i as f64 / n * 2.0 * PI;
			Point::new(
				center.x + radius * angle.cos() - node.width / 2.0,
				center.y + radius * angle.sin() - node.height / 2.0,
			)
		})
		.collect()
}

/// Moves the nodes onto the ring.
pub fn arrange(nodes: &mut [Node], canvas: Canvas) -> Result<()> {
	let targets = positions(nodes, canvas);
	apply_positions(nodes, &targets);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_centers_land_on_the_ring() {
		let mut nodes: Vec<Node> = ["orders", "users", "items", "payments_history"]
			.iter()
			.map(|n| Node::entity(n))
			.collect();
		let canvas = Canvas::new(900.0, 600.0);
		arrange(&mut nodes, canvas).unwrap();

		for node in &nodes {
			let c = node.center();
			let r = ((c.x - 450.0).powi(2) + (c.y - 300.0).powi(2)).sqrt();
			assert!((r - 200.0).abs() < 1e-9);
		}
		// first node sits at angle zero
		assert!((nodes[0].center().x - 650.0).abs() < 1e-9);
	}
}
