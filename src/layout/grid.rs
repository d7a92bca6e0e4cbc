//! Row/column placement. The fallback for every other layout.

use super::types::{Canvas, Node, Point};
use super::{Result, apply_positions};

/// Smallest distance between neighbouring grid cells.
pub const MIN_SPACING: f64 = 60.0;

/// Columns (and rows) of a square grid holding `count` nodes.
pub fn grid_size(count: usize) -> usize {
	(count as f64).sqrt().ceil().max(1.0) as usize
}

/// `(row, col)` of the node at `index`.
pub fn cell(index: usize, grid_size: usize) -> (usize, usize) {
	(index / grid_size, index % grid_size)
}

/// Top-left positions for `count` nodes, in input order.
pub fn positions(count: usize, canvas: Canvas) -> Vec<Point> {
	let size = grid_size(count);
	let (margin_x, margin_y) = (canvas.width * 0.05, canvas.height * 0.05);
	let x_spacing = MIN_SPACING.max(canvas.width * 0.9 / size as f64);
	let y_spacing = MIN_SPACING.max(canvas.height * 0.9 / size as f64);
	log::debug!("grid layout {size}x{size}, spacing {x_spacing:.1}x{y_spacing:.1}");

	(0..count)
		.map(|i| {
			let (row, col) = cell(i, size);
			Point::new(
				margin_x + col as f64 * x_spacing,
				margin_y + row as f64 * y_spacing,
			)
		})
		.collect()
}

/// Moves the nodes to [`positions`]; never skips a node silently.
pub fn arrange(nodes: &mut [Node], canvas: Canvas) -> Result<()> {
	let targets = positions(nodes.len(), canvas);
	match apply_positions(nodes, &targets) {
		Some(err) => Err(err),
		None => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn places_nodes_row_major() {
		let mut nodes: Vec<Node> = ["a", "b", "c", "d", "e"].iter().map(|n| Node::entity(n)).collect();
		arrange(&mut nodes, Canvas::new(1000.0, 800.0)).unwrap();
		// 3x3 grid, spacing 300 x 240, margins 50 x 40
		assert_eq!(nodes[0].position(), Point::new(50.0, 40.0));
		assert_eq!(nodes[2].position(), Point::new(650.0, 40.0));
		assert_eq!(nodes[3].position(), Point::new(50.0, 280.0));
		assert_eq!(nodes[4].position(), Point::new(350.0, 280.0));
	}

	#[test]
	fn spacing_never_drops_below_minimum() {
		let pts = positions(100, Canvas::new(300.0, 300.0));
		assert_eq!(pts[1].x - pts[0].x, MIN_SPACING);
		assert_eq!(pts[10].y - pts[0].y, MIN_SPACING);
	}

	#[test]
	fn non_finite_canvas_is_reported() {
		let mut nodes = vec![Node::entity("a")];
		assert!(arrange(&mut nodes, Canvas::new(f64::NAN, 100.0)).is_err());
	}
}
