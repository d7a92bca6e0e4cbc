//! Link routes derived from entity positions. Routing never moves nodes.

use super::types::{Edge, Node, Point, Router, index_nodes};

const SELF_LOOP_REACH: f64 = 30.0;
const SELF_LOOP_SPREAD: f64 = 10.0;

/// Where the segment from `node`'s center toward `toward` leaves its box.
fn border_point(node: &Node, toward: Point) -> Point {
	let c = node.center();
	let (dx, dy) = (toward.x - c.x, toward.y - c.y);
	if dx == 0.0 && dy == 0.0 {
		return c;
	}
	let (hw, hh) = (node.width / 2.0, node.height / 2.0);
	let tx = if dx != 0.0 { hw / dx.abs() } else { f64::INFINITY };
	let ty = if dy != 0.0 { hh / dy.abs() } else { f64::INFINITY };
	let t = tx.min(ty).min(1.0);
	Point::new(c.x + dx * t, c.y + dy * t)
}

fn self_loop(node: &Node) -> Vec<Point> {
	let c = node.center();
	let right = node.x + node.width;
	vec![
		Point::new(right, c.y - SELF_LOOP_SPREAD),
		Point::new(right + SELF_LOOP_REACH, c.y - SELF_LOOP_SPREAD),
		Point::new(right + SELF_LOOP_REACH, c.y + SELF_LOOP_SPREAD),
		Point::new(right, c.y + SELF_LOOP_SPREAD),
	]
}

fn manhattan(source: &Node, target: &Node) -> Vec<Point> {
	let (sc, tc) = (source.center(), target.center());
	let (dx, dy) = (tc.x - sc.x, tc.y - sc.y);
	if dx.abs() >= dy.abs() {
		let dir = dx.signum();
		let start = Point::new(sc.x + dir * source.width / 2.0, sc.y);
		let end = Point::new(tc.x - dir * target.width / 2.0, tc.y);
		let mid = (start.x + end.x) / 2.0;
		vec![start, Point::new(mid, start.y), Point::new(mid, end.y), end]
	} else {
		let dir = dy.signum();
		let start = Point::new(sc.x, sc.y + dir * source.height / 2.0);
		let end = Point::new(tc.x, tc.y - dir * target.height / 2.0);
		let mid = (start.y + end.y) / 2.0;
		vec![start, Point::new(start.x, mid), Point::new(end.x, mid), end]
	}
}

/// Route for one link between two resolved entities.
pub fn route(source: &Node, target: &Node, router: Router) -> Vec<Point> {
	if source.id == target.id {
		return self_loop(source);
	}
	match router {
		Router::Normal => vec![
			border_point(source, target.center()),
			border_point(target, source.center()),
		],
		Router::Manhattan => manhattan(source, target),
	}
}

/// Recomputes every link's waypoints from the current node positions. Links
/// with a missing endpoint get an empty route.
pub fn refresh_routes(nodes: &[Node], edges: &mut [Edge]) {
	let index = index_nodes(nodes);
	for edge in edges.iter_mut() {
		edge.route = match (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
			(Some(&s), Some(&t)) => route(&nodes[s], &nodes[t], edge.style.router),
			_ => Vec::new(),
		};
	}
}

/// Refreshes only links touching `id`, used while an entity is dragged.
pub fn refresh_routes_for(nodes: &[Node], edges: &mut [Edge], id: &str) {
	let index = index_nodes(nodes);
	for edge in edges.iter_mut().filter(|e| e.source == id || e.target == id) {
		if let (Some(&s), Some(&t)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
			edge.route = route(&nodes[s], &nodes[t], edge.style.router);
		}
	}
}

/// Point at fraction `t` of the route's length.
pub fn point_along(route: &[Point], t: f64) -> Option<Point> {
	let first = *route.first()?;
	let lengths: Vec<f64> = route
		.windows(2)
		.map(|w| ((w[1].x - w[0].x).powi(2) + (w[1].y - w[0].y).powi(2)).sqrt())
		.collect();
	let total: f64 = lengths.iter().sum();
	if total == 0.0 {
		return Some(first);
	}
	let mut remaining = total * t.clamp(0.0, 1.0);
	for (w, len) in route.windows(2).zip(&lengths) {
		if remaining <= *len && *len > 0.0 {
			let f = remaining / len;
			return Some(Point::new(
				w[0].x + (w[1].x - w[0].x) * f,
				w[0].y + (w[1].y - w[0].y) * f,
			));
		}
		remaining -= len;
	}
	route.last().copied()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn at(name: &str, x: f64, y: f64) -> Node {
		let mut n = Node::with_size(name, 100.0, 50.0);
		n.x = x;
		n.y = y;
		n
	}

	#[test]
	fn normal_route_clips_to_borders() {
		let r = route(&at("a", 0.0, 0.0), &at("b", 300.0, 0.0), Router::Normal);
		assert_eq!(r, vec![Point::new(100.0, 25.0), Point::new(300.0, 25.0)]);
	}

	#[test]
	fn manhattan_route_is_orthogonal() {
		let r = route(&at("a", 0.0, 0.0), &at("b", 300.0, 200.0), Router::Manhattan);
		assert_eq!(r.first(), Some(&Point::new(100.0, 25.0)));
		assert_eq!(r.last(), Some(&Point::new(300.0, 225.0)));
		for w in r.windows(2) {
			assert!(w[0].x == w[1].x || w[0].y == w[1].y);
		}
	}

	#[test]
	fn refresh_skips_dangling_links_and_keeps_nodes() {
		let nodes = vec![at("a", 0.0, 0.0), at("b", 0.0, 300.0)];
		let before = nodes.clone();
		let mut edges = vec![Edge::new("a", "b"), Edge::new("a", "gone"), Edge::new("b", "b")];
		refresh_routes(&nodes, &mut edges);
		assert_eq!(edges[0].route.len(), 4);
		assert!(edges[1].route.is_empty());
		assert_eq!(edges[2].route.len(), 4);
		assert_eq!(nodes, before);
	}

	#[test]
	fn point_along_walks_by_length() {
		let r = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
		assert_eq!(point_along(&r, 0.25), Some(Point::new(5.0, 0.0)));
		assert_eq!(point_along(&r, 0.75), Some(Point::new(10.0, 5.0)));
		assert_eq!(point_along(&[], 0.5), None);
	}
}
