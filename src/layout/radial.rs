//! Concentric-ring layout anchored at the most connected table.
//!
//! The most connected node sits at the canvas center. Every other node reached
//! from it lands on the ring of its breadth-first depth, so hop distance reads
//! directly as distance from the center. Nodes that cannot be reached are
//! parked on one or more outer rings in a neutral color.

use std::collections::VecDeque;
use std::f64::consts::PI;

use super::grid::MIN_SPACING;
use super::types::{Canvas, Connector, Edge, LevelGuide, Node, Point, Router, resolve_edges};
use super::{LayoutError, Result};

/// Smallest gap between consecutive level rings.
const MIN_RING_STEP: f64 = 1.0;

/// Tuning and colors of the radial layout.
#[derive(Clone, Debug)]
pub struct RadialParameters {
	/// Node count above which the canvas is enlarged while computing.
	pub expand_threshold: usize,
	/// Scale of the enlarged canvas.
	pub expand_factor: f64,
	/// Unconnected nodes per outer ring.
	pub ring_capacity: usize,
	/// Angle of the first node on each level ring.
	pub level_start_angle: f64,
	/// Angle of the first node on each outer ring.
	pub unconnected_start_angle: f64,
	/// Border of the central node.
	pub central_stroke: &'static str,
	/// Border of unreachable nodes.
	pub unconnected_stroke: &'static str,
	/// Inner, middle and outer level colors.
	pub level_palette: [&'static str; 3],
	/// Links pointing away from the center.
	pub outward_link: &'static str,
	/// Links pointing toward the center.
	pub inward_link: &'static str,
	/// Links within one level, drawn dashed.
	pub same_level_link: &'static str,
}

impl Default for RadialParameters {
	fn default() -> Self {
		Self {
			expand_threshold: 20,
			expand_factor: 1.1,
			ring_capacity: 12,
			level_start_angle: PI / 4.0,
			unconnected_start_angle: PI / 6.0,
			central_stroke: "#e91e63",
			unconnected_stroke: "#9e9e9e",
			level_palette: ["#2196F3", "#4CAF50", "#FF9800"],
			outward_link: "#2196F3",
			inward_link: "#4CAF50",
			same_level_link: "#9C27B0",
		}
	}
}

/// The computed structure and positions of a radial layout.
#[derive(Clone, Debug, Default)]
pub struct RadialPlan {
	/// Index of the most connected node; `None` when no node has a link.
	pub central: Option<usize>,
	/// Link count per node, counting both endpoints.
	pub degrees: Vec<usize>,
	/// BFS depth per node; `None` for unreachable nodes.
	pub levels: Vec<Option<usize>>,
	/// Node indices per level, in BFS discovery order.
	pub by_level: Vec<Vec<usize>>,
	/// Radius per level; level 0 is the center.
	pub radii: Vec<f64>,
	/// Radius of the first ring of unreachable nodes.
	pub outer_radius: f64,
	/// Unreachable node indices grouped per outer ring, largest first.
	pub rings: Vec<Vec<usize>>,
	/// Top-left target per node.
	pub positions: Vec<Point>,
	/// Level circles; cleared when the canvas was enlarged.
	pub guides: Vec<LevelGuide>,
}

impl RadialPlan {
	/// Unreachable nodes in ring order.
	pub fn unconnected(&self) -> impl Iterator<Item = usize> + '_ {
		self.rings.iter().flatten().copied()
	}

	/// Deepest level reached from the central node.
	pub fn max_level(&self) -> usize {
		self.by_level.len().saturating_sub(1)
	}
}

/// Bidirectional adjacency plus the degree of each node.
pub fn adjacency(count: usize, links: &[(usize, usize)]) -> (Vec<Vec<usize>>, Vec<usize>) {
	let mut adj = vec![Vec::new(); count];
	let mut degrees = vec![0; count];
	for &(s, t) in links {
		adj[s].push(t);
		degrees[s] += 1;
		adj[t].push(s);
		degrees[t] += 1;
	}
	(adj, degrees)
}

/// First node with the highest degree, or `None` if every degree is zero.
pub fn central_node(degrees: &[usize]) -> Option<usize> {
	let mut best: Option<(usize, usize)> = None;
	for (i, &d) in degrees.iter().enumerate() {
		if d > 0 && best.is_none_or(|(_, max)| d > max) {
			best = Some((i, d));
		}
	}
	best.map(|(i, _)| i)
}

/// Breadth-first depth of every node reachable from `root`.
pub fn bfs_levels(adj: &[Vec<usize>], root: usize) -> (Vec<Option<usize>>, Vec<Vec<usize>>) {
	let mut levels = vec![None; adj.len()];
	let mut by_level = vec![vec![root]];
	let mut queue = VecDeque::from([root]);
	levels[root] = Some(0);

	while let Some(node) = queue.pop_front() {
		let next = levels[node].unwrap_or(0) + 1;
		for &other in &adj[node] {
			if levels[other].is_some() {
				continue;
			}
			levels[other] = Some(next);
			if by_level.len() <= next {
				by_level.push(Vec::new());
			}
			by_level[next].push(other);
			queue.push_back(other);
		}
	}
	(levels, by_level)
}

/// Ring spacing derived from node sizes and canvas size.
struct RingMetrics {
	base_step: f64,
	radii: Vec<f64>,
	outer_radius: f64,
}

fn ring_metrics(
	nodes: &[Node],
	max_level: usize,
	unconnected: usize,
	paper: Canvas,
) -> RingMetrics {
	let n = nodes.len() as f64;
	let avg_w = nodes.iter().map(|x| x.width).sum::<f64>() / n;
	let avg_h = nodes.iter().map(|x| x.height).sum::<f64>() / n;
	let base_step = avg_w.max(avg_h) * (1.2 - (n / 100.0).min(0.3));

	let level_multiplier = 1.0
		+ if max_level > 1 {
			(0.05 / max_level as f64).min(0.05)
		} else {
			0.0
		};
	let density = (15.0 / n).clamp(0.5, 1.0);
	let paper_size = paper.width.min(paper.height);
	let first = (base_step * 1.5)
		.min(paper_size * 0.2 * density * (1.0 + max_level as f64 / 15.0))
		.max(MIN_SPACING);

	let mut radii = vec![0.0];
	let mut current = first;
	for i in 1..=max_level {
		radii.push(current);
		let progress = i as f64 / max_level as f64;
		let multiplier = level_multiplier * (1.0 - progress * 0.2);
		current += (base_step * multiplier.powi(i as i32)).max(MIN_RING_STEP);
	}

	let outer_multiplier = (10.0 / unconnected.max(1) as f64).clamp(0.5, 0.8);
	RingMetrics {
		base_step,
		radii,
		outer_radius: current + base_step * outer_multiplier,
	}
}

/// Sorts by width, largest first; ties keep their current order.
fn largest_first(nodes: &[Node], ids: &mut [usize]) {
	ids.sort_by(|&a, &b| nodes[b].width.total_cmp(&nodes[a].width));
}

fn on_ring(center: Point, radius: f64, angle: f64, node: &Node) -> Point {
	Point::new(
		center.x + radius * angle.cos() - node.width / 2.0,
		center.y + radius * angle.sin() - node.height / 2.0,
	)
}

/// Computes the radial plan. `paper` is the visible canvas, `work` the
/// (possibly enlarged) surface whose center anchors the rings.
pub fn plan(
	nodes: &[Node],
	edges: &[Edge],
	paper: Canvas,
	work: Canvas,
	params: &RadialParameters,
) -> Result<RadialPlan> {
	if nodes.is_empty() {
		return Err(LayoutError::Computation("radial layout needs at least one node".into()));
	}
	let links = resolve_edges(nodes, edges);
	let (adj, degrees) = adjacency(nodes.len(), &links);
	let central = central_node(&degrees);
	let (levels, by_level) = match central {
		Some(root) => bfs_levels(&adj, root),
		None => (vec![None; nodes.len()], Vec::new()),
	};
	let max_level = by_level.len().saturating_sub(1);

	let mut unconnected: Vec<usize> = (0..nodes.len()).filter(|&i| levels[i].is_none()).collect();
	largest_first(nodes, &mut unconnected);

	let metrics = ring_metrics(nodes, max_level, unconnected.len(), paper);
	let center = work.center();
	log::debug!(
		"radial layout: central {:?}, {} levels, radii {:?}, outer radius {:.1}",
		central.map(|c| &nodes[c].id),
		max_level,
		metrics.radii,
		metrics.outer_radius
	);

	let mut positions: Vec<Point> = nodes.iter().map(Node::position).collect();
	let mut guides = Vec::new();

	if let Some(root) = central {
		let node = &nodes[root];
		positions[root] = Point::new(center.x - node.width / 2.0, center.y - node.height / 2.0);
	}

	for (level, members) in by_level.iter().enumerate().skip(1) {
		let radius = metrics.radii[level];
		let mut ordered = members.clone();
		largest_first(nodes, &mut ordered);
		let step = 2.0 * PI / ordered.len() as f64;
		for (i, &id) in ordered.iter().enumerate() {
			let angle = params.level_start_angle + i as f64 * step;
			positions[id] = on_ring(center, radius, angle, &nodes[id]);
		}
		guides.push(LevelGuide {
			center,
			radius,
			stroke: "#e0e0e0".into(),
			dash: (5.0, 5.0),
		});
	}

	let capacity = params.ring_capacity.max(1);
	let rings: Vec<Vec<usize>> = unconnected.chunks(capacity).map(<[usize]>::to_vec).collect();
	for (ring_index, ring) in rings.iter().enumerate() {
		let radius = metrics.outer_radius + ring_index as f64 * metrics.base_step * 0.7;
		let step = 2.0 * PI / ring.len() as f64;
		for (i, &id) in ring.iter().enumerate() {
			let angle = params.unconnected_start_angle + i as f64 * step;
			positions[id] = on_ring(center, radius, angle, &nodes[id]);
		}
	}
	if !rings.is_empty() {
		guides.push(LevelGuide {
			center,
			radius: metrics.outer_radius,
			stroke: "#eeeeee".into(),
			dash: (3.0, 3.0),
		});
	}

	if let Some((i, p)) = positions.iter().enumerate().find(|(_, p)| !p.is_finite()) {
		return Err(LayoutError::InvalidPosition {
			node: nodes[i].id.clone(),
			x: p.x,
			y: p.y,
		});
	}

	Ok(RadialPlan {
		central,
		degrees,
		levels,
		by_level,
		radii: metrics.radii,
		outer_radius: metrics.outer_radius,
		rings,
		positions,
		guides,
	})
}

fn parse_hex(color: &str) -> (u8, u8, u8) {
	let hex = color.trim_start_matches('#');
	let channel = |i: usize| {
		hex.get(i..i + 2)
			.and_then(|c| u8::from_str_radix(c, 16).ok())
			.unwrap_or(0)
	};
	(channel(0), channel(2), channel(4))
}

fn mix(a: &str, b: &str, t: f64) -> String {
	let (a, b) = (parse_hex(a), parse_hex(b));
	let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
	format!("#{:02x}{:02x}{:02x}", lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Level color for a fractional depth in `[0, 1]`.
pub fn level_color(palette: &[&str; 3], ratio: f64) -> String {
	let ratio = ratio.clamp(0.0, 1.0);
	if ratio <= 0.5 {
		mix(palette[0], palette[1], ratio * 2.0)
	} else {
		mix(palette[1], palette[2], (ratio - 0.5) * 2.0)
	}
}

/// Recolors nodes and reroutes links to show the level structure.
pub fn apply_styles(plan: &RadialPlan, nodes: &mut [Node], edges: &mut [Edge], params: &RadialParameters) {
	let max_level = plan.max_level().max(1) as f64;
	for (i, node) in nodes.iter_mut().enumerate() {
		match plan.levels[i] {
			Some(0) => {
				node.style.stroke = params.central_stroke.into();
				node.style.stroke_width = 3.0;
			}
			Some(level) => {
				node.style.stroke = level_color(&params.level_palette, level as f64 / max_level);
			}
			None => node.style.stroke = params.unconnected_stroke.into(),
		}
	}

	let index = super::types::index_nodes(nodes);
	let level_of = |id: &str| index.get(id).and_then(|&i| plan.levels[i]);
	for edge in edges.iter_mut() {
		let style = &mut edge.style;
		match (level_of(&edge.source), level_of(&edge.target)) {
			(Some(s), Some(t)) if s != t => {
				style.router = Router::Normal;
				style.connector = Connector::Rounded { radius: 20.0 };
				let color = if s < t { params.outward_link } else { params.inward_link };
				style.stroke = color.into();
				style.stroke_width = 1.5;
			}
			(Some(_), Some(_)) => {
				style.router = Router::Normal;
				style.connector = Connector::Rounded { radius: 25.0 };
				style.stroke = params.same_level_link.into();
				style.dashed = true;
			}
			_ => {
				style.router = Router::Manhattan;
				style.connector = Connector::default();
				style.stroke = params.unconnected_stroke.into();
			}
		}
	}
}

/// Runs the radial layout. Large diagrams get an enlarged working canvas that
/// is restored before returning, together with the removal of level guides.
/// Nothing is mutated unless the whole plan succeeds.
pub fn arrange(
	nodes: &mut [Node],
	edges: &mut [Edge],
	canvas: &mut Canvas,
	params: &RadialParameters,
) -> Result<RadialPlan> {
	let original = *canvas;
	let expand = nodes.len() > params.expand_threshold;
	if expand {
		canvas.width = original.width.max(original.width * params.expand_factor);
		canvas.height = original.height.max(original.height * params.expand_factor);
		log::debug!(
			"temporarily expanding canvas to {:.0}x{:.0}",
			canvas.width,
			canvas.height
		);
	}

	let result = plan(nodes, edges, original, *canvas, params);
	*canvas = original;
	let mut plan = result?;

	for (node, p) in nodes.iter_mut().zip(&plan.positions) {
		node.x = p.x;
		node.y = p.y;
	}
	apply_styles(&plan, nodes, edges, params);

	if expand {
		plan.guides.clear();
	}
	Ok(plan)
}
