//! Built-in layered (Sugiyama-style) directed-graph engine.
//!
//! 1. Cycles are broken by reversing DFS back edges.
//! 2. Ranks come from the longest path to each node.
//! 3. Nodes within a rank are ordered by barycenter sweeps.
//! 4. Ranks become columns (left-to-right) or rows (top-to-bottom), each one
//!    centered against the largest rank.

use super::hierarchical::{DirectedGraphLayout, RankDirection, RankGraph, RankOptions};
use super::types::Point;
use super::Result;

/// Engine used by the hierarchical layout unless another is installed.
#[derive(Clone, Debug)]
pub struct LayeredLayout {
	/// Down/up barycenter sweep pairs.
	pub sweeps: usize,
}

impl Default for LayeredLayout {
	fn default() -> Self {
		Self { sweeps: 4 }
	}
}

/// Drops self loops and reverses back edges so the result is acyclic.
fn acyclic_links(count: usize, links: &[(usize, usize)]) -> Vec<(usize, usize)> {
	let mut out: Vec<Vec<usize>> = vec![Vec::new(); count];
	for &(s, t) in links {
		if s != t {
			out[s].push(t);
		}
	}

	// 0 = unvisited, 1 = on stack, 2 = done
	let mut state = vec![0u8; count];
	let mut result = Vec::with_capacity(links.len());
	for start in 0..count {
		if state[start] != 0 {
			continue;
		}
		let mut stack = vec![(start, 0usize)];
		state[start] = 1;
		while let Some(top) = stack.last_mut() {
			let node = top.0;
			if let Some(&succ) = out[node].get(top.1) {
				top.1 += 1;
				match state[succ] {
					0 => {
						result.push((node, succ));
						state[succ] = 1;
						stack.push((succ, 0));
					}
					1 => result.push((succ, node)),
					_ => result.push((node, succ)),
				}
			} else {
				state[node] = 2;
				stack.pop();
			}
		}
	}
	result
}

/// Longest-path rank of every node in an acyclic link set.
fn longest_path_ranks(count: usize, dag: &[(usize, usize)]) -> Vec<usize> {
	let mut ranks = vec![0; count];
	// at most `count` relaxation rounds are needed on a DAG
	for _ in 0..count {
		let mut changed = false;
		for &(s, t) in dag {
			if ranks[t] < ranks[s] + 1 {
				ranks[t] = ranks[s] + 1;
				changed = true;
			}
		}
		if !changed {
			break;
		}
	}
	ranks
}

fn barycenter_sweep(
	layers: &mut [Vec<usize>],
	neighbours: &[Vec<usize>],
	slot: &mut [f64],
	order: impl Iterator<Item = usize>,
) {
	for r in order {
		let layer = &mut layers[r];
		let mut keyed: Vec<(f64, usize)> = layer
			.iter()
			.map(|&n| {
				let pos: Vec<f64> = neighbours[n].iter().map(|&m| slot[m]).collect();
				if pos.is_empty() {
					(slot[n], n)
				} else {
					(pos.iter().sum::<f64>() / pos.len() as f64, n)
				}
			})
			.collect();
		keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
		*layer = keyed.into_iter().map(|(_, n)| n).collect();
		for (i, &n) in layer.iter().enumerate() {
			slot[n] = i as f64;
		}
	}
}

impl DirectedGraphLayout for LayeredLayout {
	fn layout(&self, graph: &RankGraph<'_>, options: &RankOptions) -> Result<Vec<Point>> {
		let count = graph.nodes.len();
		let dag = acyclic_links(count, &graph.links);
		let ranks = longest_path_ranks(count, &dag);
		let rank_count = ranks.iter().copied().max().map_or(0, |r| r + 1);

		let mut layers: Vec<Vec<usize>> = vec![Vec::new(); rank_count];
		for (n, &r) in ranks.iter().enumerate() {
			layers[r].push(n);
		}
		let mut slot = vec![0.0; count];
		for layer in &layers {
			for (i, &n) in layer.iter().enumerate() {
				slot[n] = i as f64;
			}
		}

		let mut preds = vec![Vec::new(); count];
		let mut succs = vec![Vec::new(); count];
		for &(s, t) in &dag {
			succs[s].push(t);
			preds[t].push(s);
		}
		for _ in 0..self.sweeps {
			barycenter_sweep(&mut layers, &preds, &mut slot, 1..rank_count);
			barycenter_sweep(&mut layers, &succs, &mut slot, (0..rank_count.saturating_sub(1)).rev());
		}

		// (along-rank extent, across-rank extent) per node
		let horizontal = options.rank_dir == RankDirection::LeftRight;
		let extent = |n: usize| {
			let node = &graph.nodes[n];
			if horizontal {
				(node.height, node.width)
			} else {
				(node.width, node.height)
			}
		};

		let spans: Vec<f64> = layers
			.iter()
			.map(|layer| {
				let total: f64 = layer.iter().map(|&n| extent(n).0).sum();
				total + options.node_sep * layer.len().saturating_sub(1) as f64
			})
			.collect();
		let widest = spans.iter().copied().fold(0.0, f64::max);

		let mut positions = vec![Point::default(); count];
		let mut across = if horizontal { options.margin_x } else { options.margin_y };
		for (layer, span) in layers.iter().zip(&spans) {
			let thickness = layer.iter().map(|&n| extent(n).1).fold(0.0, f64::max);
			let mut along = if horizontal { options.margin_y } else { options.margin_x };
			along += (widest - span) / 2.0;
			for &n in layer {
				let (len, depth) = extent(n);
				let offset = (thickness - depth) / 2.0;
				positions[n] = if horizontal {
					Point::new(across + offset, along)
				} else {
					Point::new(along, across + offset)
				};
				along += len + options.node_sep;
			}
			across += thickness + options.rank_sep;
		}
		Ok(positions)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::types::Node;

	fn graph_of<'a>(nodes: &'a [Node], links: &[(usize, usize)]) -> RankGraph<'a> {
		RankGraph {
			nodes,
			links: links.to_vec(),
		}
	}

	#[test]
	fn cycles_are_broken() {
		let dag = acyclic_links(3, &[(0, 1), (1, 2), (2, 0), (1, 1)]);
		assert_eq!(dag.len(), 3);
		assert_eq!(longest_path_ranks(3, &dag), vec![0, 1, 2]);
	}

	#[test]
	fn ranks_flow_left_to_right() {
		let nodes: Vec<Node> = ["orders", "users", "items"].iter().map(|n| Node::entity(n)).collect();
		let graph = graph_of(&nodes, &[(2, 0), (0, 1)]);
		let options = RankOptions::for_canvas(crate::layout::Canvas::new(1000.0, 800.0));
		let pos = LayeredLayout::default().layout(&graph, &options).unwrap();
		// items -> orders -> users
		assert!(pos[2].x < pos[0].x && pos[0].x < pos[1].x);
		assert_eq!(pos[2].x, options.margin_x);
	}

	#[test]
	fn nodes_in_a_rank_do_not_overlap() {
		let nodes: Vec<Node> = ["root", "a", "b", "c"].iter().map(|n| Node::entity(n)).collect();
		let graph = graph_of(&nodes, &[(0, 1), (0, 2), (0, 3)]);
		let options = RankOptions::for_canvas(crate::layout::Canvas::new(1000.0, 800.0));
		let pos = LayeredLayout::default().layout(&graph, &options).unwrap();
		let mut ys: Vec<f64> = pos[1..].iter().map(|p| p.y).collect();
		ys.sort_by(f64::total_cmp);
		for pair in ys.windows(2) {
			assert!(pair[1] - pair[0] >= nodes[1].height + options.node_sep - 1e-9);
		}
	}
}
