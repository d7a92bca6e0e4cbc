//! Layout selection by name with a grid fallback.

use std::fmt;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::force::{self, ForceParameters};
use super::fruchterman::{self, FruchtermanParameters};
use super::hierarchical::{self, DirectedGraphLayout};
use super::layered::LayeredLayout;
use super::radial::{self, RadialParameters, RadialPlan};
use super::types::{Canvas, Edge, EdgeStyle, LevelGuide, Node, NodeStyle};
use super::{LayoutError, Result, circular, grid, routing};

/// Available layout algorithms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutKind {
	/// Row-major grid; the fallback for every other layout.
	#[default]
	Grid,
	/// Ranked top-to-bottom layout of the link direction.
	Hierarchical,
	/// Spring embedder with a fixed iteration count.
	Force,
	/// A single ring.
	Circular,
	/// Rings of hop distance around the most connected table.
	Radial,
	/// Fruchterman–Reingold with a cooling schedule.
	Fruchterman,
}

impl LayoutKind {
	/// Every layout, in picker order.
	pub const ALL: [LayoutKind; 6] = [
		LayoutKind::Grid,
		LayoutKind::Hierarchical,
		LayoutKind::Force,
		LayoutKind::Circular,
		LayoutKind::Radial,
		LayoutKind::Fruchterman,
	];

	/// Lowercase name used to request the layout.
	pub fn name(self) -> &'static str {
		match self {
			LayoutKind::Grid => "grid",
			LayoutKind::Hierarchical => "hierarchical",
			LayoutKind::Force => "force",
			LayoutKind::Circular => "circular",
			LayoutKind::Radial => "radial",
			LayoutKind::Fruchterman => "fruchterman",
		}
	}

	/// Human readable name for layout pickers.
	pub fn label(self) -> &'static str {
		match self {
			LayoutKind::Grid => "Grid",
			LayoutKind::Hierarchical => "Hierarchical",
			LayoutKind::Force => "Force-Directed",
			LayoutKind::Circular => "Circular",
			LayoutKind::Radial => "Radial",
			LayoutKind::Fruchterman => "Fruchterman-Reingold",
		}
	}

	/// Parses a layout name; `dagre` is accepted for the hierarchical layout.
	pub fn from_name(name: &str) -> Option<LayoutKind> {
		let name = name.trim().to_ascii_lowercase();
		if name == "dagre" {
			return Some(LayoutKind::Hierarchical);
		}
		Self::ALL.into_iter().find(|k| k.name() == name)
	}

	/// Like [`LayoutKind::from_name`], but unknown names select the grid.
	pub fn from_name_or_grid(name: &str) -> LayoutKind {
		Self::from_name(name).unwrap_or_else(|| {
			log::warn!("unknown layout {name:?}, using grid");
			LayoutKind::Grid
		})
	}
}

impl fmt::Display for LayoutKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// What a layout request ended up doing.
#[derive(Clone, Debug, Default)]
pub struct LayoutReport {
	/// Layout that was asked for.
	pub requested: LayoutKind,
	/// Layout that positioned the nodes; `None` for an empty diagram or when
	/// even the grid fallback failed.
	pub applied: Option<LayoutKind>,
	/// Error that forced the grid fallback.
	pub fallback: Option<LayoutError>,
	/// Plan of a successful radial layout.
	pub radial: Option<RadialPlan>,
}

impl LayoutReport {
	/// Level circles to draw; empty unless a radial layout kept them.
	pub fn guides(&self) -> &[LevelGuide] {
		self.radial.as_ref().map_or(&[], |p| p.guides.as_slice())
	}
}

/// Selects a layout by name, degrades to the grid on failure and refreshes
/// link routes afterwards.
pub struct LayoutManager {
	engine: Box<dyn DirectedGraphLayout>,
	rng: SmallRng,
	/// Tuning of the force-directed layout.
	pub force: ForceParameters,
	/// Tuning of the Fruchterman–Reingold layout.
	pub fruchterman: FruchtermanParameters,
	/// Tuning of the radial layout.
	pub radial: RadialParameters,
}

impl Default for LayoutManager {
	fn default() -> Self {
		Self::new(0x5eed)
	}
}

impl LayoutManager {
	/// Manager with the built-in layered engine; `seed` drives the random
	/// start of the Fruchterman–Reingold layout.
	pub fn new(seed: u64) -> Self {
		Self {
			engine: Box::new(LayeredLayout::default()),
			rng: SmallRng::seed_from_u64(seed),
			force: ForceParameters::default(),
			fruchterman: FruchtermanParameters::default(),
			radial: RadialParameters::default(),
		}
	}

	/// Replaces the directed-graph engine used by the hierarchical layout.
	pub fn with_engine(mut self, engine: Box<dyn DirectedGraphLayout>) -> Self {
		self.engine = engine;
		self
	}

	/// Applies the layout called `name`; unknown names select the grid.
	pub fn apply_layout(
		&mut self,
		name: &str,
		nodes: &mut [Node],
		edges: &mut [Edge],
		canvas: &mut Canvas,
	) -> LayoutReport {
		self.apply(LayoutKind::from_name_or_grid(name), nodes, edges, canvas)
	}

	/// Applies `kind`, falling back to the grid when it fails, then resets
	/// every link route. Styles are reset before the layout runs.
	pub fn apply(
		&mut self,
		kind: LayoutKind,
		nodes: &mut [Node],
		edges: &mut [Edge],
		canvas: &mut Canvas,
	) -> LayoutReport {
		let mut report = LayoutReport {
			requested: kind,
			..Default::default()
		};
		if nodes.is_empty() {
			log::info!("no entities to lay out");
			return report;
		}
		log::info!(
			"applying {kind} layout to {} entities on {:.0}x{:.0}",
			nodes.len(),
			canvas.width,
			canvas.height
		);
		reset_styles(nodes, edges);

		match self.run(kind, nodes, edges, canvas) {
			Ok(plan) => {
				report.applied = Some(kind);
				report.radial = plan;
			}
			Err(err) => {
				log::warn!("{kind} layout failed ({err}), falling back to grid");
				reset_styles(nodes, edges);
				match grid::arrange(nodes, *canvas) {
					Ok(()) => report.applied = Some(LayoutKind::Grid),
					Err(grid_err) => log::error!("grid fallback failed: {grid_err}"),
				}
				report.fallback = Some(err);
			}
		}

		routing::refresh_routes(nodes, edges);
		report
	}

	fn run(
		&mut self,
		kind: LayoutKind,
		nodes: &mut [Node],
		edges: &mut [Edge],
		canvas: &mut Canvas,
	) -> Result<Option<RadialPlan>> {
		match kind {
			LayoutKind::Grid => grid::arrange(nodes, *canvas)?,
			LayoutKind::Circular => circular::arrange(nodes, *canvas)?,
			LayoutKind::Force => force::arrange(nodes, edges, *canvas, &self.force)?,
			LayoutKind::Fruchterman => {
				fruchterman::arrange(nodes, edges, *canvas, &self.fruchterman, &mut self.rng)?
			}
			LayoutKind::Hierarchical => {
				hierarchical::arrange(nodes, edges, *canvas, self.engine.as_ref())?
			}
			LayoutKind::Radial => {
				return radial::arrange(nodes, edges, canvas, &self.radial).map(Some);
			}
		}
		Ok(None)
	}
}

fn reset_styles(nodes: &mut [Node], edges: &mut [Edge]) {
	for node in nodes.iter_mut() {
		node.style = NodeStyle::default();
	}
	for edge in edges.iter_mut() {
		edge.style = EdgeStyle::default();
	}
}
