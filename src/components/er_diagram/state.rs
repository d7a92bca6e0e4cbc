//! Diagram controller: data, layout and pointer interaction.

use std::collections::HashSet;

use crate::layout::routing;
use crate::layout::{Canvas, Edge, LayoutKind, LayoutManager, LayoutReport, LevelGuide, Node, NodeStyle, Point};

use super::transition::{Motion, Transition};
use super::types::Relationship;
use super::viewport::ViewTransform;

/// Seconds the button must be held on empty canvas before panning starts.
pub const PAN_HOLD_SECS: f64 = 0.2;
/// Border color of the entity being dragged.
pub const DRAG_STROKE: &str = "#2196F3";
/// Border width of the entity being dragged.
pub const DRAG_STROKE_WIDTH: f64 = 3.0;

/// An entity being moved with the pointer.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	/// Index of the dragged entity.
	pub node: Option<usize>,
	/// Pointer position at the press, in diagram space.
	pub start_x: f64,
	/// See `start_x`.
	pub start_y: f64,
	/// Entity position at the press.
	pub node_start: Point,
	/// Style to restore once the node is released.
	pub saved_style: Option<NodeStyle>,
}

impl DragState {
	/// True while an entity is held.
	pub fn active(&self) -> bool {
		self.node.is_some()
	}
}

/// Panning of the whole view by dragging empty canvas.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Button is down on empty canvas; panning starts after the hold.
	pub armed: bool,
	/// The view follows the pointer.
	pub active: bool,
	/// Seconds the button has been held while armed.
	pub held: f64,
	/// Screen position of the press.
	pub start_x: f64,
	/// See `start_x`.
	pub start_y: f64,
	/// View offset at the press.
	pub transform_start_x: f64,
	/// See `transform_start_x`.
	pub transform_start_y: f64,
}

/// Owns the diagram: entities, links, viewport, layout selection and the
/// pointer interaction state of one canvas.
pub struct DiagramState {
	/// One entity per table.
	pub nodes: Vec<Node>,
	/// One link per relationship record.
	pub edges: Vec<Edge>,
	/// Pan and zoom.
	pub transform: ViewTransform,
	/// Visible surface size.
	pub canvas: Canvas,
	/// Layout used by the next render.
	pub layout: LayoutKind,
	/// Entity drag in progress.
	pub drag: DragState,
	/// View pan in progress.
	pub pan: PanState,
	/// Entity under the pointer.
	pub hover: Option<usize>,
	/// Radial level circles.
	pub guides: Vec<LevelGuide>,
	/// How nodes reach new layout positions.
	pub motion: Motion,
	manager: LayoutManager,
	transition: Option<Transition>,
	fit_pending: bool,
}

impl DiagramState {
	/// Empty diagram with the default layout manager.
	pub fn new(width: f64, height: f64) -> Self {
		Self::with_manager(width, height, LayoutManager::default())
	}

	/// Empty diagram laid out by `manager`.
	pub fn with_manager(width: f64, height: f64, manager: LayoutManager) -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			transform: ViewTransform::default(),
			canvas: Canvas::new(width, height),
			layout: LayoutKind::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: None,
			guides: Vec::new(),
			motion: Motion::default(),
			manager,
			transition: None,
			fit_pending: false,
		}
	}

	/// Replaces the layout motion.
	pub fn with_motion(mut self, motion: Motion) -> Self {
		self.motion = motion;
		self
	}

	/// Rebuilds the diagram from `relationships` and lays it out with the
	/// current layout. Tables become entities in first-seen order; every
	/// record becomes its own link.
	pub fn render_relationships(&mut self, relationships: &[Relationship]) -> LayoutReport {
		self.transform = ViewTransform::default();
		self.transition = None;
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hover = None;
		self.guides.clear();

		let mut seen = HashSet::new();
		self.nodes.clear();
		for table in relationships.iter().flat_map(|r| [&r.source_table, &r.target_table]) {
			if seen.insert(table.as_str()) {
				self.nodes.push(Node::entity(table));
			}
		}
		self.edges = relationships
			.iter()
			.map(|r| Edge::with_labels(&r.source_table, &r.target_table, &r.source_field, &r.target_field))
			.collect();
		log::info!(
			"rendering {} entities and {} relationships",
			self.nodes.len(),
			self.edges.len()
		);

		self.apply_layout()
	}

	/// Selects the layout called `name` (unknown names select the grid) and
	/// applies it.
	pub fn set_layout(&mut self, name: &str) -> LayoutReport {
		self.layout = LayoutKind::from_name_or_grid(name);
		self.apply_layout()
	}

	/// Re-runs the current layout. Node movement is animated according to
	/// [`Motion`]; a padded fit follows once nodes settle.
	pub fn apply_layout(&mut self) -> LayoutReport {
		self.settle();
		let from: Vec<Point> = self.nodes.iter().map(Node::position).collect();
		let report = self
			.manager
			.apply(self.layout, &mut self.nodes, &mut self.edges, &mut self.canvas);
		self.guides = report.guides().to_vec();
		if report.applied.is_none() {
			return report;
		}

		let to: Vec<Point> = self.nodes.iter().map(Node::position).collect();
		self.transition = Transition::new(from.clone(), to, self.motion);
		if self.transition.is_some() {
			self.place(&from);
		}
		self.fit_pending = true;
		if self.transition.is_none() {
			self.finish_layout();
		}
		report
	}

	/// True while nodes move toward a new layout.
	pub fn is_animating(&self) -> bool {
		self.transition.is_some()
	}

	/// Advances time by `dt` seconds: pan hold, running transition and the
	/// fit that follows it.
	pub fn tick(&mut self, dt: f64) {
		if self.pan.armed && !self.pan.active {
			self.pan.held += dt;
			if self.pan.held >= PAN_HOLD_SECS {
				self.pan.active = true;
			}
		}

		let Some(transition) = self.transition.as_mut() else {
			return;
		};
		let positions = transition.advance(dt);
		let finished = transition.is_finished();
		self.place(&positions);
		if finished {
			self.transition = None;
			self.finish_layout();
		}
	}

	/// Jumps a running transition to its end.
	fn settle(&mut self) {
		if let Some(t) = self.transition.take() {
			let targets = t.targets().to_vec();
			self.place(&targets);
			self.finish_layout();
		}
	}

	fn place(&mut self, positions: &[Point]) {
		for (node, p) in self.nodes.iter_mut().zip(positions) {
			node.x = p.x;
			node.y = p.y;
		}
		routing::refresh_routes(&self.nodes, &mut self.edges);
	}

	fn finish_layout(&mut self) {
		if std::mem::take(&mut self.fit_pending) {
			self.transform.fit_after_layout(&self.nodes, self.canvas);
		}
	}

	/// Zooms in one step around the origin.
	pub fn zoom_in(&mut self) {
		self.transform.zoom_in();
	}

	/// Zooms out one step around the origin.
	pub fn zoom_out(&mut self) {
		self.transform.zoom_out();
	}

	/// Wheel zoom anchored at the cursor.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		self.transform.wheel(sx, sy, delta_y);
	}

	/// Frames every entity; false for an empty diagram.
	pub fn fit_to_content(&mut self) -> bool {
		self.transform.fit_to_content(&self.nodes, self.canvas)
	}

	/// Follows the container size; positions and the layout are untouched.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.canvas = Canvas::new(width, height);
	}

	/// Topmost entity under the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let p = self.transform.screen_to_graph(sx, sy);
		self.nodes.iter().rposition(|n| n.contains(p))
	}

	/// Press: grabs the entity under the pointer or arms panning.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		if let Some(idx) = self.node_at_position(sx, sy) {
			self.settle();
			let node = &mut self.nodes[idx];
			self.drag = DragState {
				node: Some(idx),
				start_x: sx,
				start_y: sy,
				node_start: node.position(),
				saved_style: Some(node.style.clone()),
			};
			node.style = NodeStyle {
				stroke: DRAG_STROKE.into(),
				stroke_width: DRAG_STROKE_WIDTH,
			};
		} else {
			self.pan = PanState {
				armed: true,
				active: false,
				held: 0.0,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	/// Moves the grabbed entity, pans, or updates the hover.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if let Some(idx) = self.drag.node {
			let k = self.transform.k;
			let node = &mut self.nodes[idx];
			node.x = self.drag.node_start.x + (sx - self.drag.start_x) / k;
			node.y = self.drag.node_start.y + (sy - self.drag.start_y) / k;
			let id = node.id.clone();
			routing::refresh_routes_for(&self.nodes, &mut self.edges, &id);
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		} else {
			self.hover = self.node_at_position(sx, sy);
		}
	}

	/// Ends any drag or pan; also used when the pointer leaves the canvas.
	pub fn pointer_up(&mut self) {
		if let (Some(idx), Some(style)) = (self.drag.node, self.drag.saved_style.take()) {
			if let Some(node) = self.nodes.get_mut(idx) {
				node.style = style;
			}
		}
		self.drag = DragState::default();
		self.pan = PanState::default();
	}

	/// Pointer left the canvas.
	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		self.hover = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rel(st: &str, sf: &str, tt: &str, tf: &str) -> Relationship {
		Relationship {
			source_table: st.into(),
			source_field: sf.into(),
			target_table: tt.into(),
			target_field: tf.into(),
			..Default::default()
		}
	}

	fn headless() -> DiagramState {
		DiagramState::new(800.0, 600.0).with_motion(Motion::Immediate)
	}

	#[test]
	fn tables_are_deduplicated_and_links_are_not() {
		let mut state = headless();
		state.render_relationships(&[
			rel("orders", "user_id", "users", "id"),
			rel("orders", "created_by", "users", "id"),
			rel("items", "order_id", "orders", "id"),
		]);
		let ids: Vec<&str> = state.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["orders", "users", "items"]);
		assert_eq!(state.edges.len(), 3);
		assert_eq!(state.edges[1].source_label, "created_by");
	}

	#[test]
	fn render_resets_the_view_before_layout() {
		let mut state = headless();
		state.transform = ViewTransform { x: 300.0, y: 300.0, k: 0.4 };
		state.render_relationships(&[]);
		assert_eq!(state.transform, ViewTransform::default());
	}

	#[test]
	fn eased_layout_fits_only_when_settled() {
		let mut state = DiagramState::new(800.0, 600.0);
		state.render_relationships(&[rel("orders", "user_id", "users", "id")]);
		assert!(state.is_animating());
		assert_eq!(state.transform, ViewTransform::default());

		for _ in 0..40 {
			state.tick(1.0 / 60.0);
		}
		assert!(!state.is_animating());
		assert_ne!(state.transform, ViewTransform::default());
		let expected = crate::layout::grid::positions(2, state.canvas);
		assert_eq!(state.nodes[0].position(), expected[0]);
	}

	#[test]
	fn switching_layout_mid_transition_settles_first() {
		let mut state = DiagramState::new(800.0, 600.0);
		state.render_relationships(&[rel("a", "b_id", "b", "id")]);
		state.tick(0.1);
		let report = state.set_layout("circular");
		assert_eq!(report.applied, Some(LayoutKind::Circular));
		assert_eq!(state.layout, LayoutKind::Circular);
	}

	#[test]
	fn resize_keeps_positions_and_layout() {
		let mut state = headless();
		state.set_layout("circular");
		state.render_relationships(&[rel("a", "b_id", "b", "id")]);
		let before = state.nodes.clone();
		state.resize(1200.0, 900.0);
		assert_eq!(state.nodes, before);
		assert_eq!(state.layout, LayoutKind::Circular);
		assert_eq!(state.canvas, Canvas::new(1200.0, 900.0));
	}

	#[test]
	fn dragging_moves_node_and_restores_style() {
		let mut state = headless();
		state.render_relationships(&[rel("a", "b_id", "b", "id")]);
		let c = state.nodes[0].center();
		let (sx, sy) = (c.x * state.transform.k + state.transform.x, c.y * state.transform.k + state.transform.y);

		state.pointer_down(sx, sy);
		assert_eq!(state.drag.node, Some(0));
		assert_eq!(state.nodes[0].style.stroke, DRAG_STROKE);

		let start = state.nodes[0].position();
		state.pointer_move(sx + 20.0, sy);
		let moved = state.nodes[0].position();
		assert!((moved.x - (start.x + 20.0 / state.transform.k)).abs() < 1e-9);
		assert_eq!(moved.y, start.y);

		state.pointer_up();
		assert!(!state.drag.active());
		assert_eq!(state.nodes[0].style, NodeStyle::default());
	}

	#[test]
	fn panning_waits_for_the_hold() {
		let mut state = headless();
		state.pointer_down(5.0, 5.0);
		state.pointer_move(50.0, 50.0);
		assert_eq!((state.transform.x, state.transform.y), (0.0, 0.0));

		state.tick(0.25);
		assert!(state.pan.active);
		state.pointer_move(50.0, 40.0);
		assert_eq!((state.transform.x, state.transform.y), (45.0, 35.0));

		state.pointer_leave();
		assert!(!state.pan.armed && !state.pan.active);
	}
}
