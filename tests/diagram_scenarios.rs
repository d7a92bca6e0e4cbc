//! End-to-end flows through the diagram controller and layout manager.

use er_diagram_canvas::components::er_diagram::export::to_svg;
use er_diagram_canvas::components::er_diagram::transition::Motion;
use er_diagram_canvas::components::er_diagram::viewport::{FIT_MAX_SCALE, ViewTransform};
use er_diagram_canvas::components::er_diagram::{DiagramState, Relationship};
use er_diagram_canvas::layout::{Canvas, LayoutKind, LayoutManager, Node, Unavailable, grid};

fn rel(source_table: &str, source_field: &str, target_table: &str, target_field: &str) -> Relationship {
	Relationship {
		source_table: source_table.into(),
		source_field: source_field.into(),
		target_table: target_table.into(),
		target_field: target_field.into(),
		..Default::default()
	}
}

fn headless(width: f64, height: f64) -> DiagramState {
	DiagramState::new(width, height).with_motion(Motion::Immediate)
}

#[test]
fn single_relationship_renders_two_entities_on_the_grid() {
	let mut state = headless(800.0, 600.0);
	let report = state.render_relationships(&[rel("orders", "user_id", "users", "id")]);

	assert_eq!(report.applied, Some(LayoutKind::Grid));
	let ids: Vec<&str> = state.nodes.iter().map(|n| n.id.as_str()).collect();
	assert_eq!(ids, ["orders", "users"]);
	assert_eq!(state.edges.len(), 1);
	assert_eq!(state.edges[0].source_label, "user_id");
	assert_eq!(state.edges[0].target_label, "id");

	let size = grid::grid_size(2);
	assert_ne!(grid::cell(0, size), grid::cell(1, size));
	assert_ne!(state.nodes[0].position(), state.nodes[1].position());

	assert!(state.fit_to_content());
	assert!(state.transform.k > 0.0 && state.transform.k <= FIT_MAX_SCALE);
}

#[test]
fn unconnected_tables_fill_three_outer_rings_under_radial() {
	let mut nodes: Vec<Node> = (0..25).map(|i| Node::entity(&format!("orphan_{i}"))).collect();
	let mut canvas = Canvas::new(1200.0, 900.0);
	let report = LayoutManager::default().apply_layout("radial", &mut nodes, &mut [], &mut canvas);

	assert_eq!(report.applied, Some(LayoutKind::Radial));
	let plan = report.radial.expect("radial plan");
	assert_eq!(plan.central, None);
	assert_eq!(plan.unconnected().count(), 25);
	assert_eq!(plan.rings.len(), 3);
	assert_eq!(plan.rings.iter().map(Vec::len).collect::<Vec<_>>(), [12usize, 12, 1]);
	// enlarged while computing, restored afterwards without guides
	assert_eq!(canvas, Canvas::new(1200.0, 900.0));
	assert!(plan.guides.is_empty());
}

#[test]
fn radial_diagram_keeps_guides_when_not_enlarged() {
	let mut state = headless(1000.0, 800.0);
	state.set_layout("radial");
	let report = state.render_relationships(&[
		rel("orders", "user_id", "users", "id"),
		rel("payments", "order_id", "orders", "id"),
		rel("items", "order_id", "orders", "id"),
	]);
	assert_eq!(report.applied, Some(LayoutKind::Radial));
	assert!(!state.guides.is_empty());

	state.set_layout("grid");
	assert!(state.guides.is_empty());
}

#[test]
fn missing_hierarchical_engine_still_yields_a_diagram() {
	let manager = LayoutManager::default().with_engine(Box::new(Unavailable));
	let mut state = DiagramState::with_manager(800.0, 600.0, manager).with_motion(Motion::Immediate);
	state.set_layout("dagre");
	let report = state.render_relationships(&[
		rel("orders", "user_id", "users", "id"),
		rel("items", "order_id", "orders", "id"),
	]);
	assert_eq!(report.requested, LayoutKind::Hierarchical);
	assert_eq!(report.applied, Some(LayoutKind::Grid));
	for (n, p) in state.nodes.iter().zip(grid::positions(3, state.canvas)) {
		assert_eq!(n.position(), p);
	}
	assert!(state.edges.iter().all(|e| !e.route.is_empty()));
}

#[test]
fn every_layout_produces_finite_positions_and_routes() {
	let rels = [
		rel("orders", "user_id", "users", "id"),
		rel("orders", "address_id", "addresses", "id"),
		rel("items", "order_id", "orders", "id"),
		rel("items", "product_id", "products", "id"),
		rel("users", "manager_id", "users", "id"),
		rel("audit", "actor", "audit_types", "code"),
	];
	for kind in LayoutKind::ALL {
		let mut state = headless(1200.0, 800.0);
		state.set_layout(kind.name());
		let report = state.render_relationships(&rels);
		assert_eq!(report.applied, Some(kind), "{kind} fell back");
		assert!(state.nodes.iter().all(|n| n.position().is_finite()));
		assert!(state.edges.iter().all(|e| e.route.len() >= 2));
	}
}

#[test]
fn new_render_replaces_the_previous_diagram() {
	let mut state = headless(800.0, 600.0);
	state.render_relationships(&[rel("a", "b_id", "b", "id"), rel("c", "a_id", "a", "id")]);
	state.zoom_in();
	state.render_relationships(&[rel("x", "y_id", "y", "id")]);
	assert_eq!(state.nodes.len(), 2);
	assert_eq!(state.edges.len(), 1);
	assert_ne!(state.transform, ViewTransform { x: 0.0, y: 0.0, k: 1.1 });
	assert!(to_svg(&state).contains(">x</text>"));
}
