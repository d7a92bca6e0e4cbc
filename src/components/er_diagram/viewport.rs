//! Pan and zoom of the diagram view.

use crate::layout::{Canvas, Node, Point};

/// Scale change of one zoom button press.
pub const ZOOM_STEP: f64 = 0.1;
/// Smallest scale reachable with the zoom buttons.
pub const MIN_ZOOM: f64 = 0.3;
/// Largest scale reachable with the zoom buttons.
pub const MAX_ZOOM: f64 = 2.0;
/// Scale factor of one wheel notch.
pub const WHEEL_FACTOR: f64 = 1.1;

/// Margin kept around the content by "Fit".
pub const FIT_PADDING: f64 = 50.0;
/// Lower scale bound of a fit.
pub const FIT_MIN_SCALE: f64 = 0.2;
/// Upper scale bound of "Fit".
pub const FIT_MAX_SCALE: f64 = 1.5;
/// Scale cap for the automatic fit that follows a layout.
pub const LAYOUT_FIT_MAX_SCALE: f64 = 1.3;

/// Graph-space bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	/// Left edge.
	pub min_x: f64,
	/// Top edge.
	pub min_y: f64,
	/// Right edge.
	pub max_x: f64,
	/// Bottom edge.
	pub max_y: f64,
}

impl Bounds {
	/// Box around every entity; `None` when there are none.
	pub fn of_nodes(nodes: &[Node]) -> Option<Bounds> {
		nodes.iter().fold(None, |acc, n| {
			let b = Bounds {
				min_x: n.x,
				min_y: n.y,
				max_x: n.x + n.width,
				max_y: n.y + n.height,
			};
			Some(match acc {
				None => b,
				Some(a) => Bounds {
					min_x: a.min_x.min(b.min_x),
					min_y: a.min_y.min(b.min_y),
					max_x: a.max_x.max(b.max_x),
					max_y: a.max_y.max(b.max_y),
				},
			})
		})
	}

	/// Horizontal extent.
	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	/// Vertical extent.
	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}
}

/// Screen = graph * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal offset in screen pixels.
	pub x: f64,
	/// Vertical offset in screen pixels.
	pub y: f64,
	/// Scale.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

impl ViewTransform {
	/// Inverse of the transform.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// One step larger, capped at [`MAX_ZOOM`].
	pub fn zoom_in(&mut self) {
		self.k = (self.k + ZOOM_STEP).min(MAX_ZOOM);
	}

	/// One step smaller, floored at [`MIN_ZOOM`].
	pub fn zoom_out(&mut self) {
		self.k = (self.k - ZOOM_STEP).max(MIN_ZOOM);
	}

	/// Zooms by one wheel notch keeping the graph point under the cursor fixed.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 1.0 / WHEEL_FACTOR } else { WHEEL_FACTOR };
		let new_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}

	/// Scales and centers `bounds` inside `canvas` with `padding` on every
	/// side. Returns `false` and leaves the transform alone when there is
	/// nothing to fit.
	pub fn fit(&mut self, bounds: Option<Bounds>, canvas: Canvas, padding: f64, min: f64, max: f64) -> bool {
		let Some(b) = bounds else {
			return false;
		};
		let (bw, bh) = (b.width().max(1.0), b.height().max(1.0));
		let avail_w = (canvas.width - 2.0 * padding).max(1.0);
		let avail_h = (canvas.height - 2.0 * padding).max(1.0);
		let k = (avail_w / bw).min(avail_h / bh).clamp(min, max);
		if !k.is_finite() {
			return false;
		}
		self.k = k;
		self.x = (canvas.width - bw * k) / 2.0 - b.min_x * k;
		self.y = (canvas.height - bh * k) / 2.0 - b.min_y * k;
		true
	}

	/// The "Fit" button.
	pub fn fit_to_content(&mut self, nodes: &[Node], canvas: Canvas) -> bool {
		self.fit(Bounds::of_nodes(nodes), canvas, FIT_PADDING, FIT_MIN_SCALE, FIT_MAX_SCALE)
	}

	/// Fit used after a layout settles; padding follows the canvas size.
	pub fn fit_after_layout(&mut self, nodes: &[Node], canvas: Canvas) -> bool {
		let padding = (canvas.width.min(canvas.height) * 0.04).clamp(30.0, 60.0);
		self.fit(Bounds::of_nodes(nodes), canvas, padding, FIT_MIN_SCALE, LAYOUT_FIT_MAX_SCALE)
	}
}
