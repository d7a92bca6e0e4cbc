//! Vector math and the force terms shared by the physics layouts.

use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use super::types::Point;

/// Displacement or force in diagram space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
	/// Horizontal component.
	pub x: f64,
	/// Vertical component.
	pub y: f64,
}

impl Vec2 {
	/// The null vector.
	pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

	/// Creates a vector.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean length.
	pub fn length(self) -> f64 {
		(self.x * self.x + self.y * self.y).sqrt()
	}

	/// Per-axis clamp to `[-limit, limit]`.
	pub fn clamp_axes(self, limit: f64) -> Self {
		Self::new(self.x.max(-limit).min(limit), self.y.max(-limit).min(limit))
	}

	/// Rescales the vector so its length does not exceed `max`.
	pub fn limit(self, max: f64) -> Self {
		let len = self.length();
		if len > 0.0 {
			self * (len.min(max) / len)
		} else {
			self
		}
	}
}

impl From<Point> for Vec2 {
	fn from(p: Point) -> Self {
		Self::new(p.x, p.y)
	}
}

impl From<Vec2> for Point {
	fn from(v: Vec2) -> Self {
		Point::new(v.x, v.y)
	}
}

impl Add for Vec2 {
	type Output = Vec2;
	fn add(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl AddAssign for Vec2 {
	fn add_assign(&mut self, rhs: Vec2) {
		self.x += rhs.x;
		self.y += rhs.y;
	}
}

impl Sub for Vec2 {
	type Output = Vec2;
	fn sub(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl SubAssign for Vec2 {
	fn sub_assign(&mut self, rhs: Vec2) {
		self.x -= rhs.x;
		self.y -= rhs.y;
	}
}

impl Mul<f64> for Vec2 {
	type Output = Vec2;
	fn mul(self, rhs: f64) -> Vec2 {
		Vec2::new(self.x * rhs, self.y * rhs)
	}
}

/// Spring pull along `delta` (source to target) toward `rest` length.
/// The result is added to the source and subtracted from the target.
pub fn spring(delta: Vec2, rest: f64, strength: f64) -> Vec2 {
	let distance = nonzero(delta.length());
	delta * ((distance - rest) / distance * strength)
}

/// Inverse-square charge between two nodes, `delta` pointing from a to b.
/// The result is added to b and subtracted from a; a negative charge repels.
pub fn charge(delta: Vec2, charge: f64) -> Vec2 {
	let distance = nonzero(delta.length());
	delta * (-charge / (distance * distance) / distance)
}

/// Pull of `pos` toward `center`.
pub fn gravity(pos: Vec2, center: Vec2, strength: f64) -> Vec2 {
	(center - pos) * strength
}

/// Fruchterman–Reingold repulsion `k²/d` along `delta`, applied to b (and negated for a).
pub fn fr_repulsion(delta: Vec2, k: f64) -> Vec2 {
	let distance = delta.length().max(1.0);
	delta * (k * k / distance / distance)
}

/// Fruchterman–Reingold attraction `d²/k` along `delta`, applied to the source.
pub fn fr_attraction(delta: Vec2, k: f64) -> Vec2 {
	let distance = delta.length().max(1.0);
	delta * (distance * distance / k / distance)
}

/// Geometric annealing schedule.
#[derive(Clone, Copy, Debug)]
pub struct Temperature {
	/// Current displacement cap.
	pub value: f64,
	/// Factor applied by each [`Temperature::cool`].
	pub cooling: f64,
}

impl Temperature {
	/// Starts at `initial`.
	pub fn new(initial: f64, cooling: f64) -> Self {
		Self {
			value: initial,
			cooling,
		}
	}

	/// Lowers the temperature by one step.
	pub fn cool(&mut self) {
		self.value *= self.cooling;
	}
}

/// Clamp without the `lo <= hi` precondition of `f64::clamp`; `lo` wins.
pub fn clamp_soft(v: f64, lo: f64, hi: f64) -> f64 {
	v.min(hi).max(lo)
}

fn nonzero(d: f64) -> f64 {
	if d == 0.0 { 1.0 } else { d }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn spring_is_zero_at_rest_length() {
		let f = spring(Vec2::new(300.0, 0.0), 300.0, 0.1);
		assert_eq!(f, Vec2::ZERO);
		// stretched springs pull the source toward the target
		assert!(spring(Vec2::new(400.0, 0.0), 300.0, 0.1).x > 0.0);
	}

	#[test]
	fn negative_charge_pushes_apart() {
		// a at the origin, b to its right: b is pushed further right
		let f = charge(Vec2::new(10.0, 0.0), -3000.0);
		assert!(f.x > 0.0);
		assert_eq!(f.y, 0.0);
		// a positive charge attracts
		assert!(charge(Vec2::new(10.0, 0.0), 3000.0).x < 0.0);
	}

	#[test]
	fn coincident_nodes_do_not_produce_nan() {
		assert!(charge(Vec2::ZERO, -3000.0).length().is_finite());
		assert!(fr_repulsion(Vec2::ZERO, 100.0).length().is_finite());
		assert!(spring(Vec2::ZERO, 300.0, 0.1).length().is_finite());
	}

	#[test]
	fn limit_and_clamp() {
		assert_eq!(Vec2::new(30.0, -40.0).limit(5.0), Vec2::new(3.0, -4.0));
		assert_eq!(Vec2::new(30.0, -4.0).clamp_axes(10.0), Vec2::new(10.0, -4.0));
		assert_eq!(clamp_soft(5.0, 10.0, 2.0), 10.0);
	}

	#[test]
	fn temperature_decays_geometrically() {
		let mut t = Temperature::new(100.0, 0.95);
		t.cool();
		t.cool();
		assert!((t.value - 90.25).abs() < 1e-9);
	}
}
