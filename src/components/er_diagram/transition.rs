//! Position transitions between two layouts.

use crate::layout::Point;

/// How nodes travel to freshly computed positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
	/// Assign targets at once; used headless.
	Immediate,
	/// Quadratic ease-out after `delay` seconds, over `duration` seconds.
	Eased {
		/// Seconds before nodes start moving.
		delay: f64,
		/// Seconds the move takes.
		duration: f64,
	},
}

impl Default for Motion {
	fn default() -> Self {
		Motion::Eased {
			delay: 0.05,
			duration: 0.5,
		}
	}
}

fn ease_out_quad(t: f64) -> f64 {
	t * (2.0 - t)
}

/// Nodes on their way from one set of positions to another.
#[derive(Clone, Debug)]
pub struct Transition {
	from: Vec<Point>,
	to: Vec<Point>,
	elapsed: f64,
	delay: f64,
	duration: f64,
}

impl Transition {
	/// `None` when `motion` is immediate or nothing moves.
	pub fn new(from: Vec<Point>, to: Vec<Point>, motion: Motion) -> Option<Self> {
		let Motion::Eased { delay, duration } = motion else {
			return None;
		};
		if from == to || from.len() != to.len() {
			return None;
		}
		Some(Self {
			from,
			to,
			elapsed: 0.0,
			delay,
			duration,
		})
	}

	/// Final positions.
	pub fn targets(&self) -> &[Point] {
		&self.to
	}

	/// True once the eased time has run out.
	pub fn is_finished(&self) -> bool {
		self.elapsed >= self.delay + self.duration
	}

	/// Advances by `dt` seconds and returns the interpolated positions.
	pub fn advance(&mut self, dt: f64) -> Vec<Point> {
		self.elapsed += dt;
		let t = if self.duration <= 0.0 {
			1.0
		} else {
			((self.elapsed - self.delay) / self.duration).clamp(0.0, 1.0)
		};
		let e = ease_out_quad(t);
		self.from
			.iter()
			.zip(&self.to)
			.map(|(a, b)| Point::new(a.x + (b.x - a.x) * e, a.y + (b.y - a.y) * e))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pair() -> (Vec<Point>, Vec<Point>) {
		(vec![Point::new(0.0, 0.0)], vec![Point::new(100.0, 50.0)])
	}

	#[test]
	fn immediate_motion_has_no_transition() {
		let (from, to) = pair();
		assert!(Transition::new(from, to, Motion::Immediate).is_none());
	}

	#[test]
	fn holds_during_delay_then_reaches_target() {
		let (from, to) = pair();
		let mut t = Transition::new(from, to.clone(), Motion::default()).unwrap();
		assert_eq!(t.advance(0.04), vec![Point::new(0.0, 0.0)]);
		let mid = t.advance(0.26);
		assert!(mid[0].x > 50.0 && mid[0].x < 100.0);
		assert!(!t.is_finished());
		assert_eq!(t.advance(0.3), to);
		assert!(t.is_finished());
	}
}
