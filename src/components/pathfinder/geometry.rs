/// A position on the canvas plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		(other.x - self.x).hypot(other.y - self.y)
	}

	pub fn midpoint(self, other: Point) -> Point {
		Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
	}
}

/// Shortest distance from `p` to the segment `a`–`b`.
///
/// Projects `p` onto the segment and clamps the parameter to `[0, 1]`, so
/// vertical, horizontal and zero-length segments need no special case.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
	// endpoint order must not change the result
	let (a, b) = if (a.x, a.y) <= (b.x, b.y) { (a, b) } else { (b, a) };
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len_sq = dx * dx + dy * dy;
	if len_sq == 0.0 {
		return p.distance(a);
	}
	let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
	p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}
