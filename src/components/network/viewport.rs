use super::types::Point;

pub const OVERLAY_MARGIN: f64 = 16.0;
pub const LEGEND_ROW_HEIGHT: f64 = 18.0;

/// Screen = graph * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, p: Point) -> Point {
		Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
	}

	pub fn graph_to_screen(&self, p: Point) -> Point {
		Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
	}

	/// Scales by `factor` within `[min, max]`, keeping the graph point under `anchor` fixed.
	pub fn zoom_at(&mut self, anchor: Point, factor: f64, min: f64, max: f64) {
		if !factor.is_finite() || factor <= 0.0 {
			return;
		}
		let new_k = (self.k * factor).max(min.min(max)).min(max.max(min));
		if !new_k.is_finite() || new_k <= 0.0 {
			return;
		}
		let ratio = new_k / self.k;
		self.x = anchor.x - (anchor.x - self.x) * ratio;
		self.y = anchor.y - (anchor.y - self.y) * ratio;
		self.k = new_k;
	}
}

/// Drawing surface size plus the pan/zoom transform applied to graph space.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
	pub transform: ViewTransform,
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	/// Graph origin starts at the surface center.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			width,
			height,
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}

	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}

	pub fn stats_anchor(&self) -> Point {
		Point::new(OVERLAY_MARGIN, OVERLAY_MARGIN + 8.0)
	}

	/// One baseline per legend row, stacked upward from the bottom-left corner.
	pub fn legend_rows(&self, count: usize) -> Vec<Point> {
		(0..count)
			.map(|i| {
				Point::new(
					OVERLAY_MARGIN,
					self.height - OVERLAY_MARGIN - (count - 1 - i) as f64 * LEGEND_ROW_HEIGHT,
				)
			})
			.collect()
	}
}
