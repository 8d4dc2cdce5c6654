#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_from(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Pixel point inside this size expressed as a fraction of each extent.
    pub fn fraction_of(&self, point: Point) -> Point {
        if self.is_empty() {
            return Point::ORIGIN;
        }
        Point::new(point.x / self.width, point.y / self.height)
    }

    pub fn scale(&self, fraction: Point) -> Point {
        Point::new(fraction.x * self.width, fraction.y * self.height)
    }

    pub fn scale_size(&self, fraction: Size) -> Size {
        Size::new(fraction.width * self.width, fraction.height * self.height)
    }
}

/// Bounds `value` to `[min, max]`; an inverted range collapses to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min || max < min {
        return min;
    }
    if value > max {
        return max;
    }
    value
}
