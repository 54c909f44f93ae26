//! Numeric range of the scale and its mapping onto the stage height

/// Unit count past which one tick and one gridline per unit gets expensive
pub const LARGE_UNIT_COUNT: i64 = 100_000;

/// Raw range inputs as last entered; either bound may be non-numeric
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RangeModel {
    min: Option<i64>,
    max: Option<i64>,
}

impl RangeModel {
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    /// Replace both bounds. Returns whether the resulting range is usable.
    pub fn set_bounds(&mut self, min: Option<i64>, max: Option<i64>) -> bool {
        self.min = min;
        self.max = max;
        self.bounds().is_some()
    }

    pub fn set_min(&mut self, min: Option<i64>) -> bool {
        self.set_bounds(min, self.max)
    }

    pub fn set_max(&mut self, max: Option<i64>) -> bool {
        self.set_bounds(self.min, max)
    }

    pub fn min(&self) -> Option<i64> {
        self.min
    }

    pub fn max(&self) -> Option<i64> {
        self.max
    }

    /// The validated bounds, or `None` while the inputs are unusable
    pub fn bounds(&self) -> Option<RangeBounds> {
        RangeBounds::new(self.min?, self.max?)
    }
}

/// A range with `min < max`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeBounds {
    min: i64,
    max: i64,
}

impl RangeBounds {
    pub fn new(min: i64, max: i64) -> Option<Self> {
        // unit_count must fit in i64
        (min < max && max.checked_sub(min).is_some()).then_some(Self { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn unit_count(&self) -> i64 {
        self.max - self.min
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Whether a redraw would emit more than [`LARGE_UNIT_COUNT`] ticks
    pub fn is_large(&self) -> bool {
        self.unit_count() > LARGE_UNIT_COUNT
    }

    /// Every integer value of the range, `min` first
    pub fn values(&self) -> impl Iterator<Item = i64> {
        self.min..=self.max
    }

    /// Project the range onto a surface of the given pixel height
    pub fn mapping(self, surface_height: f64) -> AxisMapping {
        AxisMapping {
            bounds: self,
            surface_height,
        }
    }
}

/// Linear value <-> pixel projection for one range and surface height
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisMapping {
    bounds: RangeBounds,
    surface_height: f64,
}

impl AxisMapping {
    pub fn bounds(&self) -> RangeBounds {
        self.bounds
    }

    pub fn surface_height(&self) -> f64 {
        self.surface_height
    }

    pub fn pixels_per_unit(&self) -> f64 {
        self.surface_height / self.bounds.unit_count() as f64
    }

    /// Offset of `value` from the top of the surface. The distance from
    /// `min` is taken in integers so large bounds keep unit spacing.
    pub fn value_to_pixel(&self, value: i64) -> f64 {
        self.unit_offset(value.saturating_sub(self.bounds.min))
    }

    /// Nearest range value at pixel offset `y`, clamped to the range
    pub fn pixel_to_value(&self, y: f64) -> i64 {
        let index = (y / self.pixels_per_unit()).round();
        let index = index.clamp(0.0, self.bounds.unit_count() as f64) as i64;
        self.bounds.min.saturating_add(index).min(self.bounds.max)
    }

    /// Pixel offset of the `index`-th unit from the top of the surface.
    /// The last unit sits exactly on the bottom edge.
    pub fn unit_offset(&self, index: i64) -> f64 {
        if index == self.bounds.unit_count() {
            return self.surface_height;
        }
        index as f64 * self.pixels_per_unit()
    }
}
