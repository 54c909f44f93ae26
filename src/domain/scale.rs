//! Independent scale factors of the stage

/// Smallest page zoom factor
pub const MIN_PAGE_SCALE: f64 = 0.05;
/// Largest page zoom factor
pub const MAX_PAGE_SCALE: f64 = 5.0;

/// Whole-view zoom factor, always within `[MIN_PAGE_SCALE, MAX_PAGE_SCALE]`
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct PageScale(f64);

impl PageScale {
    pub const IDENTITY: PageScale = PageScale(1.0);

    /// Clamp `value` into the allowed zoom range; NaN reads as 100%
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::IDENTITY;
        }
        Self(value.clamp(MIN_PAGE_SCALE, MAX_PAGE_SCALE))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Rounded percentage, as shown on the zoom slider
    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

impl Default for PageScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Scale factors shared by the renderers.
///
/// The page scale only transforms the composed view; the ruler scale only
/// changes the ruler strip. Neither is derived from the other, and neither
/// affects the range's pixel-per-unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleState {
    page: PageScale,
    ruler: f64,
}

impl ScaleState {
    pub fn page(&self) -> PageScale {
        self.page
    }

    pub fn set_page(&mut self, value: f64) -> PageScale {
        self.page = PageScale::clamped(value);
        self.page
    }

    pub fn ruler(&self) -> f64 {
        self.ruler
    }

    /// Set the ruler scale. Non-finite or non-positive values are refused.
    pub fn set_ruler(&mut self, value: f64) -> bool {
        if value.is_finite() && value > 0.0 {
            self.ruler = value;
            true
        } else {
            false
        }
    }

    /// Ruler scale as a rounded percentage label, e.g. `"150%"`
    pub fn ruler_label(&self) -> String {
        format!("{}%", (self.ruler * 100.0).round())
    }
}

impl Default for ScaleState {
    fn default() -> Self {
        Self {
            page: PageScale::IDENTITY,
            ruler: 1.0,
        }
    }
}
