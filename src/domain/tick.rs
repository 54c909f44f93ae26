//! Ruler tick classification

/// Spacing, in units, between labeled ticks. Always at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelInterval(i64);

impl LabelInterval {
    /// Use `input` when it is a positive integer, otherwise `default`
    pub fn from_input(input: Option<i64>, default: i64) -> Self {
        match input {
            Some(value) if value >= 1 => Self(value),
            _ => {
                log::warn!("Label interval {:?} is unusable, falling back to {}", input, default);
                Self(default.max(1))
            }
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// Whether `value` falls on the interval grid
    pub fn aligns(self, value: i64) -> bool {
        value.rem_euclid(self.0) == 0
    }
}

/// One integer position on the ruler, derived from range and interval
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RulerTick {
    pub value: i64,
    /// Offset from the top of the ruler surface
    pub y: f64,
    pub is_labeled: bool,
    pub is_boundary: bool,
}

impl RulerTick {
    /// Classify `value` against the range ends and the interval
    pub fn classify(value: i64, y: f64, min: i64, max: i64, interval: LabelInterval) -> Self {
        let is_boundary = value == min || value == max;
        Self {
            value,
            y,
            is_labeled: is_boundary || interval.aligns(value),
            is_boundary,
        }
    }

    /// Emphasized ticks are drawn bold, longer, and always labeled
    pub fn is_emphasized(&self) -> bool {
        self.is_labeled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_fallback() {
        assert_eq!(LabelInterval::from_input(Some(5), 10).get(), 5);
        assert_eq!(LabelInterval::from_input(Some(0), 10).get(), 10);
        assert_eq!(LabelInterval::from_input(Some(-4), 10).get(), 10);
        assert_eq!(LabelInterval::from_input(None, 10).get(), 10);
    }

    #[test]
    fn test_alignment_handles_negative_values() {
        let interval = LabelInterval::from_input(Some(10), 10);
        assert!(interval.aligns(-20));
        assert!(interval.aligns(0));
        assert!(!interval.aligns(-15));
    }

    #[test]
    fn test_boundaries_always_labeled() {
        let interval = LabelInterval::from_input(Some(7), 10);
        let min = RulerTick::classify(3, 0.0, 3, 25, interval);
        let max = RulerTick::classify(25, 100.0, 3, 25, interval);
        let inner = RulerTick::classify(14, 50.0, 3, 25, interval);
        let plain = RulerTick::classify(15, 52.0, 3, 25, interval);

        assert!(min.is_boundary && min.is_labeled);
        assert!(max.is_boundary && max.is_labeled);
        assert!(inner.is_labeled && !inner.is_boundary);
        assert!(!plain.is_labeled);
    }
}
