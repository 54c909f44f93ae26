//! Controls that mirror engine state back to the user

use crate::zoom::ZoomDisplay;

pub trait ControlDisplay: ZoomDisplay {
    /// Ruler scale label, e.g. `"150%"`
    fn show_ruler_scale(&mut self, label: &str);

    /// A new empty upload slot appeared
    fn show_slot_added(&mut self, label: &str);

    /// Opacity slider and label of one slot
    fn show_slot_opacity(&mut self, label: &str, pct: u8);
}
