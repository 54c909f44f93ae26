//! Gridlines on the vector surface

use super::geometry::{palette, scene};
use crate::domain::AxisMapping;
use crate::scene::{LineNode, RedrawScope, Scene, Tag};

/// Draws one horizontal line per unit of the range
#[derive(Clone, Copy, Debug)]
pub struct GridRenderer {
    stage_width: f64,
}

impl GridRenderer {
    pub fn new(stage_width: f64) -> Self {
        Self { stage_width }
    }

    /// Replace the previous gridlines. Returns how many lines were drawn,
    /// or `None` (scene untouched) when there is no usable range.
    pub fn render<S: Scene>(&self, target: &mut S, mapping: Option<&AxisMapping>) -> Option<usize> {
        let mapping = mapping?;
        let removed = target.destroy_tagged(Tag::Grid);

        let units = mapping.bounds().unit_count();
        for index in 0..=units {
            target.add_line(
                Tag::Grid,
                LineNode::horizontal(
                    mapping.unit_offset(index),
                    self.stage_width,
                    palette::GRID,
                    scene::GRID_STROKE,
                ),
            );
        }
        target.request_redraw(RedrawScope::Full);
        log::debug!("Grid redrawn: {} lines (replaced {})", units + 1, removed);
        Some(units as usize + 1)
    }
}
