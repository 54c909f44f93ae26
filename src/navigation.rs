//! Navigating to a value on the scale

use crate::domain::AxisMapping;
use crate::render::geometry::{palette, scene};
use crate::scene::{LineNode, NodeId, NodeKind, RedrawScope, Scene, Tag};

/// Scrolling container around the composed view
pub trait Viewport {
    /// Visible height of the container
    fn height(&self) -> f64;

    /// Scroll so `top` is the first visible pixel row
    fn scroll_to(&mut self, top: f64, animated: bool);
}

/// Places the single transient marker and scrolls it into view
#[derive(Debug)]
pub struct TargetLocator {
    stage_width: f64,
    marker: Option<NodeId>,
}

impl TargetLocator {
    pub fn new(stage_width: f64) -> Self {
        Self {
            stage_width,
            marker: None,
        }
    }

    /// Vertical position of the marker, if one is shown
    pub fn marker_y<S: Scene>(&self, target: &S) -> Option<f64> {
        match &target.node(self.marker?)?.kind {
            NodeKind::Line(line) => Some(line.from.y),
            _ => None,
        }
    }

    /// Center `value` in the viewport and mark it.
    ///
    /// Does nothing for a non-numeric value, a value outside the range, or
    /// while the range is unusable. Returns the marker's pixel offset.
    pub fn go_to<S: Scene, V: Viewport>(
        &mut self,
        target: &mut S,
        viewport: &mut V,
        mapping: Option<&AxisMapping>,
        value: Option<i64>,
    ) -> Option<f64> {
        let mapping = mapping?;
        let value = value?;
        if !mapping.bounds().contains(value) {
            log::debug!("Target {} outside {:?}, ignored", value, mapping.bounds());
            return None;
        }

        let y = mapping.value_to_pixel(value);
        viewport.scroll_to(y - viewport.height() / 2.0, true);

        target.destroy_tagged(Tag::Marker);
        let line = LineNode::horizontal(y, self.stage_width, palette::MARKER, scene::MARKER_STROKE)
            .dashed(scene::MARKER_DASH);
        let id = target.add_line(Tag::Marker, line);
        target.raise_to_top(id);
        target.request_redraw(RedrawScope::Full);
        self.marker = Some(id);

        log::info!("Marker placed at value {} (y = {:.1})", value, y);
        Some(y)
    }

    /// Put the marker back above content added after it
    pub fn keep_on_top<S: Scene>(&self, target: &mut S) {
        if let Some(id) = self.marker {
            target.raise_to_top(id);
        }
    }
}
